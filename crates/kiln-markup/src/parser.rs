use crate::ast::{Document, Node, Prop, Value};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    /// Error positioned at the token just consumed.
    fn err_prev(&self, msg: impl Into<String>) -> ParseError {
        let t = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i));
        let (line, col) = t.map(|t| (t.line, t.col)).unwrap_or((1, 1));
        ParseError::new(msg, line, col)
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        let root = self.parse_node()?;
        match self.peek() {
            Token::Eof => Ok(Document { root }),
            tok => Err(self.err(format!("expected end of file after root node, got {tok:?}"))),
        }
    }

    // ── Node ──────────────────────────────────────────────────────────────

    fn parse_node(&mut self) -> Result<Node, ParseError> {
        let (line, _) = self.current_pos();
        let kind = match self.advance() {
            Token::Ident(s) => s,
            tok => return Err(self.err_prev(format!("expected a view type, got {tok:?}"))),
        };

        let content = match self.peek() {
            Token::Str(s) => {
                let s = s.clone();
                self.advance();
                Some(s)
            }
            _ => None,
        };

        let (props, children) = if self.peek() == &Token::LBrace {
            self.parse_block()?
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(Node { kind, content, props, children, line })
    }

    // ── Block ─────────────────────────────────────────────────────────────

    /// `{ item* }`: `Ident ":"` starts a property, any other `Ident` a child.
    fn parse_block(&mut self) -> Result<(Vec<Prop>, Vec<Node>), ParseError> {
        self.advance();
        let mut props = Vec::new();
        let mut children = Vec::new();

        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => return Err(self.err("unclosed '{' block")),
                Token::Ident(_) if self.peek_ahead(1) == &Token::Colon => {
                    props.push(self.parse_prop()?);
                }
                Token::Ident(_) => children.push(self.parse_node()?),
                tok => {
                    return Err(self.err(format!(
                        "unexpected {tok:?} inside block; expected `key: value` or a view type"
                    )));
                }
            }
        }

        Ok((props, children))
    }

    // ── Prop ──────────────────────────────────────────────────────────────

    fn parse_prop(&mut self) -> Result<Prop, ParseError> {
        let key = match self.advance() {
            Token::Ident(s) => s,
            tok => return Err(self.err_prev(format!("expected a property name, got {tok:?}"))),
        };
        self.advance();
        let value = self.parse_value()?;
        Ok(Prop { key, value })
    }

    // ── Value ─────────────────────────────────────────────────────────────

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.advance() {
            Token::Str(s) => Ok(Value::Str(s)),
            Token::Number(n) => Ok(Value::Number(n)),
            Token::Color(c) => Ok(Value::Color(c)),
            Token::Ident(s) => Ok(Value::Ident(s)),
            Token::LParen => self.parse_tuple(),
            tok => Err(self.err_prev(format!("expected a value, got {tok:?}"))),
        }
    }

    fn parse_tuple(&mut self) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        loop {
            match self.advance() {
                Token::Number(n) => items.push(n),
                Token::RParen if items.is_empty() => break,
                tok => return Err(self.err_prev(format!("expected a number in tuple, got {tok:?}"))),
            }
            match self.advance() {
                Token::Comma => {}
                Token::RParen => break,
                tok => return Err(self.err_prev(format!("expected ',' or ')', got {tok:?}"))),
            }
        }
        Ok(Value::Tuple(items))
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parses `.kiln` source into a [`Document`].
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_document()
}
