use std::fmt;

/// A parsed description: exactly one root node.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}

/// `Type "content" { key: value ... Child { } ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: String,
    /// Optional inline string after the type, e.g. a label's text.
    pub content: Option<String>,
    pub props: Vec<Prop>,
    pub children: Vec<Node>,
    /// 1-based line of the type name.
    pub line: usize,
}

impl Node {
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.iter().rev().find(|p| p.key == key).map(|p| &p.value)
    }

    /// Properties flattened to `key -> string` pairs, later keys winning.
    pub fn params(&self) -> Vec<(String, String)> {
        self.props
            .iter()
            .map(|p| (p.key.clone(), p.value.to_string()))
            .collect()
    }

    /// Depth-first count of this node and its descendants.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(f32),
    Ident(String),
    /// Straight-alpha bytes from `#rrggbb` / `#rrggbbaa`.
    Color([u8; 4]),
    /// `(a, b, ...)`, e.g. `(0.5, 0.5, 0, 0)` for a unified vector.
    Tuple(Vec<f32>),
}

/// The string form consumed by parameter dictionaries.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) | Value::Ident(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Color([r, g, b, a]) => write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}"),
            Value::Tuple(items) => {
                for (i, n) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{n}")?;
                }
                Ok(())
            }
        }
    }
}
