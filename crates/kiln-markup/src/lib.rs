//! Lexer, parser, and AST for **Kiln view descriptions** (`.kiln`).
//!
//! Dependency-free so editor tooling can read layouts without pulling in
//! engine code.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Document`, `Node`, `Prop`, `Value` |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_str` entry point |
//!
//! ```rust
//! use kiln_markup::parse_str;
//!
//! let src = r#"
//!     VerticalList {
//!         UnifiedSize: (1, 1, 0, 0)
//!         AbsoluteSpacing: 10
//!         Label "Hello" { TextColour: #ffffffff }
//!     }
//! "#;
//!
//! let doc = parse_str(src).unwrap();
//! assert_eq!(doc.root.kind, "VerticalList");
//! assert_eq!(doc.root.children[0].content.as_deref(), Some("Hello"));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Document, Node, Prop, Value};
pub use error::ParseError;
pub use parser::parse_str;
