//! Literal expression parsing for option values.
//!
//! Option text such as `4`, `True`, `['a', 'b']` or `{'mtu': 1400}` is read
//! as a *literal*: a constant written in a small expression syntax with no
//! names, calls or operators (apart from a sign in front of a number).  The
//! grammar is Python's literal syntax, so booleans and none are spelled
//! `True`, `False` and `None`.
//!
//! [`parse_literal`] is what the configuration store uses: it returns `None`
//! for anything that is not a literal and the caller keeps the raw text.
//! [`try_parse_literal`] exposes the reason a string was rejected.
//!
//! ```rust
//! use ovn_k8s_config::{parse_literal, Value};
//!
//! assert_eq!(parse_literal("[3,4]"), Some(Value::List(vec![Value::Int(3), Value::Int(4)])));
//! assert_eq!(parse_literal("3,4"), None);
//! assert_eq!(parse_literal("true"), None);
//! ```

pub mod lexer;
pub mod parser;

use thiserror::Error;

use crate::domain::value::Value;

/// Why a string is not a literal.  Positions are character offsets.
#[derive(Debug, Error, PartialEq)]
pub enum LiteralError {
    /// The text is empty or only whitespace and comments.
    #[error("empty expression")]
    Empty,

    #[error("unexpected character {ch:?} at {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    /// A name other than `True`, `False` or `None`.
    #[error("name {name:?} at {pos} is not a literal")]
    UnknownName { pos: usize, name: String },

    #[error("unsupported string prefix {prefix:?} at {pos}")]
    UnsupportedPrefix { pos: usize, prefix: String },

    #[error("unterminated string starting at {pos}")]
    UnterminatedString { pos: usize },

    #[error("invalid escape {escape:?} at {pos}")]
    InvalidEscape { pos: usize, escape: String },

    #[error("non-ASCII character in bytes literal at {pos}")]
    NonAsciiBytes { pos: usize },

    #[error("invalid number {text:?} at {pos}")]
    InvalidNumber { pos: usize, text: String },

    #[error("expected {expected} at {pos}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: &'static str,
        found: String,
    },

    /// A sign applied to something other than a number literal.
    #[error("unary sign at {pos} must be followed by a number")]
    InvalidOperand { pos: usize },

    /// `'text' b'bytes'` concatenation.
    #[error("cannot mix str and bytes literals at {pos}")]
    MixedStringTypes { pos: usize },

    /// A list, dict or set used as a dict key or set member.
    #[error("unhashable {type_name} at {pos}")]
    Unhashable { pos: usize, type_name: &'static str },

    /// `a, b` without enclosing brackets.
    #[error("bare comma-separated sequence at {pos}")]
    BareTuple { pos: usize },

    #[error("trailing input at {pos}")]
    TrailingInput { pos: usize },

    #[error("nesting deeper than {max} levels at {pos}")]
    TooDeep { pos: usize, max: usize },
}

/// Parses `text` as a literal, returning `None` if it is not one.
///
/// Never fails: every rejection reason collapses into `None`.
pub fn parse_literal(text: &str) -> Option<Value> {
    try_parse_literal(text).ok()
}

/// Parses `text` as a literal.
///
/// # Errors
///
/// Returns a [`LiteralError`] describing the first reason `text` is not a
/// literal.
pub fn try_parse_literal(text: &str) -> Result<Value, LiteralError> {
    let tokens = lexer::tokenize(text)?;
    parser::Parser::new(tokens).parse_top_level()
}
