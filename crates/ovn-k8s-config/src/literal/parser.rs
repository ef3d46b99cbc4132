//! Recursive-descent parser turning [`Token`]s into a [`Value`].
//!
//! Grammar (informal):
//!
//! ```text
//! top      := expr NEWLINE* EOF
//! expr     := ('+' | '-') atom        -- atom must be a number literal
//!           | atom
//! atom     := INT | FLOAT | STRING+ | BYTES+ | True | False | None
//!           | '[' items? ']'
//!           | '(' ')' | '(' expr ')' | '(' expr ',' items? ')'
//!           | '{' '}' | '{' entries '}' | '{' items '}'
//! items    := expr (',' expr)* ','?
//! entries  := expr ':' expr (',' expr ':' expr)* ','?
//! ```

use num_bigint::{BigInt, BigUint};

use super::lexer::{Spanned, Token};
use super::LiteralError;
use crate::domain::value::Value;

/// Maximum bracket nesting accepted before giving up.
pub const MAX_DEPTH: usize = 200;

static EOF: Token = Token::Eof;

/// Intermediate result that remembers whether a value was written as a bare
/// number, which is the only thing a unary sign may apply to.
enum Parsed {
    Int(BigUint),
    Float(f64),
    Value(Value),
}

impl Parsed {
    fn into_value(self) -> Value {
        match self {
            Parsed::Int(magnitude) => Value::from(BigInt::from(magnitude)),
            Parsed::Float(x) => Value::Float(x),
            Parsed::Value(v) => v,
        }
    }
}

/// Parser state over a fully tokenized input.
pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Creates a parser.  `tokens` must end with [`Token::Eof`], as produced
    /// by [`super::lexer::tokenize`].
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    /// Parses exactly one literal spanning the whole input.
    ///
    /// # Errors
    ///
    /// Returns [`LiteralError`] if the tokens do not form a single literal.
    pub fn parse_top_level(&mut self) -> Result<Value, LiteralError> {
        self.skip_newlines();
        if self.peek() == &Token::Eof {
            return Err(LiteralError::Empty);
        }

        let value = self.parse_expr()?.into_value();

        if self.peek() == &Token::Comma {
            return Err(LiteralError::BareTuple { pos: self.current_pos() });
        }
        self.skip_newlines();
        if self.peek() != &Token::Eof {
            return Err(LiteralError::TrailingInput { pos: self.current_pos() });
        }
        Ok(value)
    }

    // ── Token cursor ──────────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&EOF, |s| &s.token)
    }

    fn current_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.pos)
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn skip_newlines(&mut self) {
        while self.peek() == &Token::Newline {
            self.pos += 1;
        }
    }

    fn unexpected(&self, expected: &'static str) -> LiteralError {
        LiteralError::UnexpectedToken {
            pos: self.current_pos(),
            expected,
            found: self.peek().describe(),
        }
    }

    fn enter(&mut self) -> Result<(), LiteralError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(LiteralError::TooDeep { pos: self.current_pos(), max: MAX_DEPTH });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ── Expressions ───────────────────────────────────────────────────────────

    fn parse_expr(&mut self) -> Result<Parsed, LiteralError> {
        let negative = match self.peek() {
            Token::Minus => true,
            Token::Plus => false,
            _ => return self.parse_atom(),
        };
        let sign_pos = self.current_pos();
        self.advance();

        match self.parse_atom()? {
            Parsed::Int(magnitude) => {
                let n = BigInt::from(magnitude);
                Ok(Parsed::Value(Value::from(if negative { -n } else { n })))
            }
            Parsed::Float(x) => Ok(Parsed::Value(Value::Float(if negative { -x } else { x }))),
            Parsed::Value(_) => Err(LiteralError::InvalidOperand { pos: sign_pos }),
        }
    }

    fn parse_atom(&mut self) -> Result<Parsed, LiteralError> {
        match self.peek().clone() {
            Token::Int(magnitude) => {
                self.advance();
                Ok(Parsed::Int(magnitude))
            }
            Token::Float(x) => {
                self.advance();
                Ok(Parsed::Float(x))
            }
            Token::True => {
                self.advance();
                Ok(Parsed::Value(Value::Bool(true)))
            }
            Token::False => {
                self.advance();
                Ok(Parsed::Value(Value::Bool(false)))
            }
            Token::None => {
                self.advance();
                Ok(Parsed::Value(Value::None))
            }
            Token::Str(_) | Token::Bytes(_) => self.parse_strings().map(Parsed::Value),
            Token::LBracket => self.parse_list().map(Parsed::Value),
            Token::LParen => self.parse_paren(),
            Token::LBrace => self.parse_brace().map(Parsed::Value),
            _ => Err(self.unexpected("a literal")),
        }
    }

    /// Concatenates adjacent string (or bytes) literals.
    fn parse_strings(&mut self) -> Result<Value, LiteralError> {
        let mut text: Option<String> = None;
        let mut bytes: Option<Vec<u8>> = None;

        loop {
            let pos = self.current_pos();
            match self.peek().clone() {
                Token::Str(s) => {
                    if bytes.is_some() {
                        return Err(LiteralError::MixedStringTypes { pos });
                    }
                    text.get_or_insert_with(String::new).push_str(&s);
                }
                Token::Bytes(b) => {
                    if text.is_some() {
                        return Err(LiteralError::MixedStringTypes { pos });
                    }
                    bytes.get_or_insert_with(Vec::new).extend_from_slice(&b);
                }
                _ => break,
            }
            self.advance();
        }

        match (text, bytes) {
            (Some(s), _) => Ok(Value::Str(s)),
            (None, Some(b)) => Ok(Value::Bytes(b)),
            (None, None) => Err(self.unexpected("a string")),
        }
    }

    // ── Containers ────────────────────────────────────────────────────────────

    /// Parses comma-separated items up to (and including) `close`.  The
    /// opening bracket must already be consumed.
    fn parse_items(
        &mut self,
        close: Token,
        expected: &'static str,
        mut items: Vec<Value>,
    ) -> Result<Vec<Value>, LiteralError> {
        loop {
            if self.peek() == &close {
                self.advance();
                return Ok(items);
            }
            items.push(self.parse_expr()?.into_value());
            match self.peek() {
                Token::Comma => {
                    self.advance();
                }
                t if t == &close => {}
                _ => return Err(self.unexpected(expected)),
            }
        }
    }

    fn parse_list(&mut self) -> Result<Value, LiteralError> {
        self.enter()?;
        self.advance();
        let items = self.parse_items(Token::RBracket, "',' or ']'", Vec::new())?;
        self.leave();
        Ok(Value::List(items))
    }

    fn parse_paren(&mut self) -> Result<Parsed, LiteralError> {
        self.enter()?;
        self.advance();

        if self.peek() == &Token::RParen {
            self.advance();
            self.leave();
            return Ok(Parsed::Value(Value::Tuple(Vec::new())));
        }

        let first = self.parse_expr()?;
        let result = match self.peek() {
            // Plain grouping: `(1)` is just `1`.
            Token::RParen => {
                self.advance();
                first
            }
            Token::Comma => {
                self.advance();
                let items = self.parse_items(Token::RParen, "',' or ')'", vec![first.into_value()])?;
                Parsed::Value(Value::Tuple(items))
            }
            _ => return Err(self.unexpected("',' or ')'")),
        };
        self.leave();
        Ok(result)
    }

    fn parse_brace(&mut self) -> Result<Value, LiteralError> {
        self.enter()?;
        self.advance();

        if self.peek() == &Token::RBrace {
            self.advance();
            self.leave();
            return Ok(Value::Dict(Vec::new()));
        }

        let first_pos = self.current_pos();
        let first = self.parse_expr()?.into_value();
        let value = if self.peek() == &Token::Colon {
            self.parse_dict_rest(first, first_pos)?
        } else {
            self.parse_set_rest(first, first_pos)?
        };
        self.leave();
        Ok(value)
    }

    fn parse_dict_rest(&mut self, first_key: Value, first_pos: usize) -> Result<Value, LiteralError> {
        let mut entries: Vec<(Value, Value)> = Vec::new();
        let mut key = first_key;
        let mut key_pos = first_pos;

        loop {
            if !key.is_hashable() {
                return Err(LiteralError::Unhashable { pos: key_pos, type_name: key.type_name() });
            }
            if self.peek() != &Token::Colon {
                return Err(self.unexpected("':'"));
            }
            self.advance();
            let value = self.parse_expr()?.into_value();

            // A repeated key keeps its first spelling and position and takes
            // the new value.
            match entries.iter_mut().find(|(k, _)| k.same_key(&key)) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }

            match self.peek() {
                Token::Comma => {
                    self.advance();
                }
                Token::RBrace => {}
                _ => return Err(self.unexpected("',' or '}'")),
            }
            if self.peek() == &Token::RBrace {
                self.advance();
                return Ok(Value::Dict(entries));
            }

            key_pos = self.current_pos();
            key = self.parse_expr()?.into_value();
        }
    }

    fn parse_set_rest(&mut self, first: Value, first_pos: usize) -> Result<Value, LiteralError> {
        let mut members: Vec<Value> = Vec::new();
        let mut item = first;
        let mut item_pos = first_pos;

        loop {
            if !item.is_hashable() {
                return Err(LiteralError::Unhashable { pos: item_pos, type_name: item.type_name() });
            }
            if !members.iter().any(|m| m.same_key(&item)) {
                members.push(item);
            }

            match self.peek() {
                Token::Comma => {
                    self.advance();
                }
                Token::RBrace => {}
                _ => return Err(self.unexpected("',' or '}'")),
            }
            if self.peek() == &Token::RBrace {
                self.advance();
                return Ok(Value::Set(members));
            }

            item_pos = self.current_pos();
            item = self.parse_expr()?.into_value();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use crate::domain::value::Value;
    use crate::literal::{try_parse_literal, LiteralError};

    fn parse(text: &str) -> Value {
        try_parse_literal(text).unwrap_or_else(|e| panic!("{text:?} must parse: {e}"))
    }

    fn strs(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    // ── Scalars ───────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("42"), Value::Int(42));
        assert_eq!(parse("3.14"), Value::Float(3.14));
        assert_eq!(parse("True"), Value::Bool(true));
        assert_eq!(parse("False"), Value::Bool(false));
        assert_eq!(parse("None"), Value::None);
        assert_eq!(parse("'ovn'"), Value::from("ovn"));
    }

    #[test]
    fn test_parse_signed_numbers() {
        assert_eq!(parse("-5"), Value::Int(-5));
        assert_eq!(parse("+5"), Value::Int(5));
        assert_eq!(parse("-2.5"), Value::Float(-2.5));
        assert_eq!(parse("-(1)"), Value::Int(-1));
        assert_eq!(parse("[-1, +2]"), Value::List(vec![Value::Int(-1), Value::Int(2)]));
    }

    #[test]
    fn test_parse_integers_at_i64_limits_stay_int() {
        assert_eq!(parse("9223372036854775807"), Value::Int(i64::MAX));
        assert_eq!(parse("-9223372036854775808"), Value::Int(i64::MIN));
        assert_eq!(parse("-(9223372036854775808)"), Value::Int(i64::MIN));
    }

    #[test]
    fn test_parse_integers_beyond_i64_are_big() {
        // Arrange
        let two_pow_64: BigInt = BigInt::from(1u8) << 64;

        // Act / Assert
        assert_eq!(parse("18446744073709551616"), Value::BigInt(two_pow_64.clone()));
        assert_eq!(parse("-0x1_0000_0000_0000_0000"), Value::BigInt(-two_pow_64));
        assert_eq!(parse("9223372036854775808"), Value::BigInt(BigInt::from(i64::MAX) + 1));

        let digits = "123456789012345678901234567890123456789012345";
        assert_eq!(parse(digits).to_string(), digits);
    }

    #[test]
    fn test_sign_only_applies_to_number_literals() {
        for bad in ["--1", "-(-1)", "-True", "-'a'", "+[1]", "-"] {
            assert!(try_parse_literal(bad).is_err(), "{bad:?} must be rejected");
        }
        assert!(matches!(try_parse_literal("-None"), Err(LiteralError::InvalidOperand { pos: 0 })));
    }

    #[test]
    fn test_parse_adjacent_strings_concatenate() {
        assert_eq!(parse("'a' \"b\""), Value::from("ab"));
        assert_eq!(parse("b'a' b'b'"), Value::Bytes(b"ab".to_vec()));
        assert!(matches!(
            try_parse_literal("'a' b'b'"),
            Err(LiteralError::MixedStringTypes { .. })
        ));
    }

    // ── Containers ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_list() {
        assert_eq!(parse("[3,4]"), Value::List(vec![Value::Int(3), Value::Int(4)]));
        assert_eq!(parse("[]"), Value::List(vec![]));
        assert_eq!(parse("[\"a\",\"b\",]"), Value::List(strs(&["a", "b"])));
    }

    #[test]
    fn test_parse_tuple_forms() {
        assert_eq!(parse("()"), Value::Tuple(vec![]));
        assert_eq!(parse("(1,)"), Value::Tuple(vec![Value::Int(1)]));
        assert_eq!(parse("(1, 'a')"), Value::Tuple(vec![Value::Int(1), Value::from("a")]));
        // Parentheses alone only group.
        assert_eq!(parse("(1)"), Value::Int(1));
        assert_eq!(parse("((('x')))"), Value::from("x"));
    }

    #[test]
    fn test_parse_dict_and_set() {
        assert_eq!(parse("{}"), Value::Dict(vec![]));
        assert_eq!(
            parse("{'a': 1, 'b': [True]}"),
            Value::Dict(vec![
                (Value::from("a"), Value::Int(1)),
                (Value::from("b"), Value::List(vec![Value::Bool(true)])),
            ])
        );
        assert_eq!(parse("{1, 2, 2, 1}"), Value::Set(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_set_members_equal_by_numeric_value_collapse() {
        assert_eq!(parse("{1, 1.0, True}"), Value::Set(vec![Value::Int(1)]));
        assert_eq!(
            parse("{False, 0, (1, 'a'), (True, 'a')}"),
            Value::Set(vec![
                Value::Bool(false),
                Value::Tuple(vec![Value::Int(1), Value::from("a")]),
            ])
        );
        assert_eq!(
            parse("{1, '1', 2.5}"),
            Value::Set(vec![Value::Int(1), Value::from("1"), Value::Float(2.5)])
        );
    }

    #[test]
    fn test_dict_keys_equal_by_numeric_value_merge() {
        assert_eq!(
            parse("{1: 'a', True: 'b'}"),
            Value::Dict(vec![(Value::Int(1), Value::from("b"))])
        );
        assert_eq!(
            parse("{2.0: 'x', 2: 'y', 3: 'z'}"),
            Value::Dict(vec![
                (Value::Float(2.0), Value::from("y")),
                (Value::Int(3), Value::from("z")),
            ])
        );
    }

    #[test]
    fn test_duplicate_dict_key_keeps_first_position_and_last_value() {
        assert_eq!(
            parse("{'a': 1, 'b': 2, 'a': 3}"),
            Value::Dict(vec![
                (Value::from("a"), Value::Int(3)),
                (Value::from("b"), Value::Int(2)),
            ])
        );
    }

    #[test]
    fn test_unhashable_keys_and_members_are_rejected() {
        assert!(matches!(
            try_parse_literal("{[1]: 2}"),
            Err(LiteralError::Unhashable { type_name: "list", .. })
        ));
        assert!(matches!(
            try_parse_literal("{1, {2: 3}}"),
            Err(LiteralError::Unhashable { type_name: "dict", .. })
        ));
        assert!(matches!(
            try_parse_literal("{(1, [2]): 0}"),
            Err(LiteralError::Unhashable { type_name: "tuple", .. })
        ));
        assert_eq!(
            parse("{(1, 2): 'pair'}"),
            Value::Dict(vec![(
                Value::Tuple(vec![Value::Int(1), Value::Int(2)]),
                Value::from("pair")
            )])
        );
    }

    #[test]
    fn test_container_may_span_lines() {
        assert_eq!(parse("[\n'a',\n'b'\n]"), Value::List(strs(&["a", "b"])));
    }

    // ── Rejections ────────────────────────────────────────────────────────────

    #[test]
    fn test_bare_comma_sequence_is_rejected() {
        assert!(matches!(try_parse_literal("3,4"), Err(LiteralError::BareTuple { pos: 1 })));
        assert!(matches!(try_parse_literal("1,"), Err(LiteralError::BareTuple { .. })));
    }

    #[test]
    fn test_empty_and_blank_inputs_are_rejected() {
        assert_eq!(try_parse_literal(""), Err(LiteralError::Empty));
        assert_eq!(try_parse_literal("   "), Err(LiteralError::Empty));
        assert_eq!(try_parse_literal("# only a comment"), Err(LiteralError::Empty));
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        assert!(matches!(try_parse_literal("1 2"), Err(LiteralError::TrailingInput { .. })));
        assert!(matches!(try_parse_literal("1\n2"), Err(LiteralError::TrailingInput { .. })));
        assert!(matches!(try_parse_literal("[1] ]"), Err(LiteralError::TrailingInput { .. })));
    }

    #[test]
    fn test_malformed_containers_are_rejected() {
        for bad in ["[1", "[1 2]", "(1 2)", "{1: }", "{1: 2, 3}", "{'a' 1}", "[,]", "(,)", ")"] {
            assert!(try_parse_literal(bad).is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn test_excessive_nesting_is_rejected() {
        let deep = format!("{}{}", "[".repeat(500), "]".repeat(500));
        assert!(matches!(try_parse_literal(&deep), Err(LiteralError::TooDeep { max: 200, .. })));

        let ok = format!("{}{}", "[".repeat(50), "]".repeat(50));
        assert!(try_parse_literal(&ok).is_ok());
    }
}
