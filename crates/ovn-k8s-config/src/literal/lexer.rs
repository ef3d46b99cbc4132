//! Tokenizer for literal expressions.
//!
//! Splits option text into [`Token`]s: brackets, separators, unary signs,
//! numbers, quoted strings and the three keywords `True`, `False`, `None`.
//! Any other name is rejected here, which is what makes `true`, `eth0` or
//! `/path/to/file` fall back to plain strings.
//!
//! Newlines are significant only outside brackets.  Inside `[...]`, `(...)`
//! and `{...}` a value may span several (INI continuation) lines.

use num_bigint::BigUint;

use super::LiteralError;

/// A single lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Plus,
    Minus,
    /// Unsigned integer magnitude of any size; the sign is applied by the
    /// parser.
    Int(BigUint),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    True,
    False,
    None,
    /// Line break outside any bracket.
    Newline,
    Eof,
}

impl Token {
    /// Human-readable token description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::LBracket => "'['".into(),
            Token::RBracket => "']'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::LBrace => "'{'".into(),
            Token::RBrace => "'}'".into(),
            Token::Comma => "','".into(),
            Token::Colon => "':'".into(),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Int(n) => format!("integer {n}"),
            Token::Float(x) => format!("float {x}"),
            Token::Str(_) => "string".into(),
            Token::Bytes(_) => "bytes".into(),
            Token::True => "True".into(),
            Token::False => "False".into(),
            Token::None => "None".into(),
            Token::Newline => "newline".into(),
            Token::Eof => "end of input".into(),
        }
    }
}

/// A token together with the character offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Tokenizes `text` completely.  The returned vector always ends with
/// [`Token::Eof`].
///
/// # Errors
///
/// Returns the first [`LiteralError`] encountered.
pub fn tokenize(text: &str) -> Result<Vec<Spanned>, LiteralError> {
    Lexer::new(text).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
    tokens: Vec<Spanned>,
}

impl Lexer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
            tokens: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, token: Token, pos: usize) {
        self.tokens.push(Spanned { token, pos });
    }

    fn run(mut self) -> Result<Vec<Spanned>, LiteralError> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                ' ' | '\t' | '\x0c' => self.pos += 1,
                '\r' | '\n' => {
                    self.pos += 1;
                    if c == '\r' && self.peek() == Some('\n') {
                        self.pos += 1;
                    }
                    if self.depth == 0 {
                        self.push(Token::Newline, start);
                    }
                }
                '#' => {
                    while !matches!(self.peek(), None | Some('\n') | Some('\r')) {
                        self.pos += 1;
                    }
                }
                '\\' => {
                    // Explicit line joining.
                    self.pos += 1;
                    match self.peek() {
                        Some('\n') => self.pos += 1,
                        Some('\r') => {
                            self.pos += 1;
                            if self.peek() == Some('\n') {
                                self.pos += 1;
                            }
                        }
                        _ => return Err(LiteralError::UnexpectedChar { pos: start, ch: '\\' }),
                    }
                }
                '[' | '(' | '{' => {
                    self.pos += 1;
                    self.depth += 1;
                    let token = match c {
                        '[' => Token::LBracket,
                        '(' => Token::LParen,
                        _ => Token::LBrace,
                    };
                    self.push(token, start);
                }
                ']' | ')' | '}' => {
                    self.pos += 1;
                    self.depth = self.depth.saturating_sub(1);
                    let token = match c {
                        ']' => Token::RBracket,
                        ')' => Token::RParen,
                        _ => Token::RBrace,
                    };
                    self.push(token, start);
                }
                ',' => {
                    self.pos += 1;
                    self.push(Token::Comma, start);
                }
                ':' => {
                    self.pos += 1;
                    self.push(Token::Colon, start);
                }
                '+' => {
                    self.pos += 1;
                    self.push(Token::Plus, start);
                }
                '-' => {
                    self.pos += 1;
                    self.push(Token::Minus, start);
                }
                '\'' | '"' => {
                    let token = self.lex_string(StringPrefix::default())?;
                    self.push(token, start);
                }
                '0'..='9' => {
                    let token = self.lex_number()?;
                    self.push(token, start);
                }
                '.' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => {
                    let token = self.lex_number()?;
                    self.push(token, start);
                }
                c if is_name_start(c) => {
                    let token = self.lex_name()?;
                    self.push(token, start);
                }
                other => return Err(LiteralError::UnexpectedChar { pos: start, ch: other }),
            }
        }
        let end = self.pos;
        self.push(Token::Eof, end);
        Ok(self.tokens)
    }

    // ── Names and keywords ────────────────────────────────────────────────────

    fn lex_name(&mut self) -> Result<Token, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(is_name_continue) {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        if matches!(self.peek(), Some('\'') | Some('"')) {
            let prefix = StringPrefix::parse(&name).ok_or_else(|| {
                LiteralError::UnsupportedPrefix { pos: start, prefix: name.clone() }
            })?;
            return self.lex_string(prefix);
        }

        match name.as_str() {
            "True" => Ok(Token::True),
            "False" => Ok(Token::False),
            "None" => Ok(Token::None),
            _ => Err(LiteralError::UnknownName { pos: start, name }),
        }
    }

    // ── Numbers ───────────────────────────────────────────────────────────────

    fn lex_number(&mut self) -> Result<Token, LiteralError> {
        let start = self.pos;

        if self.peek() == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                return self.lex_prefixed_int(start, radix);
            }
        }

        let int_part = self.take_digits(start, true)?;
        let mut is_float = false;

        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.take_digits(start, false)?;
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let save = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.pos += 1;
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.take_digits(start, false)?;
            } else {
                self.pos = save;
                return Err(self.invalid_number(start));
            }
        }

        // Imaginary literals and identifiers glued to a number (`1j`, `3abc`).
        if self.peek().is_some_and(is_name_continue) {
            self.pos += 1;
            return Err(self.invalid_number(start));
        }

        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|&&c| c != '_')
            .collect();

        if is_float {
            return text
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| self.invalid_number(start));
        }

        // Decimal integers other than zero may not start with `0`.
        if int_part.len() > 1 && int_part.starts_with('0') && int_part.chars().any(|c| c != '0') {
            return Err(self.invalid_number(start));
        }
        BigUint::parse_bytes(text.as_bytes(), 10)
            .map(Token::Int)
            .ok_or_else(|| self.invalid_number(start))
    }

    fn lex_prefixed_int(&mut self, start: usize, radix: u32) -> Result<Token, LiteralError> {
        let mut digits = String::new();
        // One underscore may directly follow the base prefix (`0x_ff`).
        let mut prev_underscore = false;
        while let Some(c) = self.peek() {
            if c == '_' {
                if prev_underscore {
                    self.pos += 1;
                    return Err(self.invalid_number(start));
                }
                prev_underscore = true;
                self.pos += 1;
            } else if c.is_digit(radix) {
                digits.push(c);
                prev_underscore = false;
                self.pos += 1;
            } else if c.is_ascii_alphanumeric() {
                self.pos += 1;
                return Err(self.invalid_number(start));
            } else {
                break;
            }
        }
        if digits.is_empty() || prev_underscore {
            return Err(self.invalid_number(start));
        }
        BigUint::parse_bytes(digits.as_bytes(), radix)
            .map(Token::Int)
            .ok_or_else(|| self.invalid_number(start))
    }

    /// Consumes a run of decimal digits with single `_` separators between
    /// digits.  Returns the digits without separators.
    fn take_digits(&mut self, start: usize, required: bool) -> Result<String, LiteralError> {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.pos += 1;
            } else if c == '_' {
                let next_is_digit = self.peek_at(1).is_some_and(|d| d.is_ascii_digit());
                if digits.is_empty() || !next_is_digit {
                    self.pos += 1;
                    return Err(self.invalid_number(start));
                }
                self.pos += 1;
            } else {
                break;
            }
        }
        if required && digits.is_empty() && self.peek() != Some('.') {
            return Err(self.invalid_number(start));
        }
        Ok(digits)
    }

    fn invalid_number(&self, start: usize) -> LiteralError {
        LiteralError::InvalidNumber {
            pos: start,
            text: self.chars[start..self.pos.min(self.chars.len())].iter().collect(),
        }
    }

    // ── Strings ───────────────────────────────────────────────────────────────

    /// Lexes a quoted string starting at the opening quote.
    fn lex_string(&mut self, prefix: StringPrefix) -> Result<Token, LiteralError> {
        let start = self.pos;
        let quote = self.peek().ok_or(LiteralError::UnterminatedString { pos: start })?;
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let mut out = String::new();
        loop {
            let c = self.peek().ok_or(LiteralError::UnterminatedString { pos: start })?;
            if c == quote {
                if !triple {
                    self.pos += 1;
                    break;
                }
                if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                    self.pos += 3;
                    break;
                }
                out.push(c);
                self.pos += 1;
                continue;
            }
            if (c == '\n' || c == '\r') && !triple {
                return Err(LiteralError::UnterminatedString { pos: start });
            }
            if c == '\\' {
                if prefix.raw {
                    // Raw strings keep the backslash, but it still protects the
                    // next character from ending the literal.
                    out.push(c);
                    self.pos += 1;
                    if let Some(next) = self.peek() {
                        if prefix.bytes && !next.is_ascii() {
                            return Err(LiteralError::NonAsciiBytes { pos: self.pos });
                        }
                        out.push(next);
                        self.pos += 1;
                    }
                    continue;
                }
                self.lex_escape(&mut out, prefix.bytes)?;
                continue;
            }
            if prefix.bytes && !c.is_ascii() {
                return Err(LiteralError::NonAsciiBytes { pos: self.pos });
            }
            out.push(c);
            self.pos += 1;
        }

        if prefix.bytes {
            // Escapes were decoded into U+0000..=U+00FF, one char per byte.
            Ok(Token::Bytes(out.chars().map(|c| c as u32 as u8).collect()))
        } else {
            Ok(Token::Str(out))
        }
    }

    /// Decodes one backslash escape at the current position into `out`.
    fn lex_escape(&mut self, out: &mut String, bytes: bool) -> Result<(), LiteralError> {
        let start = self.pos;
        self.pos += 1;
        let c = self.peek().ok_or(LiteralError::UnterminatedString { pos: start })?;
        self.pos += 1;
        match c {
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.pos += 1;
                }
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                if bytes && code > 0xff {
                    return Err(self.invalid_escape(start));
                }
                out.push(char::from_u32(code).ok_or_else(|| self.invalid_escape(start))?);
            }
            'x' => {
                let code = self.take_hex(start, 2)?;
                out.push(char::from_u32(code).ok_or_else(|| self.invalid_escape(start))?);
            }
            'u' if !bytes => {
                let code = self.take_hex(start, 4)?;
                out.push(char::from_u32(code).ok_or_else(|| self.invalid_escape(start))?);
            }
            'U' if !bytes => {
                let code = self.take_hex(start, 8)?;
                out.push(char::from_u32(code).ok_or_else(|| self.invalid_escape(start))?);
            }
            // Named escapes need the Unicode name table; not supported.
            'N' if !bytes => return Err(self.invalid_escape(start)),
            other => {
                if bytes && !other.is_ascii() {
                    return Err(LiteralError::NonAsciiBytes { pos: start + 1 });
                }
                // Unknown escapes are kept verbatim.
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn take_hex(&mut self, start: usize, count: usize) -> Result<u32, LiteralError> {
        let mut code = 0u32;
        for _ in 0..count {
            let digit = self
                .peek()
                .and_then(|d| d.to_digit(16))
                .ok_or_else(|| self.invalid_escape(start))?;
            code = code * 16 + digit;
            self.pos += 1;
        }
        Ok(code)
    }

    fn invalid_escape(&self, start: usize) -> LiteralError {
        LiteralError::InvalidEscape {
            pos: start,
            escape: self.chars[start..self.pos.min(self.chars.len())].iter().collect(),
        }
    }
}

/// Flags carried by a string prefix such as `r`, `b` or `rb`.
#[derive(Debug, Default, Clone, Copy)]
struct StringPrefix {
    raw: bool,
    bytes: bool,
}

impl StringPrefix {
    fn parse(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_lowercase().as_str() {
            "u" => Some(Self::default()),
            "r" => Some(Self { raw: true, bytes: false }),
            "b" => Some(Self { raw: false, bytes: true }),
            "rb" | "br" => Some(Self { raw: true, bytes: true }),
            _ => None,
        }
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
