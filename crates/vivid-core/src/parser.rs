//! JSON text → [`Json`] tree.
//!
//! A hand-written recursive descent parser over the input characters. It
//! tracks the 1-based line and column of every token so failures can point
//! at the first offending character.
//!
//! Grammar notes:
//!
//! - The document root must be an object or an array. A lone scalar is rejected.
//! - Numbers follow JSON exactly: optional `-`, no leading zeros, digits on
//!   both sides of `.`, optional exponent. `+1`, `.5`, `1.`, `01`, `0x1` fail.
//! - Strings accept the JSON escapes only; raw control characters must be
//!   escaped and `\u` surrogates must come in valid pairs.
//! - Whitespace is space, tab, CR and LF. Any other control character outside
//!   a string is an error, as are trailing commas, comments and single quotes.
//! - Duplicate object keys are accepted; the last occurrence wins.

use std::str::FromStr;

use crate::error::{JsonError, Result};
use crate::value::{Json, Map};

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of objects and arrays. The root counts as 1.
    pub max_depth: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub const fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// No nesting limit. Very deep input may exhaust the stack.
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a JSON document with the default [`ParseOptions`].
///
/// ```
/// let doc = vivid_core::parse(r#"{"a": [1, 2, {"b": true}]}"#).unwrap();
/// assert!(doc.get("a").at(2).get("b").as_boolean());
/// ```
pub fn parse(text: &str) -> Result<Json> {
    parse_with(text, ParseOptions::default())
}

/// Parse a JSON document with explicit options.
pub fn parse_with(text: &str, options: ParseOptions) -> Result<Json> {
    let result = Parser::new(text, options).parse_document();
    if let Err(JsonError::Parse {
        message,
        line,
        column,
    }) = &result
    {
        tracing::debug!(%message, line, column, "JSON parse failed");
    }
    result
}

impl FromStr for Json {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// A `(line, column)` pair, both 1-based.
#[derive(Clone, Copy)]
struct Mark {
    line: usize,
    column: usize,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    depth: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, options: ParseOptions) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            options,
        }
    }

    fn parse_document(&mut self) -> Result<Json> {
        self.skip_whitespace();
        let root = match self.peek() {
            None => return Err(self.error_here("empty document")),
            Some('{') => self.parse_object()?,
            Some('[') => self.parse_array()?,
            Some(c) if starts_scalar(c) => {
                return Err(self.error_here("document root must be an object or an array"))
            }
            Some(c) => return Err(self.unexpected(c, "at the start of the document")),
        };
        self.skip_whitespace();
        match self.peek() {
            None => Ok(root),
            Some(c) => Err(self.unexpected(c, "after the end of the document")),
        }
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.column,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.bump();
        }
    }

    /// Consume digits, returning how many were read.
    fn digits(&mut self) -> usize {
        let mut count = 0;
        while let Some('0'..='9') = self.peek() {
            self.bump();
            count += 1;
        }
        count
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    fn error_at(&self, mark: Mark, message: impl Into<String>) -> JsonError {
        JsonError::parse(message, mark.line, mark.column)
    }

    fn error_here(&self, message: impl Into<String>) -> JsonError {
        self.error_at(self.mark(), message)
    }

    fn unexpected(&self, c: char, context: &str) -> JsonError {
        if c.is_control() {
            self.error_here(format!(
                "unexpected control character U+{:04X} {context}",
                c as u32
            ))
        } else {
            self.error_here(format!("unexpected character '{c}' {context}"))
        }
    }

    // ------------------------------------------------------------------
    // Grammar
    // ------------------------------------------------------------------

    fn parse_value(&mut self) -> Result<Json> {
        match self.peek() {
            None => Err(self.error_here("unexpected end of input, expected a value")),
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => self.parse_string().map(Json::string),
            Some('-' | '0'..='9') => self.parse_number(),
            Some('t') => self.parse_literal("true", Json::boolean(true)),
            Some('f') => self.parse_literal("false", Json::boolean(false)),
            Some('n') => self.parse_literal("null", Json::null()),
            Some(c) => Err(self.unexpected(c, "where a value was expected")),
        }
    }

    fn enter(&mut self, at: Mark) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.error_at(
                at,
                format!(
                    "nesting exceeds the maximum depth of {}",
                    self.options.max_depth
                ),
            ));
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<Json> {
        let open = self.mark();
        self.enter(open)?;
        self.bump(); // '{'
        self.skip_whitespace();

        let mut map = Map::new();
        if self.peek() == Some('}') {
            self.bump();
            self.depth -= 1;
            return Ok(Json::from_map(map));
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('"') => {}
                Some('}') => return Err(self.error_here("trailing comma before '}'")),
                None => return Err(self.error_at(open, "unterminated object")),
                Some(c) => return Err(self.unexpected(c, "where an object key was expected")),
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            match self.peek() {
                Some(':') => {
                    self.bump();
                }
                None => return Err(self.error_at(open, "unterminated object")),
                Some(c) => return Err(self.unexpected(c, "where ':' was expected")),
            }

            self.skip_whitespace();
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    break;
                }
                None => return Err(self.error_at(open, "unterminated object")),
                Some(c) => return Err(self.unexpected(c, "where ',' or '}' was expected")),
            }
        }

        self.depth -= 1;
        Ok(Json::from_map(map))
    }

    fn parse_array(&mut self) -> Result<Json> {
        let open = self.mark();
        self.enter(open)?;
        self.bump(); // '['
        self.skip_whitespace();

        let mut items = Vec::new();
        if self.peek() == Some(']') {
            self.bump();
            self.depth -= 1;
            return Ok(Json::from_vec(items));
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(']') => return Err(self.error_here("trailing comma before ']'")),
                None => return Err(self.error_at(open, "unterminated array")),
                Some(_) => items.push(self.parse_value()?),
            }

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                None => return Err(self.error_at(open, "unterminated array")),
                Some(c) => return Err(self.unexpected(c, "where ',' or ']' was expected")),
            }
        }

        self.depth -= 1;
        Ok(Json::from_vec(items))
    }

    fn parse_literal(&mut self, word: &str, value: Json) -> Result<Json> {
        let start = self.mark();
        for expected in word.chars() {
            if self.peek() != Some(expected) {
                return Err(self.error_at(start, format!("invalid literal, expected '{word}'")));
            }
            self.bump();
        }
        Ok(value)
    }

    fn parse_number(&mut self) -> Result<Json> {
        let start = self.mark();
        let begin = self.pos;

        if self.peek() == Some('-') {
            self.bump();
        }
        match self.peek() {
            Some('0') => {
                self.bump();
                if let Some('0'..='9') = self.peek() {
                    return Err(self.error_at(start, "leading zeros are not allowed in numbers"));
                }
            }
            Some('1'..='9') => {
                self.digits();
            }
            _ => return Err(self.error_here("invalid number, expected a digit")),
        }

        if self.peek() == Some('.') {
            self.bump();
            if self.digits() == 0 {
                return Err(self.error_here("invalid number, expected a digit after '.'"));
            }
        }

        if let Some('e' | 'E') = self.peek() {
            self.bump();
            if let Some('+' | '-') = self.peek() {
                self.bump();
            }
            if self.digits() == 0 {
                return Err(self.error_here("invalid number, expected a digit in the exponent"));
            }
        }

        let text = &self.src[begin..self.pos];
        text.parse::<f64>()
            .map(Json::number)
            .map_err(|_| self.error_at(start, format!("invalid number '{text}'")))
    }

    fn parse_string(&mut self) -> Result<String> {
        let open = self.mark();
        self.bump(); // '"'

        let mut out = String::new();
        loop {
            let here = self.mark();
            match self.bump() {
                None => return Err(self.error_at(open, "unterminated string")),
                Some('"') => return Ok(out),
                Some('\\') => self.parse_escape(here, &mut out)?,
                Some(c) if (c as u32) < 0x20 => {
                    return Err(self.error_at(
                        here,
                        format!(
                            "control character U+{:04X} must be escaped in a string",
                            c as u32
                        ),
                    ))
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, start: Mark, out: &mut String) -> Result<()> {
        let c = match self.bump() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{0008}',
            Some('f') => '\u{000C}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => self.parse_unicode_escape(start)?,
            Some(other) => {
                return Err(self.error_at(start, format!("invalid escape sequence '\\{other}'")))
            }
            None => return Err(self.error_at(start, "unterminated string")),
        };
        out.push(c);
        Ok(())
    }

    /// The part after `\u`, including a trailing `\uXXXX` low surrogate when
    /// the first unit is a high surrogate.
    fn parse_unicode_escape(&mut self, start: Mark) -> Result<char> {
        let high = self.hex4()?;
        let code = match high {
            0xD800..=0xDBFF => {
                if self.peek() != Some('\\') {
                    return Err(self.error_at(start, "unpaired surrogate in \\u escape"));
                }
                self.bump();
                if self.bump() != Some('u') {
                    return Err(self.error_at(start, "unpaired surrogate in \\u escape"));
                }
                let low = self.hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.error_at(start, "unpaired surrogate in \\u escape"));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(self.error_at(start, "unpaired surrogate in \\u escape"));
            }
            _ => high,
        };
        char::from_u32(code).ok_or_else(|| self.error_at(start, "invalid \\u escape"))
    }

    fn hex4(&mut self) -> Result<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let here = self.mark();
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_at(here, "invalid \\u escape, expected 4 hex digits"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }
}

fn starts_scalar(c: char) -> bool {
    matches!(c, '"' | '-' | '0'..='9' | 't' | 'f' | 'n')
}
