use crate::error::{PlistError, Result};
use serde_json::{Map, Value};

/// Deepest dictionary/array nesting accepted before giving up
pub(crate) const MAX_DEPTH: usize = 256;

/// Recursive-descent reader for OpenStep-style property lists.
///
/// The cursor walks byte offsets into `text`; every offset it stops on is a
/// char boundary because it only ever advances by `char::len_utf8`.
pub(crate) struct Parser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self {
            text,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse exactly one top-level value followed only by trivia
    pub(crate) fn parse_document(mut self) -> Result<Value> {
        self.skip_trivia()?;
        let value = self.parse_value()?;
        self.skip_trivia()?;
        if self.pos < self.text.len() {
            return Err(self.error_here("trailing content after top-level value"));
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.peek() {
            Some(open @ ('{' | '(')) => {
                if self.depth == MAX_DEPTH {
                    return Err(self.error_here("nesting too deep"));
                }
                self.depth += 1;
                let value = if open == '{' {
                    self.parse_dict()
                } else {
                    self.parse_array()
                };
                self.depth -= 1;
                value
            }
            Some('<') => self.parse_data().map(Value::String),
            Some('"') | Some('\'') => self.parse_quoted().map(Value::String),
            Some(c) if is_unquoted_char(c) => Ok(Value::String(self.parse_unquoted())),
            Some(c) => Err(self.error_here(format!("unexpected character '{c}'"))),
            None => Err(PlistError::UnexpectedEof("value")),
        }
    }

    fn parse_dict(&mut self) -> Result<Value> {
        self.expect('{', "dictionary")?;
        let mut map = Map::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                None => return Err(PlistError::UnexpectedEof("dictionary")),
                _ => {}
            }

            let key = self.parse_key()?;
            self.skip_trivia()?;
            self.expect('=', "dictionary entry")?;
            self.skip_trivia()?;
            let value = self.parse_value()?;
            self.skip_trivia()?;
            self.expect(';', "dictionary entry")?;

            if map.insert(key.clone(), value).is_some() {
                log::debug!("duplicate plist key '{key}', keeping last value");
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('(', "array")?;
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(')') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                None => return Err(PlistError::UnexpectedEof("array")),
                _ => {}
            }

            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {}
                None => return Err(PlistError::UnexpectedEof("array")),
                Some(c) => {
                    return Err(self.error_here(format!("expected ',' or ')' in array, found '{c}'")))
                }
            }
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek() {
            Some('"') | Some('\'') => self.parse_quoted(),
            Some(c) if is_unquoted_char(c) => Ok(self.parse_unquoted()),
            Some(c) => Err(self.error_here(format!("expected dictionary key, found '{c}'"))),
            None => Err(PlistError::UnexpectedEof("dictionary key")),
        }
    }

    fn parse_unquoted(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_unquoted_char(c) {
                break;
            }
            self.bump();
        }
        self.text[start..self.pos].to_string()
    }

    /// `<0fbd 7a>` blobs are kept as their hex digits
    fn parse_data(&mut self) -> Result<String> {
        self.expect('<', "data")?;
        let mut hex = String::new();
        loop {
            match self.bump() {
                Some('>') => return Ok(hex),
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(c) if c.is_whitespace() => {}
                Some(c) => return Err(self.error_before(format!("invalid data character '{c}'"))),
                None => return Err(PlistError::UnexpectedEof("data")),
            }
        }
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error_before("expected quoted string")),
        };
        let mut out = String::new();

        loop {
            match self.bump() {
                None => return Err(PlistError::UnexpectedEof("quoted string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.parse_escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<()> {
        let c = self
            .bump()
            .ok_or(PlistError::UnexpectedEof("string escape"))?;
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            'U' | 'u' => {
                let code = self.parse_hex4()?;
                let code = match code {
                    0xD800..=0xDBFF => self.parse_low_surrogate().map_or(code, |low| {
                        0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
                    }),
                    _ => code,
                };
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            self.bump();
                            code = code * 8 + d;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|d| d.to_digit(16))
                .ok_or_else(|| self.error_before("invalid \\U escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Consume a `\Udc00`-style escape only if it is a low surrogate
    fn parse_low_surrogate(&mut self) -> Option<u32> {
        let rest = &self.text[self.pos..];
        if !(rest.starts_with("\\U") || rest.starts_with("\\u")) {
            return None;
        }

        let start = self.pos;
        self.pos += 2;
        match self.parse_hex4() {
            Ok(low @ 0xDC00..=0xDFFF) => Some(low),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            let rest = &self.text[self.pos..];
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("//") {
                let line_len = trimmed.find('\n').unwrap_or(trimmed.len());
                self.pos += line_len;
            } else if trimmed.starts_with("/*") {
                match trimmed[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(PlistError::UnexpectedEof("block comment")),
                }
            } else {
                return Ok(());
            }
        }
    }

    fn expect(&mut self, want: char, context: &'static str) -> Result<()> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error_here(format!("expected '{want}' in {context}, found '{c}'"))),
            None => Err(PlistError::UnexpectedEof(context)),
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error_here(&self, message: impl Into<String>) -> PlistError {
        self.error_at(self.pos, message)
    }

    /// Error pointing at the char just consumed
    fn error_before(&self, message: impl Into<String>) -> PlistError {
        let prev = self.text[..self.pos]
            .chars()
            .next_back()
            .map_or(self.pos, |c| self.pos - c.len_utf8());
        self.error_at(prev, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> PlistError {
        let (line, column) = line_column(self.text, offset);
        PlistError::syntax(line, column, message)
    }
}

fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '+' | '/' | ':' | '.' | '-')
}

/// 1-based line and column of a byte offset
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before, |nl| &before[nl + 1..])
        .chars()
        .count()
        + 1;
    (line, column)
}
