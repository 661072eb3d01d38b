//! Constrained parser for JavaScript data modules (`export const NAME = { ... };`).
//! Does not execute JavaScript; reads object/array literals, strings, numbers,
//! booleans and `null` only.

mod js_value;

pub use js_value::JsValue;

use crate::config::MAX_CATALOG_FILE_BYTES;
use std::str::FromStr;

/// Parse a data module into its top-level `const` declarations, in source order.
pub fn parse_module(content: &str) -> Result<Vec<(String, JsValue)>, ParseError> {
    if content.len() > MAX_CATALOG_FILE_BYTES {
        return Err(ParseError::InputTooLarge);
    }
    let mut p = Parser::new(content);
    let mut decls = Vec::new();
    loop {
        p.skip_whitespace_and_comments();
        if p.rest().is_empty() {
            break;
        }
        if p.eat_keyword("import") {
            // Data modules may import helpers; the statement carries no data.
            p.skip_statement();
            continue;
        }
        p.eat_keyword("export");
        p.skip_whitespace_and_comments();
        if !(p.eat_keyword("const") || p.eat_keyword("let") || p.eat_keyword("var")) {
            return Err(ParseError::ExpectedDeclaration { at: p.pos });
        }
        p.skip_whitespace_and_comments();
        let name = p.parse_identifier()?;
        p.skip_whitespace_and_comments();
        p.expect('=')?;
        let value = p.parse_value()?;
        p.skip_whitespace_and_comments();
        if p.rest().starts_with(';') {
            p.pos += 1;
        }
        decls.push((name, value));
    }
    Ok(decls)
}

/// Parse a single literal value (object, array, string, number, boolean, null).
pub fn parse_value(content: &str) -> Result<JsValue, ParseError> {
    let mut p = Parser::new(content);
    let v = p.parse_value()?;
    p.skip_whitespace_and_comments();
    if p.rest().is_empty() {
        Ok(v)
    } else {
        Err(ParseError::TrailingContent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedEof,
    UnexpectedChar(char),
    UnexpectedIdentifier(String),
    InvalidNumber { at: usize },
    UnclosedString,
    InputTooLarge,
    TrailingContent,
    NestedTooDeep,
    InvalidEscape,
    ExpectedDeclaration { at: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnexpectedEof => write!(f, "unexpected end of input"),
            ParseError::UnexpectedChar(c) => write!(f, "unexpected character: {:?}", c),
            ParseError::UnexpectedIdentifier(s) => write!(f, "unexpected identifier: {}", s),
            ParseError::InvalidNumber { at } => write!(f, "invalid number at byte {}", at),
            ParseError::UnclosedString => write!(f, "unclosed string"),
            ParseError::InputTooLarge => write!(f, "input exceeds maximum size"),
            ParseError::TrailingContent => write!(f, "trailing content after value"),
            ParseError::NestedTooDeep => write!(f, "nesting too deep"),
            ParseError::InvalidEscape => write!(f, "invalid escape in string"),
            ParseError::ExpectedDeclaration { at } => {
                write!(f, "expected `const` declaration at byte {}", at)
            }
        }
    }
}

impl std::error::Error for ParseError {}

const MAX_DEPTH: u32 = 128;

struct Parser<'a> {
    s: &'a str,
    pos: usize,
    depth: u32,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Parser {
            s,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            if rest.len() != trimmed.len() {
                self.pos += rest.len() - trimmed.len();
                continue;
            }
            if rest.starts_with("//") {
                match rest.find('\n') {
                    Some(nl) => self.pos += nl + 1,
                    None => self.pos = self.s.len(),
                }
                continue;
            }
            if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => self.pos = self.s.len(),
                }
                continue;
            }
            break;
        }
    }

    /// Consume `word` if it appears here as a whole identifier.
    fn eat_keyword(&mut self, word: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(word) {
            return false;
        }
        let boundary = rest[word.len()..]
            .chars()
            .next()
            .map(|c| !is_ident_char(c))
            .unwrap_or(true);
        if boundary {
            self.pos += word.len();
        }
        boundary
    }

    fn skip_statement(&mut self) {
        match self.rest().find(';') {
            Some(i) => self.pos += i + 1,
            None => self.pos = self.s.len(),
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        self.skip_whitespace_and_comments();
        match self.peek() {
            Some(x) if x == c => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(x) => Err(ParseError::UnexpectedChar(x)),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn parse_value(&mut self) -> Result<JsValue, ParseError> {
        self.skip_whitespace_and_comments();
        let c = self.peek().ok_or(ParseError::UnexpectedEof)?;
        if c == '{' {
            self.nested(Self::parse_object)
        } else if c == '[' {
            self.nested(Self::parse_array)
        } else if c == '"' || c == '\'' || c == '`' {
            self.parse_string().map(JsValue::String)
        } else if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' {
            self.parse_number()
        } else if is_ident_start(c) {
            let ident = self.parse_identifier()?;
            match ident.as_str() {
                "true" => Ok(JsValue::Bool(true)),
                "false" => Ok(JsValue::Bool(false)),
                "null" | "undefined" => Ok(JsValue::Null),
                "Infinity" => Ok(JsValue::Number(f64::INFINITY)),
                "NaN" => Ok(JsValue::Number(f64::NAN)),
                _ => Err(ParseError::UnexpectedIdentifier(ident)),
            }
        } else {
            Err(ParseError::UnexpectedChar(c))
        }
    }

    fn nested(
        &mut self,
        f: fn(&mut Self) -> Result<JsValue, ParseError>,
    ) -> Result<JsValue, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::NestedTooDeep);
        }
        self.depth += 1;
        let r = f(self);
        self.depth -= 1;
        r
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(c) if is_ident_start(c) => {}
            Some(c) => return Err(ParseError::UnexpectedChar(c)),
            None => return Err(ParseError::UnexpectedEof),
        }
        let len = rest
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += len;
        Ok(rest[..len].to_string())
    }

    fn parse_object(&mut self) -> Result<JsValue, ParseError> {
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let c = self.peek().ok_or(ParseError::UnexpectedEof)?;
            if c == '}' {
                self.pos += 1;
                break;
            }
            let key = if c == '"' || c == '\'' {
                self.parse_string()?
            } else if c.is_ascii_digit() {
                match self.parse_number()? {
                    JsValue::Number(n) => crate::model::format_number(n),
                    _ => return Err(ParseError::InvalidNumber { at: self.pos }),
                }
            } else {
                self.parse_identifier()?
            };
            self.expect(':')?;
            let value = self.parse_value()?;
            entries.push((key, value));
            self.skip_whitespace_and_comments();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(x) => return Err(ParseError::UnexpectedChar(x)),
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(JsValue::Object(entries))
    }

    fn parse_array(&mut self) -> Result<JsValue, ParseError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.peek() == Some(']') {
                self.pos += 1;
                break;
            }
            items.push(self.parse_value()?);
            self.skip_whitespace_and_comments();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(x) => return Err(ParseError::UnexpectedChar(x)),
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        Ok(JsValue::Array(items))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let quote = self.peek().ok_or(ParseError::UnexpectedEof)?;
        self.pos += 1;
        let mut s = String::new();
        loop {
            let c = self.peek().ok_or(ParseError::UnclosedString)?;
            self.pos += c.len_utf8();
            if c == quote {
                break;
            }
            if c == '\\' {
                let (esc, len) = parse_escape(self.rest())?;
                if let Some(esc) = esc {
                    s.push(esc);
                }
                self.pos += len;
                continue;
            }
            if c == '\n' && quote != '`' {
                return Err(ParseError::UnclosedString);
            }
            if c == '$' && quote == '`' && self.rest().starts_with('{') {
                return Err(ParseError::UnexpectedChar('$'));
            }
            s.push(c);
        }
        Ok(s)
    }

    fn parse_number(&mut self) -> Result<JsValue, ParseError> {
        let start = self.pos;
        let rest = self.rest();
        let mut negative = false;
        let mut body = rest;
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            body = stripped;
        } else if let Some(stripped) = rest.strip_prefix('+') {
            body = stripped;
        }
        let sign_len = rest.len() - body.len();
        if body.starts_with("Infinity") {
            self.pos += sign_len + "Infinity".len();
            return Ok(JsValue::Number(if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }));
        }
        let mut len = 0;
        let mut prev = ' ';
        for c in body.chars() {
            let exp_sign = (c == '-' || c == '+') && (prev == 'e' || prev == 'E');
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '_' || exp_sign {
                len += 1;
                prev = c;
            } else {
                break;
            }
        }
        if len == 0 {
            return Err(ParseError::InvalidNumber { at: start });
        }
        let literal: String = body[..len].chars().filter(|c| *c != '_').collect();
        let n = f64::from_str(&literal).map_err(|_| ParseError::InvalidNumber { at: start })?;
        self.pos += sign_len + len;
        Ok(JsValue::Number(if negative { -n } else { n }))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Decode one escape after a backslash. Returns the char (None for a line
/// continuation) and the number of bytes consumed.
fn parse_escape(rest: &str) -> Result<(Option<char>, usize), ParseError> {
    let c = rest.chars().next().ok_or(ParseError::InvalidEscape)?;
    let simple = match c {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'v' => Some('\u{b}'),
        '0' => Some('\0'),
        '\n' => return Ok((None, 1)),
        'u' => {
            let hex = rest.get(1..5).ok_or(ParseError::InvalidEscape)?;
            let code = u32::from_str_radix(hex, 16).map_err(|_| ParseError::InvalidEscape)?;
            let ch = char::from_u32(code).ok_or(ParseError::InvalidEscape)?;
            return Ok((Some(ch), 5));
        }
        '\\' | '"' | '\'' | '`' | '/' => Some(c),
        _ => None,
    };
    match simple {
        Some(ch) => Ok((Some(ch), c.len_utf8())),
        None => Err(ParseError::InvalidEscape),
    }
}
