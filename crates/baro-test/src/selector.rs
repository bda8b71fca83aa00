//! Selector parsing for form inputs.
//!
//! Supports:
//! - `"email"` - by field name
//! - `"#bday"` - by element id
//! - `"[data-testid='bday']"` - by test id

use baro_core::FieldSpec;
use thiserror::Error;

/// Parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Match by field name
    Name(String),
    /// Match by element id (e.g., `#bday`)
    Id(String),
    /// Match by test id (e.g., `[data-testid='bday']`)
    TestId(String),
    /// Match by attribute (e.g., `[name='terms']`)
    Attribute {
        /// Attribute name
        name: String,
        /// Attribute value
        value: String,
    },
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse()
    }

    /// Check if this selector matches a field.
    ///
    /// Inputs render with `id` and `name` equal to the test id.
    pub fn matches(&self, field: &FieldSpec) -> bool {
        match self {
            Self::Name(name) => field.name() == name || field.test_id() == name,
            Self::Id(id) | Self::TestId(id) => field.test_id() == id,
            Self::Attribute { name, value } => match name.as_str() {
                "id" | "name" | "data-testid" => field.test_id() == value,
                "type" => field.kind().as_str() == value,
                _ => false,
            },
        }
    }
}

/// Selector parser.
pub struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    /// Create a new parser.
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the selector.
    pub fn parse(&mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();
        let selector = self.parse_selector()?;
        self.skip_whitespace();

        match self.peek_char() {
            None => Ok(selector),
            Some(c) => Err(SelectorError::UnexpectedChar(c)),
        }
    }

    fn parse_selector(&mut self) -> Result<Selector, SelectorError> {
        let first = self.peek_char().ok_or(SelectorError::Empty)?;

        match first {
            '#' => {
                self.advance();
                Ok(Selector::Id(self.read_identifier()?))
            }
            '[' => self.parse_attribute(),
            _ if first.is_alphabetic() => Ok(Selector::Name(self.read_identifier()?)),
            _ => Err(SelectorError::UnexpectedChar(first)),
        }
    }

    fn parse_attribute(&mut self) -> Result<Selector, SelectorError> {
        self.advance(); // '['

        let name = self.read_until('=').trim().to_string();
        if name.is_empty() || self.peek_char() != Some('=') {
            return Err(SelectorError::InvalidAttribute);
        }
        self.advance(); // '='

        let quote = self.peek_char().filter(|c| *c == '\'' || *c == '"');
        if quote.is_some() {
            self.advance();
        }

        let value = match quote {
            Some(q) => self.read_until(q),
            None => self.read_until(']').trim().to_string(),
        };

        if let Some(q) = quote {
            if self.peek_char() != Some(q) {
                return Err(SelectorError::UnclosedAttribute);
            }
            self.advance();
        }

        if self.peek_char() != Some(']') {
            return Err(SelectorError::UnclosedAttribute);
        }
        self.advance();

        if name == "data-testid" {
            Ok(Selector::TestId(value))
        } else {
            Ok(Selector::Attribute { name, value })
        }
    }

    fn read_identifier(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(SelectorError::ExpectedIdentifier);
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn read_until(&mut self, stop: char) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c == stop {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// Selector parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Empty selector
    #[error("empty selector")]
    Empty,
    /// Unexpected character
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),
    /// Expected identifier
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// Invalid attribute syntax
    #[error("invalid attribute syntax")]
    InvalidAttribute,
    /// Unclosed attribute bracket or quote
    #[error("unclosed attribute bracket")]
    UnclosedAttribute,
}
