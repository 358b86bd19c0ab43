//! Character-level scanning of a single line of program text or a state
//! literal.
//!
//! The [`Cursor`] consumes a line left to right and remembers how far it got,
//! so every error can point at the last character that was accepted.

use crate::error::AsmError;

/// What a line of program text contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace only.
    Blank,
    /// Starts with `#`. Echoed in listings, never compiled.
    Comment,
    /// Starts with `#!`. Neither echoed nor compiled.
    Shebang,
    /// Anything else: exactly one instruction.
    Code,
}

/// Classify a line of program text.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with("#!") {
        LineKind::Shebang
    } else if trimmed.starts_with('#') {
        LineKind::Comment
    } else {
        LineKind::Code
    }
}

/// Scanner over one line.
pub(crate) struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str, line: usize) -> Self {
        Self { text, pos: 0, line }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Characters consumed so far.
    pub(crate) fn column(&self) -> usize {
        self.text[..self.pos].chars().count()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume `c` (after optional whitespace) if it is next.
    pub(crate) fn eat(&mut self, c: char) -> bool {
        let start = self.pos;
        self.skip_whitespace();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            self.pos = start;
            false
        }
    }

    /// Consume a lone `-`, the empty-stack marker. `-5` is left alone.
    pub(crate) fn eat_dash(&mut self) -> bool {
        self.skip_whitespace();
        let mut chars = self.rest().chars();
        if chars.next() == Some('-') && !chars.next().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `c` or fail with [`AsmError::Expected`].
    pub(crate) fn expect(&mut self, c: char, what: &'static str) -> Result<(), AsmError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    /// Require at least one whitespace character.
    pub(crate) fn expect_space(&mut self) -> Result<(), AsmError> {
        match self.peek() {
            Some(c) if c.is_whitespace() => {
                self.skip_whitespace();
                Ok(())
            }
            _ => Err(self.expected("' '")),
        }
    }

    /// Consume a run of ASCII letters (a mnemonic or visibility keyword).
    pub(crate) fn word(&mut self) -> &'a str {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Consume an optionally signed decimal integer.
    pub(crate) fn integer(&mut self) -> Result<i32, AsmError> {
        self.skip_whitespace();
        let start = self.pos;
        let token = self.number_token(true);
        if token.is_empty() || token == "-" || token == "+" {
            self.pos = start;
            return Err(self.expected("integer"));
        }
        token.parse().map_err(|_| {
            self.pos = start;
            self.invalid_number(token)
        })
    }

    /// Consume an unsigned decimal integer.
    pub(crate) fn unsigned(&mut self) -> Result<usize, AsmError> {
        self.skip_whitespace();
        let start = self.pos;
        let token = self.number_token(false);
        if token.is_empty() {
            return Err(self.expected("unsigned integer"));
        }
        token.parse().map_err(|_| {
            self.pos = start;
            self.invalid_number(token)
        })
    }

    fn number_token(&mut self, signed: bool) -> &'a str {
        let rest = self.rest();
        let sign = match rest.chars().next() {
            Some('-' | '+') if signed => 1,
            _ => 0,
        };
        let digits = rest[sign..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len() - sign);
        self.pos += sign + digits;
        &rest[..sign + digits]
    }

    /// Succeeds only if nothing but whitespace remains.
    pub(crate) fn finish(&mut self) -> Result<(), AsmError> {
        self.skip_whitespace();
        let rest = self.rest();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(AsmError::TrailingInput {
                line: self.line,
                column: self.column(),
                token: rest.trim_end().to_string(),
            })
        }
    }

    pub(crate) fn expected(&self, expected: &'static str) -> AsmError {
        AsmError::Expected {
            line: self.line,
            column: self.column(),
            expected,
        }
    }

    pub(crate) fn invalid_number(&self, token: &str) -> AsmError {
        AsmError::InvalidNumber {
            line: self.line,
            column: self.column(),
            token: token.to_string(),
        }
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }
}
