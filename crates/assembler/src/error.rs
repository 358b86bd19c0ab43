//! Error types for the AM0/AM1 assembler and the state-literal parser.

use thiserror::Error;

/// Errors produced while parsing program text or a state literal.
///
/// `line` is 1-based. `column` counts the characters successfully consumed
/// on that line before the failure, so it is the 1-based column of the last
/// good character (0 when nothing was consumed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized instruction mnemonic.
    #[error("line {line}, column {column}: unknown mnemonic '{token}'")]
    UnknownMnemonic {
        line: usize,
        column: usize,
        token: String,
    },

    /// Missing punctuation or operand.
    #[error("line {line}, column {column}: expected {expected}")]
    Expected {
        line: usize,
        column: usize,
        expected: &'static str,
    },

    /// An integer literal that does not fit the operand type.
    #[error("line {line}, column {column}: invalid number '{token}'")]
    InvalidNumber {
        line: usize,
        column: usize,
        token: String,
    },

    /// A visibility other than `global`, `local` or `lokal`.
    #[error("line {line}, column {column}: unknown visibility '{token}'")]
    UnknownVisibility {
        line: usize,
        column: usize,
        token: String,
    },

    /// Characters after a complete instruction or state literal.
    #[error("line {line}, column {column}: unexpected trailing input '{token}'")]
    TrailingInput {
        line: usize,
        column: usize,
        token: String,
    },

    /// A memory key listed twice in an AM0 state literal.
    #[error("line {line}, column {column}: duplicate memory address {address}")]
    DuplicateAddress {
        line: usize,
        column: usize,
        address: i32,
    },

    /// A negative memory key in an AM0 state literal.
    #[error("line {line}, column {column}: negative memory address {address}")]
    NegativeAddress {
        line: usize,
        column: usize,
        address: i32,
    },
}

impl AsmError {
    /// 1-based line of the failure.
    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownMnemonic { line, .. }
            | AsmError::Expected { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::UnknownVisibility { line, .. }
            | AsmError::TrailingInput { line, .. }
            | AsmError::DuplicateAddress { line, .. }
            | AsmError::NegativeAddress { line, .. } => *line,
        }
    }

    /// Number of characters consumed on the line before the failure.
    pub fn column(&self) -> usize {
        match self {
            AsmError::UnknownMnemonic { column, .. }
            | AsmError::Expected { column, .. }
            | AsmError::InvalidNumber { column, .. }
            | AsmError::UnknownVisibility { column, .. }
            | AsmError::TrailingInput { column, .. }
            | AsmError::DuplicateAddress { column, .. }
            | AsmError::NegativeAddress { column, .. } => *column,
        }
    }

    /// A marker line to print under the source line: the `^` sits right
    /// after the last consumed character.
    pub fn caret(&self) -> String {
        format!("{}^", " ".repeat(self.column()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_mnemonic() {
        let e = AsmError::UnknownMnemonic {
            line: 3,
            column: 0,
            token: "FOO".to_string(),
        };
        assert_eq!(e.to_string(), "line 3, column 0: unknown mnemonic 'FOO'");
    }

    #[test]
    fn error_display_expected() {
        let e = AsmError::Expected {
            line: 1,
            column: 5,
            expected: "';'",
        };
        assert_eq!(e.to_string(), "line 1, column 5: expected ';'");
    }

    #[test]
    fn error_display_duplicate_address() {
        let e = AsmError::DuplicateAddress {
            line: 1,
            column: 14,
            address: 2,
        };
        assert_eq!(
            e.to_string(),
            "line 1, column 14: duplicate memory address 2"
        );
    }

    #[test]
    fn caret_follows_column() {
        let e = AsmError::Expected {
            line: 2,
            column: 4,
            expected: "';'",
        };
        assert_eq!(e.line(), 2);
        assert_eq!(e.caret(), "    ^");
    }

    #[test]
    fn caret_at_line_start() {
        let e = AsmError::UnknownMnemonic {
            line: 1,
            column: 0,
            token: "X".to_string(),
        };
        assert_eq!(e.caret(), "^");
    }
}
