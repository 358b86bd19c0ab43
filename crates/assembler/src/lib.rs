//! AM0/AM1 assembler: program text ↔ instructions, and state literals.
//!
//! Program text is strictly line-oriented: one instruction per line, with
//! blank lines, `#` comments and a `#!` shebang skipped. The first error
//! stops parsing and reports its line and column.
//!
//! # Usage
//!
//! ```
//! use am_assembler::{assemble_am0, disassemble_am0, parse_am0_state};
//!
//! let text = "LIT 3;\nLIT 4;\nADD;\nJMP 0;\n";
//! let program = assemble_am0(text).unwrap();
//! assert_eq!(program.len(), 4);
//! assert_eq!(disassemble_am0(&program), text);
//!
//! let state = parse_am0_state("(1 , 2:1 , [0/5])").unwrap();
//! assert_eq!(state.core.data_stack, vec![1, 2]);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(program)) == program` for every program, and a
//! parsed state literal renders back to text that parses to the same state.

pub mod error;

mod disassembler;
mod lexer;
mod parser;
mod state;

pub use error::AsmError;
pub use lexer::{classify_line, LineKind};
pub use state::{parse_am0_state, parse_am1_state};

use am_common::{Am0Instruction, Am1Instruction, Program};
use parser::{parse_am0_line, parse_am1_line};

/// Assemble AM0 program text.
///
/// Returns the first error encountered. An empty text is an empty program.
pub fn assemble_am0(text: &str) -> Result<Program<Am0Instruction>, AsmError> {
    assemble(text, parse_am0_line)
}

/// Assemble AM1 program text.
pub fn assemble_am1(text: &str) -> Result<Program<Am1Instruction>, AsmError> {
    assemble(text, parse_am1_line)
}

fn assemble<I>(
    text: &str,
    parse_line: fn(&str, usize) -> Result<I, AsmError>,
) -> Result<Program<I>, AsmError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| classify_line(line) == LineKind::Code)
        .map(|(idx, line)| parse_line(line, idx + 1))
        .collect::<Result<Vec<_>, _>>()
        .map(Program::new)
}

/// Disassemble an AM0 program into canonical text, one instruction per line.
pub fn disassemble_am0(program: &Program<Am0Instruction>) -> String {
    disassembler::disassemble(program)
}

/// Disassemble an AM1 program into canonical text, one instruction per line.
pub fn disassemble_am1(program: &Program<Am1Instruction>) -> String {
    disassembler::disassemble(program)
}
