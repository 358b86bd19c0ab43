//! Disassembler: program → canonical assembly text.
//!
//! One instruction per line, no indentation, no comments, no blank lines.
//! The per-instruction text is the instruction's `Display` form.

use std::fmt::Display;

use am_common::Program;

/// Render every instruction on its own line, each terminated by `\n`.
///
/// The output reassembles to an identical program.
pub(crate) fn disassemble<I: Display>(program: &Program<I>) -> String {
    let mut out = String::new();
    for instr in program.instructions() {
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    out
}
