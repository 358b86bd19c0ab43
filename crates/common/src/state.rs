//! Machine state shapes and their textual rendering.
//!
//! Both machines embed the same [`CoreState`] (program counter and data
//! stack). AM0 adds a sparse flat memory, AM1 a runtime stack with a frame
//! pointer. States render in the bracketed literal notation the assembler
//! crate parses back:
//!
//! ```text
//! AM0: (pc , d_top:...:d_bottom , [addr/value,...])
//! AM1: (pc , d_top:...:d_bottom , r_1:...:r_n , ref)
//! ```
//!
//! An empty stack renders as `-`.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Program counter and data stack, shared by both machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreState {
    /// 1-based index of the next instruction. `0` is the halt sentinel.
    pub pc: usize,
    /// Expression stack, last element is the top.
    pub data_stack: Vec<i32>,
}

impl Default for CoreState {
    fn default() -> Self {
        Self {
            pc: 1,
            data_stack: Vec::new(),
        }
    }
}

/// State of the AM0 machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Am0State {
    pub core: CoreState,
    /// Sparse memory: an address exists only once STORE or READ wrote it.
    pub memory: BTreeMap<i32, i32>,
}

/// State of the AM1 machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Am1State {
    pub core: CoreState,
    /// Variable and frame storage, addressed 1-based.
    pub runtime_stack: Vec<i32>,
    /// `ref`: base of the current activation record. Local address `o`
    /// names runtime-stack position `frame_pointer + o`.
    pub frame_pointer: usize,
}

impl Am0State {
    /// Write the literal form, left-aligning `pc` to `pc_width` columns.
    pub fn write_padded<W: Write>(&self, out: &mut W, pc_width: usize) -> fmt::Result {
        write!(out, "({:<pc_width$} , ", self.core.pc)?;
        write_data_stack(out, &self.core.data_stack)?;
        out.write_str(" , [")?;
        for (i, (address, value)) in self.memory.iter().enumerate() {
            if i > 0 {
                out.write_char(',')?;
            }
            write!(out, "{address}/{value}")?;
        }
        out.write_str("])")
    }
}

impl Am1State {
    /// Write the literal form, left-aligning `pc` to `pc_width` columns.
    pub fn write_padded<W: Write>(&self, out: &mut W, pc_width: usize) -> fmt::Result {
        write!(out, "({:<pc_width$} , ", self.core.pc)?;
        write_data_stack(out, &self.core.data_stack)?;
        out.write_str(" , ")?;
        write_joined(out, self.runtime_stack.iter())?;
        write!(out, " , {})", self.frame_pointer)
    }
}

impl fmt::Display for Am0State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_padded(f, 0)
    }
}

impl fmt::Display for Am1State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_padded(f, 0)
    }
}

/// Data stacks are listed top first.
fn write_data_stack<W: Write>(out: &mut W, stack: &[i32]) -> fmt::Result {
    write_joined(out, stack.iter().rev())
}

fn write_joined<'a, W: Write>(out: &mut W, values: impl Iterator<Item = &'a i32>) -> fmt::Result {
    let mut empty = true;
    for value in values {
        if !empty {
            out.write_char(':')?;
        }
        write!(out, "{value}")?;
        empty = false;
    }
    if empty {
        out.write_char('-')?;
    }
    Ok(())
}
