//! Shared types for the AM0 and AM1 abstract machines.
//!
//! This crate provides the data model both interpreters are built on:
//!
//! - [`BinaryOp`]: the arithmetic/relational opcode family shared by both machines
//! - [`CoreInstruction`], [`Am0Instruction`], [`Am1Instruction`]: the instruction sets
//! - [`Visibility`]: local/global addressing for AM1 operands
//! - [`Program`]: an immutable, 1-indexed instruction sequence
//! - [`CoreState`], [`Am0State`], [`Am1State`]: machine states and their literal rendering
//!
//! Every stored value is a single `i32`.

pub mod instruction;
pub mod opcode;
pub mod program;
pub mod state;

// Re-export commonly used types at the crate root.
pub use instruction::{Am0Instruction, Am1Instruction, CoreInstruction, Visibility};
pub use opcode::BinaryOp;
pub use program::Program;
pub use state::{Am0State, Am1State, CoreState};
