//! Runtime errors for the AM0/AM1 machines.
//!
//! Every instruction-level error carries `at`, the program counter of the
//! instruction that failed. A failed instruction leaves the machine state
//! untouched, so `at` is also the `pc` of the state reported afterwards.

use thiserror::Error;

/// Errors that stop execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An operation needed more data-stack values than present.
    #[error("not enough arguments on data stack at instruction {at}: need {needed}, have {available}")]
    StackUnderflow {
        at: usize,
        needed: usize,
        available: usize,
    },

    /// RET needed more runtime-stack values in the current frame than present.
    #[error("not enough values on runtime stack at instruction {at}: need {needed}, have {available}")]
    RuntimeStackUnderflow {
        at: usize,
        needed: usize,
        available: usize,
    },

    /// Memory or runtime-stack address out of range, or never written.
    #[error("invalid memory address {address} at instruction {at}")]
    InvalidAddress { at: usize, address: i64 },

    /// DIV or MOD with a zero divisor.
    #[error("null division at instruction {at}")]
    DivisionByZero { at: usize },

    /// Jump target outside `[0, len]`.
    #[error("invalid jump address {target} at instruction {at}, possible range [0-{len}]")]
    InvalidJumpTarget { at: usize, target: i32, len: usize },

    /// JMP targeting its own instruction.
    #[error("loop jump at instruction {at}")]
    LoopJump { at: usize },

    /// CALL target outside `[1, len]`.
    #[error("invalid call address {target} at instruction {at}, possible range [1-{len}]")]
    InvalidCallTarget { at: usize, target: i32, len: usize },

    /// JMC popped something other than 0 or 1.
    #[error("jump condition must be 0 or 1, found {value} at instruction {at}")]
    InvalidConditional { at: usize, value: i32 },

    /// INIT or RET with a negative count.
    #[error("count must be >= 0, found {count} at instruction {at}")]
    NegativeCount { at: usize, count: i32 },

    /// INIT could not allocate its slots.
    #[error("runtime stack overflow at instruction {at}: cannot allocate {requested} slots")]
    StackOverflow { at: usize, requested: usize },

    /// RET found a saved return address or frame pointer that cannot be right.
    #[error("cannot return at instruction {at}: {reason}")]
    InvalidFrame { at: usize, reason: String },

    /// READ received something that is not an integer.
    #[error("wrong input at instruction {at}")]
    InvalidInput { at: usize },

    /// READ could not read from the console.
    #[error("input failed at instruction {at}: {message}")]
    Input { at: usize, message: String },

    /// WRITE or trace output could not be written.
    #[error("output failed at instruction {at}: {message}")]
    Output { at: usize, message: String },

    /// The program counter left the program without passing through 0.
    #[error("program counter ran out of line: pc {pc}, program length {len}")]
    RunawayCounter { pc: usize, len: usize },

    /// A replacement state violates the machine invariants for this program.
    #[error("invalid machine state: {reason}")]
    InvalidState { reason: String },
}
