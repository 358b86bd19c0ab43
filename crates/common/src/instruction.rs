//! Instruction sets of the AM0 and AM1 machines.
//!
//! Both machines share the [`CoreInstruction`] family (arithmetic, literals,
//! jumps). AM0 adds flat-memory access; AM1 adds runtime-stack addressing and
//! procedure calls. AM1 does not reuse AM0's memory instructions: its
//! `LOAD`/`STORE`/`READ`/`WRITE` take a `(visibility,offset)` pair instead.
//!
//! The `Display` impls produce canonical assembly text, e.g. `ADD;`,
//! `LIT -3;`, `LOAD(local,-2);`, `LOADI(1);`.

use std::fmt;

use crate::opcode::BinaryOp;

/// Addressing mode of an AM1 runtime-stack operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Offset relative to the frame pointer (`ref + offset`).
    Local,
    /// Absolute 1-based position in the runtime stack.
    Global,
}

impl Visibility {
    /// Canonical keyword used in assembly text.
    pub fn keyword(&self) -> &'static str {
        match self {
            Visibility::Local => "local",
            Visibility::Global => "global",
        }
    }

    /// Parse a visibility keyword. `lokal` is accepted as a spelling of `local`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "global" => Some(Visibility::Global),
            "local" | "lokal" => Some(Visibility::Local),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Instructions present in both machines with identical semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreInstruction {
    /// Arithmetic or comparison on the two topmost data-stack values.
    Binary(BinaryOp),
    /// `LIT z`: push `z`.
    Lit(i32),
    /// `JMP e`: unconditional jump; `e == 0` halts.
    Jmp(i32),
    /// `JMC e`: pop; jump to `e` on 0, fall through on 1.
    Jmc(i32),
}

impl From<BinaryOp> for CoreInstruction {
    fn from(op: BinaryOp) -> Self {
        CoreInstruction::Binary(op)
    }
}

impl fmt::Display for CoreInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreInstruction::Binary(op) => write!(f, "{};", op.mnemonic()),
            CoreInstruction::Lit(z) => write!(f, "LIT {z};"),
            CoreInstruction::Jmp(e) => write!(f, "JMP {e};"),
            CoreInstruction::Jmc(e) => write!(f, "JMC {e};"),
        }
    }
}

/// A single AM0 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Am0Instruction {
    Core(CoreInstruction),
    /// `LOAD n`: push `memory[n]`; `n` must already be written.
    Load(i32),
    /// `STORE n`: pop into `memory[n]`.
    Store(i32),
    /// `READ n`: read an integer from input into `memory[n]`.
    Read(i32),
    /// `WRITE n`: emit `memory[n]`; `n` must already be written.
    Write(i32),
}

impl From<CoreInstruction> for Am0Instruction {
    fn from(core: CoreInstruction) -> Self {
        Am0Instruction::Core(core)
    }
}

impl From<BinaryOp> for Am0Instruction {
    fn from(op: BinaryOp) -> Self {
        Am0Instruction::Core(CoreInstruction::Binary(op))
    }
}

impl fmt::Display for Am0Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Am0Instruction::Core(core) => core.fmt(f),
            Am0Instruction::Load(n) => write!(f, "LOAD {n};"),
            Am0Instruction::Store(n) => write!(f, "STORE {n};"),
            Am0Instruction::Read(n) => write!(f, "READ {n};"),
            Am0Instruction::Write(n) => write!(f, "WRITE {n};"),
        }
    }
}

/// A single AM1 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Am1Instruction {
    Core(CoreInstruction),
    /// `PUSH`: move the top of the data stack onto the runtime stack.
    Push,
    /// `CALL adr`: push return address and frame pointer, enter `adr`.
    Call(i32),
    /// `INIT n`: allocate `n` zeroed local slots.
    Init(i32),
    /// `RET n`: tear down the current frame and `n` parameter slots.
    Ret(i32),
    /// `LOADI(o)`: `LOAD(global, *local[o])`.
    LoadI(i32),
    /// `STOREI(o)`: `STORE(global, *local[o])`.
    StoreI(i32),
    /// `READI(o)`: `READ(global, *local[o])`.
    ReadI(i32),
    /// `WRITEI(o)`: `WRITE(global, *local[o])`.
    WriteI(i32),
    /// `LOAD(b,o)`: push the runtime-stack slot at `(b,o)`.
    Load(Visibility, i32),
    /// `STORE(b,o)`: pop into the runtime-stack slot at `(b,o)`.
    Store(Visibility, i32),
    /// `READ(b,o)`: read an integer from input into `(b,o)`.
    Read(Visibility, i32),
    /// `WRITE(b,o)`: emit the runtime-stack slot at `(b,o)`.
    Write(Visibility, i32),
    /// `LOADA(b,o)`: push the absolute address of `(b,o)`.
    LoadA(Visibility, i32),
}

impl From<CoreInstruction> for Am1Instruction {
    fn from(core: CoreInstruction) -> Self {
        Am1Instruction::Core(core)
    }
}

impl From<BinaryOp> for Am1Instruction {
    fn from(op: BinaryOp) -> Self {
        Am1Instruction::Core(CoreInstruction::Binary(op))
    }
}

impl fmt::Display for Am1Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Am1Instruction::Core(core) => core.fmt(f),
            Am1Instruction::Push => f.write_str("PUSH;"),
            Am1Instruction::Call(adr) => write!(f, "CALL {adr};"),
            Am1Instruction::Init(n) => write!(f, "INIT {n};"),
            Am1Instruction::Ret(n) => write!(f, "RET {n};"),
            Am1Instruction::LoadI(o) => write!(f, "LOADI({o});"),
            Am1Instruction::StoreI(o) => write!(f, "STOREI({o});"),
            Am1Instruction::ReadI(o) => write!(f, "READI({o});"),
            Am1Instruction::WriteI(o) => write!(f, "WRITEI({o});"),
            Am1Instruction::Load(b, o) => write!(f, "LOAD({b},{o});"),
            Am1Instruction::Store(b, o) => write!(f, "STORE({b},{o});"),
            Am1Instruction::Read(b, o) => write!(f, "READ({b},{o});"),
            Am1Instruction::Write(b, o) => write!(f, "WRITE({b},{o});"),
            Am1Instruction::LoadA(b, o) => write!(f, "LOADA({b},{o});"),
        }
    }
}
