//! AM0/AM1 interpreters: execute assembled abstract-machine programs.
//!
//! Both machines share the fetch-decode-execute loop of [`Machine::run`]:
//! while `pc` is neither the halt sentinel `0` nor past the end of the
//! program, the instruction at `pc` is validated and executed. Every check
//! happens before the state is touched, so a failed instruction leaves the
//! machine exactly as it was, with `pc` still on the failing instruction.
//!
//! - [`Am0`]: data stack plus flat, sparse memory
//! - [`Am1`]: data stack plus runtime stack, frame pointer and CALL/RET
//!
//! # Usage
//!
//! ```
//! use am_common::{Am0Instruction, BinaryOp, CoreInstruction, Program};
//! use am_vm::{Am0, Machine, StreamConsole};
//!
//! let program = Program::new(vec![
//!     Am0Instruction::Core(CoreInstruction::Lit(3)),
//!     Am0Instruction::Core(CoreInstruction::Lit(4)),
//!     Am0Instruction::from(BinaryOp::Add),
//!     Am0Instruction::Core(CoreInstruction::Jmp(0)),
//! ]);
//!
//! let mut vm = Am0::new(&program);
//! let mut console = StreamConsole::new(&b""[..], Vec::new());
//! vm.run(&mut console, false).unwrap();
//! assert!(vm.is_halted());
//! assert_eq!(vm.core().data_stack, vec![7]);
//! ```

pub mod am0;
pub mod am1;
pub mod console;
pub mod error;
pub mod machine;
pub mod validate;

mod frame;

pub use am0::Am0;
pub use am1::Am1;
pub use console::{Console, StreamConsole};
pub use error::RuntimeError;
pub use machine::Machine;
