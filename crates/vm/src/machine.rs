//! The fetch-decode-execute loop and the instruction family both machines share.

use std::fmt;
use std::io;

use am_common::{BinaryOp, CoreInstruction, CoreState};

use crate::console::Console;
use crate::error::RuntimeError;
use crate::validate::{enough_arguments, jmp_target_is_valid};

/// An abstract machine bound to a loaded program.
///
/// `Display` renders the current state in literal notation, with `pc`
/// padded to the width of the program length so trace lines align.
pub trait Machine: fmt::Display {
    /// The full machine state, replaceable as a whole via [`Machine::load_state`].
    type State;

    /// Number of instructions in the loaded program.
    fn program_len(&self) -> usize;

    /// The program counter and data stack.
    fn core(&self) -> &CoreState;

    fn state(&self) -> &Self::State;

    /// Replace the whole state at once.
    ///
    /// The state is checked against the loaded program first; on error the
    /// previous state is kept.
    fn load_state(&mut self, state: Self::State) -> Result<(), RuntimeError>;

    /// Return to the default state: `pc = 1`, empty stacks and storage.
    fn reset(&mut self);

    /// Execute the instruction at `pc`.
    ///
    /// A halted machine (`pc == 0`) stays halted. On error nothing has been
    /// modified.
    fn step<C: Console>(&mut self, console: &mut C) -> Result<(), RuntimeError>;

    fn pc(&self) -> usize {
        self.core().pc
    }

    /// Returns true once the machine reached the halt sentinel.
    fn is_halted(&self) -> bool {
        self.pc() == 0
    }

    /// Run until the halt sentinel or the first error.
    ///
    /// With `logging` set, the state is traced before every instruction.
    /// Leaving the program without passing through `pc == 0` is an error
    /// ([`RuntimeError::RunawayCounter`]), distinct from a clean halt.
    fn run<C: Console>(&mut self, console: &mut C, logging: bool) -> Result<(), RuntimeError> {
        while self.pc() != 0 && self.pc() <= self.program_len() {
            if logging {
                let line = self.to_string();
                console
                    .trace(&line)
                    .map_err(|e| output_error(self.pc(), e))?;
            }
            self.step(console)?;
        }
        if self.pc() != 0 {
            return Err(RuntimeError::RunawayCounter {
                pc: self.pc(),
                len: self.program_len(),
            });
        }
        Ok(())
    }
}

/// Execute an instruction of the shared family on the core state.
pub(crate) fn exec_core(
    core: &mut CoreState,
    instr: CoreInstruction,
    len: usize,
) -> Result<(), RuntimeError> {
    match instr {
        CoreInstruction::Binary(op) => exec_binary(core, op),
        CoreInstruction::Lit(z) => {
            core.data_stack.push(z);
            core.pc += 1;
            Ok(())
        }
        CoreInstruction::Jmp(target) => {
            core.pc = jmp_target_is_valid(core, target, len, true)?;
            Ok(())
        }
        CoreInstruction::Jmc(target) => exec_jmc(core, target, len),
    }
}

/// Apply `op` to the two topmost values; the result replaces the lower one.
fn exec_binary(core: &mut CoreState, op: BinaryOp) -> Result<(), RuntimeError> {
    enough_arguments(core, 2)?;
    let n = core.data_stack.len();
    let first = core.data_stack[n - 1];
    let second = core.data_stack[n - 2];
    let result = op
        .apply(first, second)
        .ok_or(RuntimeError::DivisionByZero { at: core.pc })?;
    core.data_stack[n - 2] = result;
    core.data_stack.pop();
    core.pc += 1;
    Ok(())
}

fn exec_jmc(core: &mut CoreState, target: i32, len: usize) -> Result<(), RuntimeError> {
    let target = jmp_target_is_valid(core, target, len, false)?;
    enough_arguments(core, 1)?;
    let condition = core.data_stack[core.data_stack.len() - 1];
    match condition {
        0 => core.pc = target,
        1 => core.pc += 1,
        value => return Err(RuntimeError::InvalidConditional { at: core.pc, value }),
    }
    core.data_stack.pop();
    Ok(())
}

/// Emit a WRITE through the console.
pub(crate) fn write_value<C: Console>(
    console: &mut C,
    at: usize,
    value: i32,
) -> Result<(), RuntimeError> {
    console.write_value(value).map_err(|e| output_error(at, e))
}

/// Obtain a READ value from the console; anything but an integer is fatal.
pub(crate) fn read_value<C: Console>(console: &mut C, at: usize) -> Result<i32, RuntimeError> {
    match console.read_value() {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(RuntimeError::InvalidInput { at }),
        Err(e) => Err(RuntimeError::Input {
            at,
            message: e.to_string(),
        }),
    }
}

fn output_error(at: usize, e: io::Error) -> RuntimeError {
    RuntimeError::Output {
        at,
        message: e.to_string(),
    }
}

/// Number of decimal digits of the program length, the `pc` column width.
pub(crate) fn pc_width(len: usize) -> usize {
    len.to_string().len()
}
