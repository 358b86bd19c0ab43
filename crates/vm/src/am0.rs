//! The AM0 machine: data stack plus flat, sparse memory.

use std::fmt;

use am_common::{Am0Instruction, Am0State, CoreState, Program};

use crate::console::Console;
use crate::error::RuntimeError;
use crate::machine::{exec_core, pc_width, read_value, write_value, Machine};
use crate::validate::{address_is_valid, enough_arguments};

/// AM0 interpreter bound to a program.
pub struct Am0<'a> {
    program: &'a Program<Am0Instruction>,
    state: Am0State,
}

impl<'a> Am0<'a> {
    /// Create a machine in the default state.
    pub fn new(program: &'a Program<Am0Instruction>) -> Self {
        Self {
            program,
            state: Am0State::default(),
        }
    }

    pub fn program(&self) -> &'a Program<Am0Instruction> {
        self.program
    }
}

impl Machine for Am0<'_> {
    type State = Am0State;

    fn program_len(&self) -> usize {
        self.program.len()
    }

    fn core(&self) -> &CoreState {
        &self.state.core
    }

    fn state(&self) -> &Am0State {
        &self.state
    }

    /// Accepts `pc` in `[0, len]` and non-negative memory addresses.
    fn load_state(&mut self, state: Am0State) -> Result<(), RuntimeError> {
        let len = self.program.len();
        if state.core.pc > len {
            return Err(RuntimeError::InvalidState {
                reason: format!("program counter {} outside [0-{len}]", state.core.pc),
            });
        }
        if let Some(&address) = state.memory.keys().find(|&&address| address < 0) {
            return Err(RuntimeError::InvalidState {
                reason: format!("negative memory address {address}"),
            });
        }
        self.state = state;
        Ok(())
    }

    fn reset(&mut self) {
        self.state = Am0State::default();
    }

    fn step<C: Console>(&mut self, console: &mut C) -> Result<(), RuntimeError> {
        let pc = self.state.core.pc;
        if pc == 0 {
            return Ok(());
        }
        let len = self.program.len();
        let instr = *self
            .program
            .get(pc)
            .ok_or(RuntimeError::RunawayCounter { pc, len })?;

        let state = &mut self.state;
        match instr {
            Am0Instruction::Core(core) => exec_core(&mut state.core, core, len),
            Am0Instruction::Load(n) => load(state, n),
            Am0Instruction::Store(n) => store(state, n),
            Am0Instruction::Read(n) => read(state, n, console),
            Am0Instruction::Write(n) => write(state, n, console),
        }
    }
}

impl fmt::Display for Am0<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.state.write_padded(f, pc_width(self.program.len()))
    }
}

/// LOAD n
fn load(state: &mut Am0State, n: i32) -> Result<(), RuntimeError> {
    address_is_valid(state, n, true)?;
    let value = state.memory[&n];
    state.core.data_stack.push(value);
    state.core.pc += 1;
    Ok(())
}

/// STORE n
fn store(state: &mut Am0State, n: i32) -> Result<(), RuntimeError> {
    address_is_valid(state, n, false)?;
    enough_arguments(&state.core, 1)?;
    if let Some(value) = state.core.data_stack.pop() {
        state.memory.insert(n, value);
    }
    state.core.pc += 1;
    Ok(())
}

/// READ n
fn read<C: Console>(state: &mut Am0State, n: i32, console: &mut C) -> Result<(), RuntimeError> {
    address_is_valid(state, n, false)?;
    let value = read_value(console, state.core.pc)?;
    state.memory.insert(n, value);
    state.core.pc += 1;
    Ok(())
}

/// WRITE n
fn write<C: Console>(state: &mut Am0State, n: i32, console: &mut C) -> Result<(), RuntimeError> {
    address_is_valid(state, n, true)?;
    write_value(console, state.core.pc, state.memory[&n])?;
    state.core.pc += 1;
    Ok(())
}
