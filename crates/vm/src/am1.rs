//! The AM1 machine: AM0's execution model with a runtime stack, a frame
//! pointer and procedure calls.

use std::fmt;

use am_common::{Am1Instruction, Am1State, CoreState, Program, Visibility};

use crate::console::Console;
use crate::error::RuntimeError;
use crate::frame;
use crate::machine::{exec_core, pc_width, read_value, write_value, Machine};
use crate::validate::{enough_arguments, runtime_address_is_valid};

/// AM1 interpreter bound to a program.
pub struct Am1<'a> {
    program: &'a Program<Am1Instruction>,
    state: Am1State,
}

impl<'a> Am1<'a> {
    /// Create a machine in the default state.
    pub fn new(program: &'a Program<Am1Instruction>) -> Self {
        Self {
            program,
            state: Am1State::default(),
        }
    }
}

impl Machine for Am1<'_> {
    type State = Am1State;

    fn program_len(&self) -> usize {
        self.program.len()
    }

    fn core(&self) -> &CoreState {
        &self.state.core
    }

    fn state(&self) -> &Am1State {
        &self.state
    }

    /// Accepts `pc` in `[1, len]` and `ref <= runtime_stack.len()`.
    fn load_state(&mut self, state: Am1State) -> Result<(), RuntimeError> {
        let len = self.program.len();
        if state.core.pc == 0 || state.core.pc > len {
            return Err(RuntimeError::InvalidState {
                reason: format!("program counter {} outside [1-{len}]", state.core.pc),
            });
        }
        if state.frame_pointer > state.runtime_stack.len() {
            return Err(RuntimeError::InvalidState {
                reason: format!(
                    "ref {} beyond runtime stack height {}",
                    state.frame_pointer,
                    state.runtime_stack.len()
                ),
            });
        }
        self.state = state;
        Ok(())
    }

    fn reset(&mut self) {
        self.state = Am1State::default();
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
            Am1Instruction::Core(core) => exec_core(&mut state.core, core, len),
            Am1Instruction::Push => frame::push(state),
            Am1Instruction::Call(adr) => frame::call(state, adr, len),
            Am1Instruction::Init(n) => frame::init(state, n),
            Am1Instruction::Ret(n) => frame::ret(state, n, len),
            Am1Instruction::Load(b, o) => load(state, b, o),
            Am1Instruction::Store(b, o) => store(state, b, o),
            Am1Instruction::Read(b, o) => read(state, b, o, console),
            Am1Instruction::Write(b, o) => write(state, b, o, console),
            Am1Instruction::LoadA(b, o) => load_address(state, b, o),
            Am1Instruction::LoadI(o) => {
                let address = dereference(state, o)?;
                load(state, Visibility::Global, address)
            }
            Am1Instruction::StoreI(o) => {
                let address = dereference(state, o)?;
                store(state, Visibility::Global, address)
            }
            Am1Instruction::ReadI(o) => {
                let address = dereference(state, o)?;
                read(state, Visibility::Global, address, console)
            }
            Am1Instruction::WriteI(o) => {
                let address = dereference(state, o)?;
                write(state, Visibility::Global, address, console)
            }
        }
    }
}

impl fmt::Display for Am1<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.state.write_padded(f, pc_width(self.program.len()))
    }
}

/// LOAD(b,o)
fn load(state: &mut Am1State, b: Visibility, o: i32) -> Result<(), RuntimeError> {
    let index = runtime_address_is_valid(state, b, o)?;
    let value = state.runtime_stack[index];
    state.core.data_stack.push(value);
    state.core.pc += 1;
    Ok(())
}

/// STORE(b,o)
fn store(state: &mut Am1State, b: Visibility, o: i32) -> Result<(), RuntimeError> {
    enough_arguments(&state.core, 1)?;
    let index = runtime_address_is_valid(state, b, o)?;
    if let Some(value) = state.core.data_stack.pop() {
        state.runtime_stack[index] = value;
    }
    state.core.pc += 1;
    Ok(())
}

/// READ(b,o)
fn read<C: Console>(
    state: &mut Am1State,
    b: Visibility,
    o: i32,
    console: &mut C,
) -> Result<(), RuntimeError> {
    let index = runtime_address_is_valid(state, b, o)?;
    state.runtime_stack[index] = read_value(console, state.core.pc)?;
    state.core.pc += 1;
    Ok(())
}

/// WRITE(b,o)
fn write<C: Console>(
    state: &mut Am1State,
    b: Visibility,
    o: i32,
    console: &mut C,
) -> Result<(), RuntimeError> {
    let index = runtime_address_is_valid(state, b, o)?;
    write_value(console, state.core.pc, state.runtime_stack[index])?;
    state.core.pc += 1;
    Ok(())
}

/// LOADA(b,o): push the absolute address instead of the value.
fn load_address(state: &mut Am1State, b: Visibility, o: i32) -> Result<(), RuntimeError> {
    let index = runtime_address_is_valid(state, b, o)?;
    let address = i32::try_from(index + 1).map_err(|_| RuntimeError::InvalidAddress {
        at: state.core.pc,
        address: index as i64 + 1,
    })?;
    state.core.data_stack.push(address);
    state.core.pc += 1;
    Ok(())
}

/// The global address stored in local slot `o`, for the `*I` instructions.
fn dereference(state: &Am1State, o: i32) -> Result<i32, RuntimeError> {
    let index = runtime_address_is_valid(state, Visibility::Local, o)?;
    Ok(state.runtime_stack[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::StreamConsole;
    use am_common::CoreInstruction;

    fn console(input: &str) -> StreamConsole<&[u8], Vec<u8>> {
        StreamConsole::new(input.as_bytes(), Vec::new())
    }

    fn with_state(program: &Program<Am1Instruction>, state: Am1State) -> Am1<'_> {
        let mut vm = Am1::new(program);
        vm.load_state(state).unwrap();
        vm
    }

    fn am1_state(data_stack: Vec<i32>, runtime_stack: Vec<i32>, frame_pointer: usize) -> Am1State {
        Am1State {
            core: CoreState { pc: 1, data_stack },
            runtime_stack,
            frame_pointer,
        }
    }

    #[test]
    fn local_load_is_relative_to_ref() {
        let program = Program::new(vec![Am1Instruction::Load(Visibility::Local, 1)]);
        let mut vm = with_state(&program, am1_state(vec![], vec![5, 6, 7], 2));
        vm.step(&mut console("")).unwrap();
        assert_eq!(vm.core().data_stack, vec![7]);
    }

    #[test]
    fn global_store_is_absolute() {
        let program = Program::new(vec![Am1Instruction::Store(Visibility::Global, 1)]);
        let mut vm = with_state(&program, am1_state(vec![9], vec![5, 6, 7], 2));
        vm.step(&mut console("")).unwrap();
        assert_eq!(vm.state().runtime_stack, vec![9, 6, 7]);
        assert!(vm.core().data_stack.is_empty());
    }

    #[test]
    fn store_outside_stack_leaves_state() {
        let program = Program::new(vec![Am1Instruction::Store(Visibility::Local, 2)]);
        let before = am1_state(vec![9], vec![5, 6, 7], 2);
        let mut vm = with_state(&program, before.clone());
        assert!(matches!(
            vm.step(&mut console("")),
            Err(RuntimeError::InvalidAddress { at: 1, address: 4 })
        ));
        assert_eq!(vm.state(), &before);
    }

    #[test]
    fn load_address_pushes_absolute_position() {
        let program = Program::new(vec![
            Am1Instruction::LoadA(Visibility::Local, -1),
            Am1Instruction::LoadA(Visibility::Global, 3),
        ]);
        let mut vm = with_state(&program, am1_state(vec![], vec![5, 6, 7], 2));
        let mut c = console("");
        vm.step(&mut c).unwrap();
        vm.step(&mut c).unwrap();
        assert_eq!(vm.core().data_stack, vec![1, 3]);
    }

    #[test]
    fn indirect_access_goes_through_local_slot() {
        // local 1 holds global address 1
        let program = Program::new(vec![
            Am1Instruction::LoadI(1),
            Am1Instruction::Core(CoreInstruction::Lit(40)),
            Am1Instruction::StoreI(1),
            Am1Instruction::WriteI(1),
        ]);
        let mut vm = with_state(&program, am1_state(vec![], vec![8, 0, 1], 2));
        let mut c = console("");
        for _ in 0..4 {
            vm.step(&mut c).unwrap();
        }
        assert_eq!(vm.core().data_stack, vec![8]);
        assert_eq!(vm.state().runtime_stack, vec![40, 0, 1]);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert_eq!(out, "Out: 40\n");
    }

    #[test]
    fn indirect_read_targets_global_slot() {
        let program = Program::new(vec![Am1Instruction::ReadI(1)]);
        let mut vm = with_state(&program, am1_state(vec![], vec![8, 0, 1], 2));
        vm.step(&mut console("12\n")).unwrap();
        assert_eq!(vm.state().runtime_stack, vec![12, 0, 1]);
    }

    #[test]
    fn indirect_with_dangling_pointer_fails() {
        let program = Program::new(vec![Am1Instruction::LoadI(1)]);
        let before = am1_state(vec![], vec![8, 0, 99], 2);
        let mut vm = with_state(&program, before.clone());
        assert!(matches!(
            vm.step(&mut console("")),
            Err(RuntimeError::InvalidAddress { address: 99, .. })
        ));
        assert_eq!(vm.state(), &before);
    }

    #[test]
    fn load_state_rejects_halted_pc_and_bad_ref() {
        let program = Program::new(vec![Am1Instruction::Push]);
        let mut vm = Am1::new(&program);
        let mut halted = Am1State::default();
        halted.core.pc = 0;
        assert!(vm.load_state(halted).is_err());
        assert!(vm.load_state(am1_state(vec![], vec![1], 2)).is_err());
        assert_eq!(vm.state(), &Am1State::default());
    }

    #[test]
    fn reset_restores_default() {
        let program = Program::new(vec![Am1Instruction::Init(2)]);
        let mut vm = Am1::new(&program);
        vm.step(&mut console("")).unwrap();
        vm.reset();
        assert_eq!(vm.state(), &Am1State::default());
    }
}
