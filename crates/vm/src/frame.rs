//! Activation records on the AM1 runtime stack.
//!
//! A call lays out its frame as
//!
//! ```text
//! [ ..caller.. | params.. | return address | saved ref | locals.. ]
//!                                                      ^ ref
//! ```
//!
//! CALL pushes the return address and the caller's `ref`, then points `ref`
//! just past them. INIT and PUSH grow the frame. `RET n` checks the two saved
//! slots, restores `pc` and `ref`, and drops the locals, the saved slots and
//! `n` parameters, so the caller sees the runtime stack as it was before it
//! pushed those parameters.

use std::iter;

use am_common::Am1State;

use crate::error::RuntimeError;
use crate::validate::{enough_arguments, return_address_is_valid};

/// PUSH
pub(crate) fn push(state: &mut Am1State) -> Result<(), RuntimeError> {
    enough_arguments(&state.core, 1)?;
    if let Some(value) = state.core.data_stack.pop() {
        state.runtime_stack.push(value);
    }
    state.core.pc += 1;
    Ok(())
}

/// CALL adr
pub(crate) fn call(state: &mut Am1State, target: i32, len: usize) -> Result<(), RuntimeError> {
    let at = state.core.pc;
    let invalid = || RuntimeError::InvalidCallTarget { at, target, len };
    if !return_address_is_valid(target.into(), len) {
        return Err(invalid());
    }
    let return_address = i32::try_from(at + 1).map_err(|_| invalid())?;
    let saved_ref = i32::try_from(state.frame_pointer).map_err(|_| invalid())?;

    state.runtime_stack.push(return_address);
    state.runtime_stack.push(saved_ref);
    state.frame_pointer = state.runtime_stack.len();
    state.core.pc = target as usize;
    Ok(())
}

/// INIT n
pub(crate) fn init(state: &mut Am1State, n: i32) -> Result<(), RuntimeError> {
    let count = usize::try_from(n).map_err(|_| RuntimeError::NegativeCount {
        at: state.core.pc,
        count: n,
    })?;
    reserve_slots(&mut state.runtime_stack, count, state.core.pc)?;
    state.runtime_stack.extend(iter::repeat(0).take(count));
    state.core.pc += 1;
    Ok(())
}

/// Make room for `count` more slots without aborting on allocation failure.
fn reserve_slots(stack: &mut Vec<i32>, count: usize, at: usize) -> Result<(), RuntimeError> {
    stack
        .try_reserve(count)
        .map_err(|_| RuntimeError::StackOverflow {
            at,
            requested: count,
        })
}

/// RET n
pub(crate) fn ret(state: &mut Am1State, n: i32, len: usize) -> Result<(), RuntimeError> {
    let at = state.core.pc;
    let count = usize::try_from(n).map_err(|_| RuntimeError::NegativeCount { at, count: n })?;

    let frame_pointer = state.frame_pointer;
    let height = state.runtime_stack.len();
    if frame_pointer > height {
        return Err(RuntimeError::InvalidFrame {
            at,
            reason: format!("ref {frame_pointer} beyond runtime stack height {height}"),
        });
    }

    let needed = count + 2;
    if frame_pointer < needed {
        return Err(RuntimeError::RuntimeStackUnderflow {
            at,
            needed,
            available: frame_pointer,
        });
    }

    let return_address = state.runtime_stack[frame_pointer - 2];
    let saved_ref = state.runtime_stack[frame_pointer - 1];
    if !return_address_is_valid(return_address.into(), len) {
        return Err(RuntimeError::InvalidFrame {
            at,
            reason: format!("return address {return_address} outside [1-{len}]"),
        });
    }
    // The caller's frame must survive the teardown.
    let caller_height = frame_pointer - needed;
    let saved_ref = usize::try_from(saved_ref)
        .ok()
        .filter(|&r| r <= caller_height)
        .ok_or_else(|| RuntimeError::InvalidFrame {
            at,
            reason: format!("saved ref {saved_ref} outside [0-{caller_height}]"),
        })?;

    state.core.pc = return_address as usize;
    state.frame_pointer = saved_ref;
    state.runtime_stack.truncate(caller_height);
    Ok(())
}
