//! Precondition checks run before any instruction mutates state.
//!
//! Every check only reads the state. Handlers call them first, so a failed
//! check leaves the machine exactly as it was. Errors report the current
//! `pc` as the failing instruction.

use am_common::{Am0State, Am1State, CoreState, Visibility};

use crate::error::RuntimeError;

/// The data stack holds at least `needed` values.
pub fn enough_arguments(core: &CoreState, needed: usize) -> Result<(), RuntimeError> {
    let available = core.data_stack.len();
    if available < needed {
        return Err(RuntimeError::StackUnderflow {
            at: core.pc,
            needed,
            available,
        });
    }
    Ok(())
}

/// `target` lies in `[0, len]`; with `forbid_self_loop` it must also differ
/// from the current `pc`. Returns the target as a program counter.
///
/// JMP forbids self loops, JMC does not.
pub fn jmp_target_is_valid(
    core: &CoreState,
    target: i32,
    len: usize,
    forbid_self_loop: bool,
) -> Result<usize, RuntimeError> {
    let pc = usize::try_from(target)
        .ok()
        .filter(|&pc| pc <= len)
        .ok_or(RuntimeError::InvalidJumpTarget {
            at: core.pc,
            target,
            len,
        })?;
    if forbid_self_loop && pc == core.pc {
        return Err(RuntimeError::LoopJump { at: core.pc });
    }
    Ok(pc)
}

/// `address` lies in `[1, len]`: a position execution may continue at
/// after CALL or RET.
pub fn return_address_is_valid(address: i64, len: usize) -> bool {
    address >= 1 && address as u64 <= len as u64
}

/// AM0 address check: non-negative, and already written when
/// `require_existing` is set (LOAD, WRITE).
pub fn address_is_valid(
    state: &Am0State,
    address: i32,
    require_existing: bool,
) -> Result<(), RuntimeError> {
    if address < 0 || (require_existing && !state.memory.contains_key(&address)) {
        return Err(RuntimeError::InvalidAddress {
            at: state.core.pc,
            address: address.into(),
        });
    }
    Ok(())
}

/// AM1 address check. A global address `o` is valid iff
/// `1 <= o <= runtime_stack.len()`, a local one iff
/// `1 <= ref + o <= runtime_stack.len()`.
///
/// Returns the 0-based runtime-stack index of the slot.
pub fn runtime_address_is_valid(
    state: &Am1State,
    visibility: Visibility,
    offset: i32,
) -> Result<usize, RuntimeError> {
    let base = match visibility {
        Visibility::Local => state.frame_pointer as i64,
        Visibility::Global => 0,
    };
    let address = base + i64::from(offset);
    if address < 1 || address as u64 > state.runtime_stack.len() as u64 {
        return Err(RuntimeError::InvalidAddress {
            at: state.core.pc,
            address,
        });
    }
    Ok((address - 1) as usize)
}
