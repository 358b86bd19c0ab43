//! Parser for state literals, the textual machine snapshots.
//!
//! ```text
//! AM0: (pc , d_top:..:d_bottom , [k1/v1,k2/v2,..])
//! AM1: (pc , d_top:..:d_bottom , r_bottom:..:r_top , ref)
//! ```
//!
//! `-` stands for an empty stack. The data stack is listed top first and
//! reversed into push order; the runtime stack is listed bottom first.
//! Whitespace is allowed around every token, so the padded output of a
//! running machine parses back. Range checks against a program are left to
//! `Machine::load_state`.

use std::collections::BTreeMap;

use am_common::{Am0State, Am1State, CoreState};

use crate::error::AsmError;
use crate::lexer::Cursor;

/// Parse an AM0 state literal.
pub fn parse_am0_state(text: &str) -> Result<Am0State, AsmError> {
    let mut cur = Cursor::new(text, 1);
    let core = core_state(&mut cur)?;
    cur.expect(',', "','")?;
    let memory = memory(&mut cur)?;
    cur.expect(')', "')'")?;
    cur.finish()?;
    Ok(Am0State { core, memory })
}

/// Parse an AM1 state literal.
pub fn parse_am1_state(text: &str) -> Result<Am1State, AsmError> {
    let mut cur = Cursor::new(text, 1);
    let core = core_state(&mut cur)?;
    cur.expect(',', "','")?;
    let runtime_stack = stack(&mut cur)?;
    cur.expect(',', "','")?;
    let frame_pointer = cur.unsigned()?;
    cur.expect(')', "')'")?;
    cur.finish()?;
    Ok(Am1State {
        core,
        runtime_stack,
        frame_pointer,
    })
}

/// `(pc , data-stack`
fn core_state(cur: &mut Cursor<'_>) -> Result<CoreState, AsmError> {
    cur.expect('(', "'('")?;
    let pc = cur.unsigned()?;
    cur.expect(',', "','")?;
    let mut data_stack = stack(cur)?;
    data_stack.reverse();
    Ok(CoreState { pc, data_stack })
}

/// `-` or `v1:v2:..`, in listed order.
fn stack(cur: &mut Cursor<'_>) -> Result<Vec<i32>, AsmError> {
    if cur.eat_dash() {
        return Ok(Vec::new());
    }
    let mut values = vec![cur.integer()?];
    while cur.eat(':') {
        values.push(cur.integer()?);
    }
    Ok(values)
}

/// `[k1/v1,k2/v2,..]`
fn memory(cur: &mut Cursor<'_>) -> Result<BTreeMap<i32, i32>, AsmError> {
    cur.expect('[', "'['")?;
    let mut memory = BTreeMap::new();
    if cur.eat(']') {
        return Ok(memory);
    }
    loop {
        cur.skip_whitespace();
        let column = cur.column();
        let address = cur.integer()?;
        if address < 0 {
            return Err(AsmError::NegativeAddress {
                line: cur.line(),
                column,
                address,
            });
        }
        if memory.contains_key(&address) {
            return Err(AsmError::DuplicateAddress {
                line: cur.line(),
                column,
                address,
            });
        }
        cur.expect('/', "'/'")?;
        let value = cur.integer()?;
        memory.insert(address, value);
        if !cur.eat(',') {
            break;
        }
    }
    cur.expect(']', "']'")?;
    Ok(memory)
}
