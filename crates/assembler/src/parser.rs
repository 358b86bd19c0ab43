//! Parser for AM0/AM1 program lines → instructions.
//!
//! Operand syntax per family:
//!
//! ```text
//! ADD;                 nullary, also PUSH; in AM1
//! LIT -3;              unary, one space before the operand
//! LOADI(2);            indirect (AM1), trailing ';' optional
//! LOAD(local,-2);      addressed (AM1), visibility global | local | lokal
//! ```
//!
//! Whitespace is tolerated around punctuation. Text after a complete
//! instruction is ignored, so a line may end in a remark.

use am_common::{Am0Instruction, Am1Instruction, BinaryOp, CoreInstruction, Visibility};

use crate::error::AsmError;
use crate::lexer::Cursor;

/// Parse one code line of an AM0 program.
pub(crate) fn parse_am0_line(text: &str, line: usize) -> Result<Am0Instruction, AsmError> {
    let mut cur = Cursor::new(text, line);
    let start = start_column(&mut cur);
    let mnemonic = cur.word();

    let instr = if let Some(core) = core_instruction(mnemonic, &mut cur)? {
        core.into()
    } else {
        let ctor: fn(i32) -> Am0Instruction = match mnemonic {
            "LOAD" => Am0Instruction::Load,
            "STORE" => Am0Instruction::Store,
            "READ" => Am0Instruction::Read,
            "WRITE" => Am0Instruction::Write,
            _ => return Err(unknown_mnemonic(&cur, start, mnemonic)),
        };
        ctor(unary_operand(&mut cur)?)
    };
    Ok(instr)
}

/// Parse one code line of an AM1 program.
pub(crate) fn parse_am1_line(text: &str, line: usize) -> Result<Am1Instruction, AsmError> {
    let mut cur = Cursor::new(text, line);
    let start = start_column(&mut cur);
    let mnemonic = cur.word();

    if let Some(core) = core_instruction(mnemonic, &mut cur)? {
        return Ok(core.into());
    }

    let instr = match mnemonic {
        "PUSH" => {
            cur.expect(';', "';'")?;
            Am1Instruction::Push
        }
        "CALL" => Am1Instruction::Call(unary_operand(&mut cur)?),
        "INIT" => Am1Instruction::Init(unary_operand(&mut cur)?),
        "RET" => Am1Instruction::Ret(unary_operand(&mut cur)?),
        "LOADI" => Am1Instruction::LoadI(indirect_operand(&mut cur)?),
        "STOREI" => Am1Instruction::StoreI(indirect_operand(&mut cur)?),
        "READI" => Am1Instruction::ReadI(indirect_operand(&mut cur)?),
        "WRITEI" => Am1Instruction::WriteI(indirect_operand(&mut cur)?),
        "LOAD" | "STORE" | "READ" | "WRITE" | "LOADA" => {
            let (b, o) = addressed_operand(&mut cur)?;
            match mnemonic {
                "LOAD" => Am1Instruction::Load(b, o),
                "STORE" => Am1Instruction::Store(b, o),
                "READ" => Am1Instruction::Read(b, o),
                "WRITE" => Am1Instruction::Write(b, o),
                _ => Am1Instruction::LoadA(b, o),
            }
        }
        _ => return Err(unknown_mnemonic(&cur, start, mnemonic)),
    };
    Ok(instr)
}

/// Skip leading whitespace and return the column the mnemonic starts at.
fn start_column(cur: &mut Cursor<'_>) -> usize {
    cur.skip_whitespace();
    cur.column()
}

/// The instructions both dialects share. `Ok(None)` if `mnemonic` is not one.
fn core_instruction(
    mnemonic: &str,
    cur: &mut Cursor<'_>,
) -> Result<Option<CoreInstruction>, AsmError> {
    if let Some(op) = BinaryOp::from_mnemonic(mnemonic) {
        cur.expect(';', "';'")?;
        return Ok(Some(op.into()));
    }
    let ctor: fn(i32) -> CoreInstruction = match mnemonic {
        "LIT" => CoreInstruction::Lit,
        "JMP" => CoreInstruction::Jmp,
        "JMC" => CoreInstruction::Jmc,
        _ => return Ok(None),
    };
    Ok(Some(ctor(unary_operand(cur)?)))
}

/// ` <int>;`
fn unary_operand(cur: &mut Cursor<'_>) -> Result<i32, AsmError> {
    cur.expect_space()?;
    let value = cur.integer()?;
    cur.expect(';', "';'")?;
    Ok(value)
}

/// `(<int>)` with an optional `;`.
fn indirect_operand(cur: &mut Cursor<'_>) -> Result<i32, AsmError> {
    cur.expect('(', "'('")?;
    let value = cur.integer()?;
    cur.expect(')', "')'")?;
    cur.eat(';');
    Ok(value)
}

/// `(<visibility>,<int>);`
fn addressed_operand(cur: &mut Cursor<'_>) -> Result<(Visibility, i32), AsmError> {
    cur.expect('(', "'('")?;
    cur.skip_whitespace();
    let before = cur.column();
    let keyword = cur.word();
    let visibility = Visibility::from_keyword(keyword).ok_or_else(|| {
        AsmError::UnknownVisibility {
            line: cur.line(),
            column: before,
            token: keyword.to_string(),
        }
    })?;
    cur.expect(',', "','")?;
    let offset = cur.integer()?;
    cur.expect(')', "')'")?;
    cur.expect(';', "';'")?;
    Ok((visibility, offset))
}

fn unknown_mnemonic(cur: &Cursor<'_>, column: usize, mnemonic: &str) -> AsmError {
    if mnemonic.is_empty() {
        return AsmError::Expected {
            line: cur.line(),
            column,
            expected: "mnemonic",
        };
    }
    AsmError::UnknownMnemonic {
        line: cur.line(),
        column,
        token: mnemonic.to_string(),
    }
}
