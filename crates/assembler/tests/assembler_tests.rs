//! Integration tests for the AM0/AM1 assembler.
//!
//! Tests cover:
//! - The sample programs under `tests/programs/` (assemble, then execute)
//! - Parse errors with line, column and caret
//! - State literals: parsing, loading into a machine, render/parse roundtrip

use am_assembler::{
    assemble_am0, assemble_am1, disassemble_am0, disassemble_am1, parse_am0_state,
    parse_am1_state, AsmError,
};
use am_common::{Am0State, Am1State, CoreState};
use am_vm::{Am0, Am1, Machine, RuntimeError, StreamConsole};
use proptest::prelude::*;

// ---- Test helpers ----

const ADD_AM0: &str = include_str!("../../../tests/programs/add.am0");
const COUNTDOWN_AM0: &str = include_str!("../../../tests/programs/countdown.am0");
const DIVZERO_AM0: &str = include_str!("../../../tests/programs/divzero.am0");
const FACTORIAL_AM1: &str = include_str!("../../../tests/programs/factorial.am1");
const SWAP_AM1: &str = include_str!("../../../tests/programs/swap.am1");

fn console(input: &str) -> StreamConsole<&[u8], Vec<u8>> {
    StreamConsole::new(input.as_bytes(), Vec::new())
}

fn output(console: StreamConsole<&[u8], Vec<u8>>) -> String {
    String::from_utf8(console.into_output()).unwrap()
}

/// Assemble and run AM0 text; returns the run result, final state and output.
fn run_am0(text: &str, input: &str) -> (Result<(), RuntimeError>, Am0State, String) {
    let program = assemble_am0(text).unwrap();
    let mut vm = Am0::new(&program);
    let mut c = console(input);
    let result = vm.run(&mut c, false);
    (result, vm.state().clone(), output(c))
}

fn run_am1(text: &str, input: &str) -> (Result<(), RuntimeError>, Am1State, String) {
    let program = assemble_am1(text).unwrap();
    let mut vm = Am1::new(&program);
    let mut c = console(input);
    let result = vm.run(&mut c, false);
    (result, vm.state().clone(), output(c))
}

// ---- Sample programs ----

#[test]
fn add_program() {
    let (result, state, out) = run_am0(ADD_AM0, "");
    assert_eq!(result, Ok(()));
    assert_eq!(out, "Out: 7\n");
    assert_eq!(state.to_string(), "(0 , - , [1/7])");
}

#[test]
fn add_program_without_halt_runs_away() {
    let (result, state, out) = run_am0("LIT 3;\nLIT 4;\nADD;\nSTORE 1;\nWRITE 1;\n", "");
    assert_eq!(out, "Out: 7\n");
    assert_eq!(state.to_string(), "(6 , - , [1/7])");
    assert!(matches!(result, Err(RuntimeError::RunawayCounter { .. })));
}

#[test]
fn countdown_program() {
    let (result, _, out) = run_am0(COUNTDOWN_AM0, "3\n");
    assert_eq!(result, Ok(()));
    assert_eq!(out, " In: Out: 3\nOut: 2\nOut: 1\n");
}

#[test]
fn divzero_program_keeps_state() {
    let (result, state, _) = run_am0(DIVZERO_AM0, "");
    assert_eq!(result, Err(RuntimeError::DivisionByZero { at: 3 }));
    assert_eq!(state.to_string(), "(3 , 0:5 , [])");
}

#[test]
fn factorial_program() {
    let (result, state, out) = run_am1(FACTORIAL_AM1, "6\n");
    assert_eq!(result, Ok(()));
    assert_eq!(out, " In: Out: 720\n");
    assert_eq!(state.runtime_stack, vec![720]);
}

#[test]
fn swap_program_uses_pointers() {
    let (result, state, out) = run_am1(SWAP_AM1, "");
    assert_eq!(result, Ok(()));
    assert_eq!(out, "Out: 20\nOut: 10\n");
    assert_eq!(state.to_string(), "(0 , - , 20:10 , 0)");
}

#[test]
fn procedure_with_local_variable() {
    let text = "CALL 3;\nJMP 0;\nINIT 1;\nLIT 9;\nSTORE(local,1);\nLOAD(local,1);\nRET 0;\n";
    let (result, state, _) = run_am1(text, "");
    assert_eq!(result, Ok(()));
    assert_eq!(state.core.data_stack, vec![9]);
    assert!(state.runtime_stack.is_empty());
}

#[test]
fn sample_programs_disassemble_to_reassemblable_text() {
    for text in [ADD_AM0, COUNTDOWN_AM0, DIVZERO_AM0] {
        let program = assemble_am0(text).unwrap();
        assert_eq!(assemble_am0(&disassemble_am0(&program)).unwrap(), program);
    }
    for text in [FACTORIAL_AM1, SWAP_AM1] {
        let program = assemble_am1(text).unwrap();
        assert_eq!(assemble_am1(&disassemble_am1(&program)).unwrap(), program);
    }
}

#[test]
fn remarks_after_instructions_are_ignored() {
    let (result, state, _) = run_am0("LIT 3; push three\nLIT 4;\nADD; # sum\nJMP 0; done\n", "");
    assert_eq!(result, Ok(()));
    assert_eq!(state.core.data_stack, vec![7]);

    let program = assemble_am1("ADD; # sum\n").unwrap();
    assert_eq!(disassemble_am1(&program), "ADD;\n");
}

// ---- Parse errors ----

#[test]
fn error_in_later_line() {
    let err = assemble_am0("LIT 1;\nLIT 2\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::Expected {
            line: 2,
            column: 5,
            expected: "';'"
        }
    );
    assert_eq!(err.caret(), "     ^");
}

#[test]
fn am1_only_instructions_fail_in_am0() {
    for text in ["PUSH;", "CALL 1;", "INIT 1;", "RET 0;", "LOADI(1);"] {
        assert!(
            matches!(assemble_am0(text), Err(AsmError::UnknownMnemonic { .. })),
            "{text} should be rejected"
        );
    }
}

#[test]
fn invalid_number_reports_token() {
    let err = assemble_am1("LIT 4294967296;").unwrap_err();
    assert_eq!(
        err,
        AsmError::InvalidNumber {
            line: 1,
            column: 4,
            token: "4294967296".to_string()
        }
    );
}

#[test]
fn unknown_visibility_points_at_keyword() {
    let err = assemble_am1("# frame\nSTORE(frame,1);\n").unwrap_err();
    assert_eq!(err.line(), 2);
    assert_eq!(err.caret(), "      ^");
    assert!(matches!(err, AsmError::UnknownVisibility { .. }));
}

// ---- State literals ----

#[test]
fn loaded_state_resumes_execution() {
    let program = assemble_am0("LOAD 4;\nADD;\nWRITE 0;\nJMP 0;\n").unwrap();
    let mut vm = Am0::new(&program);
    vm.load_state(parse_am0_state("(2, 5:1, [0/9, 4/2])").unwrap())
        .unwrap();
    let mut c = console("");
    vm.run(&mut c, false).unwrap();
    assert_eq!(output(c), "Out: 9\n");
    assert_eq!(vm.core().data_stack, vec![6]);
}

#[test]
fn state_beyond_program_is_refused() {
    let program = assemble_am1("RET 0;\n").unwrap();
    let mut vm = Am1::new(&program);
    let state = parse_am1_state("(2 , - , 1:0 , 2)").unwrap();
    assert!(matches!(
        vm.load_state(state),
        Err(RuntimeError::InvalidState { .. })
    ));
    assert_eq!(vm.state(), &Am1State::default());
}

#[test]
fn injected_frame_is_checked_on_return() {
    // saved ref 5 lies above the caller's frame
    let program = assemble_am1("RET 0;\nJMP 0;\n").unwrap();
    let mut vm = Am1::new(&program);
    vm.load_state(parse_am1_state("(1 , - , 2:5 , 2)").unwrap())
        .unwrap();
    assert!(matches!(
        vm.run(&mut console(""), false),
        Err(RuntimeError::InvalidFrame { at: 1, .. })
    ));
}

#[test]
fn padded_trace_line_parses_back() {
    let program = assemble_am1(&"PUSH;\n".repeat(12)).unwrap();
    let mut vm = Am1::new(&program);
    vm.load_state(parse_am1_state("(1,3:2:1,-,0)").unwrap())
        .unwrap();
    let rendered = vm.to_string();
    assert_eq!(rendered, "(1  , 3:2:1 , - , 0)");
    assert_eq!(parse_am1_state(&rendered).unwrap(), *vm.state());
}

// ---- Property tests ----

fn arb_core() -> impl Strategy<Value = CoreState> {
    (0usize..1000, prop::collection::vec(any::<i32>(), 0..6))
        .prop_map(|(pc, data_stack)| CoreState { pc, data_stack })
}

fn arb_am0_state() -> impl Strategy<Value = Am0State> {
    (
        arb_core(),
        prop::collection::btree_map(0i32..i32::MAX, any::<i32>(), 0..6),
    )
        .prop_map(|(core, memory)| Am0State { core, memory })
}

fn arb_am1_state() -> impl Strategy<Value = Am1State> {
    (
        arb_core(),
        prop::collection::vec(any::<i32>(), 0..6),
        0usize..10,
    )
        .prop_map(|(core, runtime_stack, frame_pointer)| Am1State {
            core,
            runtime_stack,
            frame_pointer,
        })
}

proptest! {
    #[test]
    fn am0_state_render_parse_roundtrip(state in arb_am0_state(), width in 0usize..5) {
        let mut padded = String::new();
        state.write_padded(&mut padded, width).unwrap();
        prop_assert_eq!(parse_am0_state(&state.to_string()).unwrap(), state.clone());
        prop_assert_eq!(parse_am0_state(&padded).unwrap(), state);
    }

    #[test]
    fn am1_state_render_parse_roundtrip(state in arb_am1_state(), width in 0usize..5) {
        let mut padded = String::new();
        state.write_padded(&mut padded, width).unwrap();
        prop_assert_eq!(parse_am1_state(&state.to_string()).unwrap(), state.clone());
        prop_assert_eq!(parse_am1_state(&padded).unwrap(), state);
    }

    #[test]
    fn literal_arithmetic(a in any::<i32>(), b in 1i32..=i32::MAX) {
        let text = format!("LIT {a};\nLIT {b};\nDIV;\nLIT {a};\nLIT {b};\nMOD;\nJMP 0;\n");
        let (result, state, _) = run_am0(&text, "");
        prop_assert_eq!(result, Ok(()));
        prop_assert_eq!(state.core.data_stack, vec![a.wrapping_div(b), a.wrapping_rem(b)]);
    }
}
