//! Driver steps: read, assemble, list, seed the state, run, report.
//!
//! Every step prints its own diagnostics and returns the process exit code
//! on failure.

use std::fmt::Display;
use std::fs;
use std::io::{self, BufRead, Read};

use am_assembler::{
    assemble_am0, assemble_am1, classify_line, disassemble_am0, disassemble_am1,
    parse_am0_state, parse_am1_state, AsmError, LineKind,
};
use am_common::Program;
use am_vm::{Am0, Am1, Machine, RuntimeError, StreamConsole};

use crate::{Cli, Dialect};

/// How many state literals `--init` accepts before giving up.
pub const MAX_STATE_ATTEMPTS: usize = 5;

/// Why a state line was refused.
#[derive(Debug)]
enum StateError {
    Parse(AsmError),
    Load(RuntimeError),
}

/// Assemble and run an AM0 program.
pub fn run_am0(cli: &Cli) -> Result<(), i32> {
    let dialect = Dialect::Am0;
    let source = read_source(cli)?;
    let program = assemble_or_report(&source, assemble_am0)?;
    if cli.input.is_some() {
        print_listing(dialect, &source, &disassemble_am0(&program));
    }

    let mut vm = Am0::new(&program);
    if cli.init {
        let stdin = io::stdin();
        init_state(&mut vm, dialect, parse_am0_state, &mut stdin.lock())?;
    }
    execute(&mut vm, dialect, cli.logging)
}

/// Assemble and run an AM1 program.
pub fn run_am1(cli: &Cli) -> Result<(), i32> {
    let dialect = Dialect::Am1;
    let source = read_source(cli)?;
    let program = assemble_or_report(&source, assemble_am1)?;
    if cli.input.is_some() {
        print_listing(dialect, &source, &disassemble_am1(&program));
    }

    let mut vm = Am1::new(&program);
    if cli.init {
        let stdin = io::stdin();
        init_state(&mut vm, dialect, parse_am1_state, &mut stdin.lock())?;
    }
    execute(&mut vm, dialect, cli.logging)
}

/// Program text from the input file, or all of stdin.
fn read_source(cli: &Cli) -> Result<String, i32> {
    match &cli.input {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            eprintln!("error: cannot read '{}': {e}", path.display());
            1
        }),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(|e| {
                eprintln!("error: cannot read program from stdin: {e}");
                1
            })?;
            Ok(text)
        }
    }
}

/// Assemble, printing the offending line and a caret on failure.
fn assemble_or_report<I>(
    source: &str,
    assemble: fn(&str) -> Result<Program<I>, AsmError>,
) -> Result<Program<I>, i32> {
    assemble(source).map_err(|e| {
        if let Some(line) = source.lines().nth(e.line().saturating_sub(1)) {
            eprintln!("{line}");
            eprintln!("{}", e.caret());
        }
        eprintln!("error: {e}");
        1
    })
}

/// Print `AMx code:` and the numbered program, with comments in place.
fn print_listing(dialect: Dialect, source: &str, canonical: &str) {
    println!("{} code:", dialect.name());
    print!("{}", listing(source, canonical));
    println!();
}

/// Numbered listing of the canonical instructions. Comment lines are kept
/// where they appear in the source; blank and shebang lines are dropped.
pub fn listing(source: &str, canonical: &str) -> String {
    let mut instructions = canonical.lines();
    let width = canonical.lines().count().to_string().len();
    let mut out = String::new();
    let mut number = 0;
    for line in source.lines() {
        match classify_line(line) {
            LineKind::Comment => {
                out.push_str(line.trim_start());
                out.push('\n');
            }
            LineKind::Code => {
                number += 1;
                let text = instructions.next().unwrap_or_default();
                out.push_str(&format!("{number:>width$}: {text}\n"));
            }
            LineKind::Blank | LineKind::Shebang => {}
        }
    }
    out
}

/// Prompt for a state literal until one parses and loads.
///
/// After the first failure the example literals are shown once. End of
/// input or [`MAX_STATE_ATTEMPTS`] failures cancel with exit code 1.
pub fn init_state<M, R>(
    vm: &mut M,
    dialect: Dialect,
    parse: fn(&str) -> Result<M::State, AsmError>,
    input: &mut R,
) -> Result<(), i32>
where
    M: Machine,
    R: BufRead,
{
    println!("{} state:", dialect.name());
    let mut examples_shown = false;

    for _ in 0..MAX_STATE_ATTEMPTS {
        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(|e| {
            eprintln!("error: cannot read state: {e}");
            1
        })?;
        if read == 0 {
            eprintln!("error: no initial state given");
            return Err(1);
        }
        let line = line.trim_end_matches(['\r', '\n']);

        let attempt = parse(line)
            .map_err(StateError::Parse)
            .and_then(|state| vm.load_state(state).map_err(StateError::Load));
        match attempt {
            Ok(()) => {
                println!();
                return Ok(());
            }
            Err(StateError::Parse(e)) => {
                eprintln!("{line}");
                eprintln!("{}", e.caret());
                eprintln!("error: {e}");
            }
            Err(StateError::Load(e)) => eprintln!("error: {e}"),
        }

        if !examples_shown {
            eprintln!("examples:");
            for example in dialect.state_examples() {
                eprintln!("  {example}");
            }
            examples_shown = true;
        }
    }

    eprintln!("error: no valid state after {MAX_STATE_ATTEMPTS} attempts");
    Err(1)
}

/// Run to completion on stdin/stdout and report the outcome.
fn execute<M: Machine>(vm: &mut M, dialect: Dialect, logging: bool) -> Result<(), i32> {
    println!("Running the {} interpreter:", dialect.name());
    let mut console = StreamConsole::stdio();
    match vm.run(&mut console, logging) {
        Ok(()) => {
            println!("Final state: {vm}");
            Ok(())
        }
        Err(e) => report_failure(dialect, &e, &*vm),
    }
}

fn report_failure(dialect: Dialect, e: &RuntimeError, vm: &impl Display) -> Result<(), i32> {
    eprintln!(
        "{} interpreter terminated with an error: {e}",
        dialect.name()
    );
    eprintln!("Last machine state: {vm}");
    Err(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use am_common::{Am0State, Am1State};

    #[test]
    fn listing_numbers_code_and_keeps_comments() {
        let source = "#!/usr/bin/env am0\n# sum\nLIT  1 ;\n\nLIT 2;\nADD;\n";
        let canonical = "LIT 1;\nLIT 2;\nADD;\n";
        assert_eq!(
            listing(source, canonical),
            "# sum\n1: LIT 1;\n2: LIT 2;\n3: ADD;\n"
        );
    }

    #[test]
    fn listing_aligns_numbers() {
        let source = "PUSH;\n".repeat(10);
        let canonical = source.clone();
        let out = listing(&source, &canonical);
        assert!(out.starts_with(" 1: PUSH;\n"));
        assert!(out.ends_with("10: PUSH;\n"));
    }

    #[test]
    fn init_state_loads_first_valid_line() {
        let program = assemble_am0("LIT 1;\nLIT 2;\n").unwrap();
        let mut vm = Am0::new(&program);
        let mut input = "(2 , 5 , [0/1])\n".as_bytes();
        init_state(&mut vm, Dialect::Am0, parse_am0_state, &mut input).unwrap();
        assert_eq!(vm.pc(), 2);
        assert_eq!(vm.state().memory.get(&0), Some(&1));
    }

    #[test]
    fn init_state_retries_after_errors() {
        let program = assemble_am1("PUSH;\n").unwrap();
        let mut vm = Am1::new(&program);
        // bad syntax, then pc beyond the program, then valid
        let mut input = "(1 , - ,\n(9 , - , - , 0)\n(1 , 3 , - , 0)\n".as_bytes();
        init_state(&mut vm, Dialect::Am1, parse_am1_state, &mut input).unwrap();
        assert_eq!(vm.core().data_stack, vec![3]);
    }

    #[test]
    fn init_state_gives_up_at_end_of_input() {
        let program = assemble_am0("ADD;\n").unwrap();
        let mut vm = Am0::new(&program);
        let mut input = "(x)\n".as_bytes();
        assert_eq!(
            init_state(&mut vm, Dialect::Am0, parse_am0_state, &mut input),
            Err(1)
        );
        assert_eq!(vm.state(), &Am0State::default());
    }

    #[test]
    fn init_state_gives_up_after_max_attempts() {
        let program = assemble_am1("PUSH;\n").unwrap();
        let mut vm = Am1::new(&program);
        let text = "bad\n".repeat(MAX_STATE_ATTEMPTS) + "(1 , - , - , 0)\n";
        let mut input = text.as_bytes();
        assert_eq!(
            init_state(&mut vm, Dialect::Am1, parse_am1_state, &mut input),
            Err(1)
        );
        assert_eq!(vm.state(), &Am1State::default());
    }

    #[test]
    fn assembly_error_maps_to_exit_1() {
        assert_eq!(assemble_or_report("LIT 1;\nNOP;\n", assemble_am0), Err(1));
    }
}
