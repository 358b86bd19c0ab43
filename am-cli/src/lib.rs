//! Drivers for the AM0 and AM1 interpreters.
//!
//! Both binaries share one command line:
//!
//! ```text
//! am0 [-l|--logging] [-i|--init] [INPUT-FILE]
//! am1 [-l|--logging] [-i|--init] [INPUT-FILE]
//! ```
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/assembly error, or no valid initial state
//! - 3: Runtime error

pub mod commands;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, FromArgMatches, Parser};

/// Command-line options shared by `am0` and `am1`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    /// Print the machine state before every instruction.
    #[arg(short, long)]
    pub logging: bool,

    /// Read an initial machine state from stdin before running.
    #[arg(short, long)]
    pub init: bool,

    /// Program text. Read from stdin when omitted.
    #[arg(value_name = "INPUT-FILE")]
    pub input: Option<PathBuf>,
}

/// Which machine a binary drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Am0,
    Am1,
}

impl Dialect {
    /// Display name used in headings, e.g. `AM0 code:`.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Am0 => "AM0",
            Dialect::Am1 => "AM1",
        }
    }

    /// Binary name.
    pub fn binary(self) -> &'static str {
        match self {
            Dialect::Am0 => "am0",
            Dialect::Am1 => "am1",
        }
    }

    fn about(self) -> &'static str {
        match self {
            Dialect::Am0 => "Interpreter for the AM0 abstract machine",
            Dialect::Am1 => "Interpreter for the AM1 abstract machine with procedures",
        }
    }

    /// Example state literals shown after an invalid `--init` input.
    pub fn state_examples(self) -> &'static [&'static str] {
        match self {
            Dialect::Am0 => &["(1 , - , [])", "(3 , 4:2 , [0/7,1/-3])"],
            Dialect::Am1 => &["(1 , - , - , 0)", "(5 , 4 , 7:4:0 , 3)"],
        }
    }
}

/// Parse `args` (including the binary name) for `dialect`.
pub fn parse_args<I, T>(dialect: Dialect, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Cli::command()
        .name(dialect.binary())
        .about(dialect.about())
        .try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}

/// Entry point of the `am0` and `am1` binaries.
pub fn main(dialect: Dialect) {
    let cli = match parse_args(dialect, std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let result = match dialect {
        Dialect::Am0 => commands::run_am0(&cli),
        Dialect::Am1 => commands::run_am1(&cli),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
