//! External I/O seen by a running program.
//!
//! READ and WRITE instructions, and the per-step state trace of
//! `run(.., logging = true)`, all go through [`Console`]. The engine never
//! touches stdin/stdout directly.

use std::collections::VecDeque;
use std::io::{self, BufRead, Stdout, StdinLock, Write};

/// Source of READ input and sink for WRITE output and trace lines.
pub trait Console {
    /// Read one integer.
    ///
    /// `Ok(None)` means the next token was not an integer or the input
    /// ended. The malformed token is consumed.
    fn read_value(&mut self) -> io::Result<Option<i32>>;

    /// Emit a value written by a WRITE instruction.
    fn write_value(&mut self, value: i32) -> io::Result<()>;

    /// Emit one rendered machine state.
    fn trace(&mut self, line: &str) -> io::Result<()>;
}

/// A [`Console`] over any buffered reader and writer.
///
/// Input is consumed as whitespace-separated tokens, so several values may
/// share one line. A ` In: ` prompt precedes every read, WRITE produces
/// `Out: <value>` lines and trace lines are written verbatim.
pub struct StreamConsole<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> StreamConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// The writer, e.g. to inspect buffered output in tests.
    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

impl StreamConsole<StdinLock<'static>, Stdout> {
    /// Console over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for StreamConsole<R, W> {
    fn read_value(&mut self) -> io::Result<Option<i32>> {
        write!(self.output, " In: ")?;
        self.output.flush()?;
        Ok(self.next_token()?.and_then(|token| token.parse().ok()))
    }

    fn write_value(&mut self, value: i32) -> io::Result<()> {
        writeln!(self.output, "Out: {value}")
    }

    fn trace(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}
