use std::io::{self, BufRead, StdinLock, Stdout, Write};

use anyhow::Result;
use tracing::warn;

use crate::card::confirm::Confirm;

const POSITIVE: [&str; 5] = ["y", "Y", "yes", "Yes", "YES"];
const NEGATIVE: [&str; 5] = ["n", "N", "no", "No", "NO"];

/// Asks questions on the controlling terminal and blocks until a yes or a no is typed.
pub struct TerminalConfirm<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirm<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, context: &str, question: &str) -> Result<bool> {
        loop {
            if !context.is_empty() {
                writeln!(self.output, "{context}")?;
            }
            write!(self.output, "{question} (y/n) ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                warn!("Input closed while asking {question:?}, treating it as a no");
                writeln!(self.output)?;
                return Ok(false);
            }

            let answer = answer.trim_end_matches(['\r', '\n']);
            if POSITIVE.contains(&answer) {
                return Ok(true);
            }
            if NEGATIVE.contains(&answer) {
                return Ok(false);
            }
            writeln!(self.output, "invalid input")?;
            writeln!(self.output)?;
        }
    }
}
