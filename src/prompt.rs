//! Interactive terminal prompts.
//!
//! Generic over the input/output streams so the question loops can be
//! exercised in tests against in-memory buffers.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, BufReader, Stdin, Stdout, Write};

/// Asks questions on `output` and reads answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// A prompter wired to the process stdin/stdout.
pub fn stdio() -> Prompter<BufReader<Stdin>, Stdout> {
    Prompter::new(BufReader::new(std::io::stdin()), std::io::stdout())
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask a yes/no question. Empty input takes the default.
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        write!(self.output, "{} {}: ", question, hint)?;
        self.output.flush()?;

        let answer = self.read_answer()?;
        Ok(match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            "" => default,
            _ => false,
        })
    }

    /// Ask for a free-text value; returns the trimmed answer, possibly empty.
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;
        Ok(self.read_answer()?.trim().to_string())
    }

    /// Ask for a free-text value, re-prompting until it is non-empty.
    pub fn read_nonempty(&mut self, prompt: &str) -> Result<String> {
        loop {
            let answer = self.read_line(prompt)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "A value is required.")?;
        }
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("reading from the terminal")?;
        if read == 0 {
            bail!("input stream closed before the prompt was answered");
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_confirm_yes_variants() {
        for answer in ["y\n", "Y\n", "yes\n", "YES\n"] {
            let mut p = prompter(answer);
            assert!(p.confirm("continue?", false).unwrap());
        }
    }

    #[test]
    fn test_confirm_empty_takes_default() {
        let mut p = prompter("\n");
        assert!(!p.confirm("continue?", false).unwrap());
        let mut p = prompter("\n");
        assert!(p.confirm("continue?", true).unwrap());
    }

    #[test]
    fn test_confirm_garbage_is_no() {
        let mut p = prompter("maybe\n");
        assert!(!p.confirm("continue?", true).unwrap());
    }

    #[test]
    fn test_read_nonempty_reprompts() {
        let mut p = prompter("\n\nnode.example.com\n");
        assert_eq!(p.read_nonempty("FQDN").unwrap(), "node.example.com");
    }

    #[test]
    fn test_read_nonempty_eof_is_error() {
        let mut p = prompter("\n");
        assert!(p.read_nonempty("FQDN").is_err());
    }
}
