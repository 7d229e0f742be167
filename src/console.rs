//! User interaction capability shared by authentication and the shell.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-based input and output with a masked mode for secrets.
pub trait Console {
    /// Reads a line without echoing what is typed.
    fn read_masked_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Reads a visible line, without the trailing newline.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Shows a message to the user.
    fn say(&mut self, message: &str);

    /// Asks a yes/no question; anything starting with `y` or `Y` is a yes.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.read_line(prompt)?;
        Ok(answer.trim_start().starts_with(['y', 'Y']))
    }
}

/// Console backed by the process terminal.
#[derive(Debug, Default)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn read_masked_line(&mut self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Scripted console that replays queued answers and records everything shown.
///
/// Masked and visible reads draw from the same queue, in call order.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    inputs: VecDeque<String>,
    output: Vec<String>,
}

impl MemoryConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Messages and prompts shown so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// True if any shown line contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    fn next_input(&mut self, prompt: &str) -> io::Result<String> {
        self.output.push(prompt.to_string());
        self.inputs
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted input left"))
    }
}

impl Console for MemoryConsole {
    fn read_masked_line(&mut self, prompt: &str) -> io::Result<String> {
        self.next_input(prompt)
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.next_input(prompt)
    }

    fn say(&mut self, message: &str) {
        self.output.push(message.to_string());
    }
}
