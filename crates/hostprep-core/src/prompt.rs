//! Yes/no confirmations that gate individual steps.
//!
//! The decision is split from the I/O: [`parse_answer`] maps operator input
//! to a decision, and a [`Decide`] implementation supplies the input. The
//! terminal implementation reads stdin; tests use [`ScriptedDecider`].

use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// A question with its documented default answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirm {
    pub question: String,
    pub default: bool,
}

impl Confirm {
    /// Defaults to yes: `[Y/n]`.
    pub fn yes(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            default: true,
        }
    }

    /// Defaults to no: `[y/N]`.
    pub fn no(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            default: false,
        }
    }

    pub fn hint(&self) -> &'static str {
        if self.default {
            "[Y/n]"
        } else {
            "[y/N]"
        }
    }
}

/// Map a line of operator input to a decision. `None` means ask again.
pub fn parse_answer(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

pub trait Decide {
    fn confirm(&mut self, prompt: &Confirm) -> bool;
}

// ---------------------------------------------------------------------------
// TerminalDecider
// ---------------------------------------------------------------------------

/// Asks on `output` and reads answers line by line from `input`.
///
/// End of input takes the default, so a piped selection with no further
/// lines runs every step with its documented default.
pub struct TerminalDecider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalDecider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Decide for TerminalDecider<R, W> {
    fn confirm(&mut self, prompt: &Confirm) -> bool {
        loop {
            let _ = write!(self.output, "{} {} ", prompt.question, prompt.hint());
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    let _ = writeln!(self.output);
                    return prompt.default;
                }
                Ok(_) => {}
            }
            if let Some(answer) = parse_answer(&line, prompt.default) {
                return answer;
            }
            let _ = writeln!(self.output, "Please answer y or n.");
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedDecider
// ---------------------------------------------------------------------------

/// Answers from a fixed queue; once exhausted every prompt takes its default.
#[derive(Debug, Default)]
pub struct ScriptedDecider {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedDecider {
    pub fn new<I: IntoIterator<Item = bool>>(answers: I) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Always take the documented default.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Decide for ScriptedDecider {
    fn confirm(&mut self, prompt: &Confirm) -> bool {
        self.asked.push(prompt.question.clone());
        self.answers.pop_front().unwrap_or(prompt.default)
    }
}
