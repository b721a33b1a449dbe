//! User interaction seam
//!
//! The pipeline asks for exactly two things: a free-text search query and an
//! integer selection. Where the answers come from is up to the caller.

use std::collections::VecDeque;

use crate::errors::InputError;

/// Source of answers to the pipeline's questions
pub trait Prompt {
    /// Ask for a line of free text
    fn prompt_string(&mut self, message: &str) -> Result<String, InputError>;

    /// Ask for an integer; non-numeric input is an [`InputError::NotANumber`]
    fn prompt_int(&mut self, message: &str) -> Result<i64, InputError>;
}

/// Parse a selection as typed by the user
pub fn parse_int(input: &str) -> Result<i64, InputError> {
    let trimmed = input.trim();
    trimmed.parse::<i64>().map_err(|_| InputError::NotANumber {
        input: trimmed.to_string(),
    })
}

/// Answers questions from a fixed list, in order
///
/// Running out of answers is reported as an end-of-input error.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    fn next_answer(&mut self) -> Result<String, InputError> {
        self.answers.pop_front().ok_or_else(|| {
            InputError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no more answers",
            ))
        })
    }
}

impl Prompt for ScriptedPrompt {
    fn prompt_string(&mut self, _message: &str) -> Result<String, InputError> {
        self.next_answer()
    }

    fn prompt_int(&mut self, _message: &str) -> Result<i64, InputError> {
        parse_int(&self.next_answer()?)
    }
}
