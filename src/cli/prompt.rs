//! Terminal prompts

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;

use crate::app::prompt::{parse_int, Prompt};
use crate::app::ShutdownSignal;
use crate::constants::limits;
use crate::errors::InputError;

type LineResult = io::Result<(usize, String)>;

/// Reads answers from standard input, one line each
///
/// The read happens on a helper thread so a shutdown request ends the wait
/// with [`InputError::Interrupted`] instead of blocking until Enter.
#[derive(Debug, Default)]
pub struct StdinPrompt {
    shutdown: ShutdownSignal,
}

impl StdinPrompt {
    pub fn new(shutdown: ShutdownSignal) -> Self {
        Self { shutdown }
    }

    fn read_answer(&self, message: &str) -> Result<String, InputError> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", message)?;
        stdout.flush()?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut line = String::new();
            let read = io::stdin().lock().read_line(&mut line).map(|n| (n, line));
            let _ = tx.send(read);
        });

        let line = wait_for_line(&rx, &self.shutdown)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Wait for the reader thread, giving up once shutdown is requested
fn wait_for_line(
    rx: &Receiver<LineResult>,
    shutdown: &ShutdownSignal,
) -> Result<String, InputError> {
    loop {
        if shutdown.is_requested() {
            return Err(InputError::Interrupted);
        }
        match rx.recv_timeout(limits::INPUT_POLL_INTERVAL) {
            Ok(Ok((0, _))) => {
                return Err(InputError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "standard input closed",
                )))
            }
            Ok(Ok((_, line))) => return Ok(line),
            Ok(Err(e)) => return Err(InputError::Io(e)),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(InputError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "input reader stopped",
                )))
            }
        }
    }
}

impl Prompt for StdinPrompt {
    fn prompt_string(&mut self, message: &str) -> Result<String, InputError> {
        self.read_answer(message)
    }

    fn prompt_int(&mut self, message: &str) -> Result<i64, InputError> {
        parse_int(&self.read_answer(message)?)
    }
}

/// Answers from command line flags first, asking `fallback` otherwise
#[derive(Debug)]
pub struct PresetPrompt<P> {
    query: Option<String>,
    selection: Option<i64>,
    fallback: P,
}

impl<P: Prompt> PresetPrompt<P> {
    pub fn new(query: Option<String>, selection: Option<i64>, fallback: P) -> Self {
        Self {
            query,
            selection,
            fallback,
        }
    }
}

impl<P: Prompt> Prompt for PresetPrompt<P> {
    fn prompt_string(&mut self, message: &str) -> Result<String, InputError> {
        match self.query.take() {
            Some(query) => Ok(query),
            None => self.fallback.prompt_string(message),
        }
    }

    fn prompt_int(&mut self, message: &str) -> Result<i64, InputError> {
        match self.selection.take() {
            Some(selection) => Ok(selection),
            None => self.fallback.prompt_int(message),
        }
    }
}
