// This file is part of xdsh, a job-controlling Unix command shell.
// Copyright (C) 2026 xdsh developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Line input and history
//!
//! A deliberately small line reader: it prints the prompt, reads from
//! standard input, and hands out one line at a time. The read is the one
//! place where `SIGINT` is allowed to interrupt the shell; an interrupt
//! discards the partial line and starts over.
//!
//! The in-memory history is loaded from `$HISTFILE` at start-up and the
//! file is rewritten from memory when the shell exits.

use xdsh_env::io::Fd;
use xdsh_env::system::{Errno, RealSystem};
use xdsh_env::trap;

/// Maximum number of history entries kept in memory
const HISTORY_MAX: usize = 1000;

/// Outcome of one read
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadResult {
    /// A whole input line, without the trailing newline
    Line(String),
    /// End of input
    Eof,
    /// The read was aborted by `SIGINT`.
    Interrupted,
}

/// Buffering line reader over standard input
#[derive(Debug, Default)]
pub struct LineReader {
    /// Bytes read but not yet handed out as lines
    pending: Vec<u8>,
    /// Whether the input is exhausted
    at_eof: bool,
    history: Vec<String>,
}

impl LineReader {
    #[must_use]
    pub fn new() -> LineReader {
        LineReader::default()
    }

    /// Takes one complete line out of the pending buffer, if any.
    fn take_pending_line(&mut self) -> Option<String> {
        let newline = self.pending.iter().position(|&byte| byte == b'\n')?;
        let rest = self.pending.split_off(newline + 1);
        let mut line = std::mem::replace(&mut self.pending, rest);
        line.pop(); // the newline
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Reads the next line, printing the prompt first.
    ///
    /// The prompt goes to standard error so that redirected output is not
    /// polluted.
    pub fn read_line(&mut self, system: &mut RealSystem, prompt: &str) -> ReadResult {
        if let Some(line) = self.take_pending_line() {
            return ReadResult::Line(line);
        }
        if self.at_eof {
            return match self.pending.is_empty() {
                true => ReadResult::Eof,
                false => {
                    let line = String::from_utf8_lossy(&std::mem::take(&mut self.pending))
                        .into_owned();
                    ReadResult::Line(line)
                }
            };
        }

        let _ = system.write_all(Fd::STDERR, prompt.as_bytes());

        let mut buffer = [0; 4096];
        loop {
            match system.read_interruptible(Fd::STDIN, &mut buffer) {
                Ok(0) => {
                    self.at_eof = true;
                    return match self.pending.is_empty() {
                        true => ReadResult::Eof,
                        false => {
                            let line =
                                String::from_utf8_lossy(&std::mem::take(&mut self.pending))
                                    .into_owned();
                            ReadResult::Line(line)
                        }
                    };
                }
                Ok(count) => {
                    self.pending.extend_from_slice(&buffer[..count]);
                    if let Some(line) = self.take_pending_line() {
                        return ReadResult::Line(line);
                    }
                }
                Err(Errno::EINTR) => {
                    if trap::take_sigint() {
                        self.pending.clear();
                        let _ = system.write_all(Fd::STDERR, b"\n");
                        return ReadResult::Interrupted;
                    }
                }
                Err(_) => {
                    self.at_eof = true;
                    return ReadResult::Eof;
                }
            }
        }
    }

    /// Appends a line to the history, skipping blanks and immediate
    /// repetitions.
    pub fn add_history(&mut self, line: &str) {
        let line = line.trim_end_matches('\n');
        if line.trim().is_empty() {
            return;
        }
        if self.history.last().is_some_and(|last| last == line) {
            return;
        }
        self.history.push(line.to_string());
        if self.history.len() > HISTORY_MAX {
            let excess = self.history.len() - HISTORY_MAX;
            self.history.drain(..excess);
        }
    }

    /// Loads the history from a file, ignoring a missing one.
    pub fn load_history(&mut self, path: &str) {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return;
        };
        for line in contents.lines() {
            self.add_history(line);
        }
    }

    /// Rewrites the history file from memory.
    pub fn save_history(&self, path: &str) -> std::io::Result<()> {
        let mut contents = String::new();
        for line in &self.history {
            contents.push_str(line);
            contents.push('\n');
        }
        std::fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_skips_blank_lines_and_repetitions() {
        let mut reader = LineReader::new();
        reader.add_history("ls");
        reader.add_history("   ");
        reader.add_history("ls");
        reader.add_history("pwd");
        reader.add_history("ls");
        assert_eq!(reader.history, ["ls", "pwd", "ls"]);
    }

    #[test]
    fn history_is_capped() {
        let mut reader = LineReader::new();
        for index in 0..(HISTORY_MAX + 10) {
            reader.add_history(&format!("command {index}"));
        }
        assert_eq!(reader.history.len(), HISTORY_MAX);
        assert_eq!(reader.history[0], "command 10");
    }

    #[test]
    fn history_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history").display().to_string();

        let mut reader = LineReader::new();
        reader.add_history("one");
        reader.add_history("two");
        reader.save_history(&path).unwrap();

        let mut restored = LineReader::new();
        restored.load_history(&path);
        assert_eq!(restored.history, ["one", "two"]);

        // Loading a missing file is not an error.
        let mut fresh = LineReader::new();
        fresh.load_history("/no/such/history");
        assert_eq!(fresh.history, Vec::<String>::new());
    }

    #[test]
    fn pending_buffer_splits_lines() {
        let mut reader = LineReader::new();
        reader.pending.extend_from_slice(b"one\ntwo\nthr");
        assert_eq!(reader.take_pending_line(), Some("one".to_string()));
        assert_eq!(reader.take_pending_line(), Some("two".to_string()));
        assert_eq!(reader.take_pending_line(), None);
        assert_eq!(reader.pending, b"thr");
    }
}
