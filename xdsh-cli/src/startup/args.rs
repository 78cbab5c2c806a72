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

//! Shell invocation argument parsing
//!
//! ```text
//! xdsh [-l] [-c STRING | -f FILE] [--help]
//! ```
//!
//! `-l` marks the shell as a login shell, as does an argv\[0\] starting
//! with a dash. Without `-c` and `-f` the shell reads from standard
//! input.

use thiserror::Error;

/// Where the shell reads its commands from
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// Read standard input, interactively when it is a terminal.
    Stdin,
    /// Execute the string and exit.
    CommandString(String),
    /// Parse the named file and exit.
    File(String),
}

/// Result of a successful parse that runs the shell
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Run {
    pub is_login: bool,
    pub source: Source,
}

/// Result of parsing the invocation arguments
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Parse {
    /// `--help` was given.
    Help,
    /// Run the shell.
    Run(Run),
}

/// Error in invocation argument parsing
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("option -c missing its string operand")]
    MissingCommandString,
    #[error("option -f missing its file operand")]
    MissingFile,
    #[error("options -c and -f are mutually exclusive")]
    ConflictingSources,
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("unexpected operand `{0}`")]
    UnexpectedOperand(String),
}

/// Parses the invocation arguments, including `argv[0]`.
pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Parse, Error> {
    let mut args = args.into_iter();
    let argv0 = args.next().unwrap_or_default();
    let mut is_login = argv0.starts_with('-');
    let mut source: Option<Source> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" => return Ok(Parse::Help),
            "-l" => is_login = true,
            "-c" => {
                if source.is_some() {
                    return Err(Error::ConflictingSources);
                }
                let code = args.next().ok_or(Error::MissingCommandString)?;
                source = Some(Source::CommandString(code));
            }
            "-f" => {
                if source.is_some() {
                    return Err(Error::ConflictingSources);
                }
                let file = args.next().ok_or(Error::MissingFile)?;
                source = Some(Source::File(file));
            }
            arg if arg.starts_with('-') && arg.len() > 1 => {
                return Err(Error::UnknownOption(arg.to_string()));
            }
            arg => return Err(Error::UnexpectedOperand(arg.to_string())),
        }
    }

    Ok(Parse::Run(Run {
        is_login,
        source: source.unwrap_or(Source::Stdin),
    }))
}
