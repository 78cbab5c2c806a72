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

//! Command-line parsing for the kill built-in
//!
//! Kill cannot use the generic option parser because of the obsolete
//! `-SIGSPEC` form: `-TERM` and `-9` are signal specifications, not
//! clustered short options.

use super::Command;
use crate::common::syntax::Field;
use thiserror::Error;
use xdsh_env::signal::{RawNumber, number_of};

/// Error in kill command-line parsing
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SyntaxError {
    #[error("{0}: invalid signal specification")]
    InvalidSignal(String),
    #[error("option -{0} missing an argument")]
    MissingArgument(char),
    #[error("no target process specified")]
    MissingTargets,
}

fn parse_signal(spec: &str) -> Result<RawNumber, SyntaxError> {
    number_of(spec).ok_or_else(|| SyntaxError::InvalidSignal(spec.to_string()))
}

/// Parses the arguments of the kill built-in.
pub fn parse(args: Vec<Field>) -> Result<Command, SyntaxError> {
    let mut signal: Option<RawNumber> = None;
    let mut index = 0;

    while index < args.len() {
        let value = args[index].value.clone();
        if value == "--" {
            index += 1;
            break;
        }
        if value == "--help" {
            return Ok(Command::Help);
        }
        if value == "-" || !value.starts_with('-') {
            break;
        }

        if value == "-l" {
            let signals = args[index + 1..].to_vec();
            return Ok(Command::Print { signals });
        }
        if let Some(rest) = value.strip_prefix("-l").filter(|rest| !rest.is_empty()) {
            let mut signals = vec![Field::dummy(rest)];
            signals.extend_from_slice(&args[index + 1..]);
            return Ok(Command::Print { signals });
        }

        if value == "-s" || value == "-n" {
            let option = value.chars().nth(1).unwrap_or('s');
            index += 1;
            let Some(spec) = args.get(index) else {
                return Err(SyntaxError::MissingArgument(option));
            };
            signal = Some(parse_signal(&spec.value)?);
            index += 1;
            continue;
        }
        // The obsolete form: the whole rest of the word names the signal.
        // Tried first so that `-STOP` is SIGSTOP rather than `-s TOP`.
        if let Some(number) = number_of(&value[1..]) {
            signal = Some(number);
            index += 1;
            continue;
        }

        if let Some(rest) = value
            .strip_prefix("-s")
            .or_else(|| value.strip_prefix("-n"))
            .filter(|rest| !rest.is_empty())
        {
            signal = Some(parse_signal(rest)?);
            index += 1;
            continue;
        }

        return Err(SyntaxError::InvalidSignal(value[1..].to_string()));
    }

    let targets = args[index..].to_vec();
    if targets.is_empty() {
        return Err(SyntaxError::MissingTargets);
    }
    Ok(Command::Send {
        signal: signal.unwrap_or(libc::SIGTERM),
        targets,
    })
}
