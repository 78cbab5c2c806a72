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

//! Implementation of `kill -l`
//!
//! Without operands, every defined signal is listed by name, one per
//! line, in ascending number order, each exactly once. A numeric operand
//! prints the corresponding name; a name operand prints the corresponding
//! number.

use crate::common::{output, report_failure};
use std::fmt::Write as _;
use thiserror::Error;
use xdsh_env::Env;
use xdsh_env::builtin::Result;
use xdsh_env::semantics::Field;
use xdsh_env::signal::{RawNumber, all_signals, name_of, number_of};

/// Error indicating that an operand does not name a signal
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{0}: invalid signal specification")]
pub struct InvalidSignal(pub String);

/// Builds the `kill -l` output.
pub fn print(signals: &[Field]) -> std::result::Result<String, Vec<InvalidSignal>> {
    let mut text = String::new();
    let mut errors = Vec::new();

    if signals.is_empty() {
        for (name, _) in all_signals() {
            let _ = writeln!(text, "{name}");
        }
    } else {
        for spec in signals {
            let looked_up = if spec.value.parse::<RawNumber>().is_ok() {
                number_of(&spec.value)
                    .and_then(name_of)
                    .map(|name| name.to_string())
            } else {
                number_of(&spec.value).map(|number| number.to_string())
            };
            match looked_up {
                Some(line) => {
                    let _ = writeln!(text, "{line}");
                }
                None => errors.push(InvalidSignal(spec.value.clone())),
            }
        }
    }

    if errors.is_empty() { Ok(text) } else { Err(errors) }
}

/// Executes the `Print` command.
pub fn execute(env: &mut Env, signals: &[Field]) -> Result {
    match print(signals) {
        Ok(text) => output(env, "kill", &text),
        Err(errors) => {
            let mut result = Result::default();
            for error in errors {
                result = report_failure(env, "kill", &error.to_string());
            }
            result
        }
    }
}
