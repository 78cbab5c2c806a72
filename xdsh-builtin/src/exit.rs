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

//! Exit built-in
//!
//! The **`exit`** built-in terminates the shell.
//!
//! # Synopsis
//!
//! ```sh
//! exit [status]
//! ```
//!
//! Without an operand the shell exits with the current value of `$?`.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, report_usage_error};
use std::ops::ControlFlow::Break;
use xdsh_env::Env;
use xdsh_env::builtin::Result;
use xdsh_env::semantics::{Divert, ExitStatus};

const NAME: &str = "exit";
const USAGE: &str = "exit [status]";

const SPECS: &[OptionSpec<'static>] = &[OptionSpec::new().long("help")];

/// Entry point of the exit built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };
    if !options.is_empty() {
        return help(env, USAGE, "exit the shell");
    }

    match operands.as_slice() {
        [] => Result {
            // Keep the current $? as the final exit status.
            exit_status: env.exit_status,
            divert: Break(Divert::Exit(None)),
        },
        [operand] => match operand.value.parse::<i32>() {
            Ok(status) => Result::exit(Some(ExitStatus(status))),
            Err(_) => {
                let result = report_usage_error(
                    env,
                    NAME,
                    &format!("{}: numeric argument required", operand.value),
                    USAGE,
                );
                // The shell still exits, with the usage-error status.
                Result {
                    exit_status: result.exit_status,
                    divert: Break(Divert::Exit(Some(result.exit_status))),
                }
            }
        },
        _ => report_usage_error(env, NAME, "too many operands", USAGE),
    }
}
