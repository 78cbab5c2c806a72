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

//! Set built-in
//!
//! The **`set`** built-in assigns shell variables and prints them.
//!
//! # Synopsis
//!
//! ```sh
//! set [name=value…]
//! ```
//!
//! Without operands, all variables are printed in the reusable form
//! `set name='value'`, sorted by name. Each operand assigns a variable;
//! an existing variable keeps its exported flag.
//!
//! This `set` does not implement the POSIX option surface; it is the
//! assignment counterpart of `export`.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, output, report_failure, report_usage_error};
use xdsh_env::Env;
use xdsh_env::builtin::Result;

const NAME: &str = "set";
const USAGE: &str = "set [name=value...]";

const SPECS: &[OptionSpec<'static>] = &[OptionSpec::new().long("help")];

/// Entry point of the set built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };
    if !options.is_empty() {
        return help(env, USAGE, "assign or print shell variables");
    }

    if operands.is_empty() {
        let mut print = String::new();
        for (name, variable) in env.variables.iter_sorted() {
            print.push_str(&format!("set {name}='{}'\n", variable.value));
        }
        return output(env, NAME, &print);
    }

    let mut result = Result::default();
    for operand in &operands {
        match operand.value.split_once('=') {
            Some((name, value)) => {
                if let Err(error) = env.variables.assign(name, value) {
                    result = report_failure(env, NAME, &error.to_string());
                }
            }
            None => {
                return report_usage_error(
                    env,
                    NAME,
                    &format!("{}: expected name=value", operand.value),
                    USAGE,
                );
            }
        }
    }
    result
}
