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

//! Export built-in
//!
//! The **`export`** built-in marks variables for export to child
//! processes.
//!
//! # Synopsis
//!
//! ```sh
//! export [name[=value]…]
//! ```
//!
//! Without operands, all exported variables are printed in the reusable
//! form `export name='value'`. An operand with a `=` assigns and exports
//! in one step; a bare name exports the existing variable, creating it
//! empty if necessary.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, output, report_failure, report_usage_error};
use xdsh_env::Env;
use xdsh_env::builtin::Result;

const NAME: &str = "export";
const USAGE: &str = "export [name[=value]...]";

const SPECS: &[OptionSpec<'static>] = &[OptionSpec::new().long("help")];

/// Entry point of the export built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };
    if !options.is_empty() {
        return help(env, USAGE, "export variables to the environment");
    }

    if operands.is_empty() {
        let mut print = String::new();
        for (name, variable) in env.variables.iter_sorted() {
            if variable.is_exported {
                print.push_str(&format!("export {name}='{}'\n", variable.value));
            }
        }
        return output(env, NAME, &print);
    }

    let mut result = Result::default();
    for operand in &operands {
        let assignment = match operand.value.split_once('=') {
            Some((name, value)) => env.variables.assign_exported(name, value),
            None => {
                if env.variables.set_exported(&operand.value, true) {
                    Ok(())
                } else {
                    env.variables.assign_exported(operand.value.as_str(), "")
                }
            }
        };
        if let Err(error) = assignment {
            result = report_failure(env, NAME, &error.to_string());
        }
    }
    result
}
