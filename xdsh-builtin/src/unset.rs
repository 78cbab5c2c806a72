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

//! Unset built-in
//!
//! The **`unset`** built-in removes shell variables.
//!
//! # Synopsis
//!
//! ```sh
//! unset name…
//! ```
//!
//! Removing a variable that does not exist is not an error.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, report_usage_error};
use xdsh_env::Env;
use xdsh_env::builtin::Result;

const NAME: &str = "unset";
const USAGE: &str = "unset name...";

const SPECS: &[OptionSpec<'static>] = &[OptionSpec::new().long("help")];

/// Entry point of the unset built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };
    if !options.is_empty() {
        return help(env, USAGE, "remove shell variables");
    }
    if operands.is_empty() {
        return report_usage_error(env, NAME, "operand missing", USAGE);
    }

    for operand in &operands {
        env.variables.remove(&operand.value);
    }
    Result::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::semantics::ExitStatus;
    use xdsh_env::system::RealSystem;

    #[test]
    fn removes_variables() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        env.variables.assign("x", "1").unwrap();
        let result = main(&mut env, Field::dummies(["x", "never_existed"]));
        assert_eq!(result.exit_status, ExitStatus::SUCCESS);
        assert_eq!(env.variables.get_scalar("x"), None);
    }

    #[test]
    fn missing_operand_is_a_usage_error() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, ExitStatus::ERROR);
    }
}
