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

//! Unalias built-in
//!
//! The **`unalias`** built-in removes alias definitions.
//!
//! # Synopsis
//!
//! ```sh
//! unalias -a
//! unalias name…
//! ```
//!
//! With `-a`, all aliases are removed. Otherwise each named alias is
//! removed; a name that is not defined is reported and the built-in
//! fails, but the remaining names are still processed.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, report_failure, report_usage_error};
use xdsh_env::Env;
use xdsh_env::builtin::Result;

const NAME: &str = "unalias";
const USAGE: &str = "unalias -a | unalias name...";

const SPECS: &[OptionSpec<'static>] = &[
    OptionSpec::new().short('a'),
    OptionSpec::new().long("help"),
];

/// Entry point of the unalias built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };
    for option in &options {
        match option.spec.get_short() {
            Some('a') => {
                env.aliases.clear();
                return Result::default();
            }
            _ => return help(env, USAGE, "remove alias definitions"),
        }
    }

    if operands.is_empty() {
        return report_usage_error(env, NAME, "operand missing", USAGE);
    }

    let mut result = Result::default();
    for operand in &operands {
        if !env.aliases.remove(&operand.value) {
            result = report_failure(env, NAME, &format!("{}: not found", operand.value));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::semantics::ExitStatus;
    use xdsh_env::system::RealSystem;

    fn env_with_aliases() -> Env {
        let mut env = Env::new(unsafe { RealSystem::new() });
        env.aliases.define("a", "1").unwrap();
        env.aliases.define("b", "2").unwrap();
        env
    }

    #[test]
    fn removes_named_aliases() {
        let mut env = env_with_aliases();
        let result = main(&mut env, Field::dummies(["a"]));
        assert_eq!(result.exit_status, ExitStatus::SUCCESS);
        assert!(env.aliases.get("a").is_none());
        assert!(env.aliases.get("b").is_some());
    }

    #[test]
    fn removes_everything_with_a() {
        let mut env = env_with_aliases();
        let result = main(&mut env, Field::dummies(["-a"]));
        assert_eq!(result.exit_status, ExitStatus::SUCCESS);
        assert!(env.aliases.is_empty());
    }

    #[test]
    fn unknown_name_fails_but_continues() {
        let mut env = env_with_aliases();
        let result = main(&mut env, Field::dummies(["nope", "b"]));
        assert_eq!(result.exit_status, ExitStatus::FAILURE);
        assert!(env.aliases.get("b").is_none());
    }

    #[test]
    fn missing_operand_is_a_usage_error() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, ExitStatus::ERROR);
    }
}
