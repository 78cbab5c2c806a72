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

//! Alias built-in
//!
//! The **`alias`** built-in defines and prints aliases.
//!
//! # Synopsis
//!
//! ```sh
//! alias [name[=value]…]
//! ```
//!
//! Without operands, all aliases are printed in the reusable form
//! `alias name='value'`, sorted by name. An operand with a `=` defines an
//! alias; one without prints the named alias, or fails if it is not
//! defined.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, output, report_failure, report_usage_error};
use std::fmt::Write as _;
use xdsh_env::Env;
use xdsh_env::builtin::Result;

const NAME: &str = "alias";
const USAGE: &str = "alias [name[=value]...]";

const SPECS: &[OptionSpec<'static>] = &[OptionSpec::new().long("help")];

fn format_alias(name: &str, replacement: &str) -> String {
    format!("alias {name}='{replacement}'\n")
}

/// Entry point of the alias built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };
    if !options.is_empty() {
        return help(env, USAGE, "define or print aliases");
    }

    if operands.is_empty() {
        let mut print = String::new();
        for alias in env.aliases.iter_sorted() {
            print.push_str(&format_alias(&alias.name, &alias.replacement));
        }
        return output(env, NAME, &print);
    }

    let mut print = String::new();
    let mut result = Result::default();
    for operand in &operands {
        match operand.value.split_once('=') {
            Some((name, replacement)) => {
                if let Err(error) = env.aliases.define(name, replacement) {
                    result = report_failure(env, NAME, &error.to_string());
                }
            }
            None => match env.aliases.get(&operand.value) {
                Some(alias) => {
                    let _ = write!(print, "{}", format_alias(&alias.name, &alias.replacement));
                }
                None => {
                    result =
                        report_failure(env, NAME, &format!("{}: not found", operand.value));
                }
            },
        }
    }
    let output_result = output(env, NAME, &print);
    if result.exit_status.is_successful() {
        output_result
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::semantics::ExitStatus;
    use xdsh_env::system::RealSystem;

    fn test_env() -> Env {
        Env::new(unsafe { RealSystem::new() })
    }

    #[test]
    fn defining_and_looking_up() {
        let mut env = test_env();
        let result = main(&mut env, Field::dummies(["ll=ls -l"]));
        assert_eq!(result.exit_status, ExitStatus::SUCCESS);
        assert_eq!(env.aliases.get("ll").unwrap().replacement, "ls -l");
    }

    #[test]
    fn formatting_is_reusable() {
        assert_eq!(format_alias("ll", "ls -l"), "alias ll='ls -l'\n");
    }

    #[test]
    fn unknown_name_fails() {
        let mut env = test_env();
        let result = main(&mut env, Field::dummies(["nope"]));
        assert_eq!(result.exit_status, ExitStatus::FAILURE);
    }

    #[test]
    fn invalid_name_fails() {
        let mut env = test_env();
        let result = main(&mut env, Field::dummies(["no good=x"]));
        assert_eq!(result.exit_status, ExitStatus::FAILURE);
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let mut env = test_env();
        main(&mut env, Field::dummies(["e=env FOO=bar"]));
        assert_eq!(env.aliases.get("e").unwrap().replacement, "env FOO=bar");
    }
}
