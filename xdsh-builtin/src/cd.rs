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

//! Cd built-in
//!
//! The **`cd`** built-in changes the working directory.
//!
//! # Synopsis
//!
//! ```sh
//! cd [directory]
//! ```
//!
//! Without an operand the target is `$HOME`. The operand `-` means
//! `$OLDPWD` and prints the new directory. On success `$PWD` and
//! `$OLDPWD` are updated and exported.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, report_failure, report_usage_error};
use std::ffi::CString;
use xdsh_env::Env;
use xdsh_env::builtin::Result;
use xdsh_env::variable::{HOME, OLDPWD, PWD};

const NAME: &str = "cd";
const USAGE: &str = "cd [directory]";

const SPECS: &[OptionSpec<'static>] = &[OptionSpec::new().long("help")];

/// Entry point of the cd built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };
    if !options.is_empty() {
        return help(env, USAGE, "change the working directory");
    }

    let mut print_target = false;
    let target = match operands.as_slice() {
        [] => match env.variables.get_scalar(HOME) {
            Some(home) => home.to_string(),
            None => return report_failure(env, NAME, "HOME not set"),
        },
        [operand] if operand.value == "-" => match env.variables.get_scalar(OLDPWD) {
            Some(oldpwd) => {
                print_target = true;
                oldpwd.to_string()
            }
            None => return report_failure(env, NAME, "OLDPWD not set"),
        },
        [operand] => operand.value.clone(),
        _ => return report_usage_error(env, NAME, "too many operands", USAGE),
    };

    let old = env.system.getcwd().ok();
    let Ok(c_target) = CString::new(target.as_str()) else {
        return report_failure(env, NAME, &format!("{target}: invalid path"));
    };
    if let Err(errno) = env.system.chdir(&c_target) {
        return report_failure(env, NAME, &format!("{target}: {errno}"));
    }

    if let Some(old) = old {
        let _ = env
            .variables
            .assign_exported(OLDPWD, old.display().to_string());
    }
    let new = match env.system.getcwd() {
        Ok(new) => new.display().to_string(),
        Err(_) => target,
    };
    let _ = env.variables.assign_exported(PWD, new.clone());
    if print_target {
        env.print(&format!("{new}\n"));
    }
    Result::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::semantics::ExitStatus;
    use xdsh_env::system::RealSystem;

    // Tests that actually chdir would interfere with parallel tests; the
    // error paths are checked instead.

    #[test]
    fn unset_home_is_an_error() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, ExitStatus::FAILURE);
    }

    #[test]
    fn unset_oldpwd_is_an_error() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        let result = main(&mut env, Field::dummies(["-"]));
        assert_eq!(result.exit_status, ExitStatus::FAILURE);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        let result = main(&mut env, Field::dummies(["/no/such/directory/at/all"]));
        assert_eq!(result.exit_status, ExitStatus::FAILURE);
        assert_eq!(env.variables.get_scalar(PWD), None);
    }

    #[test]
    fn too_many_operands_is_a_usage_error() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        let result = main(&mut env, Field::dummies(["a", "b"]));
        assert_eq!(result.exit_status, ExitStatus::ERROR);
    }
}
