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

//! Help built-in
//!
//! The **`help`** built-in lists the available built-ins with their
//! one-line summaries.

use crate::common::output;
use crate::common::syntax::Field;
use itertools::Itertools;
use std::fmt::Write as _;
use xdsh_env::Env;
use xdsh_env::builtin::Result;

/// Entry point of the help built-in
pub fn main(env: &mut Env, _args: Vec<Field>) -> Result {
    let mut print = String::new();
    for (name, builtin) in env.builtins.iter().sorted_by_key(|&(name, _)| name) {
        let _ = writeln!(print, "{name:<10} {}", builtin.summary);
    }
    output(env, "help", &print)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::system::RealSystem;

    #[test]
    fn lists_registered_builtins() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        env.builtins = crate::builtins();
        let result = main(&mut env, vec![]);
        assert!(result.exit_status.is_successful());
    }
}
