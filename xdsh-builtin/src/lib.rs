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

//! Implementations of the xdsh built-in utilities
//!
//! Every built-in follows the same contract: exit status 0 on success, 1
//! on failure, 2 on usage errors; `--help` prints a usage summary to
//! standard output and succeeds. Built-ins touch shell state only through
//! the stores in [`xdsh_env`].
//!
//! [`builtins`] returns the dispatch table the execution engine consults.
//! A single foreground built-in executes in the shell process without
//! forking; a built-in inside a pipeline or background job runs in the
//! forked child.

pub mod alias;
pub mod bg;
pub mod cd;
pub mod common;
pub mod exit;
pub mod export;
pub mod fg;
pub mod help;
pub mod jobs;
pub mod kill;
pub mod set;
pub mod unalias;
pub mod unset;

use std::collections::HashMap;
use xdsh_env::builtin::Builtin;

/// Returns the built-in dispatch table.
#[must_use]
pub fn builtins() -> HashMap<&'static str, Builtin> {
    HashMap::from([
        ("alias", Builtin::new(alias::main, "define or print aliases")),
        ("bg", Builtin::new(bg::main, "resume jobs in the background")),
        ("cd", Builtin::new(cd::main, "change the working directory")),
        ("exit", Builtin::new(exit::main, "exit the shell")),
        ("export", Builtin::new(export::main, "export variables to the environment")),
        ("fg", Builtin::new(fg::main, "resume a job in the foreground")),
        ("help", Builtin::new(help::main, "list the built-in utilities")),
        ("jobs", Builtin::new(jobs::main, "print the job table")),
        ("kill", Builtin::new(kill::main, "send a signal to processes or jobs")),
        ("set", Builtin::new(set::main, "assign or print shell variables")),
        ("unalias", Builtin::new(unalias::main, "remove alias definitions")),
        ("unset", Builtin::new(unset::main, "remove shell variables")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_contains_the_job_control_surface() {
        let builtins = builtins();
        for name in ["jobs", "fg", "bg", "kill", "alias", "unalias", "set"] {
            assert!(builtins.contains_key(name), "{name}");
        }
    }
}
