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

//! Initialization files
//!
//! A login shell sources `~/.xdsh_profile`; an interactive non-login
//! shell sources `~/.xdshrc`. A missing file is silently skipped; errors
//! in the file are reported but do not stop the shell from starting.

use xdsh_env::Env;
use xdsh_env::variable::HOME;
use xdsh_semantics::execute::run_command_string;

/// Runs every line of the given file in the current environment.
pub fn source_file(env: &mut Env, path: &str) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return;
    };
    for line in contents.lines() {
        run_command_string(env, line);
    }
}

fn home_file(env: &Env, name: &str) -> Option<String> {
    let home = env.variables.get_scalar(HOME)?;
    Some(format!("{home}/{name}"))
}

/// Sources the start-up file appropriate for this shell instance.
pub fn run_init_files(env: &mut Env, interactive: bool) {
    if env.is_login {
        if let Some(path) = home_file(env, ".xdsh_profile") {
            source_file(env, &path);
        }
    } else if interactive {
        if let Some(path) = home_file(env, ".xdshrc") {
            source_file(env, &path);
        }
    }
}
