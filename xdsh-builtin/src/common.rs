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

//! Common items for implementing built-ins
//!
//! Every built-in follows the same conventions: exit status 0 on success,
//! 1 on failure, 2 on usage errors; `--help` prints a usage summary to
//! standard output and returns 0. The helpers here implement the output
//! and diagnostic sides of those conventions; the [syntax] module parses
//! command-line arguments.

pub mod syntax;

use xdsh_env::Env;
use xdsh_env::builtin::Result;
use xdsh_env::io::Fd;
use xdsh_env::semantics::ExitStatus;

/// Prints a text to the standard output.
///
/// On a write error, a failure message goes to standard error and the
/// result carries exit status 1.
pub fn output(env: &mut Env, name: &str, content: &str) -> Result {
    match env.system.write_all(Fd::STDOUT, content.as_bytes()) {
        Ok(()) => Result::default(),
        Err(errno) => report_failure(env, name, &format!("error writing to stdout: {errno}")),
    }
}

/// Prints a `--help` message and returns success.
pub fn help(env: &mut Env, usage: &str, summary: &str) -> Result {
    let text = format!("usage: {usage}\n{summary}\n");
    let _ = env.system.write_all(Fd::STDOUT, text.as_bytes());
    Result::default()
}

/// Prints a failure message and returns exit status 1.
pub fn report_failure(env: &mut Env, name: &str, message: &str) -> Result {
    env.print_error(&format!("xdsh: {name}: {message}\n"));
    Result::new(ExitStatus::FAILURE)
}

/// Prints a usage-error message and returns exit status 2.
pub fn report_usage_error(env: &mut Env, name: &str, message: &str, usage: &str) -> Result {
    env.print_error(&format!("xdsh: {name}: {message}\nusage: {usage}\n"));
    Result::new(ExitStatus::ERROR)
}
