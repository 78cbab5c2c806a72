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

//! Kill built-in
//!
//! The **`kill`** built-in sends a signal to processes or jobs, or lists
//! signals.
//!
//! # Synopsis
//!
//! ```sh
//! kill [-s sigspec|-n signum|-sigspec] target…
//! kill -l [sigspec…]
//! ```
//!
//! # Description
//!
//! Without `-l`, the built-in sends a signal (`SIGTERM` by default) to
//! every target. A target is a process ID or a jobspec with a leading
//! `%`. When the shell is interactive, a jobspec target receives the
//! signal as a process-group broadcast; otherwise each process of the job
//! is signalled individually. A negative process-group ID target must be
//! preceded by `--`.
//!
//! With `-l` and no operands, all signal names are listed, one per line,
//! without the `SIG` prefix. A numeric operand is converted to a name and
//! a name operand to its number.
//!
//! Signal names are matched case-insensitively, with or without the
//! `SIG` prefix.
//!
//! # Exit status
//!
//! Zero on success; 1 if any operand failed; 2 on usage errors. An error
//! on one operand does not stop the remaining operands from being
//! processed.

pub mod print;
pub mod send;
pub mod syntax;

use crate::common::syntax::Field;
use crate::common::{help, report_usage_error};
use xdsh_env::Env;
use xdsh_env::builtin::Result;
use xdsh_env::signal::RawNumber;

const NAME: &str = "kill";
const USAGE: &str = "kill [-s sigspec|-n signum|-sigspec] target...\n       kill -l [sigspec...]";

/// Parsed command line of the kill built-in
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Sends a signal to the targets.
    Send {
        signal: RawNumber,
        targets: Vec<Field>,
    },
    /// Lists signal names or numbers.
    Print { signals: Vec<Field> },
    /// Prints the usage summary.
    Help,
}

/// Entry point of the kill built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    match syntax::parse(args) {
        Ok(Command::Help) => help(env, USAGE, "send a signal to processes or jobs"),
        Ok(Command::Print { signals }) => print::execute(env, &signals),
        Ok(Command::Send { signal, targets }) => send::execute(env, signal, &targets),
        Err(error) => report_usage_error(env, NAME, &error.to_string(), USAGE),
    }
}
