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

//! This crate defines the shell execution environment of xdsh.
//!
//! [`Env`] is the process-wide shell state: the job table, the variable and
//! alias stores, the built-in table, the last exit status, and the
//! interface to the operating system. It is created once in `main` and
//! passed explicitly into the execution engine and the word expansion;
//! signal handlers communicate with it only through the atomic flags in
//! [`trap`].

pub mod alias;
pub mod builtin;
pub mod io;
pub mod job;
pub mod semantics;
pub mod signal;
pub mod system;
pub mod terminal;
pub mod trap;
pub mod variable;

use self::alias::AliasSet;
use self::builtin::Builtin;
use self::io::Fd;
use self::job::JobSet;
use self::semantics::ExitStatus;
use self::system::{Pid, RealSystem};
use self::terminal::Terminal;
use self::variable::VariableSet;
use std::collections::HashMap;

/// Whole shell execution environment
#[derive(Debug)]
pub struct Env {
    /// Interface to the operating system
    pub system: RealSystem,
    /// Jobs running or stopped in the background
    pub jobs: JobSet,
    /// Shell variables
    pub variables: VariableSet,
    /// Alias definitions
    pub aliases: AliasSet,
    /// Built-in utilities, by name
    pub builtins: HashMap<&'static str, Builtin>,
    /// Exit status of the last executed command (`$?`)
    pub exit_status: ExitStatus,
    /// Controlling terminal state
    pub terminal: Terminal,
    /// Whether the shell was started as a login shell
    pub is_login: bool,
    /// Whether this environment runs in a command-substitution subshell
    pub is_subshell: bool,
    /// Process ID of the main shell process (`$$`), stable across subshells
    pub main_pid: Pid,
    /// Nesting level of [`sigchld_block`](Env::sigchld_block) calls
    sigchld_blocks: u32,
}

impl Env {
    /// Creates a new environment around the given system interface.
    #[must_use]
    pub fn new(system: RealSystem) -> Env {
        let main_pid = system.getpid();
        let shell_pgid = system.getpgrp();
        Env {
            system,
            jobs: JobSet::new(),
            variables: VariableSet::new(),
            aliases: AliasSet::new(),
            builtins: HashMap::new(),
            exit_status: ExitStatus::SUCCESS,
            terminal: Terminal::noninteractive(shell_pgid),
            is_login: false,
            is_subshell: false,
            main_pid,
            sigchld_blocks: 0,
        }
    }

    /// Prints a text to standard output.
    ///
    /// I/O errors are ignored; there is nowhere to report them.
    pub fn print(&mut self, text: &str) {
        let _ = self.system.write_all(Fd::STDOUT, text.as_bytes());
    }

    /// Prints a text to standard error.
    pub fn print_error(&mut self, text: &str) {
        let _ = self.system.write_all(Fd::STDERR, text.as_bytes());
    }

    /// Prints a diagnostic message prefixed with the shell name.
    pub fn diagnose(&mut self, message: &str) {
        self.print_error(&format!("xdsh: {message}\n"));
    }
}
