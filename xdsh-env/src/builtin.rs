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

//! Type definitions for built-in utilities
//!
//! This module defines the [`Builtin`] descriptor so that the execution
//! engine can dispatch built-ins without depending on the crate that
//! implements them.

use crate::Env;
use crate::semantics::{Divert, ExitStatus, Field};
use std::ops::ControlFlow::{self, Break, Continue};

/// Result of a built-in execution
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Result {
    /// Exit status of the built-in
    pub exit_status: ExitStatus,
    /// Whether the caller should deviate from the normal flow
    pub divert: ControlFlow<Divert>,
}

impl Result {
    /// Creates a result with the given exit status and no divert.
    #[must_use]
    pub const fn new(exit_status: ExitStatus) -> Self {
        Result {
            exit_status,
            divert: Continue(()),
        }
    }

    /// Creates a result that asks the caller to exit the shell.
    #[must_use]
    pub const fn exit(exit_status: Option<ExitStatus>) -> Self {
        Result {
            exit_status: match exit_status {
                Some(status) => status,
                None => ExitStatus::SUCCESS,
            },
            divert: Break(Divert::Exit(exit_status)),
        }
    }
}

impl Default for Result {
    fn default() -> Self {
        Self::new(ExitStatus::SUCCESS)
    }
}

impl From<ExitStatus> for Result {
    fn from(exit_status: ExitStatus) -> Self {
        Self::new(exit_status)
    }
}

/// Type of built-in entry points
pub type Main = fn(&mut Env, Vec<Field>) -> Result;

/// Description of a built-in utility
#[derive(Clone, Copy, Debug)]
pub struct Builtin {
    /// Function that executes the built-in
    pub execute: Main,
    /// One-line summary printed by the help built-in
    pub summary: &'static str,
}

impl Builtin {
    #[must_use]
    pub const fn new(execute: Main, summary: &'static str) -> Self {
        Builtin { execute, summary }
    }
}
