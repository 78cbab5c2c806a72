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

//! Type definitions for command execution semantics

use crate::signal::RawNumber;

/// Number that summarizes how a command execution ended
///
/// An exit status is zero for successful completion and non-zero otherwise.
/// A command killed by a signal is conventionally reported as 128 plus the
/// signal number.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExitStatus(pub i32);

impl ExitStatus {
    /// Exit status of successful executions (0)
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    /// Exit status of generic failures (1)
    pub const FAILURE: ExitStatus = ExitStatus(1);
    /// Exit status of usage errors (2)
    pub const ERROR: ExitStatus = ExitStatus(2);
    /// Exit status when a command was found but could not be executed (126)
    pub const NOEXEC: ExitStatus = ExitStatus(126);
    /// Exit status when a command was not found (127)
    pub const NOT_FOUND: ExitStatus = ExitStatus(127);

    /// Whether this exit status is zero
    #[must_use]
    pub const fn is_successful(self) -> bool {
        self.0 == 0
    }

    /// Returns the conventional exit status for death by (or stop by) the
    /// given signal: 128 plus the signal number.
    #[must_use]
    pub const fn from_signal(signal: RawNumber) -> ExitStatus {
        ExitStatus(128 + signal)
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ExitStatus {
    fn from(value: i32) -> ExitStatus {
        ExitStatus(value)
    }
}

/// Word passed to a command or built-in after expansion
///
/// A field carries the expanded value together with the original source text
/// of the word it came from, so diagnostics can refer to what the user
/// actually typed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    /// Expanded value of the field
    pub value: String,
    /// Original source text the field resulted from
    pub origin: String,
}

impl Field {
    /// Creates a field whose origin is its own value, for tests and
    /// internally produced words.
    #[must_use]
    pub fn dummy<S: Into<String>>(value: S) -> Field {
        let value = value.into();
        let origin = value.clone();
        Field { value, origin }
    }

    /// Creates an array of [dummy](Self::dummy) fields.
    #[must_use]
    pub fn dummies<I, S>(values: I) -> Vec<Field>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(Self::dummy).collect()
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Request to deviate from the normal read–eval flow
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Divert {
    /// Terminate the shell with the given exit status, or with the current
    /// one if `None`.
    Exit(Option<ExitStatus>),
}
