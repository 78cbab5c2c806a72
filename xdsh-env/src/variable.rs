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

//! Shell variables
//!
//! A [`Variable`] is a string value with an exported flag. Exported
//! variables are the environment variables of child processes; see
//! [`VariableSet::environ`].
//!
//! Variable names must start with an underscore or an alphabetic character
//! and continue with underscores or alphanumeric characters. The validity
//! check lives here: [`VariableSet::assign`] refuses invalid names.

use itertools::Itertools;
use std::collections::HashMap;
use std::ffi::CString;
use thiserror::Error;

/// Name of the variable holding the user's home directory
pub const HOME: &str = "HOME";
/// Name of the variable holding the command search path
pub const PATH: &str = "PATH";
/// Name of the variable holding the current working directory
pub const PWD: &str = "PWD";
/// Name of the variable holding the previous working directory
pub const OLDPWD: &str = "OLDPWD";
/// Name of the variable counting nested shell levels
pub const SHLVL: &str = "SHLVL";
/// Name of the variable holding the path to the shell binary
pub const SHELL: &str = "SHELL";
/// Name of the variable naming the history file
pub const HISTFILE: &str = "HISTFILE";
/// Name of the variable holding the user's login name
pub const USER: &str = "USER";
/// Name of the other variable holding the user's login name
pub const LOGNAME: &str = "LOGNAME";

/// Checks if the passed string is a valid variable (or alias) name.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if first == b'_' || first.is_ascii_alphabetic() => {
            bytes.all(|b| b == b'_' || b.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Error returned when a variable name does not follow the naming rule
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("invalid variable name `{0}`")]
pub struct InvalidNameError(pub String);

/// Definition of a variable
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Variable {
    /// Value of the variable
    pub value: String,
    /// Whether the variable is exported to the environment of child
    /// processes
    pub is_exported: bool,
}

impl Variable {
    /// Creates a new unexported variable.
    #[must_use]
    pub fn new<S: Into<String>>(value: S) -> Self {
        Variable {
            value: value.into(),
            is_exported: false,
        }
    }

    /// Sets the `is_exported` flag in a method chain.
    #[inline]
    #[must_use]
    pub fn export(mut self) -> Self {
        self.is_exported = true;
        self
    }
}

/// Collection of variables
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VariableSet {
    all: HashMap<String, Variable>,
}

impl VariableSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the variable with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.all.get(name)
    }

    /// Returns the value of the named variable as a string slice.
    #[must_use]
    pub fn get_scalar(&self, name: &str) -> Option<&str> {
        self.get(name).map(|variable| variable.value.as_str())
    }

    /// Inserts or updates a variable.
    ///
    /// An existing variable keeps its exported flag; pass
    /// [`set_exported`](Self::set_exported) to change it.
    pub fn assign<N, V>(&mut self, name: N, value: V) -> Result<(), InvalidNameError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(InvalidNameError(name));
        }
        self.all.entry(name).or_default().value = value.into();
        Ok(())
    }

    /// Inserts or updates a variable and sets its exported flag.
    pub fn assign_exported<N, V>(&mut self, name: N, value: V) -> Result<(), InvalidNameError>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        self.assign(name.clone(), value)?;
        self.set_exported(&name, true);
        Ok(())
    }

    /// Changes the exported flag of an existing variable.
    ///
    /// Returns whether the variable was found.
    pub fn set_exported(&mut self, name: &str, is_exported: bool) -> bool {
        match self.all.get_mut(name) {
            Some(variable) => {
                variable.is_exported = is_exported;
                true
            }
            None => false,
        }
    }

    /// Removes a variable.
    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        self.all.remove(name)
    }

    /// Whether the named variable exists and is exported
    #[must_use]
    pub fn is_exported(&self, name: &str) -> bool {
        self.get(name).is_some_and(|variable| variable.is_exported)
    }

    /// Returns all variable names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.all.keys().map(String::as_str).sorted().collect()
    }

    /// Returns name-variable pairs, sorted by name.
    #[must_use]
    pub fn iter_sorted(&self) -> Vec<(&str, &Variable)> {
        self.all
            .iter()
            .map(|(name, variable)| (name.as_str(), variable))
            .sorted_by_key(|&(name, _)| name)
            .collect()
    }

    /// Materializes a `NAME=value` vector of all exported variables for
    /// passing to `execve`.
    ///
    /// Variables whose name or value contains a nul byte are skipped.
    #[must_use]
    pub fn environ(&self) -> Vec<CString> {
        self.all
            .iter()
            .filter(|(_, variable)| variable.is_exported)
            .sorted_by_key(|&(name, _)| name)
            .filter_map(|(name, variable)| {
                CString::new(format!("{name}={}", variable.value)).ok()
            })
            .collect()
    }

    /// Imports environment variables, marking them exported.
    ///
    /// Entries with invalid names are ignored.
    pub fn extend_env<I, N, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        for (name, value) in vars {
            let name = name.into();
            if is_valid_name(&name) {
                self.all.insert(name, Variable::new(value).export());
            }
        }
    }
}
