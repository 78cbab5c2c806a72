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

//! Interface used by the parser to look up aliases
//!
//! The parser substitutes aliases for the first word of each simple command.
//! The alias definitions live in the shell execution environment, which this
//! crate does not depend on, so the lookup goes through the [`Glossary`]
//! trait.

/// Immutable collection of alias definitions
pub trait Glossary {
    /// Looks up an alias by name and returns its replacement text.
    #[must_use]
    fn look_up(&self, name: &str) -> Option<String>;

    /// Returns whether the glossary has no aliases.
    ///
    /// A parser may skip alias substitution entirely when this returns
    /// `true`. The default implementation returns `false`.
    #[must_use]
    fn is_empty(&self) -> bool {
        false
    }
}

impl<T: Glossary> Glossary for &T {
    fn look_up(&self, name: &str) -> Option<String> {
        (**self).look_up(name)
    }
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

/// Empty glossary that does not contain any aliases
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct EmptyGlossary;

impl Glossary for EmptyGlossary {
    #[inline(always)]
    fn look_up(&self, _name: &str) -> Option<String> {
        None
    }
    #[inline(always)]
    fn is_empty(&self) -> bool {
        true
    }
}

/// Glossary backed by a slice of name-replacement pairs, mainly for tests
impl<'a> Glossary for &'a [(&'a str, &'a str)] {
    fn look_up(&self, name: &str) -> Option<String> {
        self.iter()
            .find(|(n, _)| *n == name)
            .map(|(_, r)| r.to_string())
    }
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}
