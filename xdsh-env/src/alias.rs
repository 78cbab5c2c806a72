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

//! Alias definitions
//!
//! An alias maps a command name to a replacement string that the parser
//! substitutes for the first word of a simple command. Alias names follow
//! the same naming rule as variables.

use crate::variable::{InvalidNameError, is_valid_name};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Name-value pair that defines an alias
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alias {
    /// Name that is matched against a command word by the parser
    pub name: String,
    /// String that substitutes the matched word
    pub replacement: String,
}

/// Wrapper of [`Alias`] for inserting into a hash set
///
/// A `HashEntry` wraps an `Alias` in `Rc` so a definition can outlive its
/// removal from the set. `Hash` and `PartialEq` compare names only.
#[derive(Clone, Debug, Eq)]
pub struct HashEntry(pub Rc<Alias>);

impl HashEntry {
    #[must_use]
    pub fn new(name: String, replacement: String) -> HashEntry {
        HashEntry(Rc::new(Alias { name, replacement }))
    }
}

impl PartialEq for HashEntry {
    fn eq(&self, other: &HashEntry) -> bool {
        self.0.name == other.0.name
    }
}

impl Hash for HashEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state)
    }
}

impl Borrow<str> for HashEntry {
    fn borrow(&self) -> &str {
        &self.0.name
    }
}

/// Collection of aliases
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AliasSet {
    entries: HashSet<HashEntry>,
}

impl AliasSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an alias by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Rc<Alias>> {
        self.entries.get(name).map(|entry| entry.0.clone())
    }

    /// Defines or redefines an alias.
    pub fn define<N, R>(&mut self, name: N, replacement: R) -> Result<(), InvalidNameError>
    where
        N: Into<String>,
        R: Into<String>,
    {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(InvalidNameError(name));
        }
        self.entries.replace(HashEntry::new(name, replacement.into()));
        Ok(())
    }

    /// Removes an alias by name. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name)
    }

    /// Removes all aliases.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether the set has no aliases
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all definitions, sorted by name.
    #[must_use]
    pub fn iter_sorted(&self) -> Vec<Rc<Alias>> {
        let mut all: Vec<Rc<Alias>> = self.entries.iter().map(|entry| entry.0.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

/// Lets the parser look aliases up in this set.
impl xdsh_syntax::alias::Glossary for AliasSet {
    fn look_up(&self, name: &str) -> Option<String> {
        self.get(name).map(|alias| alias.replacement.clone())
    }
    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_syntax::alias::Glossary;

    #[test]
    fn define_and_get() {
        let mut aliases = AliasSet::new();
        aliases.define("ll", "ls -l").unwrap();
        assert_eq!(aliases.get("ll").unwrap().replacement, "ls -l");
        assert_eq!(aliases.get("la"), None);
    }

    #[test]
    fn redefinition_replaces_the_old_value() {
        let mut aliases = AliasSet::new();
        aliases.define("ll", "old").unwrap();
        aliases.define("ll", "new").unwrap();
        assert_eq!(aliases.get("ll").unwrap().replacement, "new");
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut aliases = AliasSet::new();
        assert!(aliases.define("no good", "x").is_err());
        assert!(aliases.define("1st", "x").is_err());
    }

    #[test]
    fn remove_and_clear() {
        let mut aliases = AliasSet::new();
        aliases.define("a", "1").unwrap();
        aliases.define("b", "2").unwrap();
        assert!(aliases.remove("a"));
        assert!(!aliases.remove("a"));
        aliases.clear();
        assert!(aliases.is_empty());
    }

    #[test]
    fn sorted_iteration() {
        let mut aliases = AliasSet::new();
        aliases.define("z", "26").unwrap();
        aliases.define("a", "1").unwrap();
        let all = aliases.iter_sorted();
        assert_eq!(all[0].name, "a");
        assert_eq!(all[1].name, "z");
    }

    #[test]
    fn glossary_look_up() {
        let mut aliases = AliasSet::new();
        aliases.define("ll", "ls -l").unwrap();
        assert_eq!(Glossary::look_up(&aliases, "ll"), Some("ls -l".to_string()));
        assert!(!Glossary::is_empty(&aliases));
    }
}
