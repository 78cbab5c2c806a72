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

//! Intermediate expansion results
//!
//! An [`AttrChar`] is a character together with its origin: whether it came
//! verbatim from the user's input or was produced by an expansion. The
//! origin is the per-character originality mask that every expansion pass
//! carries along: only characters of literal origin participate in
//! quote-state transitions, and only literal whitespace splits words.
//!
//! An [`AttrField`] is a string of `AttrChar`s plus the original source
//! text of the word it came from, used in diagnostics.

/// Origin of a character in an intermediate expansion result
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Origin {
    /// The character appeared literally in the original word.
    Literal,
    /// The character was produced by an expansion.
    Expansion,
}

/// Character with its origin attribute
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AttrChar {
    /// Character value
    pub value: char,
    /// Character origin
    pub origin: Origin,
}

impl AttrChar {
    /// Whether the character comes verbatim from the user's input
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self.origin, Origin::Literal)
    }
}

/// String of `AttrChar`s with the source text of the originating word
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttrField {
    /// Value of the field
    pub chars: Vec<AttrChar>,
    /// Source text of the word this field resulted from
    pub origin: String,
}

impl AttrField {
    /// Creates a field of all-literal characters from a source word.
    #[must_use]
    pub fn from_literal(word: &str) -> AttrField {
        AttrField {
            chars: word
                .chars()
                .map(|value| AttrChar {
                    value,
                    origin: Origin::Literal,
                })
                .collect(),
            origin: word.to_string(),
        }
    }

    /// Returns the character values as a plain string.
    #[must_use]
    pub fn value(&self) -> String {
        self.chars.iter().map(|c| c.value).collect()
    }

    /// Returns the originality mask: one `'1'` byte per literal character
    /// and one `'0'` byte per expansion-produced character.
    ///
    /// The mask always has exactly as many bytes as [`value`](Self::value)
    /// has characters.
    #[must_use]
    pub fn mask(&self) -> String {
        self.chars
            .iter()
            .map(|c| if c.is_literal() { '1' } else { '0' })
            .collect()
    }
}

/// Appends the characters of `s` with the given origin.
pub fn push_str(chars: &mut Vec<AttrChar>, s: &str, origin: Origin) {
    chars.extend(s.chars().map(|value| AttrChar { value, origin }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_literal_marks_everything_literal() {
        let field = AttrField::from_literal("a$b");
        assert_eq!(field.value(), "a$b");
        assert_eq!(field.mask(), "111");
        assert_eq!(field.origin, "a$b");
    }

    #[test]
    fn push_str_tracks_origin() {
        let mut chars = AttrField::from_literal("x").chars;
        push_str(&mut chars, "yz", Origin::Expansion);
        let field = AttrField {
            chars,
            origin: "x".to_string(),
        };
        assert_eq!(field.value(), "xyz");
        assert_eq!(field.mask(), "100");
    }
}
