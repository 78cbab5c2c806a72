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

//! Quote removal
//!
//! The final pass turns an attributed field into plain text. Literal quote
//! characters that open or close a quoted run are dropped. A literal
//! backslash outside single quotes escapes the next character; inside
//! double quotes the backslash only escapes `$`, `"`, `\` and newline, and
//! stays in the text otherwise. Quote characters produced by an expansion
//! are ordinary text and survive untouched.

use super::AttrField;
use xdsh_syntax::scanner::{QuoteScanner, ScanState};

/// Performs quote removal, consuming the originality mask.
#[must_use]
pub fn remove_quotes(field: &AttrField) -> String {
    let mut result = String::with_capacity(field.chars.len());
    let mut scanner = QuoteScanner::new();

    for c in &field.chars {
        let was_escape = scanner.top() == ScanState::Escape;
        let in_double_quotes = scanner.in_double_quotes();
        let transitioned = scanner.advance(c.value, c.is_literal());

        if was_escape {
            // The character follows a literal backslash. Inside double
            // quotes the backslash is only an escape before these four.
            if in_double_quotes && !matches!(c.value, '$' | '"' | '\\' | '\n') {
                result.push('\\');
            }
            result.push(c.value);
        } else if !transitioned {
            result.push(c.value);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::super::attr::{AttrChar, Origin};
    use super::*;

    fn removed(word: &str) -> String {
        remove_quotes(&AttrField::from_literal(word))
    }

    #[test]
    fn unquoted_text_is_identity() {
        assert_eq!(removed("plain"), "plain");
        assert_eq!(removed(""), "");
    }

    #[test]
    fn quotes_are_dropped() {
        assert_eq!(removed("'a b'"), "a b");
        assert_eq!(removed("\"a b\""), "a b");
        assert_eq!(removed("a'b'c\"d\""), "abcd");
        assert_eq!(removed("''"), "");
    }

    #[test]
    fn backslash_outside_quotes_escapes_anything() {
        assert_eq!(removed("\\a"), "a");
        assert_eq!(removed("\\\\"), "\\");
        assert_eq!(removed("\\'x"), "'x");
        assert_eq!(removed("\\$HOME"), "$HOME");
    }

    #[test]
    fn backslash_in_double_quotes_is_selective() {
        // \$ \" \\ are escapes; the backslash disappears.
        assert_eq!(removed("\"\\$\""), "$");
        assert_eq!(removed("\"\\\"\""), "\"");
        assert_eq!(removed("\"\\\\\""), "\\");
        // Before anything else the backslash is literal text.
        assert_eq!(removed("\"\\a\""), "\\a");
        assert_eq!(removed("\"a\\*b\""), "a\\*b");
    }

    #[test]
    fn backslash_in_single_quotes_is_literal() {
        assert_eq!(removed("'\\a'"), "\\a");
    }

    #[test]
    fn expansion_produced_quotes_survive() {
        let field = AttrField {
            chars: "'a\"".chars()
                .map(|value| AttrChar {
                    value,
                    origin: Origin::Expansion,
                })
                .collect(),
            origin: "$Q".to_string(),
        };
        assert_eq!(remove_quotes(&field), "'a\"");
    }

    #[test]
    fn mixed_origins() {
        // Literal quotes around expanded text are removed; the expanded
        // text itself is untouched.
        let mut chars = vec![AttrChar {
            value: '"',
            origin: Origin::Literal,
        }];
        chars.extend("a'b".chars().map(|value| AttrChar {
            value,
            origin: Origin::Expansion,
        }));
        chars.push(AttrChar {
            value: '"',
            origin: Origin::Literal,
        });
        let field = AttrField {
            chars,
            origin: "\"$Q\"".to_string(),
        };
        assert_eq!(remove_quotes(&field), "a'b");
    }
}
