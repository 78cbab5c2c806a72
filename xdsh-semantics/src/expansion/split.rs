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

//! Word splitting
//!
//! A field is split at runs of unquoted whitespace (space, tab, newline)
//! that come verbatim from the user's input. Whitespace produced by an
//! expansion never splits: `$X` with `X='a b'` stays one word. Empty
//! fields between splitters are not emitted, but a quoted empty field
//! survives because its quote characters are still in the text at this
//! point.

use super::AttrField;
use super::attr::AttrChar;
use xdsh_syntax::scanner::QuoteScanner;

fn is_splitter(c: AttrChar, scanner: &QuoteScanner) -> bool {
    c.is_literal() && matches!(c.value, ' ' | '\t' | '\n') && !scanner.in_quotes()
}

/// Splits a field into words at literal unquoted whitespace.
#[must_use]
pub fn split(field: AttrField) -> Vec<AttrField> {
    let origin = field.origin;
    let mut words = Vec::new();
    let mut current: Vec<AttrChar> = Vec::new();
    let mut scanner = QuoteScanner::new();

    for c in field.chars {
        if is_splitter(c, &scanner) {
            if !current.is_empty() {
                words.push(AttrField {
                    chars: std::mem::take(&mut current),
                    origin: origin.clone(),
                });
            }
        } else {
            scanner.advance(c.value, c.is_literal());
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(AttrField {
            chars: current,
            origin,
        });
    }
    words
}
