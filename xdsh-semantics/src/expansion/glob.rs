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

//! Filename expansion
//!
//! A word containing unquoted `*`, `?`, `[` or `{` is matched against the
//! file system. Brace alternatives are expanded first; each resulting
//! pattern is split at `/` and matched component by component, scanning
//! only the directories that correspond to components with actual pattern
//! characters. Directory entries come in no particular order; the combined
//! matches are sorted case-insensitively at the end.
//!
//! If nothing matches, the word passes through unchanged, quotes and all.
//! Matches replace the word as plain expansion-produced text. Quoted and
//! expansion-produced pattern characters match literally; an unreadable
//! directory is skipped, but other directory errors abort the expansion.

use super::ErrorCause;
use super::attr::{AttrChar, AttrField, Origin};
use xdsh_syntax::scanner::{QuoteScanner, ScanState};
use yash_fnmatch::{Config, Pattern, PatternChar};

/// One character of a pattern, with its quoting resolved
#[derive(Clone, Copy, Debug)]
struct Annot {
    value: char,
    /// Quoted by quotes or a preceding backslash
    quoted: bool,
    /// Is itself a quote or escape character
    quoting: bool,
}

/// Whether the character is subject to pattern interpretation
fn is_active(a: &Annot) -> bool {
    !a.quoted && !a.quoting
}

/// Resolves the quoting of every character in the field.
fn annotate(field: &AttrField) -> Vec<Annot> {
    let mut scanner = QuoteScanner::new();
    field
        .chars
        .iter()
        .map(|c| {
            let was_escape = scanner.top() == ScanState::Escape;
            let quoted = scanner.in_quotes();
            let transitioned = scanner.advance(c.value, c.is_literal());
            Annot {
                value: c.value,
                quoted,
                quoting: transitioned && !was_escape,
            }
        })
        .collect()
}

fn has_glob_meta(annots: &[Annot]) -> bool {
    annots
        .iter()
        .any(|a| is_active(a) && matches!(a.value, '*' | '?' | '[' | '{'))
}

/// Finds the alternatives of the brace opening at `open`.
///
/// Returns the slices between top-level commas and the index of the
/// closing `}`, or `None` if the brace is unmatched.
fn split_brace<'a>(annots: &'a [Annot], open: usize) -> Option<(Vec<&'a [Annot]>, usize)> {
    let mut depth = 1;
    let mut parts = Vec::new();
    let mut part_start = open + 1;
    for (index, a) in annots.iter().enumerate().skip(open + 1) {
        if !is_active(a) {
            continue;
        }
        match a.value {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    parts.push(&annots[part_start..index]);
                    return Some((parts, index));
                }
            }
            ',' if depth == 1 => {
                parts.push(&annots[part_start..index]);
                part_start = index + 1;
            }
            _ => {}
        }
    }
    None
}

/// Expands every matched brace into its alternatives.
fn expand_braces(annots: &[Annot]) -> Vec<Vec<Annot>> {
    for (index, a) in annots.iter().enumerate() {
        if is_active(a) && a.value == '{' {
            if let Some((alternatives, close)) = split_brace(annots, index) {
                let mut results = Vec::new();
                for alternative in alternatives {
                    let mut candidate = annots[..index].to_vec();
                    candidate.extend_from_slice(alternative);
                    candidate.extend_from_slice(&annots[close + 1..]);
                    results.extend(expand_braces(&candidate));
                }
                return results;
            }
        }
    }
    vec![annots.to_vec()]
}

/// Converts one pathname component to a pattern.
///
/// Returns `None` when the component does not parse as a pattern, in which
/// case it is handled as literal text.
fn to_pattern(annots: &[Annot]) -> Option<Pattern> {
    let chars = annots.iter().filter_map(|a| {
        if a.quoting {
            None
        } else if a.quoted {
            Some(PatternChar::Literal(a.value))
        } else {
            Some(PatternChar::Normal(a.value))
        }
    });
    let mut config = Config::default();
    config.anchor_begin = true;
    config.anchor_end = true;
    config.literal_period = true;
    Pattern::parse_with_config(chars, config).ok()
}

fn is_ignorable(error: &std::io::Error) -> bool {
    use std::io::ErrorKind::*;
    matches!(error.kind(), NotFound | PermissionDenied | NotADirectory)
}

/// Appends one resolved component to the prefix and continues with the
/// rest of the pattern, or records a result if this was the last one.
fn push_component<F>(
    prefix: &mut String,
    rest: Option<&[Annot]>,
    results: &mut Vec<String>,
    push: F,
) -> Result<(), ErrorCause>
where
    F: FnOnce(&mut String),
{
    let old_len = prefix.len();
    push(prefix);
    match rest {
        None => {
            if std::fs::symlink_metadata(prefix.as_str()).is_ok() {
                results.push(prefix.clone());
            }
        }
        Some(rest) => {
            prefix.push('/');
            search_dir(prefix, rest, results)?;
        }
    }
    prefix.truncate(old_len);
    Ok(())
}

/// Recursively matches the pattern suffix against the directory named by
/// `prefix`.
fn search_dir(
    prefix: &mut String,
    suffix: &[Annot],
    results: &mut Vec<String>,
) -> Result<(), ErrorCause> {
    let (this, rest) = match suffix.iter().position(|a| a.value == '/') {
        None => (suffix, None),
        Some(index) => (&suffix[..index], Some(&suffix[index + 1..])),
    };

    match to_pattern(this).map(Pattern::into_literal) {
        None => push_component(prefix, rest, results, |prefix| {
            prefix.extend(this.iter().filter(|a| !a.quoting).map(|a| a.value));
        }),
        Some(Ok(literal)) => {
            push_component(prefix, rest, results, |prefix| prefix.push_str(&literal))
        }
        Some(Err(pattern)) => {
            let entries = {
                let dir = if prefix.is_empty() { "." } else { prefix.as_str() };
                match std::fs::read_dir(dir) {
                    Ok(entries) => entries,
                    Err(error) if is_ignorable(&error) => return Ok(()),
                    Err(error) => return Err(ErrorCause::GlobError(error.to_string())),
                }
            };
            let mut names = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|error| ErrorCause::GlobError(error.to_string()))?;
                if let Ok(name) = entry.file_name().into_string() {
                    if pattern.is_match(&name) {
                        names.push(name);
                    }
                }
            }
            for name in names {
                push_component(prefix, rest, results, |prefix| prefix.push_str(&name))?;
            }
            Ok(())
        }
    }
}

/// Performs filename expansion on one word.
pub fn expand(field: AttrField) -> Result<Vec<AttrField>, ErrorCause> {
    let annots = annotate(&field);
    if !has_glob_meta(&annots) {
        return Ok(vec![field]);
    }

    let mut matches = Vec::new();
    for alternative in expand_braces(&annots) {
        let mut prefix = String::new();
        search_dir(&mut prefix, &alternative, &mut matches)?;
    }

    if matches.is_empty() {
        return Ok(vec![field]);
    }

    matches.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    let origin = field.origin;
    Ok(matches
        .into_iter()
        .map(|value| AttrField {
            chars: value
                .chars()
                .map(|value| AttrChar {
                    value,
                    origin: Origin::Expansion,
                })
                .collect(),
            origin: origin.clone(),
        })
        .collect())
}
