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

//! Word expansion
//!
//! One argument word expands into zero or more final words through six
//! passes, in order:
//!
//! 1. [tilde] expansion of a leading `~` prefix,
//! 2. [parameter][param] expansion of `$name`, `${name}` and the special
//!    parameters `$$`, `$?`, `$!`,
//! 3. [command substitution][command_subst] of `$(…)`,
//! 4. [word splitting][split] at literal unquoted whitespace,
//! 5. [filename expansion][glob] of unquoted patterns, and
//! 6. [quote removal][quote_removal].
//!
//! Every intermediate result is an [`attr::AttrField`], which carries the
//! originality mask alongside the text: characters produced by passes 1–3
//! are marked [`Origin::Expansion`](attr::Origin) and do not act as quotes,
//! do not split words, and do not form new expansions. This is what makes
//! `"$Y"$X` behave: the quotes around `$Y` protect the substituted value
//! from splitting, and a space inside the value never splits because the
//! splitter only looks at literal characters.

pub mod attr;
pub mod command_subst;
pub mod glob;
pub mod param;
pub mod quote_removal;
pub mod split;
pub mod tilde;

use self::attr::{AttrChar, AttrField};
use thiserror::Error;
use xdsh_env::Env;
use xdsh_env::system::Errno;
use xdsh_syntax::scanner::QuoteScanner;

/// Types of errors that may occur in word expansion
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ErrorCause {
    /// A `${…}` construct with a missing `}` or an invalid body
    #[error("bad substitution: `{0}`")]
    BadSubstitution(String),
    /// A directory could not be read during filename expansion.
    #[error("cannot read directory: {0}")]
    GlobError(String),
    /// A command substitution could not be set up.
    #[error("cannot run command substitution: {0}")]
    CommandSubstError(Errno),
    /// A redirection target expanded to more than one word.
    #[error("ambiguous redirect")]
    AmbiguousRedirect,
}

/// Explanation of an expansion failure
///
/// The error carries the original source text of the word being expanded,
/// so the diagnostic can refer to what the user typed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("`{arg}`: {cause}")]
pub struct Error {
    pub cause: ErrorCause,
    /// Source text of the word whose expansion failed
    pub arg: String,
}

/// Result type for word expansion
pub type Result<T> = std::result::Result<T, Error>;

/// Expands one argument word into a list of final words.
///
/// An empty input yields an empty list. See the [module
/// documentation](self) for the passes performed.
pub fn expand(env: &mut Env, word: &str) -> Result<Vec<String>> {
    let fail = |cause| Error {
        cause,
        arg: word.to_string(),
    };

    let mut field = AttrField::from_literal(word);
    if field.chars.is_empty() {
        return Ok(Vec::new());
    }

    tilde::expand(env, &mut field);
    param::expand(env, &mut field).map_err(fail)?;
    command_subst::expand(env, &mut field).map_err(fail)?;

    let mut results = Vec::new();
    for field in split::split(field) {
        for expanded in glob::expand(field).map_err(fail)? {
            results.push(quote_removal::remove_quotes(&expanded));
        }
    }
    Ok(results)
}

/// Expands a word that must produce exactly one field, such as a
/// redirection target.
pub fn expand_single(env: &mut Env, word: &str) -> Result<String> {
    let mut words = expand(env, word)?;
    if words.len() == 1 {
        Ok(words.remove(0))
    } else {
        Err(Error {
            cause: ErrorCause::AmbiguousRedirect,
            arg: word.to_string(),
        })
    }
}

/// Returns the index of the `)` or `}` closing the substitution that
/// starts at `start`.
///
/// `chars[start]` must be a literal `$` and `chars[start + 1]` the literal
/// opener. Nested substitutions, parentheses and quotes are accounted for;
/// `None` means the construct is not closed.
pub(crate) fn find_matching(chars: &[AttrChar], start: usize) -> Option<usize> {
    let mut scanner = QuoteScanner::new();
    scanner.advance(chars[start].value, true);
    scanner.advance(chars[start + 1].value, true);
    debug_assert!(scanner.depth() > 1);

    let mut index = start + 2;
    while index < chars.len() {
        let c = chars[index];
        scanner.advance(c.value, c.is_literal());
        if scanner.depth() == 1 {
            return Some(index);
        }
        index += 1;
    }
    None
}
