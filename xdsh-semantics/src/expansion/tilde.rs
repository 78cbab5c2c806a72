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

//! Tilde expansion
//!
//! Only a leading literal `~` is subject to expansion. The prefix runs up
//! to the first `/` (or the end of the word) and selects the replacement:
//!
//! - `~`: `$HOME`, falling back to the current user's passwd entry
//! - `~+`: `$PWD`
//! - `~-`: `$OLDPWD`
//! - `~name`: the passwd home directory of *name*
//!
//! An unresolvable prefix leaves the word unchanged. The substituted text
//! is marked as expansion output, so it is never split and never treated
//! as quoting.

use super::attr::{AttrChar, Origin, push_str};
use super::AttrField;
use xdsh_env::Env;
use xdsh_env::variable::{HOME, OLDPWD, PWD};

/// Computes the replacement for a tilde prefix, without the `~`.
fn resolve(env: &Env, prefix: &str) -> Option<String> {
    match prefix {
        "" => match env.variables.get_scalar(HOME) {
            Some(home) => Some(home.to_string()),
            None => {
                let user = env.variables.get_scalar(xdsh_env::variable::USER)?;
                let dir = env.system.getpwnam_dir(user).ok()??;
                Some(dir.to_string_lossy().into_owned())
            }
        },
        "+" => env.variables.get_scalar(PWD).map(str::to_string),
        "-" => env.variables.get_scalar(OLDPWD).map(str::to_string),
        name => {
            let dir = env.system.getpwnam_dir(name).ok()??;
            Some(dir.to_string_lossy().into_owned())
        }
    }
}

/// Performs tilde expansion on a field.
pub fn expand(env: &Env, field: &mut AttrField) {
    match field.chars.first() {
        Some(first) if first.is_literal() && first.value == '~' => {}
        _ => return,
    }

    // The prefix runs to the first slash; every character must be literal,
    // or the word is not a tilde expansion at all.
    let end = field
        .chars
        .iter()
        .position(|c| c.value == '/')
        .unwrap_or(field.chars.len());
    if field.chars[..end].iter().any(|c| !c.is_literal()) {
        return;
    }
    let prefix: String = field.chars[1..end].iter().map(|c| c.value).collect();

    let Some(replacement) = resolve(env, &prefix) else {
        return;
    };

    let mut chars: Vec<AttrChar> = Vec::with_capacity(replacement.len() + field.chars.len() - end);
    push_str(&mut chars, &replacement, Origin::Expansion);
    chars.extend_from_slice(&field.chars[end..]);
    field.chars = chars;
}
