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

//! Parameter expansion
//!
//! Two syntaxes are recognized, both only at literal `$` characters that
//! are not inside single quotes and not inside a command substitution:
//!
//! - `$name` where *name* matches `[A-Za-z_][A-Za-z0-9_]*`
//! - `${body}` where *body* is a name or one of the special parameters
//!
//! The special parameters `$$`, `$?` and `$!` yield the shell's process
//! ID, the last exit status, and the process ID of the last asynchronous
//! job. An unset variable expands to nothing. A `${` without its `}` or
//! with an invalid body is a bad substitution error.
//!
//! Text inside `$(…)` is left for the command substitution pass, which
//! re-expands it in the subshell.

use super::attr::{AttrChar, Origin, push_str};
use super::{AttrField, ErrorCause, find_matching};
use xdsh_env::Env;
use xdsh_syntax::scanner::QuoteScanner;

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Looks up the value of a parameter: a special parameter or a variable.
///
/// Unset variables yield an empty string.
fn parameter_value(env: &mut Env, name: &str) -> String {
    match name {
        "$" => env.main_pid.to_string(),
        "?" => env.exit_status.to_string(),
        "!" => {
            let pid = env.jobs.last_async_pid();
            if pid.as_raw() == 0 {
                String::new()
            } else {
                pid.to_string()
            }
        }
        name => env.variables.get_scalar(name).unwrap_or("").to_string(),
    }
}

/// Performs parameter expansion on a field.
pub fn expand(env: &mut Env, field: &mut AttrField) -> Result<(), ErrorCause> {
    let chars = std::mem::take(&mut field.chars);
    let mut output: Vec<AttrChar> = Vec::with_capacity(chars.len());
    let mut scanner = QuoteScanner::new();

    let mut index = 0;
    while index < chars.len() {
        let c = chars[index];
        let active = c.is_literal()
            && c.value == '$'
            && !scanner.in_single_quotes()
            && !scanner.in_command_subst()
            && scanner.top() != xdsh_syntax::scanner::ScanState::Escape;

        if active {
            match chars.get(index + 1).filter(|next| next.is_literal()) {
                // `$(…)`: skip the whole construct; the command
                // substitution pass owns it. The region is balanced, so
                // the scanner state is unaffected by copying it verbatim.
                Some(next) if next.value == '(' => {
                    if let Some(end) = find_matching(&chars, index) {
                        output.extend_from_slice(&chars[index..=end]);
                        index = end + 1;
                        continue;
                    }
                }
                // `${body}`
                Some(next) if next.value == '{' => {
                    let Some(end) = find_matching(&chars, index) else {
                        let text: String = chars[index..].iter().map(|c| c.value).collect();
                        return Err(ErrorCause::BadSubstitution(text));
                    };
                    let body: String = chars[index + 2..end].iter().map(|c| c.value).collect();
                    let is_special = matches!(body.as_str(), "$" | "?" | "!");
                    let is_name = !body.is_empty()
                        && body.chars().next().is_some_and(is_name_start)
                        && body.chars().all(is_name_char);
                    if !is_special && !is_name {
                        let text: String = chars[index..=end].iter().map(|c| c.value).collect();
                        return Err(ErrorCause::BadSubstitution(text));
                    }
                    let value = parameter_value(env, &body);
                    push_str(&mut output, &value, Origin::Expansion);
                    index = end + 1;
                    continue;
                }
                // `$$`, `$?`, `$!`
                Some(next) if matches!(next.value, '$' | '?' | '!') => {
                    let value = parameter_value(env, &next.value.to_string());
                    push_str(&mut output, &value, Origin::Expansion);
                    index += 2;
                    continue;
                }
                // `$name`
                Some(next) if is_name_start(next.value) => {
                    let mut end = index + 1;
                    while end < chars.len() && chars[end].is_literal() && is_name_char(chars[end].value)
                    {
                        end += 1;
                    }
                    let name: String = chars[index + 1..end].iter().map(|c| c.value).collect();
                    let value = parameter_value(env, &name);
                    push_str(&mut output, &value, Origin::Expansion);
                    index = end;
                    continue;
                }
                _ => {}
            }
        }

        scanner.advance(c.value, c.is_literal());
        output.push(c);
        index += 1;
    }

    field.chars = output;
    Ok(())
}
