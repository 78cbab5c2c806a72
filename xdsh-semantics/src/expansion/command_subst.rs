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

//! Command substitution
//!
//! A `$(…)` construct runs the enclosed command in a subshell whose
//! standard output is piped back to the shell. The captured output, with
//! trailing newlines removed, substitutes the construct; the subshell's
//! exit status becomes the last exit status (`$?`).
//!
//! The subshell re-drives a fresh parser over the command text, so nested
//! substitutions and quoting inside the construct are handled by the
//! ordinary machinery. The substituted text is marked as expansion output:
//! notably, newlines inside the captured output do not split words.

use super::attr::{Origin, push_str};
use super::{AttrField, ErrorCause, find_matching};
use xdsh_env::Env;
use xdsh_env::io::Fd;
use xdsh_env::job::ProcessState;
use xdsh_env::semantics::ExitStatus;
use xdsh_env::system::ForkResult;
use xdsh_syntax::scanner::{QuoteScanner, ScanState};

/// Runs a command in a subshell and captures its standard output.
fn substitute(env: &mut Env, code: &str) -> Result<String, ErrorCause> {
    let (reader, writer) = env
        .system
        .pipe()
        .map_err(ErrorCause::CommandSubstError)?;

    // SAFETY: the shell is single-threaded.
    let fork_result = unsafe { env.system.fork() };
    match fork_result {
        Err(errno) => {
            let _ = env.system.close(reader);
            let _ = env.system.close(writer);
            Err(ErrorCause::CommandSubstError(errno))
        }

        Ok(ForkResult::Child) => {
            let _ = env.system.close(reader);
            env.is_subshell = true;
            env.terminal.is_interactive = false;
            xdsh_env::trap::reset_for_child(&mut env.system);
            if writer != Fd::STDOUT {
                if env.system.dup2(writer, Fd::STDOUT).is_err() {
                    std::process::exit(ExitStatus::FAILURE.0);
                }
                let _ = env.system.close(writer);
            }
            let status = crate::execute::run_command_string(env, code);
            std::process::exit(status.0);
        }

        Ok(ForkResult::Parent { child }) => {
            let _ = env.system.close(writer);
            let mut result = Vec::new();
            let mut buffer = [0; 1024];
            loop {
                match env.system.read(reader, &mut buffer) {
                    Ok(0) | Err(_) => break,
                    Ok(count) => result.extend(&buffer[..count]),
                }
            }
            let _ = env.system.close(reader);

            env.exit_status = match env.system.waitpid(child, 0) {
                Ok(Some((_, status))) => ProcessState::from_wait_status(status).to_exit_status(),
                _ => ExitStatus::FAILURE,
            };

            Ok(String::from_utf8_lossy(&result).into_owned())
        }
    }
}

/// Performs command substitution on a field.
pub fn expand(env: &mut Env, field: &mut AttrField) -> Result<(), ErrorCause> {
    let chars = std::mem::take(&mut field.chars);
    let mut output = Vec::with_capacity(chars.len());
    let mut scanner = QuoteScanner::new();

    let mut index = 0;
    while index < chars.len() {
        let c = chars[index];
        let active = c.is_literal()
            && c.value == '$'
            && !scanner.in_single_quotes()
            && scanner.top() != ScanState::Escape
            && chars
                .get(index + 1)
                .is_some_and(|next| next.is_literal() && next.value == '(');

        if active {
            if let Some(end) = find_matching(&chars, index) {
                let code: String = chars[index + 2..end].iter().map(|c| c.value).collect();
                let captured = substitute(env, &code)?;
                let trimmed = captured.trim_end_matches('\n');
                push_str(&mut output, trimmed, Origin::Expansion);
                index = end + 1;
                continue;
            }
            // An unclosed `$(` cannot come from the lexer; keep the text.
        }

        scanner.advance(c.value, c.is_literal());
        output.push(c);
        index += 1;
    }

    field.chars = output;
    Ok(())
}
