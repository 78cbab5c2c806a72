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

//! Completion generators for the line editor
//!
//! Four generators produce the candidates the line editor offers when the
//! user presses tab on a word with one of these shapes:
//!
//! - `~partial`: user names from the user database
//! - `~…/partial`: pathnames under the tilde-expanded directory, with a
//!   trailing `/` on directories
//! - `$partial`: variable names
//! - `${partial`: variable names in the braced form, closed with `}`
//!
//! [`generate`] dispatches on the word's shape. All generators return
//! sorted, deduplicated candidates that are full replacements for the
//! partial word.

use itertools::Itertools;
use xdsh_env::Env;

/// Completes `~partial` to user names.
#[must_use]
pub fn complete_tilde_user(env: &Env, partial: &str) -> Vec<String> {
    let Some(prefix) = partial.strip_prefix('~') else {
        return Vec::new();
    };
    env.system
        .all_user_names()
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .map(|name| format!("~{name}"))
        .sorted()
        .dedup()
        .collect()
}

/// Completes `~…/partial` to pathnames.
///
/// Directory candidates get a trailing `/` so the editor can descend into
/// them. The tilde prefix is preserved in the candidates.
#[must_use]
pub fn complete_tilde_path(env: &Env, partial: &str) -> Vec<String> {
    if !partial.starts_with('~') {
        return Vec::new();
    }
    let Some(slash) = partial.find('/') else {
        return Vec::new();
    };
    let (tilde_prefix, path_part) = partial.split_at(slash);

    // Resolve the tilde prefix the same way the expansion does.
    let mut field = crate::expansion::attr::AttrField::from_literal(tilde_prefix);
    crate::expansion::tilde::expand(env, &mut field);
    let resolved = field.value();
    if resolved == tilde_prefix {
        return Vec::new();
    }

    let (dir_part, name_part) = match path_part.rfind('/') {
        Some(index) => (&path_part[..=index], &path_part[index + 1..]),
        None => ("/", ""),
    };
    let directory = format!("{resolved}{dir_part}");

    let Ok(entries) = std::fs::read_dir(&directory) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(name_part) || name_part.is_empty() && name.starts_with('.') {
                return None;
            }
            let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
            let suffix = if is_dir { "/" } else { "" };
            Some(format!("{tilde_prefix}{dir_part}{name}{suffix}"))
        })
        .sorted()
        .dedup()
        .collect()
}

/// Completes `$partial` to variable names.
#[must_use]
pub fn complete_variable(env: &Env, partial: &str) -> Vec<String> {
    let Some(prefix) = partial.strip_prefix('$') else {
        return Vec::new();
    };
    env.variables
        .names()
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .map(|name| format!("${name}"))
        .sorted()
        .dedup()
        .collect()
}

/// Completes `${partial` to braced variable references.
#[must_use]
pub fn complete_variable_brace(env: &Env, partial: &str) -> Vec<String> {
    let Some(prefix) = partial.strip_prefix("${") else {
        return Vec::new();
    };
    let prefix = prefix.strip_suffix('}').unwrap_or(prefix);
    env.variables
        .names()
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .map(|name| format!("${{{name}}}"))
        .sorted()
        .dedup()
        .collect()
}

/// Generates completions for a partial word, dispatching on its shape.
#[must_use]
pub fn generate(env: &Env, partial: &str) -> Vec<String> {
    if partial.starts_with("${") {
        complete_variable_brace(env, partial)
    } else if partial.starts_with('$') {
        complete_variable(env, partial)
    } else if partial.starts_with('~') && partial.contains('/') {
        complete_tilde_path(env, partial)
    } else if partial.starts_with('~') {
        complete_tilde_user(env, partial)
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::system::RealSystem;
    use xdsh_env::variable::HOME;

    fn test_env() -> Env {
        Env::new(unsafe { RealSystem::new() })
    }

    #[test]
    fn variable_completion() {
        let mut env = test_env();
        env.variables.assign("PATH", "x").unwrap();
        env.variables.assign("PWD", "y").unwrap();
        env.variables.assign("HOME", "z").unwrap();

        assert_eq!(complete_variable(&env, "$P"), ["$PATH", "$PWD"]);
        assert_eq!(complete_variable(&env, "$PA"), ["$PATH"]);
        assert_eq!(complete_variable(&env, "$Q"), Vec::<String>::new());
        // All names on a bare dollar.
        assert_eq!(complete_variable(&env, "$").len(), 3);
    }

    #[test]
    fn braced_variable_completion() {
        let mut env = test_env();
        env.variables.assign("PATH", "x").unwrap();
        env.variables.assign("PWD", "y").unwrap();

        assert_eq!(complete_variable_brace(&env, "${P"), ["${PATH}", "${PWD}"]);
        assert_eq!(complete_variable_brace(&env, "${PA"), ["${PATH}"]);
    }

    #[test]
    fn tilde_path_completion_lists_the_home_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let mut env = test_env();
        env.variables
            .assign(HOME, dir.path().display().to_string())
            .unwrap();

        let all = complete_tilde_path(&env, "~/n");
        assert_eq!(all, ["~/nested/", "~/notes.md", "~/notes.txt"]);

        let nested = complete_tilde_path(&env, "~/nested/");
        assert_eq!(nested, Vec::<String>::new());
    }

    #[test]
    fn tilde_path_completion_hides_dot_files_by_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".hidden"), "").unwrap();
        std::fs::write(dir.path().join("shown"), "").unwrap();

        let mut env = test_env();
        env.variables
            .assign(HOME, dir.path().display().to_string())
            .unwrap();

        assert_eq!(complete_tilde_path(&env, "~/"), ["~/shown"]);
        assert_eq!(complete_tilde_path(&env, "~/.h"), ["~/.hidden"]);
    }

    #[test]
    fn dispatch_by_shape() {
        let mut env = test_env();
        env.variables.assign("VAR", "x").unwrap();

        assert_eq!(generate(&env, "$VA"), ["$VAR"]);
        assert_eq!(generate(&env, "${VA"), ["${VAR}"]);
        assert_eq!(generate(&env, "plain"), Vec::<String>::new());
    }

    #[test]
    fn tilde_user_completion_requires_the_tilde() {
        let env = test_env();
        assert_eq!(complete_tilde_user(&env, "root"), Vec::<String>::new());
        // Completing `~` against the real user database: whatever comes
        // back must keep the tilde prefix.
        for candidate in complete_tilde_user(&env, "~") {
            assert!(candidate.starts_with('~'));
        }
    }
}
