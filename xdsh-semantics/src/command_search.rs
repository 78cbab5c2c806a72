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

//! Command search
//!
//! Searches `$PATH` for the executable file implementing a simple command.
//! A name containing a slash is not searched at all: the caller uses it as
//! a literal path. Empty `$PATH` segments mean the current directory, and
//! a candidate only matches if it is an executable regular file.

use std::ffi::CString;
use xdsh_env::Env;
use xdsh_env::variable::PATH;

/// Search path used when `$PATH` is unset
const DEFAULT_PATH: &str = "/usr/local/bin:/bin:/usr/bin";

/// Searches the configured path for the named command.
///
/// Returns `None` both when the name contains a slash (the caller should
/// use the literal path) and when no matching executable exists; the two
/// cases are distinguished by the name itself.
#[must_use]
pub fn search_path(env: &Env, name: &str) -> Option<String> {
    if name.contains('/') || name.is_empty() {
        return None;
    }

    let path = env.variables.get_scalar(PATH).unwrap_or(DEFAULT_PATH);
    for segment in path.split(':') {
        let directory = if segment.is_empty() { "." } else { segment };
        let candidate = format!("{directory}/{name}");
        let Ok(c_candidate) = CString::new(candidate.as_str()) else {
            continue;
        };
        if env.system.is_executable_file(&c_candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use xdsh_env::system::RealSystem;

    fn env_with_path(path: &str) -> Env {
        let mut env = Env::new(unsafe { RealSystem::new() });
        env.variables.assign(PATH, path).unwrap();
        env
    }

    fn make_executable(dir: &std::path::Path, name: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[test]
    fn name_with_slash_is_not_searched() {
        let env = env_with_path("/bin");
        assert_eq!(search_path(&env, "bin/prog"), None);
        assert_eq!(search_path(&env, "/bin/prog"), None);
    }

    #[test]
    fn finds_the_first_match_in_path_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        make_executable(first.path(), "prog");
        let expected = format!("{}/prog", first.path().display());
        make_executable(second.path(), "prog");

        let env = env_with_path(&format!(
            "{}:{}",
            first.path().display(),
            second.path().display()
        ));
        assert_eq!(search_path(&env, "prog"), Some(expected));
    }

    #[test]
    fn skips_non_executable_and_non_regular_candidates() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        // A non-executable file in the first directory.
        std::fs::write(first.path().join("prog"), "").unwrap();
        // A directory named like the command in the first directory too.
        std::fs::create_dir(first.path().join("prog2")).unwrap();
        let expected = make_executable(second.path(), "prog");

        let env = env_with_path(&format!(
            "{}:{}",
            first.path().display(),
            second.path().display()
        ));
        assert_eq!(search_path(&env, "prog"), Some(expected));
    }

    #[test]
    fn missing_command_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_with_path(&dir.path().display().to_string());
        assert_eq!(search_path(&env, "no_such_program"), None);
    }

    #[test]
    fn empty_segment_means_current_directory() {
        let dir = tempfile::tempdir().unwrap();
        make_executable(dir.path(), "prog");
        let env = env_with_path(&format!("{}:", dir.path().display()));
        // The empty trailing segment resolves to "."; the command is found
        // through the first segment regardless of the current directory.
        assert_eq!(
            search_path(&env, "prog"),
            Some(format!("{}/prog", dir.path().display()))
        );
    }
}
