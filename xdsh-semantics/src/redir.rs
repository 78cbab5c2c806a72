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

//! Applying redirections
//!
//! [`RedirTargets`] holds the redirection paths of one command after word
//! expansion; [`apply`] opens them and moves the results onto the standard
//! descriptors. When the error path equals the output path byte for byte,
//! stderr is made a duplicate of stdout instead of opening the file twice
//! (the `&> file` case).
//!
//! [`SavedFds`] backs up the three standard descriptors around the no-fork
//! built-in path, so the shell's own descriptors always survive a built-in
//! with redirections.

use thiserror::Error;
use xdsh_env::io::Fd;
use xdsh_env::system::{Errno, RealSystem};

/// Creation mode for redirection output files (0664)
const OUTPUT_MODE: libc::mode_t = 0o664;

/// Redirection paths of one command, after expansion
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RedirTargets {
    pub stdin_file: Option<String>,
    /// Output path and append flag
    pub stdout_file: Option<(String, bool)>,
    /// Error path and append flag
    pub stderr_file: Option<(String, bool)>,
}

/// Error opening or applying a redirection
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{path}: {errno}")]
pub struct RedirError {
    pub path: String,
    pub errno: Errno,
}

fn open_into(
    system: &mut RealSystem,
    path: &str,
    flags: std::ffi::c_int,
    target: Fd,
) -> Result<(), RedirError> {
    let fail = |errno| RedirError {
        path: path.to_string(),
        errno,
    };
    let c_path = std::ffi::CString::new(path).map_err(|_| fail(Errno::ENOENT))?;
    let fd = system.open(&c_path, flags, OUTPUT_MODE).map_err(fail)?;
    if fd != target {
        system.dup2(fd, target).map_err(fail)?;
        let _ = system.close(fd);
    }
    Ok(())
}

fn output_flags(append: bool) -> std::ffi::c_int {
    let disposition = if append { libc::O_APPEND } else { libc::O_TRUNC };
    libc::O_WRONLY | libc::O_CREAT | disposition
}

/// Applies the redirections to the standard descriptors.
///
/// The paths must already be expanded; no tilde or pattern processing
/// happens here.
pub fn apply(system: &mut RealSystem, targets: &RedirTargets) -> Result<(), RedirError> {
    if let Some(path) = &targets.stdin_file {
        open_into(system, path, libc::O_RDONLY, Fd::STDIN)?;
    }

    if let Some((path, append)) = &targets.stdout_file {
        open_into(system, path, output_flags(*append), Fd::STDOUT)?;
    }

    if let Some((path, append)) = &targets.stderr_file {
        let same_as_stdout = targets
            .stdout_file
            .as_ref()
            .is_some_and(|(out_path, _)| out_path == path);
        if same_as_stdout {
            system.dup2(Fd::STDOUT, Fd::STDERR).map_err(|errno| RedirError {
                path: path.clone(),
                errno,
            })?;
        } else {
            open_into(system, path, output_flags(*append), Fd::STDERR)?;
        }
    }

    Ok(())
}

/// Backups of the standard descriptors for the no-fork built-in path
#[derive(Debug)]
pub struct SavedFds {
    saved: [(Fd, Fd); 3],
}

impl SavedFds {
    /// Duplicates stdin, stdout and stderr out of the way.
    pub fn save(system: &mut RealSystem) -> Result<SavedFds, Errno> {
        let mut saved = [(Fd::STDIN, Fd(-1)), (Fd::STDOUT, Fd(-1)), (Fd::STDERR, Fd(-1))];
        for index in 0..saved.len() {
            match system.dup(saved[index].0, Fd(10)) {
                Ok(fd) => saved[index].1 = fd,
                Err(errno) => {
                    // Roll back the backups made so far.
                    for (_, backup) in &saved[..index] {
                        let _ = system.close(*backup);
                    }
                    return Err(errno);
                }
            }
        }
        Ok(SavedFds { saved })
    }

    /// Restores the standard descriptors and closes the backups.
    pub fn restore(self, system: &mut RealSystem) {
        for (original, backup) in self.saved {
            let _ = system.dup2(backup, original);
            let _ = system.close(backup);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::system::RealSystem;

    fn system() -> RealSystem {
        unsafe { RealSystem::new() }
    }

    #[test]
    fn output_redirection_creates_and_truncates() {
        let mut system = system();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").display().to_string();

        // Write through a scratch fd rather than the real stdout.
        let c_path = std::ffi::CString::new(path.as_str()).unwrap();
        let fd = system
            .open(&c_path, output_flags(false), OUTPUT_MODE)
            .unwrap();
        system.write_all(fd, b"hello\n").unwrap();
        system.close(fd).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");

        // Reopening with truncation discards the old contents.
        let fd = system
            .open(&c_path, output_flags(false), OUTPUT_MODE)
            .unwrap();
        system.close(fd).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn append_redirection_keeps_contents() {
        let mut system = system();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log").display().to_string();
        let c_path = std::ffi::CString::new(path.as_str()).unwrap();

        for line in [b"one\n", b"two\n"] {
            let fd = system
                .open(&c_path, output_flags(true), OUTPUT_MODE)
                .unwrap();
            system.write_all(fd, line).unwrap();
            system.close(fd).unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let mut system = system();
        let targets = RedirTargets {
            stdin_file: Some("/no/such/file/anywhere".to_string()),
            ..Default::default()
        };
        // Checked without touching the real stdin: opening fails before
        // any dup2 happens.
        let error = apply(&mut system, &targets).unwrap_err();
        assert_eq!(error.errno, Errno::ENOENT);
        assert_eq!(error.path, "/no/such/file/anywhere");
    }

    #[test]
    fn saved_fds_restore_the_originals() {
        let mut system = system();
        let saved = SavedFds::save(&mut system).unwrap();
        // All backups are above the user fd range.
        assert!(saved.saved.iter().all(|(_, backup)| backup.0 >= 10));
        saved.restore(&mut system);

        // The standard descriptors still work after the round trip.
        assert!(system.write_all(Fd::STDERR, b"").is_ok());
    }
}
