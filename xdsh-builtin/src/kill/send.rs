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

//! Implementation of signal delivery for the kill built-in
//!
//! Each target is a process ID or a `%`-prefixed jobspec. A jobspec in an
//! interactive shell is signalled with one process-group broadcast;
//! otherwise every process of the job is signalled individually. A failed
//! target is reported but does not stop the remaining targets.

use crate::common::report_failure;
use xdsh_env::Env;
use xdsh_env::builtin::Result;
use xdsh_env::job::{Pid, id};
use xdsh_env::semantics::Field;
use xdsh_env::signal::RawNumber;

/// Delivers the signal to one target. Returns an error message on
/// failure.
fn send_to_target(env: &mut Env, signal: RawNumber, target: &str) -> std::result::Result<(), String> {
    if target.starts_with('%') {
        let spec = id::parse(target).map_err(|error| format!("{target}: {error}"))?;
        let job_id = spec
            .find(&env.jobs)
            .map_err(|error| format!("{target}: {error}"))?;
        let Some(job) = env.jobs.get_with_id(job_id) else {
            return Err(format!("{target}: no such job"));
        };
        if env.terminal.is_interactive && job.pgid.as_raw() != 0 {
            let pgid = Pid::from_raw(-job.pgid.as_raw());
            env.system
                .kill(pgid, signal)
                .map_err(|errno| format!("{target}: {errno}"))
        } else {
            let job = job.clone();
            env.kill_job(&job, signal)
                .map_err(|errno| format!("{target}: {errno}"))
        }
    } else {
        let pid: i32 = target
            .parse()
            .map_err(|_| format!("{target}: arguments must be process or job IDs"))?;
        env.system
            .kill(Pid::from_raw(pid), signal)
            .map_err(|errno| format!("{target}: {errno}"))
    }
}

/// Executes the `Send` command.
pub fn execute(env: &mut Env, signal: RawNumber, targets: &[Field]) -> Result {
    let mut result = Result::default();
    for target in targets {
        if let Err(message) = send_to_target(env, signal, &target.value) {
            result = report_failure(env, "kill", &message);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::system::RealSystem;

    fn test_env() -> Env {
        Env::new(unsafe { RealSystem::new() })
    }

    #[test]
    fn signal_zero_probes_an_existing_process() {
        let mut env = test_env();
        let own_pid = env.system.getpid().to_string();
        assert_eq!(send_to_target(&mut env, 0, &own_pid), Ok(()));
    }

    #[test]
    fn nonexistent_pid_is_an_error() {
        let mut env = test_env();
        // Probing with signal 0 avoids actually killing anything.
        let error = send_to_target(&mut env, 0, "999999999").unwrap_err();
        assert!(error.starts_with("999999999:"), "{error}");
    }

    #[test]
    fn malformed_target_is_an_error() {
        let mut env = test_env();
        let error = send_to_target(&mut env, 0, "abc").unwrap_err();
        assert!(error.contains("process or job IDs"), "{error}");
    }

    #[test]
    fn unknown_jobspec_is_an_error() {
        let mut env = test_env();
        let error = send_to_target(&mut env, 0, "%7").unwrap_err();
        assert!(error.contains("no such job"), "{error}");
    }

    #[test]
    fn errors_do_not_stop_later_targets() {
        let mut env = test_env();
        let own_pid = env.system.getpid().to_string();
        let targets = Field::dummies(["%42", own_pid.as_str()]);
        let result = execute(&mut env, 0, &targets);
        // The first target failed, the second was still probed.
        assert_eq!(result.exit_status, xdsh_env::semantics::ExitStatus::FAILURE);
    }
}
