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

//! Fg built-in
//!
//! The **`fg`** built-in resumes a job in the foreground.
//!
//! # Synopsis
//!
//! ```sh
//! fg [jobspec]
//! ```
//!
//! The selected job (the current job if no jobspec is given) gets its
//! saved terminal modes back, receives `SIGCONT`, takes the controlling
//! terminal, and is waited for like any other foreground job. If it stops
//! again it goes back into the job table as the current job.
//!
//! # Errors
//!
//! The built-in requires an interactive shell that owns the terminal; it
//! fails with "no job control" otherwise. It is also an error if the
//! jobspec does not resolve to a live job.
//!
//! # Exit status
//!
//! The exit status of the resumed job, or 1 on error.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, report_failure, report_usage_error};
use xdsh_env::Env;
use xdsh_env::builtin::Result;
use xdsh_env::job::id::{self, JobId};
use xdsh_env::job::{Job, ProcessState};

const NAME: &str = "fg";
const USAGE: &str = "fg [jobspec]";

const SPECS: &[OptionSpec<'static>] = &[OptionSpec::new().long("help")];

/// Resolves the single optional jobspec operand.
fn resolve_operand(env: &Env, operands: &[Field]) -> std::result::Result<usize, String> {
    let spec = match operands {
        [] => JobId::CurrentJob,
        [operand] => {
            id::parse(&operand.value).map_err(|error| format!("{}: {error}", operand.value))?
        }
        _ => return Err("too many operands".to_string()),
    };
    spec.find(&env.jobs)
        .map_err(|error| format!("{spec}: {error}"))
}

/// Marks every stopped process of the job as running again.
///
/// `SIGCONT` has been sent; adjusting the counters up front lets the wait
/// loop run instead of seeing an all-stopped job.
pub(crate) fn assume_continued(job: &mut Job) {
    for index in 0..job.commands.len() {
        if job.commands[index].state.is_stopped() {
            job.apply_state(index, ProcessState::Running);
        }
    }
}

/// Entry point of the fg built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };
    if !options.is_empty() {
        return help(env, USAGE, "resume a job in the foreground");
    }

    if !env.terminal.is_interactive {
        return report_failure(env, NAME, "no job control");
    }

    let job_id = match resolve_operand(env, &operands) {
        Ok(job_id) => job_id,
        Err(message) => return report_failure(env, NAME, &message),
    };

    env.sigchld_block();
    env.poll_children();
    let Some(mut job) = env.jobs.remove_with_id(job_id) else {
        env.sigchld_unblock();
        return report_failure(env, NAME, "no such job");
    };
    env.sigchld_unblock();

    if !job.is_alive() {
        return report_failure(env, NAME, "job has terminated");
    }

    // The job is a foreground job from here on; status reports must not
    // show it with a `&` any more.
    job.background = false;

    env.print(&format!("{}\n", job.name));

    if let Some(modes) = &job.saved_modes {
        let _ = env.terminal.apply_modes(&mut env.system, modes);
    }
    let _ = env.terminal.put_in_foreground(&mut env.system, job.pgid);
    let _ = env.system.kill(xdsh_env::job::Pid::from_raw(-job.pgid.as_raw()), libc::SIGCONT);
    assume_continued(&mut job);

    let status = env.wait_for_job(&mut job);
    env.terminal.reclaim(&mut env.system);
    if job.is_alive() {
        if let Ok(modes) = env.terminal.capture_modes(&env.system) {
            job.saved_modes = Some(modes);
        }
    }
    env.terminal.restore_shell_modes(&mut env.system);

    if job.is_alive() {
        job.notify = true;
        env.sigchld_block();
        env.jobs.restore(job);
        env.sigchld_unblock();
    }

    Result::new(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::job::{Command, Pid};
    use xdsh_env::system::RealSystem;

    fn stopped_job() -> Job {
        let mut command = Command::new(vec!["cat".to_string()], "cat".to_string());
        command.pid = Pid::from_raw(300);
        command.state = ProcessState::Running;
        let mut job = Job::new(vec![command], false, "cat".to_string());
        job.unreaped_count = 1;
        job.apply_state(0, ProcessState::Stopped(libc::SIGTSTP));
        job
    }

    #[test]
    fn assume_continued_resets_the_stop_counters() {
        let mut job = stopped_job();
        assert!(job.is_stopped());
        assume_continued(&mut job);
        assert!(!job.is_stopped());
        assert_eq!(job.stopped_count, 0);
        assert_eq!(job.unreaped_count, 1);
    }

    #[test]
    fn resolve_defaults_to_the_current_job() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        let id = env.jobs.add(stopped_job());
        assert_eq!(resolve_operand(&env, &[]), Ok(id));
    }

    #[test]
    fn resolve_rejects_bad_jobspecs() {
        let env = Env::new(unsafe { RealSystem::new() });
        assert!(resolve_operand(&env, &Field::dummies(["nope"])).is_err());
        assert!(resolve_operand(&env, &Field::dummies(["%1", "%2"])).is_err());
        assert!(resolve_operand(&env, &[]).is_err());
    }

    #[test]
    fn non_interactive_shell_has_no_job_control() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        let result = main(&mut env, vec![]);
        assert_eq!(
            result.exit_status,
            xdsh_env::semantics::ExitStatus::FAILURE
        );
    }
}
