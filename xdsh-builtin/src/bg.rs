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

//! Bg built-in
//!
//! The **`bg`** built-in resumes stopped jobs in the background.
//!
//! # Synopsis
//!
//! ```sh
//! bg [jobspec…]
//! ```
//!
//! Each selected job (the current job if no jobspec is given) receives
//! `SIGCONT` and is marked as a background job. The job stays in the job
//! table; its state keeps refreshing through the usual reaping.
//!
//! # Errors
//!
//! It is an error if the shell has no job control, or if a jobspec does
//! not resolve to a live stopped job. Remaining operands are still
//! processed after an error.
//!
//! # Exit status
//!
//! Zero unless an error occurs.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, report_failure, report_usage_error};
use xdsh_env::Env;
use xdsh_env::builtin::Result;
use xdsh_env::job::Pid;
use xdsh_env::job::id::{self, JobId};

const NAME: &str = "bg";
const USAGE: &str = "bg [jobspec...]";

const SPECS: &[OptionSpec<'static>] = &[OptionSpec::new().long("help")];

/// Resumes one job in the background. Returns an error message on
/// failure.
fn resume_job(env: &mut Env, spec: JobId) -> std::result::Result<(), String> {
    let job_id = spec
        .find(&env.jobs)
        .map_err(|error| format!("{spec}: {error}"))?;

    let Some(job) = env.jobs.get_with_id(job_id) else {
        return Err(format!("{spec}: no such job"));
    };
    if !job.is_alive() {
        return Err(format!("{spec}: job has terminated"));
    }
    if !job.is_stopped() {
        return Err(format!("{spec}: job already in background"));
    }
    let pgid = job.pgid;
    let line = format!("[{}] {} &\n", job.id, job.name);

    env.system
        .kill(Pid::from_raw(-pgid.as_raw()), libc::SIGCONT)
        .map_err(|errno| format!("{spec}: {errno}"))?;

    if let Some(job) = env.jobs.get_mut_with_id(job_id) {
        job.background = true;
        crate::fg::assume_continued(job);
    }
    env.jobs.update_markers();
    env.print(&line);
    Ok(())
}

/// Entry point of the bg built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };
    if !options.is_empty() {
        return help(env, USAGE, "resume jobs in the background");
    }

    if !env.terminal.is_interactive {
        return report_failure(env, NAME, "no job control");
    }

    env.sigchld_block();
    env.poll_children();
    env.sigchld_unblock();

    let specs = if operands.is_empty() {
        vec![JobId::CurrentJob]
    } else {
        let mut specs = Vec::new();
        for operand in &operands {
            match id::parse(&operand.value) {
                Ok(spec) => specs.push(spec),
                Err(error) => {
                    return report_failure(env, NAME, &format!("{}: {error}", operand.value));
                }
            }
        }
        specs
    };

    let mut result = Result::default();
    for spec in specs {
        if let Err(message) = resume_job(env, spec) {
            result = report_failure(env, NAME, &message);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::job::{Command, Job, ProcessState};
    use xdsh_env::semantics::ExitStatus;
    use xdsh_env::system::RealSystem;

    fn env_with_stopped_job() -> (Env, usize) {
        let mut env = Env::new(unsafe { RealSystem::new() });
        env.terminal.is_interactive = true;
        let mut command = Command::new(vec!["cat".to_string()], "cat".to_string());
        // Use our own process group so the SIGCONT goes somewhere harmless.
        command.pid = env.system.getpid();
        command.state = ProcessState::Running;
        let mut job = Job::new(vec![command], false, "cat".to_string());
        job.pgid = env.system.getpgrp();
        job.unreaped_count = 1;
        job.apply_state(0, ProcessState::Stopped(libc::SIGTSTP));
        let id = env.jobs.add(job);
        (env, id)
    }

    #[test]
    fn resume_marks_the_job_background_and_running() {
        let (mut env, id) = env_with_stopped_job();
        resume_job(&mut env, JobId::CurrentJob).unwrap();

        let job = env.jobs.get_with_id(id).unwrap();
        assert!(job.background);
        assert!(!job.is_stopped());
        assert!(job.is_alive());
    }

    #[test]
    fn missing_job_is_an_error() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        env.terminal.is_interactive = true;
        let error = resume_job(&mut env, JobId::CurrentJob).unwrap_err();
        assert!(error.contains("no such job"), "{error}");
    }

    #[test]
    fn running_job_is_already_in_background() {
        let (mut env, id) = env_with_stopped_job();
        crate::fg::assume_continued(env.jobs.get_mut_with_id(id).unwrap());
        let error = resume_job(&mut env, JobId::CurrentJob).unwrap_err();
        assert!(error.contains("already in background"), "{error}");
    }

    #[test]
    fn no_job_control_without_a_terminal() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        let result = main(&mut env, vec![]);
        assert_eq!(result.exit_status, ExitStatus::FAILURE);
    }
}
