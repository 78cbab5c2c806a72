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

//! Jobs built-in
//!
//! The **`jobs`** built-in prints the job table.
//!
//! # Synopsis
//!
//! ```sh
//! jobs [-l|-p] [jobspec…]
//! ```
//!
//! Without options, one status line is printed per job. With `-l`, each
//! process of a job gets its own line with its process ID and state. With
//! `-p`, only the process group IDs are printed. Operands restrict the
//! output to the given jobs.
//!
//! Jobs that have fully terminated are removed from the table after being
//! printed.

use crate::common::syntax::{Field, OptionSpec, parse_arguments};
use crate::common::{help, output, report_usage_error};
use std::fmt::Write as _;
use xdsh_env::Env;
use xdsh_env::builtin::Result;
use xdsh_env::job::fmt::Report;
use xdsh_env::job::id;

const NAME: &str = "jobs";
const USAGE: &str = "jobs [-l|-p] [jobspec...]";

const SPECS: &[OptionSpec<'static>] = &[
    OptionSpec::new().short('l'),
    OptionSpec::new().short('p'),
    OptionSpec::new().long("help"),
];

fn format_job(env: &Env, job_id: usize, detailed: bool, pids_only: bool) -> Option<String> {
    let job = env.jobs.get_with_id(job_id)?;
    if pids_only {
        return Some(format!("{}\n", job.pgid));
    }
    let report = Report {
        job,
        marker: env.jobs.marker_of(job_id),
    };
    if detailed {
        Some(format!("{}\n", report.detailed()))
    } else {
        Some(format!("{report}\n"))
    }
}

/// Entry point of the jobs built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, operands) = match parse_arguments(SPECS, args) {
        Ok(result) => result,
        Err(error) => return report_usage_error(env, NAME, &error.to_string(), USAGE),
    };

    let mut detailed = false;
    let mut pids_only = false;
    for option in &options {
        match option.spec.get_short() {
            Some('l') => detailed = true,
            Some('p') => pids_only = true,
            _ => return help(env, USAGE, "print the job table"),
        }
    }

    // Catch up on pending child status changes before printing.
    env.sigchld_block();
    env.poll_children();
    env.jobs.update_markers();

    let mut print = String::new();
    let mut failed = false;
    if operands.is_empty() {
        for job in env.jobs.jobs() {
            let id = job.id;
            if let Some(line) = format_job(env, id, detailed, pids_only) {
                print.push_str(&line);
            }
        }
        env.jobs.acknowledge_and_prune();
    } else {
        let mut errors = String::new();
        for operand in &operands {
            match id::parse(&operand.value).map(|spec| spec.find(&env.jobs)) {
                Ok(Ok(job_id)) => {
                    if let Some(line) = format_job(env, job_id, detailed, pids_only) {
                        print.push_str(&line);
                    }
                }
                Ok(Err(error)) => {
                    failed = true;
                    let _ = writeln!(errors, "xdsh: {NAME}: {}: {error}", operand.value);
                }
                Err(error) => {
                    failed = true;
                    let _ = writeln!(errors, "xdsh: {NAME}: {}: {error}", operand.value);
                }
            }
        }
        env.print_error(&errors);
    }
    env.sigchld_unblock();

    let result = output(env, NAME, &print);
    if failed {
        report_failure_status(result)
    } else {
        result
    }
}

fn report_failure_status(result: Result) -> Result {
    if result.exit_status.is_successful() {
        Result::new(xdsh_env::semantics::ExitStatus::FAILURE)
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::job::{Command, Job, Pid, ProcessState};
    use xdsh_env::system::RealSystem;

    fn env_with_jobs() -> Env {
        let mut env = Env::new(unsafe { RealSystem::new() });
        for (name, pid) in [("sleep 30 &", 100), ("cat", 200)] {
            let text = name.trim_end_matches(" &");
            let mut command =
                Command::new(text.split(' ').map(str::to_string).collect(), text.to_string());
            command.pid = Pid::from_raw(pid);
            command.state = ProcessState::Running;
            let mut job = Job::new(vec![command], name.ends_with('&'), text.to_string());
            job.pgid = Pid::from_raw(pid);
            job.unreaped_count = 1;
            env.jobs.add(job);
        }
        env
    }

    #[test]
    fn format_single_line() {
        let env = env_with_jobs();
        let line = format_job(&env, 1, false, false).unwrap();
        assert_eq!(
            line,
            "[1]-  Running                                    sleep 30 &\n"
        );
    }

    #[test]
    fn format_pids_only() {
        let env = env_with_jobs();
        assert_eq!(format_job(&env, 1, false, true).unwrap(), "100\n");
        assert_eq!(format_job(&env, 2, false, true).unwrap(), "200\n");
    }

    #[test]
    fn format_detailed_shows_command_pids() {
        let env = env_with_jobs();
        let line = format_job(&env, 2, true, false).unwrap();
        assert!(line.starts_with("[2]+    200 Running"), "{line}");
    }

    #[test]
    fn missing_job_formats_to_nothing() {
        let env = env_with_jobs();
        assert_eq!(format_job(&env, 9, false, false), None);
    }
}
