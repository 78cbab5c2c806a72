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

//! The execution engine
//!
//! [`execute_pipeline`] drives one pipeline to completion (foreground) or
//! launch (background) and records the resulting exit status in the
//! environment.
//!
//! A single foreground command expands its words in the shell process, so
//! that the dispatch decision is made on the expanded command name. If
//! that name is a built-in, it runs in the shell process with the standard
//! descriptors backed up around its redirections, and nothing is forked;
//! otherwise the command is forked with the already-expanded fields. Every
//! other pipeline forks one child per command, and each child expands its
//! own argument words right before dispatching to a built-in or `exec`.
//! The first child creates a new process group that the remaining children
//! join; a foreground job also receives the controlling terminal until it
//! terminates or stops.
//!
//! If the setup itself fails (pipe or fork), every child forked so far is
//! killed and the job is abandoned with a generic failure status.

use crate::command_search;
use crate::expansion;
use crate::redir::{self, RedirTargets, SavedFds};
use std::ffi::CString;
use std::ops::ControlFlow::{self, Break, Continue};
use xdsh_env::Env;
use xdsh_env::io::Fd;
use xdsh_env::job::{Command, Job, Pid};
use xdsh_env::semantics::{Divert, ExitStatus, Field};
use xdsh_env::system::{Errno, ForkResult};
use xdsh_syntax::syntax::Pipeline;

/// Expands the argument words of a command into fields.
fn expand_words(env: &mut Env, words: &[String]) -> expansion::Result<Vec<Field>> {
    let mut fields = Vec::new();
    for word in words {
        for value in expansion::expand(env, word)? {
            fields.push(Field {
                value,
                origin: word.clone(),
            });
        }
    }
    Ok(fields)
}

/// Expands the redirection targets of a command.
fn expand_redirs(env: &mut Env, command: &Command) -> expansion::Result<RedirTargets> {
    let mut targets = RedirTargets::default();
    if let Some(path) = &command.stdin_file {
        targets.stdin_file = Some(expansion::expand_single(env, path)?);
    }
    if let Some((path, append)) = &command.stdout_file {
        targets.stdout_file = Some((expansion::expand_single(env, path)?, *append));
    }
    if let Some((path, append)) = &command.stderr_file {
        targets.stderr_file = Some((expansion::expand_single(env, path)?, *append));
    }
    Ok(targets)
}

/// Executes one parsed pipeline.
///
/// The exit status of the pipeline is stored into `env.exit_status`. The
/// returned flow is `Break` when a built-in asked the shell to exit.
pub fn execute_pipeline(env: &mut Env, pipeline: &Pipeline) -> ControlFlow<Divert> {
    let job = Job::from_pipeline(pipeline);

    if !job.background && job.commands.len() == 1 {
        execute_single(env, job)
    } else {
        execute_forked(env, job, None)
    }
}

/// Parses and executes a whole command string.
///
/// This is the entry point used for `-c` strings, start-up files, and the
/// body of a command substitution. Returns the final exit status.
pub fn run_command_string(env: &mut Env, code: &str) -> ExitStatus {
    match xdsh_syntax::parse_line(code, &env.aliases) {
        Err(error) => {
            env.diagnose(&error.to_string());
            env.exit_status = ExitStatus::ERROR;
        }
        Ok(pipelines) => {
            for pipeline in &pipelines {
                if let Break(Divert::Exit(status)) = execute_pipeline(env, pipeline) {
                    if let Some(status) = status {
                        env.exit_status = status;
                    }
                    break;
                }
            }
        }
    }
    env.exit_status
}

/// Runs a single foreground command.
///
/// The words and redirection targets are expanded here, in the shell
/// process, so the built-in decision is made on the expanded command name
/// just as the forked path makes it. A built-in then runs without forking;
/// anything else is forked with the fields expanded here.
fn execute_single(env: &mut Env, job: Job) -> ControlFlow<Divert> {
    let fields = match expand_words(env, &job.commands[0].words) {
        Ok(fields) => fields,
        Err(error) => {
            env.diagnose(&error.to_string());
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
    };
    let targets = match expand_redirs(env, &job.commands[0]) {
        Ok(targets) => targets,
        Err(error) => {
            env.diagnose(&error.to_string());
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
    };

    let is_builtin = fields
        .first()
        .is_some_and(|name| env.builtins.contains_key(name.value.as_str()));
    if fields.is_empty() {
        // The words expanded away entirely; there is nothing to run.
        env.exit_status = ExitStatus::SUCCESS;
        Continue(())
    } else if is_builtin {
        execute_builtin_no_fork(env, fields, &targets)
    } else {
        execute_forked(env, job, Some((fields, targets)))
    }
}

/// Runs an expanded foreground built-in in the shell process.
///
/// The standard descriptors are backed up before the redirections are
/// applied and restored on every way out.
fn execute_builtin_no_fork(
    env: &mut Env,
    fields: Vec<Field>,
    targets: &RedirTargets,
) -> ControlFlow<Divert> {
    let Some((name, args)) = fields.split_first() else {
        env.exit_status = ExitStatus::SUCCESS;
        return Continue(());
    };
    let Some(builtin) = env.builtins.get(name.value.as_str()).copied() else {
        env.diagnose(&format!("{}: command not found", name.value));
        env.exit_status = ExitStatus::NOT_FOUND;
        return Continue(());
    };

    let saved = match SavedFds::save(&mut env.system) {
        Ok(saved) => saved,
        Err(errno) => {
            env.diagnose(&format!("cannot save file descriptors: {errno}"));
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
    };
    if let Err(error) = redir::apply(&mut env.system, targets) {
        saved.restore(&mut env.system);
        env.diagnose(&error.to_string());
        env.exit_status = ExitStatus::FAILURE;
        return Continue(());
    }

    let result = (builtin.execute)(env, args.to_vec());
    saved.restore(&mut env.system);
    env.exit_status = result.exit_status;
    result.divert
}

/// Forks and runs every command of the job.
///
/// `expanded` carries the fields and redirection targets a single
/// foreground command already expanded in the shell process; the child
/// uses them instead of expanding again, so command substitutions do not
/// run twice.
fn execute_forked(
    env: &mut Env,
    mut job: Job,
    expanded: Option<(Vec<Field>, RedirTargets)>,
) -> ControlFlow<Divert> {
    let count = job.commands.len();
    let mut prev_read: Option<Fd> = None;
    env.sigchld_block();

    for index in 0..count {
        let pipe = if index + 1 < count {
            match env.system.pipe() {
                Ok(pipe) => Some(pipe),
                Err(errno) => {
                    env.diagnose(&format!("cannot create pipe: {errno}"));
                    return abort_job(env, &mut job, prev_read, None);
                }
            }
        } else {
            None
        };

        // SAFETY: the shell is single-threaded.
        match unsafe { env.system.fork() } {
            Err(errno) => {
                env.diagnose(&format!("cannot fork: {errno}"));
                return abort_job(env, &mut job, prev_read, pipe);
            }

            Ok(ForkResult::Child) => {
                child_setup_and_run(env, &job, index, prev_read, pipe, expanded.as_ref())
            }

            Ok(ForkResult::Parent { child }) => {
                job.commands[index].pid = child;
                job.unreaped_count += 1;
                if index == 0 {
                    job.pgid = child;
                }
                // Racing against the same call in the child; both are
                // idempotent.
                let _ = env.system.setpgid(child, job.pgid);

                if let Some(fd) = prev_read.take() {
                    let _ = env.system.close(fd);
                }
                if let Some((read, write)) = pipe {
                    let _ = env.system.close(write);
                    prev_read = Some(read);
                }
            }
        }
    }
    job.touch();

    if job.background {
        let last_pid = job.commands.last().map_or(job.pgid, |command| command.pid);
        env.jobs.set_last_async_pid(last_pid);
        let id = env.jobs.add(job);
        env.sigchld_unblock();
        if env.terminal.is_interactive {
            env.print_error(&format!("[{id}] {last_pid}\n"));
        }
        env.exit_status = ExitStatus::SUCCESS;
    } else {
        env.sigchld_unblock();
        let _ = env.terminal.put_in_foreground(&mut env.system, job.pgid);
        let status = env.wait_for_job(&mut job);
        env.terminal.reclaim(&mut env.system);
        if job.is_alive() {
            // Keep the modes the job set, for a later fg.
            if let Ok(modes) = env.terminal.capture_modes(&env.system) {
                job.saved_modes = Some(modes);
            }
        }
        env.terminal.restore_shell_modes(&mut env.system);
        env.exit_status = status;

        if job.is_alive() {
            // The stopped job enters the table and is reported before the
            // next prompt.
            job.notify = true;
            env.sigchld_block();
            env.jobs.add(job);
            env.sigchld_unblock();
        }
    }
    Continue(())
}

/// Cancels a job whose setup failed: kills and reaps every child forked
/// so far, closes the dangling pipe ends, and records a generic failure.
fn abort_job(
    env: &mut Env,
    job: &mut Job,
    prev_read: Option<Fd>,
    pipe: Option<(Fd, Fd)>,
) -> ControlFlow<Divert> {
    if let Some(fd) = prev_read {
        let _ = env.system.close(fd);
    }
    if let Some((read, write)) = pipe {
        let _ = env.system.close(read);
        let _ = env.system.close(write);
    }
    for command in &job.commands {
        if command.pid.as_raw() != 0 {
            let _ = env.system.kill(command.pid, libc::SIGKILL);
        }
    }
    for command in &job.commands {
        if command.pid.as_raw() != 0 {
            let _ = env.system.waitpid(command.pid, 0);
        }
    }
    env.terminal.take_back(&mut env.system);
    env.sigchld_unblock();
    env.exit_status = ExitStatus::FAILURE;
    Continue(())
}

/// Child-side setup: process group, terminal, signals, pipe ends,
/// redirections, and the final dispatch. Never returns.
fn child_setup_and_run(
    env: &mut Env,
    job: &Job,
    index: usize,
    stdin_pipe: Option<Fd>,
    pipe: Option<(Fd, Fd)>,
    expanded: Option<&(Vec<Field>, RedirTargets)>,
) -> ! {
    let zero = Pid::from_raw(0);
    let pgid = if index == 0 { zero } else { job.pgid };
    let _ = env.system.setpgid(zero, pgid);
    let _ = env.system.sigmask(libc::SIG_UNBLOCK, libc::SIGCHLD);

    if !job.background && env.terminal.is_interactive {
        let own_pgid = if index == 0 {
            env.system.getpid()
        } else {
            job.pgid
        };
        let _ = env.system.tcsetpgrp(Fd::STDIN, own_pgid);
    }
    xdsh_env::trap::reset_for_child(&mut env.system);

    // Wire the pipeline first; file redirections applied below override.
    if let Some((read, write)) = pipe {
        let _ = env.system.close(read);
        if write != Fd::STDOUT {
            let _ = env.system.dup2(write, Fd::STDOUT);
            let _ = env.system.close(write);
        }
    }
    if let Some(read) = stdin_pipe {
        if read != Fd::STDIN {
            let _ = env.system.dup2(read, Fd::STDIN);
            let _ = env.system.close(read);
        }
    }

    let command = &job.commands[index];
    let (fields, targets) = match expanded {
        // Already expanded in the shell process; do not run command
        // substitutions a second time.
        Some((fields, targets)) => (fields.clone(), targets.clone()),
        None => {
            let fields = match expand_words(env, &command.words) {
                Ok(fields) => fields,
                Err(error) => {
                    env.diagnose(&error.to_string());
                    std::process::exit(ExitStatus::FAILURE.0);
                }
            };
            let targets = match expand_redirs(env, command) {
                Ok(targets) => targets,
                Err(error) => {
                    env.diagnose(&error.to_string());
                    std::process::exit(ExitStatus::FAILURE.0);
                }
            };
            (fields, targets)
        }
    };
    if let Err(error) = redir::apply(&mut env.system, &targets) {
        env.diagnose(&error.to_string());
        std::process::exit(ExitStatus::FAILURE.0);
    }

    let Some(name) = fields.first().map(|field| field.value.clone()) else {
        // The words expanded away entirely; there is nothing to run.
        std::process::exit(ExitStatus::SUCCESS.0);
    };

    if let Some(builtin) = env.builtins.get(name.as_str()).copied() {
        let args = fields[1..].to_vec();
        let result = (builtin.execute)(env, args);
        std::process::exit(result.exit_status.0);
    }

    execute_external(env, &fields)
}

/// Replaces the child process image with the resolved external command.
/// Never returns; on `exec` failure the child exits with the conventional
/// 126/127 codes.
fn execute_external(env: &mut Env, fields: &[Field]) -> ! {
    let name = fields[0].value.as_str();
    let path = if name.contains('/') {
        name.to_string()
    } else {
        match command_search::search_path(env, name) {
            Some(path) => path,
            None => {
                env.diagnose(&format!("{name}: command not found"));
                std::process::exit(ExitStatus::NOT_FOUND.0);
            }
        }
    };

    let Ok(c_path) = CString::new(path.as_str()) else {
        env.diagnose(&format!("{name}: invalid path"));
        std::process::exit(ExitStatus::FAILURE.0);
    };
    let args: Vec<CString> = fields
        .iter()
        .filter_map(|field| CString::new(field.value.as_str()).ok())
        .collect();
    let envs = env.variables.environ();

    let errno = match env.system.execve(&c_path, &args, &envs) {
        Err(errno) => errno,
        Ok(never) => match never {},
    };
    let status = match errno {
        Errno::EACCES | Errno::EISDIR => ExitStatus::NOEXEC,
        Errno::ENOENT | Errno::ENOTDIR => ExitStatus::NOT_FOUND,
        _ => ExitStatus::FAILURE,
    };
    env.diagnose(&format!("{name}: {errno}"));
    std::process::exit(status.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdsh_env::builtin::Builtin;
    use xdsh_env::system::RealSystem;

    fn record_args(env: &mut Env, args: Vec<Field>) -> xdsh_env::builtin::Result {
        let joined: Vec<String> = args.into_iter().map(|field| field.value).collect();
        env.variables
            .assign("RECORDED", joined.join(","))
            .unwrap();
        xdsh_env::builtin::Result::new(ExitStatus(7))
    }

    fn quit(_env: &mut Env, _args: Vec<Field>) -> xdsh_env::builtin::Result {
        xdsh_env::builtin::Result::exit(Some(ExitStatus(5)))
    }

    fn test_env() -> Env {
        let mut env = Env::new(unsafe { RealSystem::new() });
        env.builtins
            .insert("record", Builtin::new(record_args, "record arguments"));
        env.builtins.insert("quit", Builtin::new(quit, "exit"));
        env
    }

    fn pipeline(line: &str) -> Pipeline {
        xdsh_syntax::parse_line(line, &xdsh_syntax::alias::EmptyGlossary)
            .unwrap()
            .remove(0)
    }

    #[test]
    fn no_fork_builtin_receives_expanded_arguments() {
        let mut env = test_env();
        env.variables.assign("X", "split me").unwrap();
        let flow = execute_pipeline(&mut env, &pipeline("record a 'b c' $X"));
        assert_eq!(flow, Continue(()));
        assert_eq!(env.exit_status, ExitStatus(7));
        assert_eq!(
            env.variables.get_scalar("RECORDED"),
            Some("a,b c,split me")
        );
    }

    #[test]
    fn no_fork_builtin_leaves_no_pid_behind() {
        let mut env = test_env();
        execute_pipeline(&mut env, &pipeline("record"));
        // Nothing was forked, so the job table stays empty.
        assert!(env.jobs.is_empty());
    }

    #[test]
    fn expansion_error_skips_the_builtin() {
        let mut env = test_env();
        let flow = execute_pipeline(&mut env, &pipeline("record ${"));
        assert_eq!(flow, Continue(()));
        assert_eq!(env.exit_status, ExitStatus::FAILURE);
        assert_eq!(env.variables.get_scalar("RECORDED"), None);
    }

    #[test]
    fn exit_builtin_diverts() {
        let mut env = test_env();
        let flow = execute_pipeline(&mut env, &pipeline("quit"));
        assert_eq!(flow, Break(Divert::Exit(Some(ExitStatus(5)))));
        assert_eq!(env.exit_status, ExitStatus(5));
    }

    #[test]
    fn run_command_string_stops_at_exit() {
        let mut env = test_env();
        let status = run_command_string(&mut env, "record one; quit; record two");
        assert_eq!(status, ExitStatus(5));
        assert_eq!(env.variables.get_scalar("RECORDED"), Some("one"));
    }

    #[test]
    fn run_command_string_reports_syntax_errors() {
        let mut env = test_env();
        let status = run_command_string(&mut env, "record |");
        assert_eq!(status, ExitStatus::ERROR);
    }

    #[test]
    fn quoted_builtin_name_still_runs_in_the_shell_process() {
        // The dispatch decision is made on the expanded name, so quoting
        // the command word does not push the built-in into a child where
        // its state changes would be lost.
        let mut env = test_env();
        let flow = execute_pipeline(&mut env, &pipeline("'record' x"));
        assert_eq!(flow, Continue(()));
        assert_eq!(env.exit_status, ExitStatus(7));
        assert_eq!(env.variables.get_scalar("RECORDED"), Some("x"));
        assert!(env.jobs.is_empty());
    }

    #[test]
    fn expanded_builtin_name_still_runs_in_the_shell_process() {
        let mut env = test_env();
        env.variables.assign("CMD", "record").unwrap();
        let flow = execute_pipeline(&mut env, &pipeline("$CMD y"));
        assert_eq!(flow, Continue(()));
        assert_eq!(env.variables.get_scalar("RECORDED"), Some("y"));
    }
}
