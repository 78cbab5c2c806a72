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

//! Job management
//!
//! A [`Command`] is one simple command of a pipeline; a [`Job`] is a whole
//! pipeline and the unit of job control. The process-wide [`JobSet`] tracks
//! the jobs that are running or stopped in the background, assigns job IDs,
//! and maintains the current (`+`) and previous (`-`) job markers.
//!
//! Every wait-status observation, whether from the synchronous wait loop or
//! from the between-prompts reaper, flows through [`Job::apply_state`],
//! which keeps the `unreaped_count`/`stopped_count` bookkeeping consistent:
//! `0 <= stopped_count <= unreaped_count <= commands.len()` at all times.

pub mod fmt;
pub mod id;

use crate::Env;
use crate::semantics::ExitStatus;
use crate::signal::RawNumber;
use crate::system::Errno;
use crate::terminal::TerminalState;
use std::ffi::c_int;
use std::time::Instant;

#[doc(no_inline)]
pub use nix::unistd::Pid;

/// Observed way a process ended
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcessResult {
    /// The process exited with the given status.
    Exited(ExitStatus),
    /// The process was killed by a signal.
    Signaled {
        signal: RawNumber,
        core_dump: bool,
    },
}

/// Observed state of a child process
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcessState {
    /// Forked, but no wait status observed yet
    Pending,
    /// Running (also the state after `WIFCONTINUED`)
    Running,
    /// Stopped by the given signal
    Stopped(RawNumber),
    /// Exited or killed; no more wait statuses will be observed
    Halted(ProcessResult),
}

impl ProcessState {
    /// Decodes a raw wait status as returned by `waitpid`.
    #[must_use]
    pub fn from_wait_status(status: c_int) -> ProcessState {
        if libc::WIFEXITED(status) {
            ProcessState::Halted(ProcessResult::Exited(ExitStatus(libc::WEXITSTATUS(status))))
        } else if libc::WIFSIGNALED(status) {
            ProcessState::Halted(ProcessResult::Signaled {
                signal: libc::WTERMSIG(status),
                core_dump: libc::WCOREDUMP(status),
            })
        } else if libc::WIFSTOPPED(status) {
            ProcessState::Stopped(libc::WSTOPSIG(status))
        } else {
            ProcessState::Running
        }
    }

    /// Whether more wait statuses may be observed for the process
    #[must_use]
    pub const fn is_alive(self) -> bool {
        !matches!(self, ProcessState::Halted(_))
    }

    /// Whether the process is stopped
    #[must_use]
    pub const fn is_stopped(self) -> bool {
        matches!(self, ProcessState::Stopped(_))
    }

    /// Returns the conventional exit status for this state: the exit status
    /// for an exited process and 128 plus the signal number for a killed or
    /// stopped one.
    #[must_use]
    pub const fn to_exit_status(self) -> ExitStatus {
        match self {
            ProcessState::Pending | ProcessState::Running => ExitStatus::SUCCESS,
            ProcessState::Stopped(signal) => ExitStatus::from_signal(signal),
            ProcessState::Halted(ProcessResult::Exited(status)) => status,
            ProcessState::Halted(ProcessResult::Signaled { signal, .. }) => {
                ExitStatus::from_signal(signal)
            }
        }
    }
}

/// One simple command of a pipeline
///
/// The argument words are kept as parsed; they are expanded in the child
/// right before `exec` (or in the shell process for the no-fork built-in
/// path). The `pid` stays at zero until the command is forked and is
/// retained after the command is reaped so old pids can still be printed.
#[derive(Clone, Debug)]
pub struct Command {
    /// Raw argument words, unexpanded
    pub words: Vec<String>,
    /// Input redirection file
    pub stdin_file: Option<String>,
    /// Output redirection file and append flag
    pub stdout_file: Option<(String, bool)>,
    /// Error redirection file and append flag
    pub stderr_file: Option<(String, bool)>,
    /// Process ID, zero before the command is forked
    pub pid: Pid,
    /// Last observed process state
    pub state: ProcessState,
    /// Source text for status printing
    pub text: String,
}

impl Command {
    #[must_use]
    pub fn new(words: Vec<String>, text: String) -> Self {
        Command {
            words,
            stdin_file: None,
            stdout_file: None,
            stderr_file: None,
            pid: Pid::from_raw(0),
            state: ProcessState::Pending,
            text,
        }
    }

    /// Builds a command from its syntax tree form, folding the redirection
    /// list into the three redirection slots (the last one of each kind
    /// wins).
    #[must_use]
    pub fn from_syntax(command: &xdsh_syntax::syntax::SimpleCommand) -> Self {
        use xdsh_syntax::syntax::RedirOp;
        let mut result = Command::new(command.words.clone(), command.to_string());
        for redir in &command.redirs {
            let target = redir.target.clone();
            match redir.op {
                RedirOp::In => result.stdin_file = Some(target),
                RedirOp::Out => result.stdout_file = Some((target, false)),
                RedirOp::OutAppend => result.stdout_file = Some((target, true)),
                RedirOp::Err => result.stderr_file = Some((target, false)),
                RedirOp::ErrAppend => result.stderr_file = Some((target, true)),
                RedirOp::OutErr => {
                    result.stdout_file = Some((target.clone(), false));
                    result.stderr_file = Some((target, false));
                }
            }
        }
        result
    }
}

/// Set of processes executing a pipeline; the unit of job control
#[derive(Clone, Debug)]
pub struct Job {
    /// Commands of the pipeline, in order (at least one)
    pub commands: Vec<Command>,
    /// Whether the job was started asynchronously
    pub background: bool,
    /// Process group ID, zero until the first child is forked
    pub pgid: Pid,
    /// Number of commands that have been forked but not yet reaped
    pub unreaped_count: usize,
    /// Number of commands currently stopped
    pub stopped_count: usize,
    /// Last observed state of any command in the job
    pub last_state: ProcessState,
    /// Job ID assigned by [`JobSet::add`]; zero while unassigned
    pub id: usize,
    /// Time of the most recent state change or wait
    pub last_active: Instant,
    /// Whether a status change is waiting to be reported before the next
    /// prompt
    pub notify: bool,
    /// Terminal modes captured when the job last left the foreground
    pub saved_modes: Option<TerminalState>,
    /// Source text of the pipeline for status printing
    pub name: String,
}

impl Job {
    #[must_use]
    pub fn new(commands: Vec<Command>, background: bool, name: String) -> Self {
        Job {
            commands,
            background,
            pgid: Pid::from_raw(0),
            unreaped_count: 0,
            stopped_count: 0,
            last_state: ProcessState::Pending,
            id: 0,
            last_active: Instant::now(),
            notify: false,
            saved_modes: None,
            name,
        }
    }

    /// Builds a job from a parsed pipeline.
    ///
    /// The job name is the pipeline's source text without any trailing
    /// `&`; status reports append the `&` marker from the job's current
    /// background flag, which `fg` and `bg` flip after construction.
    #[must_use]
    pub fn from_pipeline(pipeline: &xdsh_syntax::syntax::Pipeline) -> Self {
        let commands: Vec<Command> =
            pipeline.commands.iter().map(Command::from_syntax).collect();
        let name = commands
            .iter()
            .map(|command| command.text.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        Job::new(commands, pipeline.background, name)
    }

    /// Whether any command of the job is unreaped
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.unreaped_count > 0
    }

    /// Whether every unreaped command of the job is stopped
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped_count > 0 && self.stopped_count == self.unreaped_count
    }

    /// Returns the index of the command with the given process ID.
    #[must_use]
    pub fn find_pid(&self, pid: Pid) -> Option<usize> {
        self.commands.iter().position(|command| command.pid == pid)
    }

    /// Refreshes the last-active time.
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// Applies one wait-status observation to the command at `index`.
    ///
    /// Updates the stopped and unreaped counters, the job's last state, and
    /// the last-active time.
    pub fn apply_state(&mut self, index: usize, state: ProcessState) {
        let command = &mut self.commands[index];
        let was_stopped = command.state.is_stopped();
        match state {
            ProcessState::Running if was_stopped => self.stopped_count -= 1,
            ProcessState::Stopped(_) if !was_stopped => self.stopped_count += 1,
            ProcessState::Halted(_) => {
                if was_stopped {
                    self.stopped_count -= 1;
                }
                self.unreaped_count = self.unreaped_count.saturating_sub(1);
            }
            _ => {}
        }
        command.state = state;
        self.last_state = state;
        self.touch();
    }

    /// Returns the conventional exit status of the job, reflecting the last
    /// observed state.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        self.last_state.to_exit_status()
    }
}

/// Collection of jobs
#[derive(Clone, Debug)]
pub struct JobSet {
    /// Jobs ordered by ascending job ID
    jobs: Vec<Job>,
    current_id: Option<usize>,
    previous_id: Option<usize>,
    /// Process ID of the most recently started asynchronous job
    last_async_pid: Pid,
}

impl Default for JobSet {
    fn default() -> Self {
        JobSet {
            jobs: Vec::new(),
            current_id: None,
            previous_id: None,
            last_async_pid: Pid::from_raw(0),
        }
    }
}

impl JobSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job, assigning it the next free job ID.
    ///
    /// The ID is one greater than the largest ID in the table, or 1 for an
    /// empty table, so IDs are strictly increasing among live jobs.
    pub fn add(&mut self, mut job: Job) -> usize {
        let id = self.jobs.iter().map(|job| job.id).max().unwrap_or(0) + 1;
        job.id = id;
        self.jobs.push(job);
        self.update_markers();
        id
    }

    /// Puts back a job that was temporarily removed, keeping its ID.
    pub fn restore(&mut self, job: Job) {
        let position = self
            .jobs
            .iter()
            .position(|other| other.id > job.id)
            .unwrap_or(self.jobs.len());
        self.jobs.insert(position, job);
        self.update_markers();
    }

    /// Removes and returns the job with the given ID.
    pub fn remove_with_id(&mut self, id: usize) -> Option<Job> {
        let position = self.jobs.iter().position(|job| job.id == id)?;
        let job = self.jobs.remove(position);
        self.update_markers();
        Some(job)
    }

    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns the job with the given ID.
    #[must_use]
    pub fn get_with_id(&self, id: usize) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn get_mut_with_id(&mut self, id: usize) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|job| job.id == id)
    }

    /// Returns the job that has a child process with the given PID.
    #[must_use]
    pub fn get_with_pid(&self, pid: Pid) -> Option<&Job> {
        self.jobs.iter().find(|job| job.find_pid(pid).is_some())
    }

    /// ID of the current job, marked `+` in reports
    #[must_use]
    pub fn current_job(&self) -> Option<usize> {
        self.current_id
    }

    /// ID of the previous job, marked `-` in reports
    #[must_use]
    pub fn previous_job(&self) -> Option<usize> {
        self.previous_id
    }

    /// Returns the report marker for the job with the given ID.
    #[must_use]
    pub fn marker_of(&self, id: usize) -> fmt::Marker {
        if self.current_id == Some(id) {
            fmt::Marker::CurrentJob
        } else if self.previous_id == Some(id) {
            fmt::Marker::PreviousJob
        } else {
            fmt::Marker::None
        }
    }

    /// Process ID of the most recently started asynchronous job (`$!`)
    #[must_use]
    pub fn last_async_pid(&self) -> Pid {
        self.last_async_pid
    }

    pub fn set_last_async_pid(&mut self, pid: Pid) {
        self.last_async_pid = pid;
    }

    /// Applies a wait-status observation to whatever job owns the PID.
    ///
    /// Sets the `notify` flag when the observation finished or stopped the
    /// job. Returns whether a job was found.
    pub fn apply_wait_status(&mut self, pid: Pid, state: ProcessState) -> bool {
        for job in &mut self.jobs {
            let Some(index) = job.find_pid(pid) else {
                continue;
            };
            let was_alive = job.is_alive();
            let was_stopped = job.is_stopped();
            job.apply_state(index, state);
            if (was_alive && !job.is_alive()) || (!was_stopped && job.is_stopped()) {
                job.notify = true;
            }
            return true;
        }
        false
    }

    /// Recomputes the current and previous job markers.
    ///
    /// The current job is the newest stopped job, or the newest alive job
    /// if none is stopped; "newest" compares the last-active time and then
    /// the job ID. The previous job is the next job under the same
    /// ordering.
    pub fn update_markers(&mut self) {
        let mut alive: Vec<&Job> = self.jobs.iter().filter(|job| job.is_alive()).collect();
        alive.sort_by_key(|job| (job.is_stopped(), job.last_active, job.id));
        self.current_id = alive.pop().map(|job| job.id);
        self.previous_id = alive.pop().map(|job| job.id);
    }

    /// Acknowledges every pending notification and drops finished jobs.
    ///
    /// The jobs built-in prints the whole table itself, which counts as
    /// reporting: afterwards nothing is left to notify and terminated jobs
    /// are gone.
    pub fn acknowledge_and_prune(&mut self) {
        for job in &mut self.jobs {
            job.notify = false;
        }
        self.jobs.retain(Job::is_alive);
        self.update_markers();
    }

    /// Performs the between-prompts refresh.
    ///
    /// Returns a report line for every job with a pending notification (in
    /// job-ID order), then drops the jobs that have fully terminated and
    /// recomputes the markers.
    pub fn refresh(&mut self) -> Vec<String> {
        self.update_markers();
        let (current, previous) = (self.current_id, self.previous_id);
        let mut lines = Vec::new();
        for job in &mut self.jobs {
            if job.notify {
                job.notify = false;
                let marker = if current == Some(job.id) {
                    fmt::Marker::CurrentJob
                } else if previous == Some(job.id) {
                    fmt::Marker::PreviousJob
                } else {
                    fmt::Marker::None
                };
                lines.push(fmt::Report { job, marker }.to_string());
            }
        }
        self.jobs.retain(Job::is_alive);
        self.update_markers();
        lines
    }
}

impl Env {
    /// Drains every pending child status change without blocking.
    ///
    /// This is the body of the `SIGCHLD` reaper: it runs in the main flow
    /// whenever the handler has recorded a delivery, and keeps the job
    /// table in sync with what the kernel has observed.
    pub fn poll_children(&mut self) {
        loop {
            let result = self.system.waitpid(
                Pid::from_raw(-1),
                libc::WNOHANG | libc::WUNTRACED | libc::WCONTINUED,
            );
            match result {
                Ok(Some((pid, status))) => {
                    let state = ProcessState::from_wait_status(status);
                    self.jobs.apply_wait_status(pid, state);
                }
                Ok(None) | Err(_) => break,
            }
        }
    }

    /// Waits synchronously until the job terminates or stops.
    ///
    /// The job is owned by the caller; foreground jobs are not in the job
    /// table while they run. Returns the conventional exit status of the
    /// job. In an interactive shell this also prints the customary blank
    /// line for a stop or the signal name for an abnormal termination.
    pub fn wait_for_job(&mut self, job: &mut Job) -> ExitStatus {
        while job.is_alive() && !job.is_stopped() {
            for index in 0..job.commands.len() {
                let command = &job.commands[index];
                if command.pid.as_raw() == 0 || !command.state.is_alive() {
                    continue;
                }
                let pid = command.pid;
                let state = match self
                    .system
                    .waitpid(pid, libc::WUNTRACED | libc::WCONTINUED)
                {
                    Ok(Some((_, status))) => ProcessState::from_wait_status(status),
                    Ok(None) => continue,
                    // The child is gone; record a generic failure.
                    Err(_) => ProcessState::Halted(ProcessResult::Exited(ExitStatus::FAILURE)),
                };
                job.apply_state(index, state);
            }
        }
        job.touch();

        if self.terminal.is_interactive {
            if job.is_stopped() {
                self.print_error("\n");
            } else if let ProcessState::Halted(ProcessResult::Signaled { signal, core_dump }) =
                job.last_state
            {
                if signal != libc::SIGINT {
                    let name = match crate::signal::name_of(signal) {
                        Some(name) => format!("SIG{name}"),
                        None => format!("signal {signal}"),
                    };
                    let suffix = if core_dump { " (core dumped)" } else { "" };
                    self.print_error(&format!("{name}{suffix}\n"));
                }
            }
        }

        job.exit_status()
    }

    /// Delivers a signal to every process of the job individually.
    pub fn kill_job(&mut self, job: &Job, signal: RawNumber) -> Result<(), Errno> {
        let mut result = Ok(());
        for command in &job.commands {
            if command.pid.as_raw() != 0 && command.state.is_alive() {
                if let Err(error) = self.system.kill(command.pid, signal) {
                    result = Err(error);
                }
            }
        }
        result
    }

    /// Prints pending job notifications and prunes finished jobs.
    ///
    /// Called once per prompt cycle. The job table reflects every
    /// `SIGCHLD` delivered so far once this returns.
    pub fn refresh_jobs(&mut self) {
        self.sigchld_block();
        if crate::trap::take_sigchld() {
            self.poll_children();
        }
        let lines = self.jobs.refresh();
        self.sigchld_unblock();
        if self.terminal.is_interactive {
            for line in lines {
                self.print_error(&format!("{line}\n"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn dummy_job(command_count: usize, name: &str) -> Job {
        let commands = (0..command_count)
            .map(|index| {
                let mut command =
                    Command::new(vec![format!("cmd{index}")], format!("cmd{index}"));
                command.pid = Pid::from_raw(100 + index as i32);
                command.state = ProcessState::Running;
                command
            })
            .collect();
        let mut job = Job::new(commands, false, name.to_string());
        job.unreaped_count = command_count;
        job
    }

    #[test]
    fn process_state_from_wait_status() {
        // Construct raw statuses the way the kernel encodes them.
        let exited_0 = 0x0000;
        let exited_42 = 42 << 8;
        let killed_term = libc::SIGTERM;
        let stopped_tstp = (libc::SIGTSTP << 8) | 0x7f;

        assert_eq!(
            ProcessState::from_wait_status(exited_0),
            ProcessState::Halted(ProcessResult::Exited(ExitStatus(0)))
        );
        assert_eq!(
            ProcessState::from_wait_status(exited_42),
            ProcessState::Halted(ProcessResult::Exited(ExitStatus(42)))
        );
        assert_eq!(
            ProcessState::from_wait_status(killed_term),
            ProcessState::Halted(ProcessResult::Signaled {
                signal: libc::SIGTERM,
                core_dump: false
            })
        );
        assert_eq!(
            ProcessState::from_wait_status(stopped_tstp),
            ProcessState::Stopped(libc::SIGTSTP)
        );
    }

    #[test]
    fn conventional_exit_statuses() {
        assert_eq!(
            ProcessState::Halted(ProcessResult::Exited(ExitStatus(3))).to_exit_status(),
            ExitStatus(3)
        );
        assert_eq!(
            ProcessState::Halted(ProcessResult::Signaled {
                signal: libc::SIGKILL,
                core_dump: false
            })
            .to_exit_status(),
            ExitStatus(128 + libc::SIGKILL)
        );
        assert_eq!(
            ProcessState::Stopped(libc::SIGTSTP).to_exit_status(),
            ExitStatus(128 + libc::SIGTSTP)
        );
    }

    #[test]
    fn job_name_carries_no_background_marker() {
        use xdsh_syntax::alias::EmptyGlossary;
        let pipeline = xdsh_syntax::parse_line("sleep 30 &", &EmptyGlossary)
            .unwrap()
            .remove(0);
        let job = Job::from_pipeline(&pipeline);
        assert!(job.background);
        assert_eq!(job.name, "sleep 30");

        let pipeline = xdsh_syntax::parse_line("echo hi | tr a-z A-Z", &EmptyGlossary)
            .unwrap()
            .remove(0);
        let job = Job::from_pipeline(&pipeline);
        assert!(!job.background);
        assert_eq!(job.name, "echo hi | tr a-z A-Z");
    }

    #[test]
    fn command_from_syntax_folds_redirections() {
        use xdsh_syntax::syntax::{Redir, RedirOp, SimpleCommand};
        let command = SimpleCommand {
            words: vec!["cmd".to_string()],
            redirs: vec![
                Redir {
                    op: RedirOp::Out,
                    target: "first".to_string(),
                },
                Redir {
                    op: RedirOp::OutAppend,
                    target: "second".to_string(),
                },
                Redir {
                    op: RedirOp::In,
                    target: "input".to_string(),
                },
            ],
        };
        let command = Command::from_syntax(&command);
        assert_eq!(command.stdout_file, Some(("second".to_string(), true)));
        assert_eq!(command.stdin_file, Some("input".to_string()));
        assert_eq!(command.stderr_file, None);
    }

    #[test]
    fn out_err_redirection_sets_both_slots() {
        use xdsh_syntax::syntax::{Redir, RedirOp, SimpleCommand};
        let command = SimpleCommand {
            words: vec!["cmd".to_string()],
            redirs: vec![Redir {
                op: RedirOp::OutErr,
                target: "all".to_string(),
            }],
        };
        let command = Command::from_syntax(&command);
        assert_eq!(command.stdout_file, Some(("all".to_string(), false)));
        assert_eq!(command.stderr_file, Some(("all".to_string(), false)));
    }

    #[test]
    fn counters_follow_stop_continue_exit() {
        let mut job = dummy_job(2, "a | b");
        assert!(job.is_alive());
        assert!(!job.is_stopped());

        job.apply_state(0, ProcessState::Stopped(libc::SIGTSTP));
        assert_eq!((job.stopped_count, job.unreaped_count), (1, 2));
        assert!(!job.is_stopped());

        job.apply_state(1, ProcessState::Stopped(libc::SIGTSTP));
        assert_eq!((job.stopped_count, job.unreaped_count), (2, 2));
        assert!(job.is_stopped());

        job.apply_state(0, ProcessState::Running);
        assert_eq!((job.stopped_count, job.unreaped_count), (1, 2));

        job.apply_state(0, ProcessState::Halted(ProcessResult::Exited(ExitStatus(0))));
        assert_eq!((job.stopped_count, job.unreaped_count), (1, 1));

        // Exiting while stopped also releases the stopped counter.
        job.apply_state(1, ProcessState::Halted(ProcessResult::Exited(ExitStatus(1))));
        assert_eq!((job.stopped_count, job.unreaped_count), (0, 0));
        assert!(!job.is_alive());
    }

    #[test]
    fn counter_invariant_holds_under_repeated_observations() {
        let mut job = dummy_job(3, "x | y | z");
        let observations = [
            (0, ProcessState::Stopped(libc::SIGSTOP)),
            (0, ProcessState::Stopped(libc::SIGTSTP)),
            (0, ProcessState::Running),
            (0, ProcessState::Running),
            (1, ProcessState::Stopped(libc::SIGTTIN)),
            (2, ProcessState::Halted(ProcessResult::Exited(ExitStatus(0)))),
            (0, ProcessState::Halted(ProcessResult::Signaled {
                signal: libc::SIGKILL,
                core_dump: false,
            })),
            (1, ProcessState::Halted(ProcessResult::Exited(ExitStatus(9)))),
        ];
        for (index, state) in observations {
            job.apply_state(index, state);
            assert!(job.stopped_count <= job.unreaped_count);
            assert!(job.unreaped_count <= job.commands.len());
        }
        assert!(!job.is_alive());
    }

    #[test]
    fn job_ids_are_strictly_increasing() {
        let mut set = JobSet::new();
        assert_eq!(set.add(dummy_job(1, "one")), 1);
        assert_eq!(set.add(dummy_job(1, "two")), 2);
        assert_eq!(set.add(dummy_job(1, "three")), 3);

        // Removing an inner job does not free its ID for reuse.
        set.remove_with_id(3);
        assert_eq!(set.add(dummy_job(1, "four")), 3);
        set.remove_with_id(1);
        assert_eq!(set.add(dummy_job(1, "five")), 4);
    }

    #[test]
    fn lookup_by_pid() {
        let mut set = JobSet::new();
        set.add(dummy_job(2, "a | b"));
        set.add(dummy_job(1, "c"));
        let job = set.get_with_pid(Pid::from_raw(101)).unwrap();
        assert_eq!(job.name, "a | b");
        assert!(set.get_with_pid(Pid::from_raw(999)).is_none());
    }

    #[test]
    fn current_job_prefers_the_newest_stopped_job() {
        let mut set = JobSet::new();
        let first = set.add(dummy_job(1, "first"));
        let second = set.add(dummy_job(1, "second"));
        let third = set.add(dummy_job(1, "third"));

        // All running: the newest job is current.
        assert_eq!(set.current_job(), Some(third));

        // A stopped job takes priority over newer running jobs.
        set.get_mut_with_id(first)
            .unwrap()
            .apply_state(0, ProcessState::Stopped(libc::SIGTSTP));
        set.update_markers();
        assert_eq!(set.current_job(), Some(first));
        assert_eq!(set.previous_job(), Some(third));
        assert_eq!(set.marker_of(second), fmt::Marker::None);
    }

    #[test]
    fn apply_state_alone_does_not_notify() {
        let mut set = JobSet::new();
        let done = set.add(dummy_job(1, "finished"));
        set.get_mut_with_id(done)
            .unwrap()
            .apply_state(0, ProcessState::Halted(ProcessResult::Exited(ExitStatus(0))));
        assert!(!set.get_with_id(done).unwrap().notify);
    }

    #[test]
    fn refresh_reports_and_prunes() {
        let mut set = JobSet::new();
        let done = set.add(dummy_job(1, "finished"));
        set.add(dummy_job(1, "running"));
        assert!(set.apply_wait_status(
            Pid::from_raw(100),
            ProcessState::Halted(ProcessResult::Exited(ExitStatus(0)))
        ));
        assert!(set.get_with_id(done).unwrap().notify);

        let lines = set.refresh();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Done"), "{lines:?}");
        assert!(set.get_with_id(done).is_none());
        assert_eq!(set.jobs().len(), 1);

        // A second refresh reports nothing.
        assert_eq!(set.refresh(), Vec::<String>::new());
    }

    #[test]
    fn refresh_keeps_markers_on_live_jobs() {
        let mut set = JobSet::new();
        let first = set.add(dummy_job(1, "first"));
        let second = set.add(dummy_job(1, "second"));
        set.apply_wait_status(
            Pid::from_raw(100),
            ProcessState::Halted(ProcessResult::Exited(ExitStatus(0))),
        );
        let _ = first;
        set.refresh();
        assert_eq!(set.current_job(), Some(second));
        assert_eq!(set.previous_job(), None);
    }

    #[test]
    fn apply_wait_status_notifies_on_stop() {
        let mut set = JobSet::new();
        let id = set.add(dummy_job(2, "a | b"));
        set.apply_wait_status(Pid::from_raw(100), ProcessState::Stopped(libc::SIGTSTP));
        assert!(!set.get_with_id(id).unwrap().notify);
        set.apply_wait_status(Pid::from_raw(101), ProcessState::Stopped(libc::SIGTSTP));
        assert!(set.get_with_id(id).unwrap().notify);
    }

    #[test]
    fn restore_keeps_id_order() {
        let mut set = JobSet::new();
        let first = set.add(dummy_job(1, "first"));
        let second = set.add(dummy_job(1, "second"));
        let job = set.remove_with_id(first).unwrap();
        set.restore(job);
        let ids: Vec<usize> = set.jobs().iter().map(|job| job.id).collect();
        assert_eq!(ids, [first, second]);
    }
}
