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

//! Job report formatting
//!
//! Status lines have the form
//!
//! ```text
//! [1]+  Running                                    sleep 30 &
//! ```
//!
//! with the status field padded to 42 columns. The format is used both by
//! the jobs built-in and by the automatic status reports printed between
//! prompts. The alternate (`{:#}`) form inserts the process ID after the
//! marker, and [`Report::detailed`] produces the one-line-per-command form
//! of `jobs -l`.

use super::{Job, ProcessResult, ProcessState};
use crate::signal::name_of;
use std::fmt::{Display, Formatter, Write as _};

/// Width of the status field in a report line
const STATUS_WIDTH: usize = 42;

/// Formats a process state into the status field text.
///
/// The results are `Running`, `Stopped`, `Done`, `Exit n` for a non-zero
/// exit status, or the signal name optionally followed by
/// `(core dumped)`.
#[must_use]
pub fn status_field(state: ProcessState) -> String {
    match state {
        ProcessState::Pending | ProcessState::Running => "Running".to_string(),
        ProcessState::Stopped(_) => "Stopped".to_string(),
        ProcessState::Halted(ProcessResult::Exited(status)) => {
            if status.is_successful() {
                "Done".to_string()
            } else {
                format!("Exit {status}")
            }
        }
        ProcessState::Halted(ProcessResult::Signaled { signal, core_dump }) => {
            let mut text = match name_of(signal) {
                Some(name) => format!("SIG{name}"),
                None => format!("Signal {signal}"),
            };
            if core_dump {
                text.push_str(" (core dumped)");
            }
            text
        }
    }
}

/// Type of the marker indicating the current and previous job
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Marker {
    None,
    CurrentJob,
    PreviousJob,
}

impl Marker {
    /// Returns `' '`, `'+'`, or `'-'`.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Marker::None => ' ',
            Marker::CurrentJob => '+',
            Marker::PreviousJob => '-',
        }
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Wrapper for formatting a job status report
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    /// Job to be reported
    pub job: &'a Job,
    /// Marker indicating the current and previous job
    pub marker: Marker,
}

impl Report<'_> {
    /// Formats the one-line-per-command report used by `jobs -l`.
    ///
    /// Each line shows the process ID, the state of that process, and the
    /// source text of the command; the first line is prefixed with the job
    /// ID and marker.
    #[must_use]
    pub fn detailed(&self) -> String {
        let mut result = String::new();
        for (index, command) in self.job.commands.iter().enumerate() {
            let status = status_field(command.state);
            if index == 0 {
                let _ = write!(
                    result,
                    "[{}]{}  {:>5} {:<STATUS_WIDTH$} {}",
                    self.job.id,
                    self.marker,
                    command.pid.as_raw(),
                    status,
                    command.text,
                );
            } else {
                let _ = write!(
                    result,
                    "\n      {:>5} {:<STATUS_WIDTH$} {}",
                    command.pid.as_raw(),
                    status,
                    command.text,
                );
            }
        }
        result
    }
}

/// Formats a job status report.
///
/// The alternate flag (`{:#}`) inserts the process group ID after the
/// marker. The trailing `&` reflects the job's current background flag,
/// which `fg` and `bg` may have changed since the job was parsed.
impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = self.job.id;
        let marker = self.marker;
        let status = status_field(self.job.last_state);
        let name = &self.job.name;
        let ampersand = if self.job.background { " &" } else { "" };
        if f.alternate() {
            let pid = self.job.pgid.as_raw();
            write!(
                f,
                "[{id}]{marker}  {pid:>5} {status:<STATUS_WIDTH$} {name}{ampersand}"
            )
        } else {
            write!(f, "[{id}]{marker}  {status:<STATUS_WIDTH$} {name}{ampersand}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Command, Pid};
    use super::*;
    use crate::semantics::ExitStatus;

    fn sample_job() -> Job {
        let mut command = Command::new(vec!["sleep".to_string(), "30".to_string()], "sleep 30".to_string());
        command.pid = Pid::from_raw(123);
        command.state = ProcessState::Running;
        let mut job = Job::new(vec![command], true, "sleep 30".to_string());
        job.id = 1;
        job.unreaped_count = 1;
        job.pgid = Pid::from_raw(123);
        job
    }

    #[test]
    fn status_field_texts() {
        assert_eq!(status_field(ProcessState::Running), "Running");
        assert_eq!(status_field(ProcessState::Pending), "Running");
        assert_eq!(status_field(ProcessState::Stopped(libc::SIGTSTP)), "Stopped");
        assert_eq!(
            status_field(ProcessState::Halted(ProcessResult::Exited(ExitStatus(0)))),
            "Done"
        );
        assert_eq!(
            status_field(ProcessState::Halted(ProcessResult::Exited(ExitStatus(2)))),
            "Exit 2"
        );
        assert_eq!(
            status_field(ProcessState::Halted(ProcessResult::Signaled {
                signal: libc::SIGKILL,
                core_dump: false
            })),
            "SIGKILL"
        );
        assert_eq!(
            status_field(ProcessState::Halted(ProcessResult::Signaled {
                signal: libc::SIGQUIT,
                core_dump: true
            })),
            "SIGQUIT (core dumped)"
        );
    }

    #[test]
    fn report_standard() {
        let job = sample_job();
        let report = Report {
            job: &job,
            marker: Marker::CurrentJob,
        };
        assert_eq!(
            report.to_string(),
            "[1]+  Running                                    sleep 30 &"
        );
    }

    #[test]
    fn report_markers() {
        let mut job = sample_job();
        job.apply_state(0, ProcessState::Stopped(libc::SIGTSTP));
        job.background = false;
        job.name = "cat".to_string();
        let report = Report {
            job: &job,
            marker: Marker::CurrentJob,
        };
        assert_eq!(
            report.to_string(),
            "[1]+  Stopped                                    cat"
        );

        let report = Report {
            job: &job,
            marker: Marker::PreviousJob,
        };
        assert!(report.to_string().starts_with("[1]-  "));

        let report = Report {
            job: &job,
            marker: Marker::None,
        };
        assert!(report.to_string().starts_with("[1]   "));
    }

    #[test]
    fn ampersand_follows_the_current_background_flag() {
        let mut job = sample_job();
        let report = Report {
            job: &job,
            marker: Marker::CurrentJob,
        };
        assert!(report.to_string().ends_with("sleep 30 &"));

        // Brought to the foreground: the marker disappears.
        job.background = false;
        let report = Report {
            job: &job,
            marker: Marker::CurrentJob,
        };
        assert!(report.to_string().ends_with("sleep 30"));
        assert!(!report.to_string().ends_with("&"));

        // And a job resumed in the background gains it, name untouched.
        job.background = true;
        let report = Report {
            job: &job,
            marker: Marker::CurrentJob,
        };
        assert!(report.to_string().ends_with("sleep 30 &"));
        assert_eq!(job.name, "sleep 30");
    }

    #[test]
    fn report_alternate_includes_pgid() {
        let job = sample_job();
        let report = Report {
            job: &job,
            marker: Marker::CurrentJob,
        };
        assert_eq!(
            format!("{report:#}"),
            "[1]+    123 Running                                    sleep 30 &"
        );
    }

    #[test]
    fn detailed_report_lists_every_command() {
        let mut job = sample_job();
        let mut second = Command::new(vec!["tr".to_string()], "tr a-z A-Z".to_string());
        second.pid = Pid::from_raw(124);
        second.state = ProcessState::Stopped(libc::SIGTSTP);
        job.commands.push(second);
        job.unreaped_count = 2;

        let report = Report {
            job: &job,
            marker: Marker::CurrentJob,
        };
        let detailed = report.detailed();
        let lines: Vec<&str> = detailed.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[1]+    123 Running"), "{detailed}");
        assert!(lines[1].starts_with("        124 Stopped"), "{detailed}");
        assert!(lines[0].ends_with("sleep 30"));
        assert!(lines[1].ends_with("tr a-z A-Z"));
    }
}
