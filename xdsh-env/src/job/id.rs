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

//! Jobspec parsing
//!
//! A jobspec is a textual reference to a job in the job table:
//!
//! - `%%` and `%+` denote the current job.
//! - `%-` denotes the previous job.
//! - `%n` (where `n` is a positive integer) denotes the job with ID `n`.
//!
//! Parse a jobspec with [`parse`] and resolve it against a [`JobSet`] with
//! [`JobId::find`].

use super::JobSet;
use std::fmt::{Display, Formatter};
use std::num::NonZeroUsize;
use thiserror::Error;

/// Result of parsing a jobspec
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobId {
    /// The current job (`%%` or `%+`)
    CurrentJob,
    /// The previous job (`%-`)
    PreviousJob,
    /// The job with a specific ID (`%n`)
    JobNumber(NonZeroUsize),
}

/// Defines `CurrentJob` as the default jobspec.
impl Default for JobId {
    fn default() -> Self {
        JobId::CurrentJob
    }
}

/// Converts a jobspec back to its string form.
///
/// `CurrentJob` is rendered `"%+"` rather than `"%%"`.
impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            JobId::CurrentJob => write!(f, "%+"),
            JobId::PreviousJob => write!(f, "%-"),
            JobId::JobNumber(number) => write!(f, "%{number}"),
        }
    }
}

/// Error that may occur in jobspec [parsing](parse)
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("not a valid job ID")]
pub struct ParseError;

/// Parses a jobspec.
///
/// The string must start with a `%`.
pub fn parse(job_id: &str) -> Result<JobId, ParseError> {
    let tail = job_id.strip_prefix('%').ok_or(ParseError)?;
    match tail {
        "%" | "+" => Ok(JobId::CurrentJob),
        "-" => Ok(JobId::PreviousJob),
        _ => match tail.parse::<NonZeroUsize>() {
            Ok(number) => Ok(JobId::JobNumber(number)),
            Err(_) => Err(ParseError),
        },
    }
}

/// Error that may occur in [`JobId::find`]
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum FindError {
    /// There is no job that matches the jobspec.
    #[error("no such job")]
    NotFound,
}

impl JobId {
    /// Returns the ID of the job this jobspec resolves to.
    pub fn find(&self, jobs: &JobSet) -> Result<usize, FindError> {
        match *self {
            JobId::CurrentJob => jobs.current_job().ok_or(FindError::NotFound),
            JobId::PreviousJob => jobs.previous_job().ok_or(FindError::NotFound),
            JobId::JobNumber(number) => {
                let id = number.get();
                match jobs.get_with_id(id) {
                    Some(_) => Ok(id),
                    None => Err(FindError::NotFound),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::dummy_job;
    use super::*;

    #[test]
    fn parsing_jobspecs() {
        assert_eq!(parse("%%"), Ok(JobId::CurrentJob));
        assert_eq!(parse("%+"), Ok(JobId::CurrentJob));
        assert_eq!(parse("%-"), Ok(JobId::PreviousJob));
        assert_eq!(
            parse("%1"),
            Ok(JobId::JobNumber(NonZeroUsize::new(1).unwrap()))
        );
        assert_eq!(
            parse("%42"),
            Ok(JobId::JobNumber(NonZeroUsize::new(42).unwrap()))
        );

        assert_eq!(parse(""), Err(ParseError));
        assert_eq!(parse("1"), Err(ParseError));
        assert_eq!(parse("%0"), Err(ParseError));
        assert_eq!(parse("%x"), Err(ParseError));
    }

    #[test]
    fn job_id_display() {
        assert_eq!(JobId::CurrentJob.to_string(), "%+");
        assert_eq!(JobId::PreviousJob.to_string(), "%-");
        assert_eq!(
            JobId::JobNumber(NonZeroUsize::new(7).unwrap()).to_string(),
            "%7"
        );
    }

    #[test]
    fn find_current_and_previous() {
        let mut set = JobSet::new();
        let first = set.add(dummy_job(1, "first"));
        let second = set.add(dummy_job(1, "second"));

        assert_eq!(JobId::CurrentJob.find(&set), Ok(second));
        assert_eq!(JobId::PreviousJob.find(&set), Ok(first));
    }

    #[test]
    fn find_by_number() {
        let mut set = JobSet::new();
        let id = set.add(dummy_job(1, "only"));
        let spec = JobId::JobNumber(NonZeroUsize::new(id).unwrap());
        assert_eq!(spec.find(&set), Ok(id));

        let missing = JobId::JobNumber(NonZeroUsize::new(9).unwrap());
        assert_eq!(missing.find(&set), Err(FindError::NotFound));
    }

    #[test]
    fn find_in_empty_set() {
        let set = JobSet::new();
        assert_eq!(JobId::CurrentJob.find(&set), Err(FindError::NotFound));
        assert_eq!(JobId::PreviousJob.find(&set), Err(FindError::NotFound));
    }
}
