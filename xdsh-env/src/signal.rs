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

//! Signal names and numbers
//!
//! This module provides the bidirectional mapping between signal names and
//! signal numbers, including the real-time signals `RTMIN`, `RTMIN+n`,
//! `RTMAX-n` and `RTMAX`.
//!
//! All proper signal names start with `"SIG"`. The names defined, parsed,
//! and displayed in this module do not include the `"SIG"` prefix; the
//! user-facing [`number_of`] function accepts the prefix case-insensitively.

use std::borrow::Cow;
use std::ffi::c_int;
use std::ops::RangeInclusive;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;

/// Raw signal number
///
/// POSIX requires valid signal numbers to be positive `c_int` values.
pub type RawNumber = c_int;

/// Signal name
///
/// This enum identifies a signal by its name, regardless of the number the
/// underlying system assigns to it. Use [`Name::to_raw`] and [`name_of`] to
/// convert between names and numbers.
#[derive(Clone, Copy, Debug, EnumIter, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Name {
    /// `SIGABRT` (process abort signal)
    Abrt,
    /// `SIGALRM` (alarm clock)
    Alrm,
    /// `SIGBUS` (access to an undefined portion of a memory object)
    Bus,
    /// `SIGCHLD` (child process terminated, stopped, or continued)
    Chld,
    /// `SIGCONT` (continue executing, if stopped)
    Cont,
    /// `SIGFPE` (erroneous arithmetic operation)
    Fpe,
    /// `SIGHUP` (hangup)
    Hup,
    /// `SIGILL` (illegal instruction)
    Ill,
    /// `SIGINT` (interrupt)
    Int,
    /// `SIGIO` (I/O is possible on a file descriptor)
    Io,
    /// `SIGIOT` (I/O trap, same number as `SIGABRT`)
    Iot,
    /// `SIGKILL` (kill)
    Kill,
    /// `SIGPIPE` (write on a pipe with no one to read it)
    Pipe,
    /// `SIGPOLL` (pollable event)
    Poll,
    /// `SIGPROF` (profiling timer expired)
    Prof,
    /// `SIGPWR` (power failure)
    Pwr,
    /// `SIGQUIT` (quit)
    Quit,
    /// `SIGSEGV` (invalid memory reference)
    Segv,
    /// `SIGSTKFLT` (stack fault)
    Stkflt,
    /// `SIGSTOP` (stop executing)
    Stop,
    /// `SIGSYS` (bad system call)
    Sys,
    /// `SIGTERM` (termination)
    Term,
    /// `SIGTRAP` (trace trap)
    Trap,
    /// `SIGTSTP` (stop executing from the keyboard)
    Tstp,
    /// `SIGTTIN` (background process attempting read)
    Ttin,
    /// `SIGTTOU` (background process attempting write)
    Ttou,
    /// `SIGURG` (high bandwidth data is available at a socket)
    Urg,
    /// `SIGUSR1` (user-defined signal 1)
    Usr1,
    /// `SIGUSR2` (user-defined signal 2)
    Usr2,
    /// `SIGVTALRM` (virtual timer expired)
    Vtalrm,
    /// `SIGWINCH` (window size change)
    Winch,
    /// `SIGXCPU` (CPU time limit exceeded)
    Xcpu,
    /// `SIGXFSZ` (file size limit exceeded)
    Xfsz,

    /// Real-time signal `SIGRTMIN + n`
    ///
    /// `n` is expected to be between `0` and `SIGRTMAX - SIGRTMIN`.
    Rtmin(RawNumber),

    /// Real-time signal `SIGRTMAX + n`
    ///
    /// `n` is expected to be between `SIGRTMIN - SIGRTMAX` and `0`.
    Rtmax(RawNumber),
}

/// Returns the range of real-time signals supported by the system.
#[must_use]
pub fn rt_range() -> Option<RangeInclusive<RawNumber>> {
    #[cfg(any(target_os = "android", target_os = "linux"))]
    return Some(libc::SIGRTMIN()..=libc::SIGRTMAX());

    #[allow(unreachable_code)]
    None
}

impl Name {
    /// Returns an iterator over all signal names.
    ///
    /// The iterator yields all names other than `Rtmin` and `Rtmax` in
    /// alphabetical order, followed by `Rtmin(0)` and `Rtmax(0)`.
    #[inline(always)]
    pub fn iter() -> NameIter {
        <Self as IntoEnumIterator>::iter()
    }

    /// Whether this name denotes a real-time signal
    #[must_use]
    pub const fn is_real_time(self) -> bool {
        matches!(self, Self::Rtmin(_) | Self::Rtmax(_))
    }

    /// Returns the name as a string, without the `"SIG"` prefix.
    ///
    /// Examples of the returned strings are `"TERM"`, `"RTMIN"`, and
    /// `"RTMAX-5"`. The result can be converted back with the [`FromStr`]
    /// implementation.
    #[must_use]
    pub fn as_string(&self) -> Cow<'static, str> {
        match *self {
            Self::Abrt => Cow::Borrowed("ABRT"),
            Self::Alrm => Cow::Borrowed("ALRM"),
            Self::Bus => Cow::Borrowed("BUS"),
            Self::Chld => Cow::Borrowed("CHLD"),
            Self::Cont => Cow::Borrowed("CONT"),
            Self::Fpe => Cow::Borrowed("FPE"),
            Self::Hup => Cow::Borrowed("HUP"),
            Self::Ill => Cow::Borrowed("ILL"),
            Self::Int => Cow::Borrowed("INT"),
            Self::Io => Cow::Borrowed("IO"),
            Self::Iot => Cow::Borrowed("IOT"),
            Self::Kill => Cow::Borrowed("KILL"),
            Self::Pipe => Cow::Borrowed("PIPE"),
            Self::Poll => Cow::Borrowed("POLL"),
            Self::Prof => Cow::Borrowed("PROF"),
            Self::Pwr => Cow::Borrowed("PWR"),
            Self::Quit => Cow::Borrowed("QUIT"),
            Self::Segv => Cow::Borrowed("SEGV"),
            Self::Stkflt => Cow::Borrowed("STKFLT"),
            Self::Stop => Cow::Borrowed("STOP"),
            Self::Sys => Cow::Borrowed("SYS"),
            Self::Term => Cow::Borrowed("TERM"),
            Self::Trap => Cow::Borrowed("TRAP"),
            Self::Tstp => Cow::Borrowed("TSTP"),
            Self::Ttin => Cow::Borrowed("TTIN"),
            Self::Ttou => Cow::Borrowed("TTOU"),
            Self::Urg => Cow::Borrowed("URG"),
            Self::Usr1 => Cow::Borrowed("USR1"),
            Self::Usr2 => Cow::Borrowed("USR2"),
            Self::Vtalrm => Cow::Borrowed("VTALRM"),
            Self::Winch => Cow::Borrowed("WINCH"),
            Self::Xcpu => Cow::Borrowed("XCPU"),
            Self::Xfsz => Cow::Borrowed("XFSZ"),
            Self::Rtmin(0) => Cow::Borrowed("RTMIN"),
            Self::Rtmax(0) => Cow::Borrowed("RTMAX"),
            Self::Rtmin(n) => Cow::Owned(format!("RTMIN{n:+}")),
            Self::Rtmax(n) => Cow::Owned(format!("RTMAX{n:+}")),
        }
    }

    /// Returns the signal number for this name on the current system.
    ///
    /// The result is `None` for signals the system does not define and for
    /// real-time names outside the supported range.
    #[must_use]
    pub fn to_raw(self) -> Option<RawNumber> {
        match self {
            Self::Abrt => Some(libc::SIGABRT),
            Self::Alrm => Some(libc::SIGALRM),
            Self::Bus => Some(libc::SIGBUS),
            Self::Chld => Some(libc::SIGCHLD),
            Self::Cont => Some(libc::SIGCONT),
            Self::Fpe => Some(libc::SIGFPE),
            Self::Hup => Some(libc::SIGHUP),
            Self::Ill => Some(libc::SIGILL),
            Self::Int => Some(libc::SIGINT),
            Self::Io => Some(libc::SIGIO),
            Self::Iot => Some(libc::SIGIOT),
            Self::Kill => Some(libc::SIGKILL),
            Self::Pipe => Some(libc::SIGPIPE),
            #[cfg(any(target_os = "android", target_os = "linux"))]
            Self::Poll => Some(libc::SIGPOLL),
            #[cfg(not(any(target_os = "android", target_os = "linux")))]
            Self::Poll => None,
            Self::Prof => Some(libc::SIGPROF),
            #[cfg(any(target_os = "android", target_os = "linux"))]
            Self::Pwr => Some(libc::SIGPWR),
            #[cfg(not(any(target_os = "android", target_os = "linux")))]
            Self::Pwr => None,
            Self::Quit => Some(libc::SIGQUIT),
            Self::Segv => Some(libc::SIGSEGV),
            #[cfg(any(target_os = "android", target_os = "linux"))]
            Self::Stkflt => Some(libc::SIGSTKFLT),
            #[cfg(not(any(target_os = "android", target_os = "linux")))]
            Self::Stkflt => None,
            Self::Stop => Some(libc::SIGSTOP),
            Self::Sys => Some(libc::SIGSYS),
            Self::Term => Some(libc::SIGTERM),
            Self::Trap => Some(libc::SIGTRAP),
            Self::Tstp => Some(libc::SIGTSTP),
            Self::Ttin => Some(libc::SIGTTIN),
            Self::Ttou => Some(libc::SIGTTOU),
            Self::Urg => Some(libc::SIGURG),
            Self::Usr1 => Some(libc::SIGUSR1),
            Self::Usr2 => Some(libc::SIGUSR2),
            Self::Vtalrm => Some(libc::SIGVTALRM),
            Self::Winch => Some(libc::SIGWINCH),
            Self::Xcpu => Some(libc::SIGXCPU),
            Self::Xfsz => Some(libc::SIGXFSZ),
            Self::Rtmin(n) => {
                let range = rt_range()?;
                let number = range.start().checked_add(n)?;
                range.contains(&number).then_some(number)
            }
            Self::Rtmax(n) => {
                let range = rt_range()?;
                let number = range.end().checked_add(n)?;
                range.contains(&number).then_some(number)
            }
        }
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// Error value for an unknown signal name
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("unknown signal name")]
pub struct UnknownNameError;

/// Parses a signal name from a string.
///
/// The input is expected to be an uppercase signal name without the `"SIG"`
/// prefix, as produced by [`Name::as_string`]. See [`number_of`] for the
/// lenient user-facing parser.
impl FromStr for Name {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, UnknownNameError> {
        match s {
            "ABRT" => Ok(Self::Abrt),
            "ALRM" => Ok(Self::Alrm),
            "BUS" => Ok(Self::Bus),
            "CHLD" => Ok(Self::Chld),
            "CONT" => Ok(Self::Cont),
            "FPE" => Ok(Self::Fpe),
            "HUP" => Ok(Self::Hup),
            "ILL" => Ok(Self::Ill),
            "INT" => Ok(Self::Int),
            "IO" => Ok(Self::Io),
            "IOT" => Ok(Self::Iot),
            "KILL" => Ok(Self::Kill),
            "PIPE" => Ok(Self::Pipe),
            "POLL" => Ok(Self::Poll),
            "PROF" => Ok(Self::Prof),
            "PWR" => Ok(Self::Pwr),
            "QUIT" => Ok(Self::Quit),
            "SEGV" => Ok(Self::Segv),
            "STKFLT" => Ok(Self::Stkflt),
            "STOP" => Ok(Self::Stop),
            "SYS" => Ok(Self::Sys),
            "TERM" => Ok(Self::Term),
            "TRAP" => Ok(Self::Trap),
            "TSTP" => Ok(Self::Tstp),
            "TTIN" => Ok(Self::Ttin),
            "TTOU" => Ok(Self::Ttou),
            "URG" => Ok(Self::Urg),
            "USR1" => Ok(Self::Usr1),
            "USR2" => Ok(Self::Usr2),
            "VTALRM" => Ok(Self::Vtalrm),
            "WINCH" => Ok(Self::Winch),
            "XCPU" => Ok(Self::Xcpu),
            "XFSZ" => Ok(Self::Xfsz),
            "RTMIN" => Ok(Self::Rtmin(0)),
            "RTMAX" => Ok(Self::Rtmax(0)),
            _ => {
                if let Some(tail) = s.strip_prefix("RTMIN") {
                    if tail.starts_with(['+', '-']) {
                        if let Ok(n) = tail.parse() {
                            return Ok(Self::Rtmin(n));
                        }
                    }
                }
                if let Some(tail) = s.strip_prefix("RTMAX") {
                    if tail.starts_with(['+', '-']) {
                        if let Ok(n) = tail.parse() {
                            return Ok(Self::Rtmax(n));
                        }
                    }
                }
                Err(UnknownNameError)
            }
        }
    }
}

/// Returns the name of a signal number, if the number is defined.
///
/// Real-time signals are normalized to whichever of `RTMIN+n` and `RTMAX-n`
/// is closer; the midpoint goes to the `RTMIN` side.
#[must_use]
pub fn name_of(number: RawNumber) -> Option<Name> {
    for name in Name::iter() {
        if !name.is_real_time() && name.to_raw() == Some(number) {
            return Some(name);
        }
    }
    let range = rt_range()?;
    if range.contains(&number) {
        let (min, max) = (*range.start(), *range.end());
        if number - min <= max - number {
            Some(Name::Rtmin(number - min))
        } else {
            Some(Name::Rtmax(number - max))
        }
    } else {
        None
    }
}

/// Returns the largest valid signal number on this system.
#[must_use]
pub fn max_signal_number() -> RawNumber {
    match rt_range() {
        Some(range) => *range.end(),
        None => Name::iter()
            .filter_map(Name::to_raw)
            .max()
            .unwrap_or(libc::SIGTERM),
    }
}

/// Converts a user-supplied signal specification to a signal number.
///
/// The specification may be a decimal number within `[1, SIGRTMAX]` or a
/// signal name. Name matching is case-insensitive, with or without the
/// `"SIG"` prefix.
#[must_use]
pub fn number_of(spec: &str) -> Option<RawNumber> {
    if let Ok(number) = spec.parse::<RawNumber>() {
        return (1..=max_signal_number()).contains(&number).then_some(number);
    }
    let upper = spec.to_uppercase();
    let name = upper.strip_prefix("SIG").unwrap_or(&upper);
    name.parse::<Name>().ok()?.to_raw()
}

/// Returns every defined signal as a name-number pair, in ascending number
/// order, each number exactly once.
#[must_use]
pub fn all_signals() -> Vec<(Name, RawNumber)> {
    (1..=max_signal_number())
        .filter_map(|number| name_of(number).map(|name| (name, number)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_to_string() {
        assert_eq!(Name::Term.to_string(), "TERM");
        assert_eq!(Name::Int.to_string(), "INT");
        assert_eq!(Name::Rtmin(0).to_string(), "RTMIN");
        assert_eq!(Name::Rtmax(0).to_string(), "RTMAX");
        assert_eq!(Name::Rtmin(1).to_string(), "RTMIN+1");
        assert_eq!(Name::Rtmax(-20).to_string(), "RTMAX-20");
    }

    #[test]
    fn name_from_str() {
        assert_eq!("ABRT".parse(), Ok(Name::Abrt));
        assert_eq!("QUIT".parse(), Ok(Name::Quit));
        assert_eq!("RTMIN".parse(), Ok(Name::Rtmin(0)));
        assert_eq!("RTMIN+1".parse(), Ok(Name::Rtmin(1)));
        assert_eq!("RTMAX-1".parse(), Ok(Name::Rtmax(-1)));

        assert_eq!("".parse::<Name>(), Err(UnknownNameError));
        assert_eq!("FOO".parse::<Name>(), Err(UnknownNameError));
        assert_eq!("int".parse::<Name>(), Err(UnknownNameError));
        assert_eq!("RTMIN0".parse::<Name>(), Err(UnknownNameError));
        assert_eq!("2".parse::<Name>(), Err(UnknownNameError));
    }

    #[test]
    fn name_number_round_trip() {
        for (name, number) in all_signals() {
            assert_eq!(name.to_raw(), Some(number), "{name}");
            assert_eq!(name_of(number), Some(name), "{number}");
        }
    }

    #[test]
    fn kill_number_is_kill_name() {
        assert_eq!(name_of(libc::SIGKILL), Some(Name::Kill));
        assert_eq!(number_of("9"), Some(libc::SIGKILL));
    }

    #[test]
    fn number_of_is_case_insensitive_and_accepts_sig_prefix() {
        assert_eq!(number_of("TERM"), Some(libc::SIGTERM));
        assert_eq!(number_of("term"), Some(libc::SIGTERM));
        assert_eq!(number_of("SIGTERM"), Some(libc::SIGTERM));
        assert_eq!(number_of("sigterm"), Some(libc::SIGTERM));
        assert_eq!(number_of("sigrtmin+2"), Name::Rtmin(2).to_raw());
        assert_eq!(number_of("NOSUCH"), None);
        assert_eq!(number_of("0"), None);
        assert_eq!(number_of("-5"), None);
    }

    #[test]
    fn all_signals_are_unique_and_ascending() {
        let signals = all_signals();
        for window in signals.windows(2) {
            assert!(window[0].1 < window[1].1);
        }
    }

    #[cfg(any(target_os = "android", target_os = "linux"))]
    #[test]
    fn real_time_names_normalize_to_the_closer_end() {
        let range = rt_range().unwrap();
        let (min, max) = (*range.start(), *range.end());
        assert_eq!(name_of(min), Some(Name::Rtmin(0)));
        assert_eq!(name_of(max), Some(Name::Rtmax(0)));
        assert_eq!(name_of(min + 1), Some(Name::Rtmin(1)));
        assert_eq!(name_of(max - 1), Some(Name::Rtmax(-1)));
    }
}
