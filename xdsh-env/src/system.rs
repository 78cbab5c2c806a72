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

//! Interface to the underlying operating system
//!
//! [`RealSystem`] wraps the system calls the shell needs. Every wrapper that
//! can be interrupted by a signal retries on `EINTR`, with the single
//! exception of [`read_interruptible`](RealSystem::read_interruptible),
//! which the line reader uses so that `SIGINT` can abort an interactive
//! read.
//!
//! Errors are reported as [`Errno`], a thin newtype over the raw `errno`
//! value.

use crate::io::Fd;
use std::ffi::{CStr, CString};
use std::ffi::{c_int, c_void};
use std::mem::MaybeUninit;

#[doc(no_inline)]
pub use nix::unistd::{ForkResult, Pid};

/// Raw error value
pub type RawErrno = i32;

/// Error value of a failed system call
///
/// This is a new type pattern around the raw `errno` value. It is `Copy` and
/// much lighter than `std::io::Error`, which makes it convenient to return
/// from the low-level wrappers below.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Errno(pub RawErrno);

impl Errno {
    /// Dummy value that does not equal any real error value
    pub const NO_ERROR: Self = Self(0);

    /// Permission denied
    pub const EACCES: Self = Self(libc::EACCES);
    /// Bad file descriptor
    pub const EBADF: Self = Self(libc::EBADF);
    /// No child processes
    pub const ECHILD: Self = Self(libc::ECHILD);
    /// Interrupted function
    pub const EINTR: Self = Self(libc::EINTR);
    /// Invalid argument
    pub const EINVAL: Self = Self(libc::EINVAL);
    /// Is a directory
    pub const EISDIR: Self = Self(libc::EISDIR);
    /// No such file or directory
    pub const ENOENT: Self = Self(libc::ENOENT);
    /// Not a directory
    pub const ENOTDIR: Self = Self(libc::ENOTDIR);
    /// Not a terminal
    pub const ENOTTY: Self = Self(libc::ENOTTY);
    /// Operation not permitted
    pub const EPERM: Self = Self(libc::EPERM);
    /// No such process
    pub const ESRCH: Self = Self(libc::ESRCH);

    /// Returns the current `errno` value of the calling thread.
    #[must_use]
    pub fn last() -> Self {
        Self(errno::errno().0)
    }
}

impl std::fmt::Display for Errno {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", errno::Errno(self.0))
    }
}

impl std::error::Error for Errno {}

impl From<nix::errno::Errno> for Errno {
    fn from(errno: nix::errno::Errno) -> Self {
        Self(errno as RawErrno)
    }
}

/// Result type for system call wrappers
pub type Result<T> = std::result::Result<T, Errno>;

trait ErrnoIfM1: PartialEq + Sized {
    const MINUS_1: Self;

    /// Convenience function to convert a result of -1 to an `Errno` error.
    ///
    /// This function is intended to be used just after calling a raw libc
    /// function that returns -1 on error and sets `errno`.
    fn errno_if_m1(self) -> Result<Self> {
        if self == Self::MINUS_1 {
            Err(Errno::last())
        } else {
            Ok(self)
        }
    }
}

impl ErrnoIfM1 for i32 {
    const MINUS_1: Self = -1;
}
impl ErrnoIfM1 for i64 {
    const MINUS_1: Self = -1;
}
impl ErrnoIfM1 for isize {
    const MINUS_1: Self = -1;
}

/// Access to the underlying operating system
///
/// `RealSystem` is an empty struct because the operating system keeps all
/// the state.
#[derive(Debug)]
pub struct RealSystem(());

impl RealSystem {
    /// Returns an instance of `RealSystem`.
    ///
    /// # Safety
    ///
    /// The shell's signal and terminal bookkeeping assumes a single
    /// `RealSystem` per process. The caller must not create more than one
    /// instance, and must not use it from more than one thread.
    pub unsafe fn new() -> Self {
        RealSystem(())
    }

    pub fn isatty(&self, fd: Fd) -> bool {
        unsafe { libc::isatty(fd.0) == 1 }
    }

    pub fn pipe(&mut self) -> Result<(Fd, Fd)> {
        let mut fds = [0 as c_int; 2];
        unsafe { libc::pipe(fds.as_mut_ptr()) }.errno_if_m1()?;
        Ok((Fd(fds[0]), Fd(fds[1])))
    }

    pub fn close(&mut self, fd: Fd) -> Result<()> {
        loop {
            match unsafe { libc::close(fd.0) }.errno_if_m1() {
                Err(Errno::EBADF) => return Ok(()),
                Err(Errno::EINTR) => (),
                Err(other) => return Err(other),
                Ok(_) => return Ok(()),
            }
        }
    }

    /// Duplicates `from` to the lowest free descriptor not below `to_min`.
    pub fn dup(&mut self, from: Fd, to_min: Fd) -> Result<Fd> {
        let fd = unsafe { libc::fcntl(from.0, libc::F_DUPFD, to_min.0) }.errno_if_m1()?;
        Ok(Fd(fd))
    }

    pub fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd> {
        loop {
            match unsafe { libc::dup2(from.0, to.0) }.errno_if_m1() {
                Err(Errno::EINTR) => (),
                result => return result.map(Fd),
            }
        }
    }

    pub fn open(&mut self, path: &CStr, flags: c_int, mode: libc::mode_t) -> Result<Fd> {
        loop {
            match unsafe { libc::open(path.as_ptr(), flags, mode as std::ffi::c_uint) }
                .errno_if_m1()
            {
                Err(Errno::EINTR) => (),
                result => return result.map(Fd),
            }
        }
    }

    pub fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        loop {
            match self.read_interruptible(fd, buffer) {
                Err(Errno::EINTR) => (),
                result => return result,
            }
        }
    }

    /// Like [`read`](Self::read), but returns `EINTR` to the caller.
    pub fn read_interruptible(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        let count = unsafe {
            libc::read(fd.0, buffer.as_mut_ptr() as *mut c_void, buffer.len())
        }
        .errno_if_m1()?;
        Ok(count as usize)
    }

    pub fn write(&mut self, fd: Fd, buffer: &[u8]) -> Result<usize> {
        loop {
            let result = unsafe {
                libc::write(fd.0, buffer.as_ptr() as *const c_void, buffer.len())
            }
            .errno_if_m1();
            match result {
                Err(Errno::EINTR) => (),
                result => return result.map(|count| count as usize),
            }
        }
    }

    pub fn write_all(&mut self, fd: Fd, mut buffer: &[u8]) -> Result<()> {
        while !buffer.is_empty() {
            let count = self.write(fd, buffer)?;
            buffer = &buffer[count..];
        }
        Ok(())
    }

    /// Creates a new child process.
    ///
    /// # Safety
    ///
    /// After `fork` in a process that has spawned threads, only
    /// async-signal-safe operations are allowed in the child. The shell is
    /// single-threaded, which is what makes the execution engine's use of
    /// this function sound.
    pub unsafe fn fork(&mut self) -> Result<ForkResult> {
        Ok(unsafe { nix::unistd::fork() }?)
    }

    pub fn getpid(&self) -> Pid {
        nix::unistd::getpid()
    }

    pub fn getpgrp(&self) -> Pid {
        nix::unistd::getpgrp()
    }

    pub fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<()> {
        Ok(nix::unistd::setpgid(pid, pgid)?)
    }

    pub fn tcgetpgrp(&self, fd: Fd) -> Result<Pid> {
        let pgid = unsafe { libc::tcgetpgrp(fd.0) }.errno_if_m1()?;
        Ok(Pid::from_raw(pgid))
    }

    pub fn tcsetpgrp(&mut self, fd: Fd, pgid: Pid) -> Result<()> {
        loop {
            match unsafe { libc::tcsetpgrp(fd.0, pgid.as_raw()) }.errno_if_m1() {
                Err(Errno::EINTR) => (),
                result => return result.map(drop),
            }
        }
    }

    pub fn tcgetattr(&self, fd: Fd) -> Result<libc::termios> {
        let mut modes = MaybeUninit::<libc::termios>::uninit();
        unsafe { libc::tcgetattr(fd.0, modes.as_mut_ptr()) }.errno_if_m1()?;
        Ok(unsafe { modes.assume_init() })
    }

    pub fn tcsetattr(&mut self, fd: Fd, modes: &libc::termios) -> Result<()> {
        loop {
            match unsafe { libc::tcsetattr(fd.0, libc::TCSADRAIN, modes) }.errno_if_m1() {
                Err(Errno::EINTR) => (),
                result => return result.map(drop),
            }
        }
    }

    /// Sends a signal. A negative `pid` addresses a whole process group.
    pub fn kill(&mut self, pid: Pid, signal: c_int) -> Result<()> {
        unsafe { libc::kill(pid.as_raw(), signal) }.errno_if_m1().map(drop)
    }

    /// Waits for a child process, retrying on `EINTR`.
    ///
    /// Returns `None` if `WNOHANG` was given and no child has changed state.
    /// The status is returned in the raw platform encoding; see
    /// [`ProcessState::from_wait_status`](crate::job::ProcessState::from_wait_status).
    pub fn waitpid(&mut self, target: Pid, flags: c_int) -> Result<Option<(Pid, c_int)>> {
        let mut status = 0 as c_int;
        loop {
            match unsafe { libc::waitpid(target.as_raw(), &mut status, flags) }.errno_if_m1() {
                Err(Errno::EINTR) => (),
                Err(error) => return Err(error),
                Ok(0) => return Ok(None),
                Ok(pid) => return Ok(Some((Pid::from_raw(pid), status))),
            }
        }
    }

    pub fn execve(
        &mut self,
        path: &CStr,
        args: &[CString],
        envs: &[CString],
    ) -> Result<std::convert::Infallible> {
        loop {
            let result = nix::unistd::execve(path, args, envs);
            if result != Err(nix::errno::Errno::EINTR) {
                return Ok(result?);
            }
        }
    }

    /// Installs a signal disposition. `handler` is `SIG_DFL`, `SIG_IGN`, or
    /// a function pointer cast to `sighandler_t`.
    pub fn sigaction(
        &mut self,
        signal: c_int,
        handler: libc::sighandler_t,
        flags: c_int,
    ) -> Result<()> {
        let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
        action.sa_sigaction = handler;
        action.sa_flags = flags;
        unsafe {
            libc::sigemptyset(&mut action.sa_mask).errno_if_m1()?;
            libc::sigaction(signal, &action, std::ptr::null_mut()).errno_if_m1()?;
        }
        Ok(())
    }

    /// Blocks or unblocks delivery of one signal for the whole process.
    pub fn sigmask(&mut self, how: c_int, signal: c_int) -> Result<()> {
        unsafe {
            let mut set = MaybeUninit::<libc::sigset_t>::uninit();
            libc::sigemptyset(set.as_mut_ptr()).errno_if_m1()?;
            libc::sigaddset(set.as_mut_ptr(), signal).errno_if_m1()?;
            libc::sigprocmask(how, set.as_ptr(), std::ptr::null_mut()).errno_if_m1()?;
        }
        Ok(())
    }

    /// Returns whether the given signal is currently blocked.
    pub fn is_signal_blocked(&self, signal: c_int) -> Result<bool> {
        unsafe {
            let mut set = MaybeUninit::<libc::sigset_t>::uninit();
            libc::sigemptyset(set.as_mut_ptr()).errno_if_m1()?;
            libc::sigprocmask(libc::SIG_BLOCK, std::ptr::null(), set.as_mut_ptr())
                .errno_if_m1()?;
            Ok(libc::sigismember(set.as_ptr(), signal) == 1)
        }
    }

    pub fn is_executable_file(&self, path: &CStr) -> bool {
        self.is_regular_file(path) && unsafe { libc::access(path.as_ptr(), libc::X_OK) == 0 }
    }

    pub fn is_regular_file(&self, path: &CStr) -> bool {
        let mut stat = MaybeUninit::<libc::stat>::uninit();
        unsafe {
            libc::stat(path.as_ptr(), stat.as_mut_ptr()) == 0
                && stat.assume_init().st_mode & libc::S_IFMT == libc::S_IFREG
        }
    }

    pub fn is_directory(&self, path: &CStr) -> bool {
        let mut stat = MaybeUninit::<libc::stat>::uninit();
        unsafe {
            libc::stat(path.as_ptr(), stat.as_mut_ptr()) == 0
                && stat.assume_init().st_mode & libc::S_IFMT == libc::S_IFDIR
        }
    }

    pub fn chdir(&mut self, path: &CStr) -> Result<()> {
        unsafe { libc::chdir(path.as_ptr()) }.errno_if_m1().map(drop)
    }

    pub fn getcwd(&self) -> Result<std::path::PathBuf> {
        std::env::current_dir().map_err(|error| Errno(error.raw_os_error().unwrap_or(0)))
    }

    /// Returns the home directory of the named user.
    pub fn getpwnam_dir(&self, name: &str) -> Result<Option<std::path::PathBuf>> {
        let user = nix::unistd::User::from_name(name)?;
        Ok(user.map(|user| user.dir))
    }

    /// Returns the current user's passwd entry as (name, home directory).
    pub fn current_user(&self) -> Option<(String, std::path::PathBuf)> {
        let user = nix::unistd::User::from_uid(nix::unistd::getuid()).ok()??;
        Some((user.name, user.dir))
    }

    /// Returns the login names of all users known to the system.
    ///
    /// Iterating the user database is inherently unsynchronized, which is
    /// fine in this single-threaded process.
    pub fn all_user_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        unsafe {
            libc::setpwent();
            loop {
                let entry = libc::getpwent();
                if entry.is_null() {
                    break;
                }
                let name = CStr::from_ptr((*entry).pw_name);
                if let Ok(name) = name.to_str() {
                    names.push(name.to_string());
                }
            }
            libc::endpwent();
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn system() -> RealSystem {
        // Tests only exercise stateless wrappers.
        unsafe { RealSystem::new() }
    }

    #[test]
    fn errno_displays_a_message() {
        let message = Errno::ENOENT.to_string();
        assert!(!message.is_empty());
    }

    #[test]
    fn errno_if_m1_reports_last_errno() {
        let result = unsafe { libc::close(-1) }.errno_if_m1();
        assert_eq!(result, Err(Errno::EBADF));
    }

    #[test]
    fn pipe_write_read_round_trip() {
        let mut system = system();
        let (reader, writer) = system.pipe().unwrap();
        system.write_all(writer, b"ping").unwrap();
        system.close(writer).unwrap();

        let mut buffer = [0; 16];
        let count = system.read(reader, &mut buffer).unwrap();
        assert_eq!(&buffer[..count], b"ping");
        let count = system.read(reader, &mut buffer).unwrap();
        assert_eq!(count, 0);
        system.close(reader).unwrap();
    }

    #[test]
    fn close_tolerates_bad_fd() {
        let mut system = system();
        assert_eq!(system.close(Fd(-1)), Ok(()));
    }

    #[test]
    fn executable_file_check() {
        let system = system();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog");
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        let c_path = CString::new(path.as_os_str().as_encoded_bytes()).unwrap();

        assert!(!system.is_executable_file(&c_path));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(system.is_executable_file(&c_path));

        let c_dir = CString::new(dir.path().as_os_str().as_encoded_bytes()).unwrap();
        assert!(!system.is_executable_file(&c_dir));
        assert!(system.is_directory(&c_dir));
    }

    #[test]
    fn blocked_signal_query_round_trip() {
        let mut system = system();
        assert!(!system.is_signal_blocked(libc::SIGUSR2).unwrap());
        system.sigmask(libc::SIG_BLOCK, libc::SIGUSR2).unwrap();
        assert!(system.is_signal_blocked(libc::SIGUSR2).unwrap());
        system.sigmask(libc::SIG_UNBLOCK, libc::SIGUSR2).unwrap();
        assert!(!system.is_signal_blocked(libc::SIGUSR2).unwrap());
    }
}
