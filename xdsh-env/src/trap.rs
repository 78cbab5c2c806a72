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

//! Signal disposition management
//!
//! The shell's signal handlers do nothing but record the delivery in an
//! atomic flag; everything else happens synchronously in the main flow.
//! [`take_sigchld`] is consulted before every prompt (and inside wait
//! loops) to run the reaper body, and [`take_sigint`] lets the line reader
//! notice an interrupt that aborted its `read`.
//!
//! `SIGCHLD` is installed with `SA_RESTART` so that ordinary system calls
//! are not interrupted by child status changes. `SIGINT` is installed
//! without it, deliberately: an interactive `read` must be interruptible.
//!
//! The keyboard job-control signals (`SIGTSTP`, `SIGQUIT`, `SIGTTIN`,
//! `SIGTTOU`) and `SIGTERM` are ignored in the interactive shell and reset
//! to the default disposition in every child before `exec`.

use crate::Env;
use crate::system::{RealSystem, Result};
use std::ffi::c_int;
use std::sync::atomic::{AtomicBool, Ordering};

static SIGCHLD_RECEIVED: AtomicBool = AtomicBool::new(false);
static SIGINT_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Signal-catching function; only records the delivery.
extern "C" fn catch_signal(signal: c_int) {
    // Only async-signal-safe operations are allowed here.
    match signal {
        libc::SIGCHLD => SIGCHLD_RECEIVED.store(true, Ordering::Relaxed),
        libc::SIGINT => SIGINT_RECEIVED.store(true, Ordering::Relaxed),
        _ => {}
    }
}

/// Consumes the pending-`SIGCHLD` flag.
#[must_use]
pub fn take_sigchld() -> bool {
    SIGCHLD_RECEIVED.swap(false, Ordering::Relaxed)
}

/// Consumes the pending-`SIGINT` flag.
#[must_use]
pub fn take_sigint() -> bool {
    SIGINT_RECEIVED.swap(false, Ordering::Relaxed)
}

/// Whether a `SIGINT` is pending, without consuming it
#[must_use]
pub fn sigint_pending() -> bool {
    SIGINT_RECEIVED.load(Ordering::Relaxed)
}

/// Signals ignored by the interactive shell and reset in children
const JOB_CONTROL_SIGNALS: [c_int; 5] = [
    libc::SIGTSTP,
    libc::SIGQUIT,
    libc::SIGTTIN,
    libc::SIGTTOU,
    libc::SIGTERM,
];

/// Installs the shell's signal dispositions.
pub fn install_shell_handlers(system: &mut RealSystem, interactive: bool) -> Result<()> {
    system.sigaction(
        libc::SIGCHLD,
        catch_signal as libc::sighandler_t,
        libc::SA_RESTART,
    )?;
    if interactive {
        system.sigaction(libc::SIGINT, catch_signal as libc::sighandler_t, 0)?;
        for signal in JOB_CONTROL_SIGNALS {
            system.sigaction(signal, libc::SIG_IGN, 0)?;
        }
    }
    Ok(())
}

/// Resets every shell-modified disposition to the default.
///
/// Called in a forked child before `exec` (and before running a subshell
/// body), so children start with the conventional dispositions.
pub fn reset_for_child(system: &mut RealSystem) {
    let _ = system.sigaction(libc::SIGCHLD, libc::SIG_DFL, 0);
    let _ = system.sigaction(libc::SIGINT, libc::SIG_DFL, 0);
    for signal in JOB_CONTROL_SIGNALS {
        let _ = system.sigaction(signal, libc::SIG_DFL, 0);
    }
}

impl Env {
    /// Blocks delivery of `SIGCHLD`.
    ///
    /// Calls nest; the process signal mask is only changed when the nesting
    /// level rises from zero. Every call must be paired with a
    /// [`sigchld_unblock`](Self::sigchld_unblock).
    pub fn sigchld_block(&mut self) {
        if self.sigchld_blocks == 0 {
            let _ = self.system.sigmask(libc::SIG_BLOCK, libc::SIGCHLD);
        }
        self.sigchld_blocks += 1;
    }

    /// Unblocks delivery of `SIGCHLD` after a matching
    /// [`sigchld_block`](Self::sigchld_block).
    ///
    /// The process signal mask is only changed when the nesting level
    /// returns to zero.
    pub fn sigchld_unblock(&mut self) {
        debug_assert!(self.sigchld_blocks > 0);
        self.sigchld_blocks = self.sigchld_blocks.saturating_sub(1);
        if self.sigchld_blocks == 0 {
            let _ = self.system.sigmask(libc::SIG_UNBLOCK, libc::SIGCHLD);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigchld_flag_round_trip() {
        assert!(!take_sigchld());
        catch_signal(libc::SIGCHLD);
        assert!(take_sigchld());
        assert!(!take_sigchld());
    }

    #[test]
    fn sigint_flag_round_trip() {
        assert!(!sigint_pending());
        catch_signal(libc::SIGINT);
        assert!(sigint_pending());
        assert!(take_sigint());
        assert!(!sigint_pending());
    }

    #[test]
    fn nested_block_unblock_is_a_no_op_on_the_mask() {
        let mut env = Env::new(unsafe { RealSystem::new() });
        assert!(!env.system.is_signal_blocked(libc::SIGCHLD).unwrap());

        env.sigchld_block();
        assert!(env.system.is_signal_blocked(libc::SIGCHLD).unwrap());
        env.sigchld_block();
        env.sigchld_unblock();
        // Still blocked: the outer pair is open.
        assert!(env.system.is_signal_blocked(libc::SIGCHLD).unwrap());
        env.sigchld_unblock();
        assert!(!env.system.is_signal_blocked(libc::SIGCHLD).unwrap());
    }
}
