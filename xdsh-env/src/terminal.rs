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

//! Controlling terminal management
//!
//! An interactive shell owns the controlling terminal and lends it to
//! foreground jobs: ownership alternates shell → job → shell, and the
//! shell's saved terminal modes are restored on every return. A shell is
//! interactive iff standard input and output are both terminals and
//! interactive input was requested.

use crate::io::Fd;
use crate::system::{Errno, Pid, RealSystem, Result};

/// Saved terminal modes
#[derive(Clone, Copy)]
pub struct TerminalState(pub libc::termios);

impl std::fmt::Debug for TerminalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TerminalState(..)")
    }
}

/// State of the shell's controlling terminal
#[derive(Debug)]
pub struct Terminal {
    /// Whether the shell is running interactively
    pub is_interactive: bool,
    /// Process group ID of the shell itself
    pub shell_pgid: Pid,
    /// Baseline terminal modes, saved at initialization
    saved_modes: Option<TerminalState>,
}

impl Terminal {
    /// Creates the terminal state of a non-interactive shell.
    #[must_use]
    pub fn noninteractive(shell_pgid: Pid) -> Terminal {
        Terminal {
            is_interactive: false,
            shell_pgid,
            saved_modes: None,
        }
    }

    /// Whether the shell should run interactively
    #[must_use]
    pub fn detect(system: &RealSystem, interactive_requested: bool) -> bool {
        interactive_requested && system.isatty(Fd::STDIN) && system.isatty(Fd::STDOUT)
    }

    /// Initializes the terminal for an interactive shell.
    ///
    /// Puts the shell in its own process group, takes the controlling
    /// terminal, and saves the baseline terminal modes. `SIGTTOU` must
    /// already be ignored when this is called, or taking the terminal from
    /// a background position would stop the shell.
    pub fn initialize(system: &mut RealSystem) -> Result<Terminal> {
        let shell_pgid = system.getpid();
        match system.setpgid(shell_pgid, shell_pgid) {
            Ok(()) | Err(Errno::EPERM) => {} // already a process group leader
            Err(error) => return Err(error),
        }
        system.tcsetpgrp(Fd::STDIN, shell_pgid)?;
        let saved_modes = Some(TerminalState(system.tcgetattr(Fd::STDIN)?));
        Ok(Terminal {
            is_interactive: true,
            shell_pgid,
            saved_modes,
        })
    }

    /// Puts the given process group in control of the terminal.
    ///
    /// Fails with `ENOTTY` if the shell is not interactive.
    pub fn put_in_foreground(&self, system: &mut RealSystem, pgid: Pid) -> Result<()> {
        if !self.is_interactive {
            return Err(Errno::ENOTTY);
        }
        system.tcsetpgrp(Fd::STDIN, pgid)
    }

    /// Reads the current terminal modes, for saving into a job that is
    /// leaving the foreground.
    pub fn capture_modes(&self, system: &RealSystem) -> Result<TerminalState> {
        Ok(TerminalState(system.tcgetattr(Fd::STDIN)?))
    }

    /// Applies previously captured terminal modes.
    pub fn apply_modes(&self, system: &mut RealSystem, modes: &TerminalState) -> Result<()> {
        system.tcsetattr(Fd::STDIN, &modes.0)
    }

    /// Returns terminal ownership to the shell without touching the
    /// terminal modes.
    ///
    /// The caller may want to [capture](Self::capture_modes) the modes the
    /// foreground job left behind before
    /// [restoring](Self::restore_shell_modes) the shell's own.
    pub fn reclaim(&self, system: &mut RealSystem) {
        if self.is_interactive {
            let _ = system.tcsetpgrp(Fd::STDIN, self.shell_pgid);
        }
    }

    /// Restores the shell's baseline terminal modes.
    pub fn restore_shell_modes(&self, system: &mut RealSystem) {
        if let Some(modes) = &self.saved_modes {
            let _ = system.tcsetattr(Fd::STDIN, &modes.0);
        }
    }

    /// Returns terminal ownership to the shell and restores the shell's
    /// baseline terminal modes.
    pub fn take_back(&self, system: &mut RealSystem) {
        if !self.is_interactive {
            return;
        }
        self.reclaim(system);
        self.restore_shell_modes(system);
    }
}
