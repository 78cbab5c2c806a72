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

//! This crate implements the execution semantics of xdsh: the job-control
//! [execution engine](execute) and the six-pass word [expansion].
//!
//! A parsed pipeline enters [`execute::execute_pipeline`], which forks the
//! pipeline's processes into one process group, wires up pipes and
//! redirections, and either waits in the foreground or registers the job in
//! the background. Each child of a multi-command or background pipeline
//! expands its own argument words right before `exec`. A single foreground
//! command expands in the shell process instead, so the built-in decision
//! is made on the expanded name; when that name is a built-in it runs
//! without forking at all.

pub mod command_search;
pub mod completion;
pub mod execute;
pub mod expansion;
pub mod redir;
