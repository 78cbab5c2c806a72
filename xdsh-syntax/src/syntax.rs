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

//! Syntax tree of the shell command language
//!
//! A parsed line is a list of [`Pipeline`]s. Each pipeline is a sequence of
//! [`SimpleCommand`]s connected by `|` plus a background flag. A simple
//! command carries its words verbatim, quotes and all; word expansion
//! happens at execution time, not at parse time.
//!
//! The `Display` implementations reproduce a normalized form of the source
//! text. The execution engine stores these strings in the job table for
//! status reporting.

use std::fmt::{Display, Formatter};

/// Redirection operator
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RedirOp {
    /// `< target`: open the target for reading as standard input
    In,
    /// `> target`: truncate the target and write standard output to it
    Out,
    /// `>> target`: append standard output to the target
    OutAppend,
    /// `2> target`: truncate the target and write standard error to it
    Err,
    /// `2>> target`: append standard error to the target
    ErrAppend,
    /// `&> target`: like `>` but also duplicates the result onto stderr
    OutErr,
}

impl RedirOp {
    /// Returns the operator as it appears in the source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RedirOp::In => "<",
            RedirOp::Out => ">",
            RedirOp::OutAppend => ">>",
            RedirOp::Err => "2>",
            RedirOp::ErrAppend => "2>>",
            RedirOp::OutErr => "&>",
        }
    }
}

impl Display for RedirOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

/// One redirection attached to a simple command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redir {
    pub op: RedirOp,
    /// Target word, unexpanded
    pub target: String,
}

impl Display for Redir {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.op, self.target)
    }
}

/// One simple command: words plus redirections, all unexpanded
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SimpleCommand {
    pub words: Vec<String>,
    pub redirs: Vec<Redir>,
}

impl SimpleCommand {
    /// Whether this command has neither words nor redirections
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.redirs.is_empty()
    }
}

impl Display for SimpleCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for word in &self.words {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(word)?;
            first = false;
        }
        for redir in &self.redirs {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{redir}")?;
            first = false;
        }
        Ok(())
    }
}

/// A pipeline of simple commands and its background flag
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipeline {
    /// Commands connected by `|`, in order (at least one)
    pub commands: Vec<SimpleCommand>,
    /// Whether the pipeline was terminated by `&`
    pub background: bool,
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for command in &self.commands {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{command}")?;
            first = false;
        }
        if self.background {
            f.write_str(" &")?;
        }
        Ok(())
    }
}
