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

//! This crate defines the command language of the xdsh shell.
//!
//! A line of input is [tokenized](lexer) with full awareness of quoting and
//! substitution syntax, then [parsed](parser) into a list of [pipelines]
//! (syntax::Pipeline). The quoting awareness lives in the [`scanner`] module,
//! which is shared with the word expansion performed much later, at execution
//! time; both stages must agree on what is quoted and what is not.
//!
//! Aliases are substituted during parsing through the [`alias::Glossary`]
//! abstraction so that this crate does not depend on the shell execution
//! environment.

pub mod alias;
pub mod lexer;
pub mod parser;
pub mod scanner;
pub mod syntax;

pub use self::parser::{ParseError, parse_line};
