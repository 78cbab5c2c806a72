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

//! Command-line argument parsing for built-ins
//!
//! [`parse_arguments`] splits a built-in's arguments into option
//! occurrences and operands, driven by a table of [`OptionSpec`]s. Short
//! options cluster (`-lp` is `-l -p`), an option argument may be attached
//! or detached, `--name` matches long options exactly, and `--` ends
//! option parsing. The first operand also ends option parsing, following
//! the POSIX utility conventions.

use thiserror::Error;

#[doc(no_inline)]
pub use xdsh_env::semantics::Field;

/// Specification for an option's argument
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OptionArgumentSpec {
    /// The option does not take an argument. (default)
    #[default]
    None,
    /// The option requires an argument.
    Required,
}

/// Specification of an option
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OptionSpec<'a> {
    short: Option<char>,
    long: Option<&'a str>,
    argument: OptionArgumentSpec,
}

impl OptionSpec<'static> {
    /// Creates a new empty option spec.
    #[must_use]
    pub const fn new() -> Self {
        OptionSpec {
            short: None,
            long: None,
            argument: OptionArgumentSpec::None,
        }
    }
}

impl<'a> OptionSpec<'a> {
    /// Returns the short option name.
    #[must_use]
    pub const fn get_short(&self) -> Option<char> {
        self.short
    }

    /// Gives a short name for this option.
    #[must_use]
    pub const fn short(mut self, name: char) -> Self {
        self.short = Some(name);
        self
    }

    /// Returns the long option name.
    #[must_use]
    pub const fn get_long(&self) -> Option<&'a str> {
        self.long
    }

    /// Gives a long name for this option.
    #[must_use]
    pub const fn long(mut self, name: &'a str) -> Self {
        self.long = Some(name);
        self
    }

    /// Specifies whether this option takes an argument.
    #[must_use]
    pub const fn argument(mut self, argument: OptionArgumentSpec) -> Self {
        self.argument = argument;
        self
    }
}

/// Occurrence of an option in the parsed arguments
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptionOccurrence<'a> {
    /// Specification this occurrence matched
    pub spec: &'a OptionSpec<'a>,
    /// Argument to the option, always present for an option that requires
    /// one
    pub argument: Option<Field>,
}

/// Error in command line parsing
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError<'a> {
    /// Short option that is not in the option specs
    #[error("unknown option -{0}")]
    UnknownShortOption(char, Field),

    /// Long option that is not in the option specs
    #[error("unknown option {}", .0.value)]
    UnknownLongOption(Field),

    /// Option missing its required argument
    #[error("option missing an argument: {}", .0.value)]
    MissingOptionArgument(Field, &'a OptionSpec<'a>),
}

/// Parses command line arguments into options and operands.
pub fn parse_arguments<'a>(
    option_specs: &'a [OptionSpec<'a>],
    arguments: Vec<Field>,
) -> Result<(Vec<OptionOccurrence<'a>>, Vec<Field>), ParseError<'a>> {
    let mut options = Vec::new();
    let mut operands = Vec::new();
    let mut arguments = arguments.into_iter();

    while let Some(argument) = arguments.next() {
        let value = argument.value.as_str();
        if value == "--" {
            operands.extend(arguments);
            break;
        }

        if value.starts_with("--") {
            let name = argument.value[2..].to_string();
            match option_specs
                .iter()
                .find(|spec| spec.get_long() == Some(name.as_str()))
            {
                Some(spec) => match spec.argument {
                    OptionArgumentSpec::None => options.push(OptionOccurrence {
                        spec,
                        argument: None,
                    }),
                    OptionArgumentSpec::Required => match arguments.next() {
                        Some(field) => options.push(OptionOccurrence {
                            spec,
                            argument: Some(field),
                        }),
                        None => return Err(ParseError::MissingOptionArgument(argument, spec)),
                    },
                },
                None => return Err(ParseError::UnknownLongOption(argument)),
            }
            continue;
        }

        if value.len() > 1 && value.starts_with('-') {
            let mut chars = argument.value.chars();
            chars.next(); // skip the hyphen
            while let Some(c) = chars.next() {
                let spec = match option_specs.iter().find(|spec| spec.get_short() == Some(c)) {
                    Some(spec) => spec,
                    None => return Err(ParseError::UnknownShortOption(c, argument)),
                };
                match spec.argument {
                    OptionArgumentSpec::None => options.push(OptionOccurrence {
                        spec,
                        argument: None,
                    }),
                    OptionArgumentSpec::Required => {
                        let attached = chars.as_str();
                        let argument_field = if attached.is_empty() {
                            match arguments.next() {
                                Some(field) => field,
                                None => {
                                    return Err(ParseError::MissingOptionArgument(argument, spec));
                                }
                            }
                        } else {
                            Field::dummy(attached)
                        };
                        options.push(OptionOccurrence {
                            spec,
                            argument: Some(argument_field),
                        });
                        break;
                    }
                }
            }
            continue;
        }

        // The first operand ends option parsing.
        operands.push(argument);
        operands.extend(arguments);
        break;
    }

    Ok((options, operands))
}
