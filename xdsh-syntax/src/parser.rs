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

//! Parsing token streams into pipelines
//!
//! The grammar is intentionally small:
//!
//! ```text
//! line     := pipeline ((';' | '&') pipeline?)*
//! pipeline := command ('|' command)*
//! command  := (word | redirection)+
//! ```
//!
//! A `&` terminating a pipeline marks it as a background job. Alias
//! substitution applies to the first word of each command: the replacement
//! text is tokenized and spliced into the token stream, so an alias may
//! contribute options, redirections or even a whole pipeline prefix. A name
//! already substituted in the same chain is not substituted again.

use crate::alias::Glossary;
use crate::lexer::{LexError, Token, tokenize};
use crate::syntax::{Pipeline, Redir, SimpleCommand};
use std::collections::HashSet;
use std::collections::VecDeque;
use thiserror::Error;

/// Error in parsing a line
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("syntax error: missing command")]
    MissingCommand,
    #[error("syntax error: missing redirection target")]
    MissingRedirTarget,
}

/// Parses one command of a pipeline.
///
/// Consumes tokens until a `|`, `&`, `;` or the end of the stream.
fn parse_command(
    tokens: &mut VecDeque<Token>,
    aliases: &dyn Glossary,
) -> Result<SimpleCommand, ParseError> {
    let mut command = SimpleCommand::default();
    let mut substituted = HashSet::new();

    loop {
        // Alias substitution on the command head
        if command.is_empty() && !aliases.is_empty() {
            while let Some(Token::Word(w)) = tokens.front() {
                if substituted.contains(w.as_str()) {
                    break;
                }
                let Some(replacement) = aliases.look_up(w) else {
                    break;
                };
                if let Some(Token::Word(name)) = tokens.pop_front() {
                    substituted.insert(name);
                }
                for token in tokenize(&replacement)?.into_iter().rev() {
                    tokens.push_front(token);
                }
            }
        }

        match tokens.front() {
            Some(Token::Word(_)) => {
                if let Some(Token::Word(w)) = tokens.pop_front() {
                    command.words.push(w);
                }
            }
            Some(&Token::Redir(op)) => {
                tokens.pop_front();
                match tokens.pop_front() {
                    Some(Token::Word(target)) => command.redirs.push(Redir { op, target }),
                    _ => return Err(ParseError::MissingRedirTarget),
                }
            }
            _ => break,
        }
    }

    if command.words.is_empty() {
        return Err(ParseError::MissingCommand);
    }
    Ok(command)
}

/// Parses a whole line into a list of pipelines.
pub fn parse_line(line: &str, aliases: &dyn Glossary) -> Result<Vec<Pipeline>, ParseError> {
    let mut tokens: VecDeque<Token> = tokenize(line)?.into();
    let mut pipelines = Vec::new();

    while !tokens.is_empty() {
        let mut commands = vec![parse_command(&mut tokens, aliases)?];
        while tokens.front() == Some(&Token::Pipe) {
            tokens.pop_front();
            commands.push(parse_command(&mut tokens, aliases)?);
        }

        let background = match tokens.pop_front() {
            Some(Token::Background) => true,
            Some(Token::Semicolon) | None => false,
            Some(_) => return Err(ParseError::MissingCommand),
        };
        pipelines.push(Pipeline {
            commands,
            background,
        });
    }

    Ok(pipelines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::EmptyGlossary;
    use assert_matches::assert_matches;

    fn parse(line: &str) -> Vec<Pipeline> {
        parse_line(line, &EmptyGlossary).unwrap()
    }

    #[test]
    fn empty_line_parses_to_nothing() {
        assert_eq!(parse(""), []);
        assert_eq!(parse("  # just a comment"), []);
    }

    #[test]
    fn single_command() {
        let pipelines = parse("echo hello");
        assert_eq!(pipelines.len(), 1);
        assert_eq!(pipelines[0].commands.len(), 1);
        assert_eq!(pipelines[0].commands[0].words, ["echo", "hello"]);
        assert!(!pipelines[0].background);
    }

    #[test]
    fn pipeline_of_three() {
        let pipelines = parse("a | b | c");
        assert_eq!(pipelines.len(), 1);
        let commands = &pipelines[0].commands;
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].words, ["a"]);
        assert_eq!(commands[1].words, ["b"]);
        assert_eq!(commands[2].words, ["c"]);
    }

    #[test]
    fn background_flag() {
        let pipelines = parse("sleep 30 &");
        assert!(pipelines[0].background);
        assert_eq!(pipelines[0].to_string(), "sleep 30 &");
    }

    #[test]
    fn semicolon_separates_pipelines() {
        let pipelines = parse("a; b | c; d");
        assert_eq!(pipelines.len(), 3);
        assert_eq!(pipelines[1].commands.len(), 2);
    }

    #[test]
    fn ampersand_separates_pipelines() {
        let pipelines = parse("slow & fast");
        assert_eq!(pipelines.len(), 2);
        assert!(pipelines[0].background);
        assert!(!pipelines[1].background);
    }

    #[test]
    fn redirections_are_attached_to_their_command() {
        let pipelines = parse("sort < in | head > out 2>> log");
        let commands = &pipelines[0].commands;
        assert_eq!(commands[0].redirs.len(), 1);
        assert_eq!(commands[0].redirs[0].target, "in");
        assert_eq!(commands[1].redirs.len(), 2);
    }

    #[test]
    fn missing_command_in_pipeline() {
        assert_matches!(
            parse_line("a | | b", &EmptyGlossary),
            Err(ParseError::MissingCommand)
        );
        assert_matches!(
            parse_line("| a", &EmptyGlossary),
            Err(ParseError::MissingCommand)
        );
    }

    #[test]
    fn redirection_without_target() {
        assert_matches!(
            parse_line("echo >", &EmptyGlossary),
            Err(ParseError::MissingRedirTarget)
        );
        assert_matches!(
            parse_line("echo > | x", &EmptyGlossary),
            Err(ParseError::MissingRedirTarget)
        );
    }

    #[test]
    fn redirection_only_command_is_rejected() {
        assert_matches!(
            parse_line("> file", &EmptyGlossary),
            Err(ParseError::MissingCommand)
        );
    }

    #[test]
    fn lexical_errors_propagate() {
        assert_matches!(
            parse_line("echo 'x", &EmptyGlossary),
            Err(ParseError::Lex(LexError::UnclosedSingleQuote))
        );
    }

    #[test]
    fn alias_substitution_on_command_head() {
        let aliases: &[(&str, &str)] = &[("ll", "ls -l")];
        let pipelines = parse_line("ll /tmp", &aliases).unwrap();
        assert_eq!(pipelines[0].commands[0].words, ["ls", "-l", "/tmp"]);
    }

    #[test]
    fn alias_substitution_is_not_applied_to_arguments() {
        let aliases: &[(&str, &str)] = &[("ll", "ls -l")];
        let pipelines = parse_line("echo ll", &aliases).unwrap();
        assert_eq!(pipelines[0].commands[0].words, ["echo", "ll"]);
    }

    #[test]
    fn alias_chains_expand_but_do_not_loop() {
        let aliases: &[(&str, &str)] = &[("l", "ll"), ("ll", "l -a")];
        let pipelines = parse_line("l", &aliases).unwrap();
        // l -> ll -> l -a; the second l is not substituted again.
        assert_eq!(pipelines[0].commands[0].words, ["l", "-a"]);
    }

    #[test]
    fn alias_may_contribute_a_pipeline_prefix() {
        let aliases: &[(&str, &str)] = &[("pg", "ps aux | grep")];
        let pipelines = parse_line("pg xdsh", &aliases).unwrap();
        let commands = &pipelines[0].commands;
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].words, ["ps", "aux"]);
        assert_eq!(commands[1].words, ["grep", "xdsh"]);
    }

    #[test]
    fn quoted_word_is_not_an_alias() {
        let aliases: &[(&str, &str)] = &[("ll", "ls -l")];
        let pipelines = parse_line("'ll'", &aliases).unwrap();
        assert_eq!(pipelines[0].commands[0].words, ["'ll'"]);
    }
}
