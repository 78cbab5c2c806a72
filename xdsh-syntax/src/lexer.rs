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

//! Tokenization of input lines
//!
//! The lexer turns one line of input into a sequence of [`Token`]s: words
//! (kept verbatim, quotes included) and the operators `|`, `&`, `;`, `<`,
//! `>`, `>>`, `2>`, `2>>`, `&>`. Operator and whitespace recognition only
//! happens outside quoting constructs; a space inside `"…"` or `$(…)` is an
//! ordinary word character.
//!
//! An unquoted `#` at the start of a word makes the rest of the line a
//! comment.
//!
//! A quote or command substitution left open at the end of the line is a
//! lexical error. An open `${` is not: the word is accepted and the missing
//! `}` surfaces later as a bad-substitution expansion error.

use crate::scanner::{QuoteScanner, ScanState};
use crate::syntax::RedirOp;
use thiserror::Error;

/// One lexical token
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// A word, verbatim from the source including any quoting characters
    Word(String),
    /// `|`
    Pipe,
    /// `&`
    Background,
    /// `;`
    Semicolon,
    /// A redirection operator
    Redir(RedirOp),
}

/// Error in tokenization
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum LexError {
    #[error("unterminated single-quoted string")]
    UnclosedSingleQuote,
    #[error("unterminated double-quoted string")]
    UnclosedDoubleQuote,
    #[error("unterminated command substitution")]
    UnclosedCommandSubstitution,
    #[error("line ends with a backslash")]
    TrailingBackslash,
}

fn unclosed_error(state: ScanState) -> LexError {
    match state {
        ScanState::SingleQuoted => LexError::UnclosedSingleQuote,
        ScanState::DoubleQuoted => LexError::UnclosedDoubleQuote,
        ScanState::CmdParen => LexError::UnclosedCommandSubstitution,
        _ => LexError::TrailingBackslash,
    }
}

/// Splits a line into tokens.
pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut scanner = QuoteScanner::new();

    // Ends the current word, if any, and resets the scanner for the next one.
    fn flush(tokens: &mut Vec<Token>, word: &mut String, scanner: &mut QuoteScanner) {
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(word)));
        }
        *scanner = QuoteScanner::new();
    }

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if scanner.top() == ScanState::Unquoted {
            match c {
                ' ' | '\t' | '\n' => {
                    flush(&mut tokens, &mut word, &mut scanner);
                    i += 1;
                    continue;
                }
                '#' if word.is_empty() => break,
                '|' => {
                    flush(&mut tokens, &mut word, &mut scanner);
                    tokens.push(Token::Pipe);
                    i += 1;
                    continue;
                }
                ';' => {
                    flush(&mut tokens, &mut word, &mut scanner);
                    tokens.push(Token::Semicolon);
                    i += 1;
                    continue;
                }
                '&' => {
                    flush(&mut tokens, &mut word, &mut scanner);
                    if chars.get(i + 1) == Some(&'>') {
                        tokens.push(Token::Redir(RedirOp::OutErr));
                        i += 2;
                    } else {
                        tokens.push(Token::Background);
                        i += 1;
                    }
                    continue;
                }
                '<' => {
                    flush(&mut tokens, &mut word, &mut scanner);
                    tokens.push(Token::Redir(RedirOp::In));
                    i += 1;
                    continue;
                }
                '>' => {
                    let append = chars.get(i + 1) == Some(&'>');
                    let op = if word == "2" {
                        // The lone digit is the file descriptor prefix of the
                        // operator, not a word of its own.
                        word.clear();
                        if append { RedirOp::ErrAppend } else { RedirOp::Err }
                    } else if append {
                        RedirOp::OutAppend
                    } else {
                        RedirOp::Out
                    };
                    flush(&mut tokens, &mut word, &mut scanner);
                    tokens.push(Token::Redir(op));
                    i += if append { 2 } else { 1 };
                    continue;
                }
                _ => {}
            }
        }
        scanner.advance(c, true);
        word.push(c);
        i += 1;
    }

    if let Some(state) = scanner.unclosed() {
        return Err(unclosed_error(state));
    }
    flush(&mut tokens, &mut word, &mut scanner);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<Token> {
        tokenize(line).unwrap()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn empty_line() {
        assert_eq!(words(""), []);
        assert_eq!(words("   \t "), []);
    }

    #[test]
    fn plain_words() {
        assert_eq!(
            words("echo hello world"),
            [word("echo"), word("hello"), word("world")]
        );
    }

    #[test]
    fn quoted_spaces_stay_in_one_word() {
        assert_eq!(words("echo 'a b'"), [word("echo"), word("'a b'")]);
        assert_eq!(words("echo \"a b\" c"), [word("echo"), word("\"a b\""), word("c")]);
        assert_eq!(words("echo a\\ b"), [word("echo"), word("a\\ b")]);
    }

    #[test]
    fn command_substitution_spaces_stay_in_one_word() {
        assert_eq!(
            words("echo $(printf '%s\\n' one two)"),
            [word("echo"), word("$(printf '%s\\n' one two)")]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            words("a | b & c ; d"),
            [
                word("a"),
                Token::Pipe,
                word("b"),
                Token::Background,
                word("c"),
                Token::Semicolon,
                word("d"),
            ]
        );
    }

    #[test]
    fn operators_need_no_surrounding_spaces() {
        assert_eq!(words("a|b"), [word("a"), Token::Pipe, word("b")]);
        assert_eq!(words("sleep 30&"), [word("sleep"), word("30"), Token::Background]);
    }

    #[test]
    fn quoted_operators_are_ordinary_characters() {
        assert_eq!(words("echo 'a|b'"), [word("echo"), word("'a|b'")]);
        assert_eq!(words("echo \"a;b\""), [word("echo"), word("\"a;b\"")]);
    }

    #[test]
    fn redirection_operators() {
        assert_eq!(
            words("sort < in > out"),
            [
                word("sort"),
                Token::Redir(RedirOp::In),
                word("in"),
                Token::Redir(RedirOp::Out),
                word("out"),
            ]
        );
        assert_eq!(
            words("cmd >> log 2>> errs"),
            [
                word("cmd"),
                Token::Redir(RedirOp::OutAppend),
                word("log"),
                Token::Redir(RedirOp::ErrAppend),
                word("errs"),
            ]
        );
        assert_eq!(
            words("cmd 2> e &> all"),
            [
                word("cmd"),
                Token::Redir(RedirOp::Err),
                word("e"),
                Token::Redir(RedirOp::OutErr),
                word("all"),
            ]
        );
    }

    #[test]
    fn fd_prefix_must_stand_alone() {
        // "foo2" is a word; the operator is a plain ">".
        assert_eq!(
            words("foo2> x"),
            [word("foo2"), Token::Redir(RedirOp::Out), word("x")]
        );
        assert_eq!(
            words("2> x"),
            [Token::Redir(RedirOp::Err), word("x")]
        );
    }

    #[test]
    fn comments_run_to_end_of_line() {
        assert_eq!(words("echo hi # comment | no"), [word("echo"), word("hi")]);
        // A `#` in the middle of a word is ordinary.
        assert_eq!(words("echo a#b"), [word("echo"), word("a#b")]);
    }

    #[test]
    fn unterminated_quotes_are_errors() {
        assert_eq!(tokenize("echo 'oops"), Err(LexError::UnclosedSingleQuote));
        assert_eq!(tokenize("echo \"oops"), Err(LexError::UnclosedDoubleQuote));
        assert_eq!(
            tokenize("echo $(oops"),
            Err(LexError::UnclosedCommandSubstitution)
        );
        assert_eq!(tokenize("echo oops\\"), Err(LexError::TrailingBackslash));
    }

    #[test]
    fn open_param_brace_is_not_a_lexical_error() {
        assert_eq!(words("echo ${oops"), [word("echo"), word("${oops")]);
    }
}
