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

//! Command-line frontend of the xdsh shell
//!
//! [`main`] sets up the execution environment, parses the invocation
//! arguments, runs the start-up files, and drives the read–eval loop.
//! Between two prompts the job table is refreshed, so every child status
//! change observed so far is reported before the next line is read.

pub mod input;
pub mod startup;

use self::input::{LineReader, ReadResult};
use self::startup::args::{Parse, Source};
use std::ops::ControlFlow::Break;
use xdsh_env::Env;
use xdsh_env::semantics::{Divert, ExitStatus};
use xdsh_env::system::RealSystem;
use xdsh_env::terminal::Terminal;
use xdsh_env::trap;
use xdsh_env::variable::{HISTFILE, HOME};
use xdsh_semantics::execute::{execute_pipeline, run_command_string};

const USAGE: &str = "xdsh [-l] [-c STRING | -f FILE] [--help]";

/// Entry point of the shell.
pub fn main() -> ! {
    // SAFETY: this is the only RealSystem instance in the process.
    let system = unsafe { RealSystem::new() };
    let mut env = Env::new(system);

    // The Rust runtime starts with SIGPIPE ignored; give children the
    // conventional default.
    let _ = env.system.sigaction(libc::SIGPIPE, libc::SIG_DFL, 0);

    let status = run(&mut env);
    std::process::exit(status.0)
}

fn run(env: &mut Env) -> ExitStatus {
    let invocation = match startup::args::parse(std::env::args()) {
        Err(error) => {
            env.print_error(&format!("xdsh: {error}\nusage: {USAGE}\n"));
            return ExitStatus::ERROR;
        }
        Ok(Parse::Help) => {
            env.print(&format!("usage: {USAGE}\n"));
            return ExitStatus::SUCCESS;
        }
        Ok(Parse::Run(invocation)) => invocation,
    };

    env.builtins = xdsh_builtin::builtins();
    startup::configure_environment(env, invocation.is_login);

    match invocation.source {
        Source::CommandString(code) => {
            let _ = trap::install_shell_handlers(&mut env.system, false);
            run_command_string(env, &code)
        }
        Source::File(path) => {
            let _ = trap::install_shell_handlers(&mut env.system, false);
            startup::init_file::run_init_files(env, false);
            match std::fs::read_to_string(&path) {
                Err(error) => {
                    env.print_error(&format!("xdsh: {path}: {error}\n"));
                    ExitStatus::NOT_FOUND
                }
                Ok(contents) => run_lines(env, contents.lines()),
            }
        }
        Source::Stdin => {
            let interactive = Terminal::detect(&env.system, true);
            let _ = trap::install_shell_handlers(&mut env.system, interactive);
            if interactive {
                // SIGTTOU is ignored by now, so taking the terminal from a
                // background position cannot stop the shell.
                if let Ok(terminal) = Terminal::initialize(&mut env.system) {
                    env.terminal = terminal;
                }
            }
            startup::init_file::run_init_files(env, env.terminal.is_interactive);
            repl(env)
        }
    }
}

/// Runs lines from a non-interactive source, stopping at an exit request.
fn run_lines<'a, I>(env: &mut Env, lines: I) -> ExitStatus
where
    I: IntoIterator<Item = &'a str>,
{
    'lines: for line in lines {
        match xdsh_syntax::parse_line(line, &env.aliases) {
            Err(error) => {
                env.diagnose(&error.to_string());
                env.exit_status = ExitStatus::ERROR;
            }
            Ok(pipelines) => {
                for pipeline in &pipelines {
                    if let Break(Divert::Exit(status)) = execute_pipeline(env, pipeline) {
                        if let Some(status) = status {
                            env.exit_status = status;
                        }
                        break 'lines;
                    }
                }
            }
        }
        env.refresh_jobs();
    }
    env.exit_status
}

/// Builds the interactive prompt: the working directory with `$HOME`
/// abbreviated to `~`.
fn build_prompt(env: &Env) -> String {
    let cwd = env
        .system
        .getcwd()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    let cwd = match env.variables.get_scalar(HOME) {
        Some(home) if !home.is_empty() && cwd.starts_with(home) => {
            format!("~{}", &cwd[home.len()..])
        }
        _ => cwd,
    };
    format!("xdsh:{cwd}$ ")
}

/// The read–eval loop over standard input.
fn repl(env: &mut Env) -> ExitStatus {
    let interactive = env.terminal.is_interactive;
    let mut reader = LineReader::new();
    if interactive {
        if let Some(path) = env.variables.get_scalar(HISTFILE) {
            let path = path.to_string();
            reader.load_history(&path);
        }
    }

    'repl: loop {
        env.refresh_jobs();
        let prompt = if interactive {
            build_prompt(env)
        } else {
            String::new()
        };

        match reader.read_line(&mut env.system, &prompt) {
            ReadResult::Eof => break,
            ReadResult::Interrupted => {
                env.exit_status = ExitStatus::from_signal(libc::SIGINT);
            }
            ReadResult::Line(line) => {
                if interactive {
                    reader.add_history(&line);
                }
                match xdsh_syntax::parse_line(&line, &env.aliases) {
                    Err(error) => {
                        env.diagnose(&error.to_string());
                        env.exit_status = ExitStatus::ERROR;
                    }
                    Ok(pipelines) => {
                        for pipeline in &pipelines {
                            if let Break(Divert::Exit(status)) = execute_pipeline(env, pipeline)
                            {
                                if let Some(status) = status {
                                    env.exit_status = status;
                                }
                                break 'repl;
                            }
                        }
                    }
                }
            }
        }
    }

    if interactive {
        if let Some(path) = env.variables.get_scalar(HISTFILE) {
            let path = path.to_string();
            let _ = reader.save_history(&path);
        }
    }
    env.exit_status
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_env() -> Env {
        let mut env = Env::new(unsafe { RealSystem::new() });
        env.builtins = xdsh_builtin::builtins();
        env
    }

    #[test]
    fn run_lines_executes_in_order_and_stops_at_exit() {
        let mut env = test_env();
        let status = run_lines(
            &mut env,
            ["set a='1'", "set b='2'", "exit 9", "set c='3'"],
        );
        assert_eq!(status, ExitStatus(9));
        assert_eq!(env.variables.get_scalar("a"), Some("1"));
        assert_eq!(env.variables.get_scalar("b"), Some("2"));
        assert_eq!(env.variables.get_scalar("c"), None);
    }

    #[test]
    fn run_lines_continues_after_a_syntax_error() {
        let mut env = test_env();
        let status = run_lines(&mut env, ["set a='1' |", "set b='2'"]);
        assert_eq!(status, ExitStatus::SUCCESS);
        assert_eq!(env.variables.get_scalar("b"), Some("2"));
    }

    #[test]
    fn prompt_abbreviates_home() {
        let mut env = test_env();
        let cwd = env.system.getcwd().unwrap().display().to_string();
        env.variables.assign(HOME, cwd).unwrap();
        assert_eq!(build_prompt(&env), "xdsh:~$ ");
    }

    #[test]
    fn prompt_without_home() {
        let env = test_env();
        let prompt = build_prompt(&env);
        assert!(prompt.starts_with("xdsh:"));
        assert!(prompt.ends_with("$ "));
    }
}
