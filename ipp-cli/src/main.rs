//! `ippvm`: IPPcode24 interpreter.
//!
//! Exit codes:
//! - 0-9: the program's EXIT status (0 when it runs off the end)
//! - 10: bad command-line parameters
//! - 11/12: input/output file errors
//! - 21-23: source text errors
//! - 31/32: malformed document / invalid program structure
//! - 52-58: semantic and runtime errors
//! - 99: internal error

use clap::{CommandFactory, FromArgMatches};
use ipp_cli::cli::{Cli, Command};
use ipp_cli::{commands, stats};
use ipp_common::ReturnCode;
use std::process;

fn main() {
    ipp_cli::init_logging();

    let matches = match Cli::command().try_get_matches() {
        Ok(m) => m,
        Err(e) => {
            let code = if e.use_stderr() {
                ReturnCode::Parameter.code()
            } else {
                0
            };
            let _ = e.print();
            process::exit(code);
        }
    };
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(ReturnCode::Parameter.code());
        }
    };

    let result = match &cli.command {
        Command::Run(args) => {
            let items = matches
                .subcommand_matches("run")
                .map(stats::requested_items)
                .unwrap_or_default();
            commands::run(args, &items)
        }
        Command::Check { program, format } => commands::check(program, *format),
        Command::Parse { source, output } => commands::parse(source, output.as_deref()),
        Command::Disassemble { program, format } => commands::disassemble(program, *format),
    };

    match result {
        Ok(code) | Err(code) => process::exit(code),
    }
}
