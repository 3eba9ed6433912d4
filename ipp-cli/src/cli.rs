//! Command-line definition.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ippvm", version, about = "IPPcode24 interpreter: load, check and run programs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and execute a program
    Run(RunArgs),
    /// Load a program without executing it
    Check {
        /// Program file (IPPcode24 source or JSON document)
        program: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Auto)]
        format: Format,
    },
    /// Translate IPPcode24 source into a JSON program document
    Parse {
        /// IPPcode24 source file
        source: PathBuf,
        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a program as canonical IPPcode24 source
    Disassemble {
        /// Program file (IPPcode24 source or JSON document)
        program: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Auto)]
        format: Format,
    },
}

/// How to read a program file.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON if the file starts with `{`, source otherwise
    Auto,
    /// IPPcode24 source text
    Source,
    /// JSON program document
    Json,
}

/// Arguments of `ippvm run`.
///
/// The statistics flags may repeat; each occurrence writes one line to the
/// statistics file, in command-line order.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Program file (IPPcode24 source or JSON document)
    pub program: PathBuf,

    /// Read program input from this file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Auto)]
    pub format: Format,

    /// Write execution statistics to this file
    #[arg(long, value_name = "FILE")]
    pub stats: Option<PathBuf>,

    /// Statistics: number of executed instructions
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "")]
    pub insts: Vec<String>,

    /// Statistics: order of the most executed instruction
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "")]
    pub hot: Vec<String>,

    /// Statistics: most variables alive at once
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "")]
    pub vars: Vec<String>,

    /// Statistics: deepest data stack
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "")]
    pub stack: Vec<String>,

    /// Statistics: a line of literal text
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub print: Vec<String>,

    /// Statistics: an empty line
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "")]
    pub eol: Vec<String>,
}

impl RunArgs {
    /// True if any statistics group was requested.
    pub fn wants_stats(&self) -> bool {
        [&self.insts, &self.hot, &self.vars, &self.stack, &self.print, &self.eol]
            .iter()
            .any(|v| !v.is_empty())
    }
}
