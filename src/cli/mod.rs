//! CLI module for the Quill frontend
//!
//! This module provides the command-line interface for the frontend.
//!
//! ## Commands
//!
//! - `parse <file>` - Parse a package and report diagnostics
//! - `ast <file>` - Parse a package and print every module with explicit grouping
//! - `order <file>` - Print the order modules are parsed in
//! - `lex <file>` - Print the token stream of one file
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::ParseMode;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Quill language frontend
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(version = VERSION)]
#[command(about = "The Quill language frontend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command that parses a package.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ModeFlags {
    /// Parse only the entry module; do not follow imports
    #[arg(long)]
    pub just_module: bool,
    /// Parse only headers, imports and fixity declarations
    #[arg(long)]
    pub skip_definitions: bool,
    /// Drop warnings
    #[arg(long)]
    pub skip_warnings: bool,
    /// Collect diagnostics and print them as plain lines instead of rendering them
    #[arg(long)]
    pub collect: bool,
}

impl ModeFlags {
    pub fn mode(self) -> ParseMode {
        let mut mode = ParseMode::FULL_PARSE;
        if self.just_module {
            mode |= ParseMode::JUST_MODULE;
        }
        if self.skip_definitions {
            mode |= ParseMode::SKIP_DEFINITIONS;
        }
        if self.skip_warnings {
            mode |= ParseMode::SKIP_WARNINGS;
        }
        if !self.collect {
            mode |= ParseMode::STDERR_DIAGNOSTICS;
        }
        mode
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a package and report diagnostics
    Parse {
        /// Entry module
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        flags: ModeFlags,
    },

    /// Parse a package and print its modules with explicit grouping
    Ast {
        /// Entry module
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        flags: ModeFlags,
    },

    /// Print the order modules are parsed in
    Order {
        /// Entry module
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        flags: ModeFlags,
    },

    /// Tokenize one file (debug)
    Lex {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Parse { file, flags } => commands::parse_file(&file, flags.mode()),
        Command::Ast { file, flags } => commands::print_ast(&file, flags.mode()),
        Command::Order { file, flags } => commands::print_order(&file, flags.mode()),
        Command::Lex { file } => commands::lex_file(&file),
    }
}

// ============================================================================
// Tests
// ============================================================================
