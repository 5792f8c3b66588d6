//! CLI argument definitions for the equivalence registry.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cups-registry",
    version,
    about = "CUPS Code Equivalence Registry - resolve procedure code variants",
    long_about = "Maintain and query the registry that maps canonical CUPS procedure\n\
                  codes to every textual variant upstream systems use for them\n\
                  (leading zeros, dot/dash/space separators, padded long forms)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the registry file.
    #[arg(
        long = "store",
        value_name = "FILE",
        default_value = "cups-registry.json",
        global = true
    )]
    pub store: PathBuf,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a raw code string to its equivalence record.
    Resolve(ResolveArgs),

    /// Register a code, or merge newly generated variants into it.
    Register(RegisterArgs),

    /// Bulk-register codes from a CUPS catalog CSV export.
    Import(ImportArgs),

    /// List registered records.
    List(ListArgs),
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Raw code in any known format (e.g. 890201, 89.02.01, 0000890201).
    #[arg(value_name = "CODE")]
    pub code: String,
}

#[derive(Parser)]
pub struct RegisterArgs {
    /// Code to register; canonicalized before registration.
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Human-readable procedure description.
    #[arg(value_name = "DESCRIPTION")]
    pub description: String,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// CSV file with `Codigo` and `Nombre` columns.
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Include inactive records.
    #[arg(long = "all")]
    pub all: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
