use clap::{Parser, Subcommand};
use rustdoc_index::ScriptKind;
use std::path::PathBuf;

use crate::color::Color;
use crate::source::Source;

/// Inspect the implementor and sidebar index scripts rustdoc writes
#[derive(Parser, Debug)]
#[command(name = "docindex")]
#[command(about = "Inspect the implementor and sidebar index scripts rustdoc writes", long_about = None)]
#[command(args_override_self = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = Color::Auto)]
    pub color: Color,

    /// Skip cache and download scripts again
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Clear the entire cache directory
    #[arg(long)]
    pub clear_cache: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the contents of an implementors or sidebar-items script
    Show {
        /// Script file or URL
        #[arg(value_parser = parse_source)]
        source: Source,
    },

    /// Check a script, or every script below a documentation directory
    Check {
        /// Script file or rustdoc output directory
        path: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the data of a script as JSON
    Json {
        /// Script file or URL
        #[arg(value_parser = parse_source)]
        source: Source,
    },

    /// Write a script from JSON data, as printed by `json`
    Emit {
        /// JSON file
        input: PathBuf,

        /// Read a bare table of this kind (implementors or sidebar) instead
        #[arg(long)]
        kind: Option<ScriptKind>,
    },

    /// List the documented traits a type implements
    Impls {
        /// rustdoc output directory
        dir: PathBuf,

        /// Fully-qualified type path, e.g. "bytes::buf::reader::Reader"
        type_path: String,
    },
}

fn parse_source(s: &str) -> Result<Source, String> {
    Source::parse(s).map_err(|e| e.to_string())
}
