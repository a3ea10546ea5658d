use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "agentmap-launcher",
    about = "Fetch, cache and run the native agentmap binary for this platform"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a launcher config (defaults to <config dir>/agentmap/launcher.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log download and lookup details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download or refresh the binary if the latest release differs from the installed one
    /// (run this from the package's postinstall hook)
    Install,
    /// Run agentmap with the given arguments, installing it first if it is missing.
    /// Example:
    ///   agentmap-launcher run -- scan --json .
    Run {
        /// Arguments passed through to agentmap unchanged
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<OsString>,
    },
    /// Print the path of an already-installed binary (no network access)
    Locate,
    /// Show platform, install location, recorded version and binary digest
    Status,
}
