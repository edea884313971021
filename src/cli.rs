// src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hookmsg",
    version,
    about = "Offer a commit message produced by the project's prepare-commit-msg hook\n\nThe hook at <root>/.git/hooks/prepare-commit-msg is run with a scratch file path and its output is merged with the current draft.",
    after_help = "EXAMPLES:
    hookmsg resolve                          # Run the hook for the current repo
    hookmsg resolve -m 'Fix bug: details'    # Keep the draft if it already starts with the hook output
    hookmsg resolve --json                   # Machine-readable result for editor integrations
    hookmsg resolve --write-to .git/MSG      # Write the message to a file

    hookmsg check                            # Is the hook present and executable?
    hookmsg --timeout 10 init                # Persist a 10 second hook timeout
    hookmsg config                           # Show ~/.hookmsg.toml values"
)]
pub struct Cli {
    /// Project root (default: top level of the enclosing git work tree)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Kill the hook after this many seconds (0 = wait forever)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Pass this process's environment to the hook instead of an empty one
    #[arg(long, global = true)]
    pub inherit_env: bool,

    /// Directory for the hook's scratch file (default: system temp dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the hook and print the message to offer
    ///
    /// Prints nothing when the current message should be left alone.
    Resolve {
        /// The message already being edited
        #[arg(short = 'm', long, conflicts_with = "message_file")]
        message: Option<String>,

        /// Read the message already being edited from a file
        #[arg(long, value_name = "PATH")]
        message_file: Option<PathBuf>,

        /// Write the resulting message to a file instead of stdout
        #[arg(long, value_name = "PATH")]
        write_to: Option<PathBuf>,

        /// Print the outcome and any notifications as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where the hook is expected and whether it can run
    Check,

    /// Create or update `~/.hookmsg.toml` from the global options given
    Init,

    /// Show the config file location and its values
    Config,
}
