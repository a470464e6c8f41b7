use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use sshed_core::{ExportFormat, HostFields};

#[derive(Debug, Parser)]
#[command(
    name = "sshed",
    version,
    about = "Edit the Host blocks of your OpenSSH client config"
)]
pub struct Cli {
    /// SSH config file to edit [default: ~/.ssh/config]
    #[arg(short = 'f', long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all hosts
    #[command(visible_alias = "ls")]
    List,

    /// Add a new host
    #[command(disable_help_flag = true)]
    Add {
        name: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Show every option of one host
    Show { name: String },

    /// Change the recognized fields of a host
    #[command(disable_help_flag = true)]
    Edit {
        name: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a host
    #[command(visible_alias = "rm")]
    Remove { name: String },

    /// Duplicate a host under a new name
    Copy { from: String, to: String },

    /// Check that a host accepts a non-interactive connection
    Test { name: String },

    /// Print or write the config in another format
    Export {
        /// Lossless JSON dump, accepted by `import`
        #[arg(long, conflicts_with_all = ["yaml", "format"])]
        json: bool,
        /// One YAML mapping per host (export only)
        #[arg(long, conflicts_with = "format")]
        yaml: bool,
        /// native, structured (json) or simplified (yaml)
        #[arg(long, value_name = "FORMAT")]
        format: Option<ExportFormat>,
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Replace all hosts with the contents of a JSON dump
    Import { path: PathBuf },

    /// Copy the config file to a timestamped backup next to it
    Backup,
}

/// Flags shared by `add` and `edit`. `-h` is the host address here, so
/// help is only reachable as `--help`.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    /// Address to connect to (HostName)
    #[arg(short = 'h', long = "host", value_name = "ADDRESS")]
    pub host: Option<String>,
    /// Login user (User)
    #[arg(short, long)]
    pub user: Option<String>,
    /// Port (Port)
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Private key path (IdentityFile)
    #[arg(short, long = "identity", value_name = "PATH")]
    pub identity: Option<String>,
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl From<FieldArgs> for HostFields {
    fn from(args: FieldArgs) -> Self {
        Self {
            host_name: args.host,
            user: args.user,
            port: args.port,
            identity_file: args.identity,
        }
    }
}

/// `--json` and `--yaml` are shorthands for `--format`.
pub fn export_format(json: bool, yaml: bool, format: Option<ExportFormat>) -> ExportFormat {
    match (json, yaml, format) {
        (true, _, _) => ExportFormat::Structured,
        (_, true, _) => ExportFormat::Simplified,
        (_, _, format) => format.unwrap_or_default(),
    }
}
