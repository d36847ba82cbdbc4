use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{build_command, init_command, list_command, validate_command};

#[derive(Parser, Debug)]
#[command(name = "pluginforge")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Log progress to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where units come from and which of them to process
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Config file (default: nearest .pluginforge.json or pluginforge.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory containing the plugins
    #[arg(long)]
    pub plugins_dir: Option<PathBuf>,

    /// Directory for packaged archives and reports
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Only process these plugins (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Never process these plugins (comma separated)
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate every selected plugin, then build the compatible ones
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Skip these steps by key (comma separated)
        #[arg(long, value_delimiter = ',')]
        skip: Vec<String>,

        /// Kill any step running longer than this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Validate only; do not run any step
        #[arg(short, long)]
        dry_run: bool,

        /// Print the full report as JSON instead of the summary
        #[arg(long)]
        json: bool,

        /// Do not write build-report.json and BUILD_REPORT.md
        #[arg(long)]
        no_report: bool,
    },
    /// Check tools, required files and interpreter constraints
    #[command(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the validation report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the plugins a build would cover
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Write a default configuration file
    Init {
        /// Directory to write the config into
        #[arg(long)]
        cwd: Option<String>,

        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Execute the command; `Ok(false)` means the run itself failed.
    pub async fn execute(self) -> Result<bool> {
        match self {
            Commands::Build {
                selection,
                skip,
                timeout,
                dry_run,
                json,
                no_report,
            } => {
                build_command(crate::commands::BuildOptions {
                    selection,
                    skip,
                    timeout,
                    dry_run,
                    json,
                    no_report,
                })
                .await
            }
            Commands::Validate { selection, json } => validate_command(&selection, json).await,
            Commands::List { selection } => list_command(&selection).map(|_| true),
            Commands::Init { cwd, force } => init_command(cwd.as_deref(), force).map(|_| true),
        }
    }
}
