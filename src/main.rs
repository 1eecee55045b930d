//! slimroot - export packages and files with their runtime closure.
//!
//! Resolves every file a set of installed packages and explicit paths
//! needs at runtime (symlink targets, shared libraries, transitively) and
//! materializes it into a destination directory, ready to become a
//! minimal container root.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use slimroot::commands::{self, Selection};
use slimroot::config::Config;

#[derive(Parser)]
#[command(name = "slimroot")]
#[command(about = "Export packages and files with their library closure into a minimal root")]
#[command(
    after_help = "QUICK START:\n  slimroot export -d /export -p coreutils -f /etc/passwd\n  slimroot pack -p bash | ssh host slimroot unpack -d /export\n  slimroot manifest -p coreutils --json"
)]
struct Cli {
    /// Print diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SelectionArgs {
    /// Installed package to export (all files it owns)
    #[arg(short = 'p', long = "package", value_name = "PACKAGE", num_args = 1..)]
    packages: Vec<String>,

    /// Extra file to export
    #[arg(short = 'f', long = "file", value_name = "FILE", num_args = 1..)]
    files: Vec<PathBuf>,
}

impl SelectionArgs {
    fn into_selection(self) -> Selection {
        Selection {
            packages: self.packages,
            files: self.files,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve, pack and unpack into the destination
    Export {
        /// Destination directory (default: /export, or SLIMROOT_DEST)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Pattern left out when unpacking (still present in the stream).
        /// With a '/' it is anchored at the destination root; without one it
        /// matches any path component
        #[arg(short = 'r', long = "remove", value_name = "PATTERN", num_args = 1..)]
        remove: Vec<String>,
    },

    /// Print the manifest (one path per line)
    Manifest {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Print JSON with walk statistics
        #[arg(long)]
        json: bool,
    },

    /// Write the archive stream to stdout
    Pack {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Extract an archive stream from stdin into the destination
    Unpack {
        /// Destination directory (default: /export, or SLIMROOT_DEST)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Pattern left out when unpacking (anchored if it contains '/')
        #[arg(short = 'r', long = "remove", value_name = "PATTERN", num_args = 1..)]
        remove: Vec<String>,
    },

    /// Check that oracles and destination are usable
    Preflight {
        /// Destination directory (default: /export, or SLIMROOT_DEST)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Require a package backend, as an export with -p would
        #[arg(long)]
        packages: bool,

        /// Exit 1 if any check fails
        #[arg(long)]
        strict: bool,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show effective configuration
    Config,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "slimroot=debug" } else { "error" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print the subcommand's usage and exit 1.
fn usage_error(subcommand: &str, msg: &str) -> ! {
    let mut cli = Cli::command();
    let usage = cli
        .find_subcommand_mut(subcommand)
        .map(|cmd| cmd.render_usage().to_string())
        .unwrap_or_default();
    eprintln!("error: {}\n\n{}", msg, usage);
    std::process::exit(1);
}

fn require_selection(subcommand: &str, selection: SelectionArgs) -> Selection {
    let selection = selection.into_selection();
    if selection.is_empty() {
        usage_error(subcommand, "give at least one package (-p) or file (-f)");
    }
    selection
}

fn require_destination(subcommand: &str, dest: PathBuf) -> PathBuf {
    if !dest.is_dir() {
        usage_error(
            subcommand,
            &format!("destination directory {} does not exist", dest.display()),
        );
    }
    dest
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();
    init_logging(cli.verbose);
    let config = Config::load();

    match cli.command {
        Commands::Export {
            dest,
            selection,
            remove,
        } => {
            let selection = require_selection("export", selection);
            let dest = require_destination("export", dest.unwrap_or_else(|| config.dest.clone()));
            commands::cmd_export(&config, &dest, &selection, &remove)?;
        }

        Commands::Manifest { selection, json } => {
            let selection = require_selection("manifest", selection);
            commands::cmd_manifest(&config, &selection, json)?;
        }

        Commands::Pack { selection } => {
            let selection = require_selection("pack", selection);
            commands::cmd_pack(&config, &selection)?;
        }

        Commands::Unpack { dest, remove } => {
            let dest = require_destination("unpack", dest.unwrap_or_else(|| config.dest.clone()));
            commands::cmd_unpack(&dest, &remove)?;
        }

        Commands::Preflight {
            dest,
            packages,
            strict,
        } => {
            let dest = dest.unwrap_or_else(|| config.dest.clone());
            commands::cmd_preflight(&config, &dest, packages, strict)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
            };
            commands::cmd_show(show_target, &config)?;
        }
    }

    Ok(())
}
