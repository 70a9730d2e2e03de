use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use stagemap::rename::LookupPolicy;

mod config;
mod matching;
mod rename;
mod run;

pub use config::Config;

/// stagemap - Label microscope tiles by matching stage positions to multipoints
#[derive(Parser)]
#[command(name = "stagemap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Tie-break when several mapping entries fit one tile.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PolicyArg {
    /// First fitting entry in table order
    First,
    /// Entry with the longest base name
    LongestBase,
    /// Skip tiles that fit more than one entry
    RejectAmbiguous,
}

impl From<PolicyArg> for LookupPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::First => LookupPolicy::First,
            PolicyArg::LongestBase => LookupPolicy::LongestBase,
            PolicyArg::RejectAmbiguous => LookupPolicy::RejectAmbiguous,
        }
    }
}

/// Flags shared by the commands that rename tiles.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct RenameArgs {
    /// Tie-break between several fitting mapping entries (default: longest-base)
    #[arg(short = 'p', long, value_enum)]
    policy: Option<PolicyArg>,

    /// Acquisition file extension appended to base names (default: .nd2)
    #[arg(short = 'e', long, value_name = "EXT")]
    extension: Option<String>,

    /// Report what would be copied without copying
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Match acquisition planes to multipoints and write the mapping table
    Match {
        /// OME-XML metadata exported from the acquisition
        #[arg(value_name = "OME_XML")]
        ome: PathBuf,

        /// Multipoint position list
        #[arg(value_name = "MULTIPOINTS")]
        multipoints: PathBuf,

        /// Mapping table output path (default: matched_positions.csv)
        #[arg(short = 'o', long, value_name = "TABLE")]
        output: Option<PathBuf>,

        /// Absolute stage-position tolerance (default: 0.001)
        #[arg(short = 't', long)]
        tolerance: Option<f64>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Copy exported tiles to a directory under their mapped labels
    Rename {
        /// Mapping table written by `match`
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Directory of exported tiles
        #[arg(value_name = "SOURCE_DIR")]
        source_dir: PathBuf,

        /// Directory receiving the renamed copies
        #[arg(value_name = "DEST_DIR")]
        dest_dir: PathBuf,

        #[command(flatten)]
        rename: RenameArgs,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Match, write the mapping table, then rename tiles
    Run {
        /// OME-XML metadata exported from the acquisition
        #[arg(value_name = "OME_XML")]
        ome: PathBuf,

        /// Multipoint position list
        #[arg(value_name = "MULTIPOINTS")]
        multipoints: PathBuf,

        /// Directory of exported tiles
        #[arg(value_name = "SOURCE_DIR")]
        source_dir: PathBuf,

        /// Directory receiving the renamed copies
        #[arg(value_name = "DEST_DIR")]
        dest_dir: PathBuf,

        /// Mapping table output path (default: matched_positions.csv)
        #[arg(short = 'o', long, value_name = "TABLE")]
        output: Option<PathBuf>,

        /// Absolute stage-position tolerance (default: 0.001)
        #[arg(short = 't', long)]
        tolerance: Option<f64>,

        #[command(flatten)]
        rename: RenameArgs,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

impl RenameArgs {
    /// Apply command-line overrides on top of the config file settings.
    fn apply(&self, config: &mut Config) {
        if let Some(policy) = self.policy {
            config.rename.policy = policy.into();
        }
        if let Some(extension) = &self.extension {
            config.mapping.acquisition_extension = extension.clone();
        }
        if self.dry_run {
            config.rename.dry_run = true;
        }
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Match {
            ome,
            multipoints,
            output,
            tolerance,
            config,
        } => matching::run(ome, multipoints, output, tolerance, config),
        Commands::Rename {
            table,
            source_dir,
            dest_dir,
            rename: rename_args,
            config,
        } => rename::run(table, source_dir, dest_dir, rename_args, config),
        Commands::Run {
            ome,
            multipoints,
            source_dir,
            dest_dir,
            output,
            tolerance,
            rename: rename_args,
            config,
        } => run::run(
            ome,
            multipoints,
            source_dir,
            dest_dir,
            output,
            tolerance,
            rename_args,
            config,
        ),
    }
}
