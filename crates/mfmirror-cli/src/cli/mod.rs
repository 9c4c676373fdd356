//! CLI for mfmirror.

mod commands;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mfmirror_core::config;
use std::path::PathBuf;

use commands::{run_discover, run_import_har, run_mirror_command, MirrorArgs};

/// Top-level CLI for mfmirror.
#[derive(Debug, Parser)]
#[command(name = "mfmirror")]
#[command(about = "Mirror the assets referenced by a JSON manifest and rewrite it to local paths", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every asset a manifest references and write a local copy of the manifest.
    Mirror {
        /// Path to the manifest JSON.
        #[arg(long)]
        manifest: PathBuf,

        /// Output root where assets will be stored.
        #[arg(long, default_value = "./local_www")]
        out_root: PathBuf,

        /// Concurrent downloads (default from config, 8 out of the box).
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,

        /// Skip downloads whose file already exists under the output root.
        #[arg(long)]
        skip_existing: bool,
    },

    /// List the in-scope asset URLs of a manifest without downloading anything.
    Discover {
        /// Path to the manifest JSON.
        #[arg(long)]
        manifest: PathBuf,
    },

    /// Replace a manifest's resources with the requests recorded in a HAR capture.
    ImportHar {
        /// Existing manifest JSON.
        manifest: PathBuf,

        /// HAR capture file.
        har: PathBuf,

        /// Where to write the result (default: overwrite the manifest).
        output: Option<PathBuf>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Mirror {
                manifest,
                out_root,
                concurrency,
                skip_existing,
            } => {
                let args = MirrorArgs {
                    manifest,
                    out_root,
                    concurrency,
                    skip_existing,
                };
                run_mirror_command(&cfg, args)?;
            }
            CliCommand::Discover { manifest } => run_discover(&cfg, &manifest)?,
            CliCommand::ImportHar {
                manifest,
                har,
                output,
            } => run_import_har(&manifest, &har, output.as_deref())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
