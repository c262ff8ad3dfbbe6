//! CLI for the wavbatch batch converter.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wavbatch_core::config;
use wavbatch_core::fetch::{Format, Quality};

use commands::{run_fetch, run_resume, run_start, run_status};

/// Top-level CLI for wavbatch.
#[derive(Debug, Parser)]
#[command(name = "wavbatch")]
#[command(about = "wavbatch: convert lists of music URLs to WAV/AIFF, one at a time, with resume", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Convert every URL in a work list (plain text, or JSON with a .json extension).
    Run {
        /// Path to the work list.
        input: PathBuf,
        /// Output format (wav or aiff).
        #[arg(short, long)]
        format: Option<Format>,
        /// Quality tier (best, high or medium).
        #[arg(short, long)]
        quality: Option<Quality>,
        /// Output directory for audio files and the progress log.
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Seconds to wait between URLs.
        #[arg(short, long, value_name = "SECS")]
        delay: Option<u64>,
    },

    /// Resume the last batch in the output directory, retrying failed and pending URLs.
    Resume {
        #[arg(short, long)]
        format: Option<Format>,
        #[arg(short, long)]
        quality: Option<Quality>,
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        #[arg(short, long, value_name = "SECS")]
        delay: Option<u64>,
    },

    /// Show the progress log of the last batch.
    Status {
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Convert one or more URLs directly, without a progress log.
    Fetch {
        /// URLs to convert.
        #[arg(required = true)]
        urls: Vec<String>,
        #[arg(short, long)]
        format: Option<Format>,
        #[arg(short, long)]
        quality: Option<Quality>,
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Output file name (without extension); only with a single URL.
        #[arg(short, long)]
        name: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                input,
                format,
                quality,
                output,
                delay,
            } => {
                let options = cfg.batch_options(format, quality, delay);
                run_start(&cfg, &input, output.as_deref(), &options).await?;
            }
            CliCommand::Resume {
                format,
                quality,
                output,
                delay,
            } => {
                let options = cfg.batch_options(format, quality, delay);
                run_resume(&cfg, output.as_deref(), &options).await?;
            }
            CliCommand::Status { output } => run_status(&cfg, output.as_deref())?,
            CliCommand::Fetch {
                urls,
                format,
                quality,
                output,
                name,
            } => {
                let options = cfg.batch_options(format, quality, None);
                run_fetch(&cfg, &urls, output.as_deref(), &options, name.as_deref()).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
