//! dubalign - align a dub audio track to a reference video.
//!
//! Decodes both inputs to a canonical waveform, cross-correlates their
//! energy envelopes to find the best offset, and re-muxes the audio
//! onto the video at that offset.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dubalign_core::config::{ConfigManager, Settings};
use dubalign_core::logging::RunLogger;
use dubalign_core::media::{FfmpegTool, TempScratch};
use dubalign_core::orchestrator::{AlignmentReport, AlignmentRunner, RunRequest};

#[derive(Parser, Debug)]
#[command(
    name = "dubalign",
    version,
    about = "Align a dub audio track to a reference video by energy cross-correlation"
)]
struct Cli {
    /// Video file. Repeat for batch runs; videos and audios are paired
    /// in lexicographic order.
    #[arg(long = "video", value_name = "FILE", required = true)]
    videos: Vec<PathBuf>,

    /// Audio (dub) file. Repeat for batch runs.
    #[arg(long = "audio", value_name = "FILE", required = true)]
    audios: Vec<PathBuf>,

    /// Explicit output path. With several pairs, files are numbered
    /// `_1`, `_2`, ... before the extension.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Prefix for synthesized output filenames.
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Config file to read settings from.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the final report as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => ConfigManager::load_or_default(path)
            .with_context(|| format!("loading config from {}", path.display()))?
            .settings()
            .clone(),
        None => Settings::default(),
    };

    let scratch = if settings.paths.temp_root.is_empty() {
        TempScratch::default()
    } else {
        TempScratch::new(&settings.paths.temp_root)
    };

    let mut request = RunRequest::new(cli.videos, cli.audios);
    if let Some(output) = cli.output {
        request = request.with_output_hint(output);
    }
    let prefix = cli
        .prefix
        .unwrap_or_else(|| settings.output.filename_prefix.clone());
    request = request.with_output_prefix(prefix);

    let logger = RunLogger::new(request.run_id.clone())
        .with_timestamps(settings.logging.show_timestamps)
        .with_sink(Box::new(|line| println!("{}", line)));

    let runner = AlignmentRunner::new(Arc::new(FfmpegTool::new()), Arc::new(scratch));

    match runner.run(&request, &logger) {
        Ok(report) => {
            print_report(&report, cli.json)?;
            Ok(())
        }
        Err(e) => bail!("{}", e),
    }
}

fn print_report(report: &AlignmentReport, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!();
    for entry in &report.entries {
        println!(
            "{}: offset {} ms (score {:.4}) -> {}",
            entry.title,
            entry.offset_ms,
            entry.score,
            entry.output.display()
        );
    }
    if let Some(last) = &report.last_output {
        println!("Last output: {}", last.display());
    }
    Ok(())
}
