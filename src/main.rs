use anyhow::{Context, Result};
use clap::Parser;
use livescribe::cli::Cli;
use livescribe::config::Config;
use livescribe::media::MediaFile;
use livescribe::pipeline::types::TranscriptionSegment;
use std::io::{IsTerminal, Write};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.quiet, cli.verbose)?;

    let config = load_config(&cli)?;
    let file = MediaFile::from_path(&cli.file)
        .with_context(|| format!("cannot read {}", cli.file.display()))?;

    let render_progress = !cli.quiet && std::io::stderr().is_terminal();
    let result = livescribe::transcribe(file, &config, move |percent| {
        if render_progress {
            eprint!("\rTranscribing... {percent:3}%");
            if percent == 100 {
                eprintln!();
            }
            let _flush = std::io::stderr().flush();
        }
    })
    .await;

    let segments = match result {
        Ok(segments) => segments,
        Err(e) => {
            if render_progress {
                eprintln!();
            }
            if let Some(detail) = e.detail() {
                log::debug!("Failure detail: {}", detail);
            }
            return Err(e.into());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
    } else {
        print_listing(&segments);
    }

    Ok(())
}

fn init_logging(quiet: bool, verbose: u8) -> Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .context("failed to build logger instance")?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load(path)
            .with_context(|| format!("cannot load config from {}", path.display()))?,
        None => Config::default(),
    }
    .with_env_overrides();

    if let Some(endpoint) = &cli.endpoint {
        config.service.endpoint = endpoint.clone();
    }
    if let Some(model) = &cli.model {
        config.service.model = model.clone();
    }

    Ok(config)
}

fn print_listing(segments: &[TranscriptionSegment]) {
    if segments.is_empty() {
        println!("(no speech detected)");
        return;
    }
    for segment in segments {
        println!(
            "[{} - {}] {}",
            format_timestamp(segment.start_time),
            format_timestamp(segment.end_time),
            segment.text
        );
    }
}

/// Formats seconds as `m:ss.t` for the terminal listing.
fn format_timestamp(seconds: f64) -> String {
    // Round to tenths first so 59.96s becomes 1:00.0, not 0:60.0
    let tenths = (seconds * 10.0).round() as u64;
    let minutes = tenths / 600;
    let rest = (tenths % 600) as f64 / 10.0;
    format!("{}:{:04.1}", minutes, rest)
}
