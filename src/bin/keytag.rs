//! Detect the musical key of WAV files and rename them to include it.
//!
//! Usage:
//!   keytag [DIR] [--dry-run] [--json] [-v]
//!
//! Example: `audio.wav` -> `audio_Cm.wav` (for C minor)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use keytag::tagging::{find_audio_files, tag_file, RenameOutcome, TagReport};
use keytag::AnalysisConfig;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "keytag",
    version,
    about = "Detect the musical key of WAV files and append it to their names"
)]
struct Cli {
    /// Directory to scan recursively (or a single WAV file)
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Report what would be renamed without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Print one JSON object per file instead of text
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// STFT frame size in samples
    #[arg(long)]
    frame_size: Option<usize>,

    /// STFT hop size in samples
    #[arg(long)]
    hop_size: Option<usize>,

    /// Tuning reference for A4 in Hz
    #[arg(long)]
    tuning: Option<f32>,
}

/// JSON line for a file that could not be processed
#[derive(Serialize)]
struct FailureReport<'a> {
    path: &'a PathBuf,
    error: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;

    if !cli.json {
        println!("Detecting keys in WAV files from: {}\n", cli.dir.display());
    }

    let files = collect_files(&cli.dir)?;

    if !cli.json {
        if files.is_empty() {
            println!("No WAV files found in {}", cli.dir.display());
        } else {
            println!("Found {} WAV file(s)", files.len());
        }
    }

    let mut failures = 0usize;
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !cli.json {
            println!("\nProcessing: {}", name);
        }

        match tag_file(path, &config, cli.dry_run) {
            Ok(report) => {
                if cli.json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    print_report(&report);
                }
            }
            Err(e) => {
                failures += 1;
                log::info!("Failed on {}: {:?}", path.display(), e);
                if cli.json {
                    let failure = FailureReport {
                        path,
                        error: e.to_string(),
                    };
                    println!("{}", serde_json::to_string(&failure)?);
                } else {
                    eprintln!("  Error processing {}: {}", name, e);
                }
            }
        }
    }

    log::info!(
        "Processed {} file(s), {} failed",
        files.len(),
        failures
    );

    if !cli.json {
        println!("\nDone!");
    }
    Ok(())
}

/// WAV files under `dir`; a path that does not exist holds none
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        log::warn!("{} does not exist", dir.display());
        return Ok(Vec::new());
    }
    find_audio_files(dir).with_context(|| format!("cannot scan {}", dir.display()))
}

fn build_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::default();
    if let Some(frame_size) = cli.frame_size {
        config.frame_size = frame_size;
    }
    if let Some(hop_size) = cli.hop_size {
        config.hop_size = hop_size;
    }
    if let Some(tuning) = cli.tuning {
        config.center_frequency = tuning;
    }
    config.validate().context("invalid analysis options")?;
    Ok(config)
}

fn print_report(report: &TagReport) {
    println!(
        "  Detected key: {} (correlation {:.3}, clarity {:.3})",
        report.key, report.confidence, report.clarity
    );
    match &report.outcome {
        RenameOutcome::Renamed(target) | RenameOutcome::WouldRename(target) => {
            let new_name = target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if matches!(report.outcome, RenameOutcome::WouldRename(_)) {
                println!("  Would rename to: {}", new_name);
            } else {
                println!("  Renamed to: {}", new_name);
            }
        }
        RenameOutcome::AlreadyTagged => {
            println!("  Key already in filename, skipping rename");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_has_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = collect_files(&dir.path().join("missing")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_collect_files_finds_wavs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.wav"), b"").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"").unwrap();
        assert_eq!(
            collect_files(dir.path()).unwrap(),
            vec![dir.path().join("a.wav")]
        );
    }

    #[test]
    fn test_cli_defaults_to_current_dir() {
        let cli = Cli::parse_from(["keytag"]);
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(!cli.dry_run);
        assert!(build_config(&cli).is_ok());
    }
}
