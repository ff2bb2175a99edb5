pub mod apply;
pub mod config_cmd;
pub mod report;
pub mod set;

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use gif_delay::{AbortCount, FrameRange, WalkFailure, WalkResult};
use tracing::info;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "gif-durations",
    version,
    about = "Inspect and change the frame durations of GIF files"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
pub struct GlobalArgs {
    /// Copy the GIF to `<file>.bak` before modifying it.
    #[arg(long, global = true, env = "GIF_DURATIONS_BACKUP")]
    pub backup: bool,

    /// Report the frames seen when a walk stops early, instead of an unknown count.
    #[arg(long, global = true)]
    pub preserve_abort_count: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set one duration over a frame range.
    Set(SetArgs),

    /// Set per-frame durations from a text file (one value in ms per line).
    Apply(ApplyArgs),

    /// Print the durations of every frame.
    Report(ReportArgs),

    /// View / edit configuration.
    Config(ConfigArgs),
}

//  Subcommand argument structs

#[derive(Debug, clap::Args, Clone)]
pub struct SetArgs {
    /// GIF file, modified in place.
    pub file: PathBuf,

    /// 0-based inclusive frame range, e.g. `0-20`.
    #[arg(value_parser = set::parse_range)]
    pub range: FrameRange,

    #[command(flatten)]
    pub value: DurationValue,
}

#[derive(Debug, clap::Args, Clone)]
#[group(required = true, multiple = false)]
pub struct DurationValue {
    /// Time between frames in milliseconds.
    #[arg(long)]
    pub duration: Option<u32>,

    /// Frames per second.
    #[arg(long)]
    pub fps: Option<u32>,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ApplyArgs {
    /// GIF file, modified in place.
    pub file: PathBuf,

    /// Text file with one duration in ms per frame.
    pub durations: PathBuf,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ReportArgs {
    /// GIF file.
    pub file: PathBuf,

    /// Print frame ranges with their framerate instead of the raw durations list.
    #[arg(short, long)]
    pub user_friendly: bool,

    /// Print JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Display the current configuration.
    Show,
    /// Set a configuration value.
    Set { key: String, value: String },
}

//  Shared helpers for modifying commands

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub backup: bool,
    pub abort_count: AbortCount,
}

impl GlobalArgs {
    pub fn resolve(&self, cfg: &AppConfig) -> Settings {
        Settings {
            backup: self.backup || cfg.backup,
            abort_count: if self.preserve_abort_count {
                AbortCount::Preserve
            } else {
                cfg.abort_count
            },
        }
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Open `path` for in-place modification, copying it aside first if asked.
pub fn open_for_update(path: &Path, backup: bool) -> anyhow::Result<File> {
    if backup {
        let target = backup_path(path);
        fs::copy(path, &target).with_context(|| {
            format!("failed to copy {} to {}", path.display(), target.display())
        })?;
        info!(backup = %target.display(), "backup written");
    }
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))
}

/// `Frames: N`, or `Frames: unknown` when an aborted walk discarded the count.
pub fn frames_line(frame_count: Option<usize>) -> String {
    match frame_count {
        Some(n) => format!("Frames: {n}"),
        None => "Frames: unknown".to_string(),
    }
}

/// Print the outcome of a modifying walk.
pub fn finish_update(outcome: Result<WalkResult, WalkFailure>) -> anyhow::Result<()> {
    match outcome {
        Ok(result) => {
            if result.modifications == 0 {
                println!("Nothing modified.");
            } else {
                println!("Modified successfully.");
            }
            println!("{}", frames_line(result.frame_count));
            Ok(())
        }
        Err(failure) => {
            if failure.partially_modified() {
                eprintln!("Note: file could have been modified partially.");
            }
            Err(anyhow::Error::new(failure).context("operation failed"))
        }
    }
}
