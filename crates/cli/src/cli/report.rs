use std::fs::File;
use std::io::{self, Write};

use anyhow::Context;
use gif_delay::{DurationReport, GifError};
use serde::Serialize;

use crate::cli::ReportArgs;
use crate::config::AppConfig;

fn read_failure(err: GifError) -> anyhow::Error {
    if err.is_format_error() {
        anyhow::Error::new(err).context("reading failed, invalid GIF format")
    } else {
        anyhow::Error::new(err)
    }
}

/// JSON form of a range report, with the averages the text form prints.
#[derive(Serialize)]
struct RangeReportJson<'a> {
    #[serde(flatten)]
    report: &'a DurationReport,
    average_duration_ms: Option<u64>,
    average_fps: Option<u64>,
}

impl<'a> From<&'a DurationReport> for RangeReportJson<'a> {
    fn from(report: &'a DurationReport) -> Self {
        Self {
            report,
            average_duration_ms: report.average_duration_ms(),
            average_fps: report.average_fps(),
        }
    }
}

pub fn execute(cfg: &AppConfig, args: ReportArgs) -> anyhow::Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let mut out = io::stdout().lock();

    if args.user_friendly || cfg.user_friendly_report {
        let report = gif_delay::report_ranges(file).map_err(read_failure)?;
        if args.json {
            let json = RangeReportJson::from(&report);
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        } else {
            write!(out, "{report}")?;
            writeln!(out, "Finished successfully.")?;
        }
    } else {
        let millis = gif_delay::list_durations(file).map_err(read_failure)?;
        if args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&millis)?)?;
        } else {
            out.write_all(gif_delay::render_durations(&millis).as_bytes())?;
        }
    }
    Ok(())
}
