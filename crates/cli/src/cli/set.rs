use anyhow::Context;
use gif_delay::{FrameRange, GifError};

use crate::cli::{GlobalArgs, SetArgs, finish_update, open_for_update};
use crate::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum RangeParseError {
    #[error("expected a frame range like 0-20, got '{0}'")]
    Format(String),

    #[error(transparent)]
    Invalid(#[from] GifError),
}

/// Parse `START-END` (0-based, inclusive, digits only).
pub fn parse_range(s: &str) -> Result<FrameRange, RangeParseError> {
    let malformed = || RangeParseError::Format(s.to_string());
    let (start, end) = s.split_once('-').ok_or_else(malformed)?;
    let number = |part: &str| -> Result<usize, RangeParseError> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        part.parse().map_err(|_| malformed())
    };
    Ok(FrameRange::new(number(start)?, number(end)?)?)
}

pub fn execute(global: &GlobalArgs, cfg: &AppConfig, args: SetArgs) -> anyhow::Result<()> {
    let settings = global.resolve(cfg);

    let duration_ms = match (args.value.duration, args.value.fps) {
        (Some(ms), _) => ms,
        (None, Some(fps)) => {
            gif_delay::ms_from_fps(fps).context("--fps must be greater than zero")?
        }
        (None, None) => anyhow::bail!("either --duration or --fps is required"),
    };
    gif_delay::check_duration(duration_ms)?;

    let mut file = open_for_update(&args.file, settings.backup)?;
    let outcome =
        gif_delay::set_range_duration(&mut file, args.range, duration_ms, settings.abort_count);
    finish_update(outcome)
}
