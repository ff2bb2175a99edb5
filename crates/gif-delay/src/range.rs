//! Constant-duration setter over a closed frame range.

use std::io::{Read, Seek, Write};

use serde::Serialize;
use tracing::info;

use crate::types::*;
use crate::walker::walk;

/// Closed, 0-based frame index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameRange {
    start: usize,
    end: usize,
}

impl FrameRange {
    pub fn new(start: usize, end: usize) -> Result<Self, GifError> {
        if end < start {
            return Err(GifError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// Number of frames covered.
    pub fn frame_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Converts milliseconds to GIF delay units (10 ms), carrying the dropped
/// remainder so the average over many frames converges to the exact value.
#[derive(Debug, Clone, Default)]
pub struct DelayRounder {
    remainder: u32,
}

impl DelayRounder {
    pub fn units(&mut self, ms: u32) -> u16 {
        self.remainder += ms % 10;
        let mut units = ms / 10;
        if self.remainder >= 10 {
            units += 1;
            self.remainder -= 10;
        }
        u16::try_from(units).unwrap_or(u16::MAX)
    }
}

/// Reject durations the rounder could push past a 16-bit delay field.
pub fn check_duration(ms: u32) -> Result<(), GifError> {
    let ceiling = ms.div_ceil(10);
    if ceiling > u32::from(u16::MAX) {
        return Err(GifError::DurationOutOfRange(u64::from(ms)));
    }
    Ok(())
}

/// Frame duration for a frame rate, truncated to whole milliseconds.
pub fn ms_from_fps(fps: u32) -> Option<u32> {
    1000u32.checked_div(fps)
}

/// Sets every frame in a range to the same duration; aborts the walk past
/// the end of the range.
#[derive(Debug, Clone)]
pub struct RangeSetter {
    range: FrameRange,
    duration_ms: u32,
    rounder: DelayRounder,
    frames_seen: usize,
}

impl RangeSetter {
    pub fn new(range: FrameRange, duration_ms: u32) -> Result<Self, GifError> {
        check_duration(duration_ms)?;
        Ok(Self {
            range,
            duration_ms,
            rounder: DelayRounder::default(),
            frames_seen: 0,
        })
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }
}

impl FrameVisitor for RangeSetter {
    fn frame(&mut self, frame: Frame) -> FrameAction {
        self.frames_seen = frame.number;
        let index = frame.index();
        if index > self.range.end {
            FrameAction::Abort
        } else if self.range.contains(index) {
            FrameAction::Replace(self.rounder.units(self.duration_ms))
        } else {
            FrameAction::Keep
        }
    }
}

/// Set frames `range` of the GIF in `stream` to `duration_ms` each.
///
/// Fails with [`GifError::RangeBeyondEnd`] when the GIF ends before the
/// range does; frames that did exist are still rewritten.
pub fn set_range_duration<S>(
    stream: S,
    range: FrameRange,
    duration_ms: u32,
    abort_count: AbortCount,
) -> Result<WalkResult, WalkFailure>
where
    S: Read + Write + Seek,
{
    let mut setter = RangeSetter::new(range, duration_ms)?;
    let options = WalkOptions::write().with_abort_count(abort_count);
    let result = walk(stream, Some(&mut setter), options)?;

    if result.completed && setter.frames_seen() <= range.end() {
        return Err(WalkFailure {
            error: GifError::RangeBeyondEnd {
                end: range.end(),
                frame_count: setter.frames_seen(),
            },
            modifications: result.modifications,
        });
    }

    info!(
        start = range.start(),
        end = range.end(),
        duration_ms,
        modifications = result.modifications,
        frames = ?result.frame_count,
        "frame range updated"
    );
    Ok(result)
}
