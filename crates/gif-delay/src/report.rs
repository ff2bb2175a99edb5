//! Read-only duration reports: collapsed frame runs, or one raw value per frame.

use std::fmt;
use std::io::{Read, Seek};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::*;
use crate::walker::scan;

/// Rounded frame rate for a delay in hundredths of a second; `None` for a
/// zero delay.
fn fps_for(delay: f64) -> Option<u64> {
    (delay > 0.0).then(|| (100.0 / delay).round() as u64)
}

struct Fps(Option<u64>);

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(fps) => write!(f, "{fps}"),
            None => f.write_str("inf"),
        }
    }
}

//  Frame runs

/// Consecutive frames sharing one delay, 0-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRun {
    pub start: usize,
    pub end: usize,
    pub delay: u16,
}

impl FrameRun {
    pub fn duration_ms(&self) -> u32 {
        u32::from(self.delay) * 10
    }

    pub fn fps(&self) -> Option<u64> {
        fps_for(f64::from(self.delay))
    }
}

impl fmt::Display for FrameRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)?;
        } else {
            write!(f, "{}-{}", self.start, self.end)?;
        }
        write!(f, ": {} ms ({} fps)", self.duration_ms(), Fps(self.fps()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationReport {
    pub runs: Vec<FrameRun>,
    pub frame_count: usize,
    /// Sum of all delays, in hundredths of a second.
    pub total_delay: u64,
}

impl DurationReport {
    pub fn average_duration_ms(&self) -> Option<u64> {
        if self.frame_count == 0 {
            return None;
        }
        Some((self.total_delay as f64 * 10.0 / self.frame_count as f64).round() as u64)
    }

    /// `None` when every frame has a zero delay.
    pub fn average_fps(&self) -> Option<u64> {
        if self.frame_count == 0 {
            return None;
        }
        fps_for(self.total_delay as f64 / self.frame_count as f64)
    }
}

impl fmt::Display for DurationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(average) = self.average_duration_ms() else {
            return writeln!(f, "No frames");
        };
        for run in &self.runs {
            writeln!(f, "{run}")?;
        }
        writeln!(f, "Average duration: {average} ms")?;
        writeln!(f, "Average framerate: {} fps", Fps(self.average_fps()))
    }
}

/// Collapses consecutive frames with equal delays into [`FrameRun`]s.
#[derive(Debug, Default)]
pub struct RangeReporter {
    open: Option<(usize, u16)>,
    runs: Vec<FrameRun>,
    frames: usize,
    total_delay: u64,
}

impl RangeReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the last open run.
    pub fn finish(mut self) -> DurationReport {
        if let Some((start, delay)) = self.open.take() {
            self.runs.push(FrameRun {
                start,
                end: self.frames - 1,
                delay,
            });
        }
        DurationReport {
            runs: self.runs,
            frame_count: self.frames,
            total_delay: self.total_delay,
        }
    }
}

impl FrameVisitor for RangeReporter {
    fn frame(&mut self, frame: Frame) -> FrameAction {
        let index = frame.index();
        match self.open {
            None => self.open = Some((index, frame.delay)),
            Some((start, delay)) if delay != frame.delay => {
                self.runs.push(FrameRun {
                    start,
                    end: index - 1,
                    delay,
                });
                self.open = Some((index, frame.delay));
            }
            Some(_) => {}
        }
        self.frames = frame.number;
        self.total_delay += u64::from(frame.delay);
        FrameAction::Keep
    }
}

/// Report the frame runs of the GIF read from `reader`.
pub fn report_ranges<R: Read + Seek>(reader: R) -> Result<DurationReport, GifError> {
    let mut reporter = RangeReporter::new();
    scan(reader, Some(&mut reporter), AbortCount::Discard)?;
    let report = reporter.finish();
    debug!(frames = report.frame_count, runs = report.runs.len(), "range report built");
    Ok(report)
}

//  Raw listing

/// Records every frame's delay, in frame order.
#[derive(Debug, Default)]
pub struct DurationsListing {
    delays: Vec<u16>,
}

impl DurationsListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-frame durations in milliseconds.
    pub fn into_millis(self) -> Vec<u32> {
        self.delays.into_iter().map(|d| u32::from(d) * 10).collect()
    }
}

impl FrameVisitor for DurationsListing {
    fn frame(&mut self, frame: Frame) -> FrameAction {
        self.delays.push(frame.delay);
        FrameAction::Keep
    }
}

/// Per-frame durations in milliseconds of the GIF read from `reader`.
pub fn list_durations<R: Read + Seek>(reader: R) -> Result<Vec<u32>, GifError> {
    let mut listing = DurationsListing::new();
    scan(reader, Some(&mut listing), AbortCount::Discard)?;
    Ok(listing.into_millis())
}

/// One value per line, in the format read back by
/// [`set_durations_from_lines`](crate::set_durations_from_lines).
pub fn render_durations(millis: &[u32]) -> String {
    millis.iter().map(|ms| format!("{ms}\n")).collect()
}
