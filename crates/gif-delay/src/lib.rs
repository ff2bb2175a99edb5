//! Pure-Rust GIF frame delay walker.
//!
//! Walks a GIF stream block by block in a single forward pass, without
//! decoding any image data, and hands every Graphic Control Extension to a
//! [`FrameVisitor`]. Visitors either read the stored frame delays or have
//! them rewritten in place. Three operations are built on top:
//!
//! * **range setter** — one duration over a closed frame range;
//! * **durations list** — one duration per frame from a text list;
//! * **reports** — collapsed frame runs, or the raw per-frame list that the
//!   durations-list setter reads back.

pub mod cursor;
pub mod durations;
pub mod range;
pub mod report;
pub mod types;
pub mod walker;

#[cfg(test)]
mod fixtures;

pub use cursor::BlockCursor;
pub use durations::{DurationFileSetter, LineSource, MAX_DURATION_DIGITS, set_durations_from_lines};
pub use range::{DelayRounder, FrameRange, RangeSetter, check_duration, ms_from_fps, set_range_duration};
pub use report::{
    DurationReport, DurationsListing, FrameRun, RangeReporter, list_durations, render_durations,
    report_ranges,
};
pub use types::{
    AbortCount, Frame, FrameAction, FrameVisitor, GifError, WalkFailure, WalkMode, WalkOptions,
    WalkResult,
};
pub use walker::{scan, walk};
