//! GIF block constants, the per-frame visitor protocol and error types.

use serde::{Deserialize, Serialize};

/// Magic bytes at offset 0. The version suffix (`87a` / `89a`) is ignored.
pub const GIF_MAGIC: [u8; 3] = *b"GIF";

pub const EXTENSION_INTRODUCER: u8 = 0x21;
pub const IMAGE_SEPARATOR: u8 = 0x2C;
pub const TRAILER: u8 = 0x3B;

/// Extension label of a Graphic Control Extension, the block holding a frame's delay.
pub const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;

/// Bit 7 of a screen/image descriptor's packed byte: a color table follows.
pub const COLOR_TABLE_FLAG: u8 = 0x80;

/// Size in bytes of the color table announced by a descriptor's packed byte.
pub fn color_table_len(packed: u8) -> u64 {
    3 << ((packed & 0x07) + 1)
}

//  Frame protocol

/// A Graphic Control Extension as seen by a [`FrameVisitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Graphic Control Extensions seen so far, this one included (1-based).
    pub number: usize,
    /// Stored delay in hundredths of a second.
    pub delay: u16,
}

impl Frame {
    /// 0-based frame index.
    pub fn index(&self) -> usize {
        self.number - 1
    }
}

/// What the walker should do with the frame it just handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// Leave the stored delay untouched.
    Keep,
    /// Overwrite the stored delay (ignored by read-only walks).
    Replace(u16),
    /// Stop walking. Not an error.
    Abort,
}

/// Per-frame callback driven by the walker, once per Graphic Control Extension.
pub trait FrameVisitor {
    fn frame(&mut self, frame: Frame) -> FrameAction;
}

impl<F> FrameVisitor for F
where
    F: FnMut(Frame) -> FrameAction,
{
    fn frame(&mut self, frame: Frame) -> FrameAction {
        self(frame)
    }
}

//  Walk options / result

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkMode {
    #[default]
    ReadOnly,
    Write,
}

/// Frame count reported when a visitor aborts the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortCount {
    /// Report the count as unknown (`None`).
    #[default]
    Discard,
    /// Report the frames seen up to and including the aborting one.
    Preserve,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    pub mode: WalkMode,
    pub abort_count: AbortCount,
}

impl WalkOptions {
    pub fn read_only() -> Self {
        Self::default()
    }

    pub fn write() -> Self {
        Self {
            mode: WalkMode::Write,
            ..Self::default()
        }
    }

    pub fn with_abort_count(mut self, abort_count: AbortCount) -> Self {
        self.abort_count = abort_count;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkResult {
    /// `None` when unknown, i.e. the walk was aborted under [`AbortCount::Discard`].
    pub frame_count: Option<usize>,
    /// Delay fields written.
    pub modifications: usize,
    /// Writes whose value differed from the stored one.
    pub changes: usize,
    /// The trailer was reached.
    pub completed: bool,
}

//  Error

#[derive(Debug, thiserror::Error)]
pub enum GifError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid GIF magic: {0:02X?}")]
    InvalidMagic([u8; 3]),

    #[error("Unexpected end of GIF data at offset {offset}")]
    UnexpectedEof { offset: u64 },

    #[error("Unknown block 0x{byte:02X} at offset {offset}")]
    UnknownBlock { byte: u8, offset: u64 },

    #[error("Reached end of durations file before reaching end of GIF (frame {frame})")]
    DurationsExhausted { frame: usize },

    #[error("Line {line} of durations file exceeds {max} characters", max = crate::durations::MAX_DURATION_DIGITS)]
    DurationLineTooLong { line: usize },

    #[error("Durations file contains invalid characters on line {line}")]
    InvalidDurationLine { line: usize },

    #[error("Duration of {0} ms does not fit in a GIF delay field")]
    DurationOutOfRange(u64),

    #[error("Invalid frame range {start}-{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Frame range ends at {end} but the GIF has {frame_count} frame(s)")]
    RangeBeyondEnd { end: usize, frame_count: usize },
}

impl GifError {
    /// Malformed or truncated GIF structure.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic(_) | Self::UnexpectedEof { .. } | Self::UnknownBlock { .. }
        )
    }
}

/// A fatal walk error together with the writes already committed.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct WalkFailure {
    pub error: GifError,
    pub modifications: usize,
}

impl WalkFailure {
    /// The stream may have been left partially modified.
    pub fn partially_modified(&self) -> bool {
        self.modifications > 0
    }
}

impl From<GifError> for WalkFailure {
    fn from(error: GifError) -> Self {
        Self {
            error,
            modifications: 0,
        }
    }
}
