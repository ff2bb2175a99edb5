//! Single-pass structural walk over a GIF stream.
//!
//! The walker parses the header, the logical screen descriptor and the
//! optional global color table, then dispatches on top-level blocks until the
//! trailer. Every Graphic Control Extension is handed to a [`FrameVisitor`],
//! which may keep the stored delay, replace it in place, or stop the walk.
//! Nothing but the delay field itself is ever written.

use std::io::{Read, Seek, Write};

use tracing::{debug, trace};

use crate::cursor::BlockCursor;
use crate::types::*;

type StoreDelay<S> = fn(&mut BlockCursor<S>, u16) -> Result<(), GifError>;

/// Walk `stream`, reading or rewriting frame delays according to `options`.
///
/// On failure the returned [`WalkFailure`] carries the number of delay
/// fields already written: a write-mode walk over a truncated or malformed
/// file may leave it partially modified.
pub fn walk<S>(
    stream: S,
    visitor: Option<&mut dyn FrameVisitor>,
    options: WalkOptions,
) -> Result<WalkResult, WalkFailure>
where
    S: Read + Write + Seek,
{
    let store: Option<StoreDelay<S>> = match options.mode {
        WalkMode::ReadOnly => None,
        WalkMode::Write => Some(BlockCursor::<S>::overwrite_u16_le),
    };
    run(stream, visitor, options.abort_count, store)
}

/// Read-only walk for streams that can not be written to.
pub fn scan<R>(
    reader: R,
    visitor: Option<&mut dyn FrameVisitor>,
    abort_count: AbortCount,
) -> Result<WalkResult, GifError>
where
    R: Read + Seek,
{
    run(reader, visitor, abort_count, None).map_err(|failure| failure.error)
}

fn run<S: Read + Seek>(
    stream: S,
    visitor: Option<&mut dyn FrameVisitor>,
    abort_count: AbortCount,
    store: Option<StoreDelay<S>>,
) -> Result<WalkResult, WalkFailure> {
    let mut walker = Walker {
        cursor: BlockCursor::new(stream)?,
        visitor,
        store,
        frames: 0,
        modifications: 0,
        changes: 0,
    };

    match walker.walk(abort_count) {
        Ok(result) => Ok(result),
        Err(error) => {
            debug!(
                offset = walker.cursor.offset(),
                frames = walker.frames,
                modifications = walker.modifications,
                %error,
                "walk failed"
            );
            Err(WalkFailure {
                error,
                modifications: walker.modifications,
            })
        }
    }
}

enum Flow {
    Continue,
    Trailer,
    Abort,
}

struct Walker<'v, S> {
    cursor: BlockCursor<S>,
    visitor: Option<&'v mut dyn FrameVisitor>,
    store: Option<StoreDelay<S>>,
    frames: usize,
    modifications: usize,
    changes: usize,
}

impl<S: Read + Seek> Walker<'_, S> {
    fn walk(&mut self, abort_count: AbortCount) -> Result<WalkResult, GifError> {
        self.header()?;

        loop {
            match self.block()? {
                Flow::Continue => {}
                Flow::Trailer => {
                    debug!(frames = self.frames, modifications = self.modifications, "walk complete");
                    return Ok(self.result(Some(self.frames), true));
                }
                Flow::Abort => {
                    debug!(frames = self.frames, "walk aborted by visitor");
                    let frame_count = match abort_count {
                        AbortCount::Discard => None,
                        AbortCount::Preserve => Some(self.frames),
                    };
                    return Ok(self.result(frame_count, false));
                }
            }
        }
    }

    fn result(&self, frame_count: Option<usize>, completed: bool) -> WalkResult {
        WalkResult {
            frame_count,
            modifications: self.modifications,
            changes: self.changes,
            completed,
        }
    }

    /// Header, logical screen descriptor and global color table.
    fn header(&mut self) -> Result<(), GifError> {
        let mut magic = [0u8; 3];
        self.cursor.read_exact(&mut magic)?;
        if magic != GIF_MAGIC {
            return Err(GifError::InvalidMagic(magic));
        }

        // version + logical screen width/height
        self.cursor.skip(7)?;
        let packed = self.cursor.read_u8()?;
        // background color index + pixel aspect ratio
        self.cursor.skip(2)?;

        if packed & COLOR_TABLE_FLAG != 0 {
            let len = color_table_len(packed);
            trace!(len, "skipping global color table");
            self.cursor.skip(len)?;
        }
        Ok(())
    }

    fn block(&mut self) -> Result<Flow, GifError> {
        let offset = self.cursor.offset();
        match self.cursor.read_u8()? {
            TRAILER => Ok(Flow::Trailer),
            EXTENSION_INTRODUCER => match self.cursor.read_u8()? {
                GRAPHIC_CONTROL_LABEL => self.graphic_control(),
                label => {
                    trace!(offset, label, "skipping extension");
                    // The first length byte is always taken as a header and
                    // skipped, even when it is 0. An extension whose data
                    // chain is empty (`21 FE 00`) therefore reads the next
                    // block's first byte as a sub-block length.
                    let header_len = self.cursor.read_u8()?;
                    self.cursor.skip(u64::from(header_len))?;
                    self.cursor.skip_sub_blocks()?;
                    Ok(Flow::Continue)
                }
            },
            IMAGE_SEPARATOR => {
                trace!(offset, "skipping image");
                self.image()?;
                Ok(Flow::Continue)
            }
            byte => Err(GifError::UnknownBlock { byte, offset }),
        }
    }

    fn graphic_control(&mut self) -> Result<Flow, GifError> {
        self.frames += 1;

        // block size + packed fields
        self.cursor.skip(2)?;
        let delay = self.cursor.read_u16_le()?;
        let frame = Frame {
            number: self.frames,
            delay,
        };

        let action = match self.visitor.as_mut() {
            Some(visitor) => visitor.frame(frame),
            None => FrameAction::Keep,
        };
        trace!(frame = frame.index(), delay, ?action, "graphic control extension");

        match action {
            FrameAction::Abort => return Ok(Flow::Abort),
            FrameAction::Replace(value) => {
                if let Some(store) = self.store {
                    store(&mut self.cursor, value)?;
                    self.modifications += 1;
                    if value != delay {
                        self.changes += 1;
                    }
                }
            }
            FrameAction::Keep => {}
        }

        // transparent color index + block terminator
        self.cursor.skip(2)?;
        Ok(Flow::Continue)
    }

    fn image(&mut self) -> Result<(), GifError> {
        // left, top, width, height
        self.cursor.skip(8)?;
        let packed = self.cursor.read_u8()?;
        if packed & COLOR_TABLE_FLAG != 0 {
            self.cursor.skip(color_table_len(packed))?;
        }
        // LZW minimum code size
        self.cursor.skip(1)?;
        self.cursor.skip_sub_blocks()
    }
}
