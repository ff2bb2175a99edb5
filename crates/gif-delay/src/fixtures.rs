//! Hand-assembled GIF streams for unit tests.

use std::io::Cursor;

use crate::types::{AbortCount, Frame, FrameAction};
use crate::walker::scan;

pub(crate) struct GifBuilder {
    bytes: Vec<u8>,
}

impl GifBuilder {
    /// 1x1 GIF89a with a two-entry global color table.
    pub fn new() -> Self {
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend_from_slice(&[0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00]);
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF]);
        Self { bytes }
    }

    pub fn without_color_table() -> Self {
        let mut bytes = b"GIF87a".to_vec();
        bytes.extend_from_slice(&[0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
        Self { bytes }
    }

    pub fn netscape_loop(mut self) -> Self {
        self.bytes.extend_from_slice(&[0x21, 0xFF, 0x0B]);
        self.bytes.extend_from_slice(b"NETSCAPE2.0");
        self.bytes.extend_from_slice(&[0x03, 0x01, 0x00, 0x00, 0x00]);
        self
    }

    pub fn comment(mut self, text: &str) -> Self {
        self.bytes.extend_from_slice(&[0x21, 0xFE]);
        for chunk in text.as_bytes().chunks(255) {
            self.bytes.push(chunk.len() as u8);
            self.bytes.extend_from_slice(chunk);
        }
        self.bytes.push(0x00);
        self
    }

    pub fn frame(mut self, delay: u16) -> Self {
        self.control(delay);
        self.image(false);
        self
    }

    pub fn frame_with_local_table(mut self, delay: u16) -> Self {
        self.control(delay);
        self.image(true);
        self
    }

    pub fn image_without_control(mut self) -> Self {
        self.image(false);
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.bytes.push(0x3B);
        self.bytes
    }

    pub fn build_without_trailer(self) -> Vec<u8> {
        self.bytes
    }

    fn control(&mut self, delay: u16) {
        let [lo, hi] = delay.to_le_bytes();
        self.bytes
            .extend_from_slice(&[0x21, 0xF9, 0x04, 0x04, lo, hi, 0x00, 0x00]);
    }

    fn image(&mut self, local_table: bool) {
        let packed = if local_table { 0x81 } else { 0x00 };
        self.bytes.extend_from_slice(&[
            0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, packed,
        ]);
        if local_table {
            self.bytes.extend_from_slice(&[0u8; 12]);
        }
        self.bytes.extend_from_slice(&[0x02, 0x02, 0x44, 0x01, 0x00]);
    }
}

pub(crate) fn gif_with_delays(delays: &[u16]) -> Vec<u8> {
    delays
        .iter()
        .fold(GifBuilder::new(), |gif, &delay| gif.frame(delay))
        .build()
}

pub(crate) fn delays_of(gif: &[u8]) -> Vec<u16> {
    let mut delays = Vec::new();
    let mut visitor = |f: Frame| {
        delays.push(f.delay);
        FrameAction::Keep
    };
    scan(Cursor::new(gif), Some(&mut visitor), AbortCount::Discard).unwrap();
    delays
}
