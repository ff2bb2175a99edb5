//! GIF streams assembled byte by byte for integration tests.

use std::io::Cursor;

use gif_delay::{AbortCount, Frame, FrameAction, scan};

const HEADER: &[u8] = &[
    b'G', b'I', b'F', b'8', b'9', b'a', 0x02, 0x00, 0x02, 0x00, 0x81, 0x00, 0x00,
];

/// GIF with a four-entry global color table, a NETSCAPE looping extension,
/// and one 2x2 frame per delay.
pub fn gif_with_delays(delays: &[u16]) -> Vec<u8> {
    let mut bytes = HEADER.to_vec();
    bytes.extend_from_slice(&[0u8; 12]);
    bytes.extend_from_slice(&[0x21, 0xFF, 0x0B]);
    bytes.extend_from_slice(b"NETSCAPE2.0");
    bytes.extend_from_slice(&[0x03, 0x01, 0x00, 0x00, 0x00]);

    for &delay in delays {
        let [lo, hi] = delay.to_le_bytes();
        bytes.extend_from_slice(&[0x21, 0xF9, 0x04, 0x08, lo, hi, 0x00, 0x00]);
        bytes.extend_from_slice(&[0x2C, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0x00]);
        bytes.extend_from_slice(&[0x02, 0x03, 0x84, 0x1D, 0x05, 0x00]);
    }

    bytes.push(0x3B);
    bytes
}

pub fn delays_of(gif: &[u8]) -> Vec<u16> {
    let mut delays = Vec::new();
    let mut visitor = |f: Frame| {
        delays.push(f.delay);
        FrameAction::Keep
    };
    scan(Cursor::new(gif), Some(&mut visitor), AbortCount::Discard).unwrap();
    delays
}
