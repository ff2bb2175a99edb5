//! Frame durations driven by an external list, one millisecond value per line.

use std::io::{self, BufRead, Read, Seek, Write};

use tracing::{info, warn};

use crate::range::{DelayRounder, check_duration};
use crate::types::*;
use crate::walker::walk;

/// Longest accepted duration, in digits, excluding the line terminator.
pub const MAX_DURATION_DIGITS: usize = 6;

/// Bytes requested per line: the digits, `\r\n`, and one more to detect
/// over-long lines.
const LINE_READ_LIMIT: usize = MAX_DURATION_DIGITS + 3;

/// A source of text lines.
pub trait LineSource {
    /// Read at most `limit` bytes of the next line, terminator included.
    /// Returns `None` once the source is exhausted.
    fn next_line(&mut self, limit: usize) -> io::Result<Option<Vec<u8>>>;
}

impl<B: BufRead> LineSource for B {
    fn next_line(&mut self, limit: usize) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let read = self.by_ref().take(limit as u64).read_until(b'\n', &mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Parse one duration line. `None` means "leave this frame alone".
fn parse_line(raw: &[u8], line: usize) -> Result<Option<u32>, GifError> {
    let text = raw.strip_suffix(b"\n").unwrap_or(raw);
    let text = text.strip_suffix(b"\r").unwrap_or(text);

    if text.len() > MAX_DURATION_DIGITS {
        return Err(GifError::DurationLineTooLong { line });
    }
    if text.is_empty() {
        return Ok(None);
    }
    if !text.iter().all(u8::is_ascii_digit) {
        return Err(GifError::InvalidDurationLine { line });
    }

    let ms = text
        .iter()
        .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'));
    check_duration(ms)?;
    Ok(Some(ms))
}

/// Consumes one line per frame. The first bad line is remembered and stops
/// the walk.
pub struct DurationFileSetter<L> {
    lines: L,
    rounder: DelayRounder,
    error: Option<GifError>,
}

impl<L: LineSource> DurationFileSetter<L> {
    pub fn new(lines: L) -> Self {
        Self {
            lines,
            rounder: DelayRounder::default(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&GifError> {
        self.error.as_ref()
    }

    pub fn into_error(self) -> Option<GifError> {
        self.error
    }

    fn next_delay(&mut self, frame: usize) -> Result<Option<u16>, GifError> {
        let raw = self
            .lines
            .next_line(LINE_READ_LIMIT)?
            .ok_or(GifError::DurationsExhausted { frame })?;
        let ms = parse_line(&raw, frame)?;
        Ok(ms.map(|ms| self.rounder.units(ms)))
    }
}

impl<L: LineSource> FrameVisitor for DurationFileSetter<L> {
    fn frame(&mut self, frame: Frame) -> FrameAction {
        if self.error.is_some() {
            return FrameAction::Abort;
        }
        match self.next_delay(frame.number) {
            Ok(Some(delay)) => FrameAction::Replace(delay),
            Ok(None) => FrameAction::Keep,
            Err(error) => {
                warn!(frame = frame.index(), %error, "durations list rejected");
                self.error = Some(error);
                FrameAction::Abort
            }
        }
    }
}

/// Rewrite every frame's delay from `lines`, one millisecond value per frame.
///
/// A durations list that runs out early or contains a bad line fails the
/// whole operation, even though the walk itself stopped cleanly; frames
/// before the failing line have already been rewritten.
pub fn set_durations_from_lines<S, L>(
    stream: S,
    lines: L,
    abort_count: AbortCount,
) -> Result<WalkResult, WalkFailure>
where
    S: Read + Write + Seek,
    L: LineSource,
{
    let mut setter = DurationFileSetter::new(lines);
    let options = WalkOptions::write().with_abort_count(abort_count);
    let walked = walk(stream, Some(&mut setter), options);

    if let Some(error) = setter.into_error() {
        let modifications = match &walked {
            Ok(result) => result.modifications,
            Err(failure) => failure.modifications,
        };
        return Err(WalkFailure {
            error,
            modifications,
        });
    }

    let result = walked?;
    info!(
        frames = ?result.frame_count,
        modifications = result.modifications,
        changes = result.changes,
        "durations applied"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::fixtures::{delays_of, gif_with_delays};

    fn apply(delays: &[u16], list: &str) -> (Result<WalkResult, WalkFailure>, Vec<u16>) {
        let mut stream = Cursor::new(gif_with_delays(delays));
        let result = set_durations_from_lines(&mut stream, list.as_bytes(), AbortCount::Discard);
        let after = delays_of(stream.get_ref());
        (result, after)
    }

    #[test]
    fn parses_lines() {
        assert_eq!(parse_line(b"40\n", 1).unwrap(), Some(40));
        assert_eq!(parse_line(b"40\r\n", 1).unwrap(), Some(40));
        assert_eq!(parse_line(b"655350", 1).unwrap(), Some(655_350));
    }

    #[test]
    fn rejects_values_beyond_delay_field() {
        assert!(matches!(
            parse_line(b"999999\n", 4),
            Err(GifError::DurationOutOfRange(999_999))
        ));
    }

    #[test]
    fn empty_line_keeps_frame() {
        assert_eq!(parse_line(b"\n", 3).unwrap(), None);
        assert_eq!(parse_line(b"\r\n", 3).unwrap(), None);
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(matches!(
            parse_line(b"4 0\n", 2),
            Err(GifError::InvalidDurationLine { line: 2 })
        ));
        assert!(matches!(
            parse_line(b"-40\n", 2),
            Err(GifError::InvalidDurationLine { line: 2 })
        ));
        assert!(matches!(
            parse_line(b"1234567\n", 5),
            Err(GifError::DurationLineTooLong { line: 5 })
        ));
    }

    #[test]
    fn applies_each_line() {
        let (result, after) = apply(&[1, 1, 1], "50\n\n120\n");
        let result = result.unwrap();
        assert_eq!(result.modifications, 2);
        assert_eq!(result.frame_count, Some(3));
        assert_eq!(after, vec![5, 1, 12]);
    }

    #[test]
    fn remainder_spans_the_whole_list() {
        let (result, after) = apply(&[0, 0, 0, 0], "35\n25\n33\n37\n");
        result.unwrap();
        // remainders 5, 10, 3, 10
        assert_eq!(after, vec![3, 3, 3, 4]);
    }

    #[test]
    fn extra_lines_are_ignored() {
        let (result, after) = apply(&[1], "20\n30\n40\n");
        assert_eq!(result.unwrap().modifications, 1);
        assert_eq!(after, vec![2]);
    }

    #[test]
    fn exhausted_list_fails_with_partial_writes() {
        let (result, after) = apply(&[1, 1, 1], "70\n80\n");
        let failure = result.unwrap_err();
        assert!(matches!(
            failure.error,
            GifError::DurationsExhausted { frame: 3 }
        ));
        assert_eq!(failure.modifications, 2);
        assert_eq!(after, vec![7, 8, 1]);
    }

    #[test]
    fn invalid_line_stops_the_walk() {
        let (result, after) = apply(&[1, 1, 1], "70\nabc\n90\n");
        let failure = result.unwrap_err();
        assert!(matches!(
            failure.error,
            GifError::InvalidDurationLine { line: 2 }
        ));
        assert_eq!(after, vec![7, 1, 1]);
    }

    #[test]
    fn error_is_sticky() {
        let mut setter = DurationFileSetter::new("x\n10\n".as_bytes());
        assert_eq!(setter.frame(Frame { number: 1, delay: 0 }), FrameAction::Abort);
        assert_eq!(setter.frame(Frame { number: 2, delay: 0 }), FrameAction::Abort);
        assert!(setter.error().is_some());
    }
}
