//! Property-based invariants of the walker and the setters.

mod common;

use std::io::Cursor;

use gif_delay::{AbortCount, FrameRange, WalkOptions, scan, set_range_duration, walk};
use proptest::prelude::*;

use common::{delays_of, gif_with_delays};

proptest! {
    #[test]
    fn read_only_walk_counts_every_frame(delays in prop::collection::vec(any::<u16>(), 0..32)) {
        let gif = gif_with_delays(&delays);
        let result = scan(Cursor::new(gif), None, AbortCount::Discard).unwrap();
        prop_assert_eq!(result.frame_count, Some(delays.len()));
        prop_assert_eq!(result.modifications, 0);
    }

    #[test]
    fn rewriting_never_changes_length(
        delays in prop::collection::vec(any::<u16>(), 1..16),
        value in any::<u16>(),
    ) {
        let gif = gif_with_delays(&delays);
        let len = gif.len();
        let mut stream = Cursor::new(gif);
        let mut visitor = |_: gif_delay::Frame| gif_delay::FrameAction::Replace(value);
        let result = walk(&mut stream, Some(&mut visitor), WalkOptions::write()).unwrap();
        prop_assert_eq!(result.modifications, delays.len());

        let bytes = stream.into_inner();
        prop_assert_eq!(bytes.len(), len);
        prop_assert_eq!(delays_of(&bytes), vec![value; delays.len()]);
    }

    #[test]
    fn range_mean_converges_to_target(
        start in 0usize..6,
        len in 1usize..40,
        ms in 1u32..5000,
    ) {
        let end = start + len - 1;
        let mut stream = Cursor::new(gif_with_delays(&vec![0u16; end + 3]));
        let range = FrameRange::new(start, end).unwrap();
        set_range_duration(&mut stream, range, ms, AbortCount::Discard).unwrap();

        let delays = delays_of(stream.get_ref());
        let emitted: u64 = delays[start..=end].iter().map(|&d| u64::from(d)).sum();
        let target = u64::from(ms) * len as u64;
        // mean * 10 within 10 / len of the target
        prop_assert!(target >= emitted * 10);
        prop_assert!(target - emitted * 10 < 10);

        prop_assert!(delays[..start].iter().all(|&d| d == 0));
        prop_assert!(delays[end + 1..].iter().all(|&d| d == 0));
    }
}
