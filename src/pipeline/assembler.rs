//! Ordering of raw transcript events into monotonic segments.
//!
//! A single "last end time" cursor is all the state needed: each retained
//! event opens a segment at the cursor and moves the cursor to its own end
//! time, which makes overlaps and gaps impossible by construction.

use crate::pipeline::types::{TranscriptEvent, TranscriptionSegment};

/// Assembles finalized transcript events into ordered segments.
#[derive(Debug, Default)]
pub struct SegmentAssembler {
    cursor: f64,
    segments: Vec<TranscriptionSegment>,
}

impl SegmentAssembler {
    /// Creates an assembler with the cursor seeded at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor position in seconds.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Number of segments assembled so far.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segments have been assembled yet.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Feeds one event through the assembler.
    ///
    /// Non-final events, empty text, and events whose end time does not
    /// advance past the cursor are dropped. Returns whether a segment was
    /// emitted.
    pub fn push(&mut self, event: &TranscriptEvent) -> bool {
        if !event.is_final || event.text.is_empty() {
            return false;
        }
        if event.end_time_secs <= self.cursor {
            // Stale or duplicate result
            return false;
        }

        self.segments.push(TranscriptionSegment {
            text: event.text.clone(),
            start_time: self.cursor,
            end_time: event.end_time_secs,
        });
        self.cursor = event.end_time_secs;
        true
    }

    /// Consumes the assembler, returning segments in arrival order.
    pub fn into_segments(self) -> Vec<TranscriptionSegment> {
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_event(text: &str, end: f64) -> TranscriptEvent {
        TranscriptEvent {
            is_final: true,
            text: text.to_string(),
            end_time_secs: end,
        }
    }

    #[test]
    fn first_segment_starts_at_zero() {
        let mut assembler = SegmentAssembler::new();
        assert!(assembler.push(&final_event("hello", 0.8)));

        let segments = assembler.into_segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_time, 0.0);
        assert_eq!(segments[0].end_time, 0.8);
    }

    #[test]
    fn each_segment_starts_where_the_previous_ended() {
        let mut assembler = SegmentAssembler::new();
        assembler.push(&final_event("one", 0.8));
        assembler.push(&final_event("two", 2.0));
        assembler.push(&final_event("three", 2.5));

        let segments = assembler.into_segments();
        assert_eq!(segments.len(), 3);
        for pair in segments.windows(2) {
            assert!(pair[0].end_time <= pair[1].start_time);
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
    }

    #[test]
    fn non_final_events_are_ignored() {
        let mut assembler = SegmentAssembler::new();
        let partial = TranscriptEvent {
            is_final: false,
            text: "partia".to_string(),
            end_time_secs: 1.0,
        };
        assert!(!assembler.push(&partial));
        assert_eq!(assembler.cursor(), 0.0);
        assert!(assembler.is_empty());
    }

    #[test]
    fn empty_text_is_ignored() {
        let mut assembler = SegmentAssembler::new();
        assert!(!assembler.push(&final_event("", 1.0)));
        assert_eq!(assembler.cursor(), 0.0);
    }

    #[test]
    fn stale_event_never_moves_the_cursor() {
        let mut assembler = SegmentAssembler::new();
        assembler.push(&final_event("first", 2.0));

        // Equal to the cursor
        assert!(!assembler.push(&final_event("dup", 2.0)));
        assert_eq!(assembler.cursor(), 2.0);
        assert_eq!(assembler.len(), 1);

        // Behind the cursor
        assert!(!assembler.push(&final_event("late", 1.5)));
        assert_eq!(assembler.cursor(), 2.0);
        assert_eq!(assembler.len(), 1);
    }

    #[test]
    fn zero_end_time_on_fresh_assembler_is_dropped() {
        let mut assembler = SegmentAssembler::new();
        assert!(!assembler.push(&final_event("nothing", 0.0)));
        assert!(assembler.is_empty());
    }

    #[test]
    fn insertion_order_matches_arrival_order() {
        let mut assembler = SegmentAssembler::new();
        assembler.push(&final_event("a", 1.0));
        assembler.push(&final_event("b", 1.5));
        assembler.push(&final_event("c", 4.0));

        let texts: Vec<String> = assembler
            .into_segments()
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
