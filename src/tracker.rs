//! Speaking-progress state machine.
//!
//! Folds raw engine callbacks into a speaking/idle state and a clamped,
//! ordered range of the word currently being spoken.

use std::ops::Range;

use tracing::{debug, trace};

use crate::providers::{EngineEvent, OffsetUnit, UtteranceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeakingState {
    #[default]
    Idle,
    Speaking,
}

/// Inclusive unicode-scalar offsets into the utterance text.
///
/// Always `lower <= upper` and both inside `[0, len - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakingRange {
    pub lower: usize,
    pub upper: usize,
}

/// What an event did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Started,
    Progressed,
    /// Speaking ended; the audio session may be released after a grace period
    Stopped,
}

#[derive(Debug, Default)]
pub struct SpeechProgressTracker {
    state: SpeakingState,
    range: Option<SpeakingRange>,
    /// Events tagged with any other utterance are stale
    current: UtteranceId,
    utterance: String,
    scalar_len: usize,
    unit: OffsetUnit,
}

impl SpeechProgressTracker {
    pub fn new(unit: OffsetUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SpeakingState {
        self.state
    }

    pub fn is_speaking(&self) -> bool {
        self.state == SpeakingState::Speaking
    }

    /// Current word, `None` while idle or before the first progress event.
    pub fn range(&self) -> Option<SpeakingRange> {
        match self.state {
            SpeakingState::Idle => None,
            SpeakingState::Speaking => self.range,
        }
    }

    /// Text of the current (or last) utterance.
    pub fn utterance(&self) -> &str {
        &self.utterance
    }

    /// Id of the current (or last) utterance.
    pub fn utterance_id(&self) -> UtteranceId {
        self.current
    }

    /// Mark speaking as soon as an utterance is submitted, before the
    /// engine confirms it, so a pending audio-session release sees us busy.
    pub fn begin_utterance(&mut self, id: UtteranceId, text: &str) {
        self.current = id;
        self.utterance = text.to_string();
        self.scalar_len = text.chars().count();
        self.state = SpeakingState::Speaking;
        self.range = None;
    }

    /// Return to idle without an engine event (stop watchdog).
    pub fn force_idle(&mut self) -> Transition {
        self.stop()
    }

    /// Fold one engine event into the state. Events from an earlier
    /// utterance (a late `Cancelled` after a forced stop) are ignored.
    pub fn apply(&mut self, utterance: UtteranceId, event: &EngineEvent) -> Transition {
        if utterance != self.current {
            debug!(utterance, current = self.current, ?event, "Stale engine event ignored");
            return Transition::Unchanged;
        }
        match event {
            EngineEvent::Started => {
                self.state = SpeakingState::Speaking;
                self.range = None;
                Transition::Started
            }
            EngineEvent::Resumed => {
                if self.state == SpeakingState::Idle {
                    self.state = SpeakingState::Speaking;
                    self.range = None;
                }
                Transition::Started
            }
            EngineEvent::Progress(raw) => {
                if self.state == SpeakingState::Idle {
                    debug!(?raw, "Progress while idle ignored");
                    return Transition::Unchanged;
                }
                match self.normalize(raw) {
                    Some(range) => {
                        trace!(lower = range.lower, upper = range.upper, "Speaking range");
                        self.range = Some(range);
                        Transition::Progressed
                    }
                    None => Transition::Unchanged,
                }
            }
            EngineEvent::Paused => Transition::Unchanged,
            EngineEvent::Cancelled | EngineEvent::Finished => self.stop(),
        }
    }

    fn stop(&mut self) -> Transition {
        self.range = None;
        if self.state == SpeakingState::Idle {
            return Transition::Unchanged;
        }
        self.state = SpeakingState::Idle;
        Transition::Stopped
    }

    /// Convert a raw `[start, end)` range into clamped inclusive scalar bounds.
    fn normalize(&self, raw: &Range<usize>) -> Option<SpeakingRange> {
        if self.scalar_len == 0 {
            return None;
        }

        let (start, end) = match self.unit {
            OffsetUnit::UnicodeScalar => (raw.start, raw.end),
            OffsetUnit::Utf16 => (
                utf16_to_scalar_floor(&self.utterance, raw.start),
                utf16_to_scalar_ceil(&self.utterance, raw.end),
            ),
        };

        // Reversed reports carry the exclusive bound first
        let (lower, upper) = if start <= end {
            (start, end.saturating_sub(1))
        } else {
            (end.saturating_sub(1), start.saturating_sub(1))
        };
        let last = self.scalar_len - 1;
        let (lower, upper) = (lower.min(last), upper.min(last));

        Some(SpeakingRange {
            lower: lower.min(upper),
            upper: lower.max(upper),
        })
    }
}

/// Scalars that end at or before a UTF-16 offset.
fn utf16_to_scalar_floor(text: &str, offset: usize) -> usize {
    let mut units = 0;
    let mut scalars = 0;
    for c in text.chars() {
        units += c.len_utf16();
        if units > offset {
            break;
        }
        scalars += 1;
    }
    scalars
}

/// Scalars that start before a UTF-16 offset.
fn utf16_to_scalar_ceil(text: &str, offset: usize) -> usize {
    let mut units = 0;
    let mut scalars = 0;
    for c in text.chars() {
        if units >= offset {
            break;
        }
        units += c.len_utf16();
        scalars += 1;
    }
    if units < offset {
        // Past the end of the text; keep the excess so clamping sees it
        scalars + (offset - units)
    } else {
        scalars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: UtteranceId = 1;

    fn speaking(text: &str) -> SpeechProgressTracker {
        let mut tracker = SpeechProgressTracker::new(OffsetUnit::UnicodeScalar);
        tracker.begin_utterance(ID, text);
        tracker.apply(ID, &EngineEvent::Started);
        tracker
    }

    fn assert_well_formed(tracker: &SpeechProgressTracker) {
        let range = tracker.range().unwrap();
        assert!(range.lower <= range.upper);
        assert!(range.upper < tracker.utterance().chars().count());
    }

    #[test]
    fn progress_is_converted_to_inclusive_bounds() {
        let mut tracker = speaking("hello world");
        assert_eq!(tracker.apply(ID, &EngineEvent::Progress(6..11)), Transition::Progressed);
        assert_eq!(tracker.range(), Some(SpeakingRange { lower: 6, upper: 10 }));
    }

    #[test]
    fn reversed_range_is_reordered() {
        let mut tracker = speaking("0123456789");
        #[allow(clippy::reversed_empty_ranges)]
        tracker.apply(ID, &EngineEvent::Progress(5..2));
        assert_eq!(tracker.range(), Some(SpeakingRange { lower: 1, upper: 4 }));
        assert_well_formed(&tracker);
    }

    #[test]
    fn upper_bound_past_end_is_clamped() {
        let mut tracker = speaking("0123456789");
        tracker.apply(ID, &EngineEvent::Progress(7..40));
        assert_eq!(tracker.range(), Some(SpeakingRange { lower: 7, upper: 9 }));

        tracker.apply(ID, &EngineEvent::Progress(25..40));
        assert_eq!(tracker.range(), Some(SpeakingRange { lower: 9, upper: 9 }));
    }

    #[test]
    fn bounds_always_well_formed() {
        let mut tracker = speaking("short");
        for (a, b) in [(0, 0), (0, 1), (4, 0), (99, 3), (3, 99), (100, 100)] {
            tracker.apply(ID, &EngineEvent::Progress(a..b));
            assert_well_formed(&tracker);
        }
    }

    #[test]
    fn empty_utterance_never_gets_a_range() {
        let mut tracker = speaking("");
        assert_eq!(tracker.apply(ID, &EngineEvent::Progress(0..3)), Transition::Unchanged);
        assert_eq!(tracker.range(), None);
    }

    #[test]
    fn utf16_offsets_map_to_scalars() {
        let mut tracker = SpeechProgressTracker::new(OffsetUnit::Utf16);
        // "🙂" is two UTF-16 units
        tracker.begin_utterance(ID, "🙂 hi there");
        tracker.apply(ID, &EngineEvent::Progress(3..5));
        assert_eq!(tracker.range(), Some(SpeakingRange { lower: 2, upper: 3 }));

        tracker.apply(ID, &EngineEvent::Progress(0..2));
        assert_eq!(tracker.range(), Some(SpeakingRange { lower: 0, upper: 0 }));
    }

    #[test]
    fn started_progress_finished_ends_idle() {
        let mut tracker = speaking("hello there");
        tracker.apply(ID, &EngineEvent::Progress(0..3));
        assert_eq!(tracker.apply(ID, &EngineEvent::Finished), Transition::Stopped);
        assert_eq!(tracker.state(), SpeakingState::Idle);
        assert_eq!(tracker.range(), None);
    }

    #[test]
    fn progress_while_idle_is_ignored() {
        let mut tracker = SpeechProgressTracker::new(OffsetUnit::UnicodeScalar);
        assert_eq!(tracker.apply(0, &EngineEvent::Progress(0..3)), Transition::Unchanged);
        assert_eq!(tracker.state(), SpeakingState::Idle);
        assert_eq!(tracker.range(), None);
    }

    #[test]
    fn pause_is_a_no_op() {
        let mut tracker = speaking("hello");
        tracker.apply(ID, &EngineEvent::Progress(0..5));
        assert_eq!(tracker.apply(ID, &EngineEvent::Paused), Transition::Unchanged);
        assert!(tracker.is_speaking());
        assert_eq!(tracker.range(), Some(SpeakingRange { lower: 0, upper: 4 }));
    }

    #[test]
    fn resume_from_idle_clears_range() {
        let mut tracker = speaking("hello");
        tracker.apply(ID, &EngineEvent::Cancelled);
        assert_eq!(tracker.apply(ID, &EngineEvent::Resumed), Transition::Started);
        assert!(tracker.is_speaking());
        assert_eq!(tracker.range(), None);
    }

    #[test]
    fn late_events_from_an_earlier_utterance_are_ignored() {
        let mut tracker = speaking("first");
        assert_eq!(tracker.force_idle(), Transition::Stopped);

        tracker.begin_utterance(ID + 1, "second utterance");
        tracker.apply(ID + 1, &EngineEvent::Started);
        tracker.apply(ID + 1, &EngineEvent::Progress(0..6));

        assert_eq!(tracker.apply(ID, &EngineEvent::Cancelled), Transition::Unchanged);
        assert_eq!(tracker.apply(ID, &EngineEvent::Progress(7..16)), Transition::Unchanged);
        assert_eq!(tracker.state(), SpeakingState::Speaking);
        assert_eq!(tracker.range(), Some(SpeakingRange { lower: 0, upper: 5 }));
        assert_eq!(tracker.utterance_id(), ID + 1);
    }

    #[test]
    fn duplicate_end_events_stop_once() {
        let mut tracker = speaking("hello");
        assert_eq!(tracker.apply(ID, &EngineEvent::Cancelled), Transition::Stopped);
        assert_eq!(tracker.apply(ID, &EngineEvent::Finished), Transition::Unchanged);
        assert_eq!(tracker.force_idle(), Transition::Unchanged);
    }
}
