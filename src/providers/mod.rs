//! Speech engine and audio session seams.
//!
//! The platform synthesizer is a black box: it speaks text with a voice,
//! stops on request, and reports lifecycle and progress through an
//! [`EventSink`](crate::app::EventSink) from whatever thread it likes,
//! tagged with the utterance they belong to.

mod simulated;

use std::ops::Range;

use tracing::debug;

use crate::model::Voice;

pub use simulated::SimulatedEngine;

/// Errors reported by a speech engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown voice: {0}")]
    UnknownVoice(String),

    #[error("Speech engine error: {0}")]
    ProcessError(String),
}

/// Errors reported when toggling the audio output session.
#[derive(Debug, thiserror::Error)]
pub enum AudioSessionError {
    #[error("Could not set audio session active to {active}: {reason}")]
    SetActive { active: bool, reason: String },
}

/// Identifies one `speak` request. Engines echo it back with every event so
/// late callbacks from an earlier utterance can be told apart.
pub type UtteranceId = u64;

/// Lifecycle and progress callbacks of a single utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Started,
    /// Raw `[start, end)` offsets of the word about to be spoken, in the
    /// engine's [`OffsetUnit`]. May be out of bounds or reversed.
    Progress(Range<usize>),
    Paused,
    Resumed,
    Cancelled,
    Finished,
}

/// Where the engine should stop when asked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBoundary {
    /// Cut audio now without draining buffers
    Immediate,
    /// Finish the current word first
    Word,
}

/// Unit of the offsets carried by [`EngineEvent::Progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetUnit {
    #[default]
    UnicodeScalar,
    Utf16,
}

/// Trait for text-to-speech engines.
pub trait SpeechEngine {
    /// Voices currently installed. May be empty while voice packs download.
    fn available_voices(&self) -> Vec<Voice>;

    /// The engine's own choice for a language tag such as "en-US".
    fn default_voice(&self, language: &str) -> Option<Voice>;

    /// Unit of progress offsets this engine reports.
    fn offset_unit(&self) -> OffsetUnit {
        OffsetUnit::UnicodeScalar
    }

    /// Start speaking `text` with the given voice, reporting events for
    /// `utterance`.
    fn speak(
        &mut self,
        utterance: UtteranceId,
        text: &str,
        voice_id: &str,
    ) -> Result<(), EngineError>;

    /// Stop speaking. The engine must still report `Cancelled` or `Finished`.
    fn stop(&mut self, boundary: StopBoundary) -> Result<(), EngineError>;
}

/// Platform audio output session (e.g. the shared playback session on mobile).
pub trait AudioSession {
    fn set_active(&mut self, active: bool) -> Result<(), AudioSessionError>;
}

/// Audio session for platforms where output needs no activation.
#[derive(Debug, Default)]
pub struct NoopAudioSession;

impl AudioSession for NoopAudioSession {
    fn set_active(&mut self, active: bool) -> Result<(), AudioSessionError> {
        debug!(active, "Audio session toggled (no-op)");
        Ok(())
    }
}
