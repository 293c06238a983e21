//! Simulated speech engine.
//!
//! "Speaks" on a background thread by walking the utterance word by word at a
//! fixed pace and reporting progress, without producing any audio. Stands in
//! for a platform synthesizer on desktop builds and in tests.

use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use super::{EngineError, EngineEvent, SpeechEngine, StopBoundary, UtteranceId};
use crate::app::EventSink;
use crate::locale::LanguageTag;
use crate::model::Voice;

const DEFAULT_WORD_INTERVAL: Duration = Duration::from_millis(300);
const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Internal playback state shared with the speaking thread.
#[derive(Default)]
struct PlaybackState {
    /// Bumped on every speak/immediate stop; a thread whose generation is
    /// stale exits without reporting anything.
    generation: u64,
    /// Utterance the current playback reports for
    utterance: UtteranceId,
    is_playing: bool,
    is_paused: bool,
    /// Stop after the current word
    stop_at_word: bool,
}

/// Speech engine that reports word progress on a timer.
pub struct SimulatedEngine {
    voices: Vec<Voice>,
    sink: EventSink,
    word_interval: Duration,
    state: Arc<Mutex<PlaybackState>>,
}

fn lock(state: &Mutex<PlaybackState>) -> MutexGuard<'_, PlaybackState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimulatedEngine {
    pub fn new(voices: Vec<Voice>, sink: EventSink) -> Self {
        Self {
            voices,
            sink,
            word_interval: DEFAULT_WORD_INTERVAL,
            state: Arc::new(Mutex::new(PlaybackState::default())),
        }
    }

    /// Time spent on each word.
    pub fn with_word_interval(mut self, interval: Duration) -> Self {
        self.word_interval = interval;
        self
    }

    pub fn is_playing(&self) -> bool {
        let state = lock(&self.state);
        state.is_playing && !state.is_paused
    }

    pub fn is_paused(&self) -> bool {
        lock(&self.state).is_paused
    }

    pub fn pause(&mut self) {
        let mut state = lock(&self.state);
        if state.is_playing && !state.is_paused {
            state.is_paused = true;
            self.sink.emit(state.utterance, EngineEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        let mut state = lock(&self.state);
        if state.is_playing && state.is_paused {
            state.is_paused = false;
            self.sink.emit(state.utterance, EngineEvent::Resumed);
        }
    }

    /// Scalar-offset ranges of the whitespace-separated words in `text`.
    fn word_ranges(text: &str) -> Vec<Range<usize>> {
        let mut words = Vec::new();
        let mut start = None;
        for (i, c) in text.chars().enumerate() {
            match (c.is_whitespace(), start) {
                (false, None) => start = Some(i),
                (true, Some(s)) => {
                    words.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            words.push(s..text.chars().count());
        }
        words
    }

    /// Start a background thread that walks the words of one utterance.
    fn start_speaking_thread(
        &self,
        utterance: UtteranceId,
        words: Vec<Range<usize>>,
        generation: u64,
    ) {
        let state = Arc::clone(&self.state);
        let sink = self.sink.clone();
        let interval = self.word_interval;

        thread::spawn(move || {
            let mut next_word = 0;
            loop {
                {
                    let mut guard = lock(&state);

                    // Superseded by a newer utterance or an immediate stop
                    if guard.generation != generation {
                        return;
                    }

                    if guard.is_paused {
                        drop(guard);
                        thread::sleep(PAUSE_POLL_INTERVAL);
                        continue;
                    }

                    if guard.stop_at_word {
                        guard.is_playing = false;
                        guard.stop_at_word = false;
                        sink.emit(utterance, EngineEvent::Cancelled);
                        return;
                    }

                    let Some(word) = words.get(next_word) else {
                        guard.is_playing = false;
                        sink.emit(utterance, EngineEvent::Finished);
                        return;
                    };
                    sink.emit(utterance, EngineEvent::Progress(word.clone()));
                }

                next_word += 1;
                thread::sleep(interval);
            }
        });
    }
}

impl SpeechEngine for SimulatedEngine {
    fn available_voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn default_voice(&self, language: &str) -> Option<Voice> {
        if let Some(voice) = self.voices.iter().find(|v| v.language == language) {
            return Some(voice.clone());
        }
        let wanted = LanguageTag::parse(language)?;
        self.voices
            .iter()
            .find(|v| {
                LanguageTag::parse(&v.language)
                    .is_some_and(|tag| tag.language() == wanted.language())
            })
            .cloned()
    }

    fn speak(
        &mut self,
        utterance: UtteranceId,
        text: &str,
        voice_id: &str,
    ) -> Result<(), EngineError> {
        if !self.voices.iter().any(|v| v.id == voice_id) {
            return Err(EngineError::UnknownVoice(voice_id.to_string()));
        }

        // Stop any current utterance
        self.stop(StopBoundary::Immediate)?;

        let words = Self::word_ranges(text);
        info!(utterance, voice_id, words = words.len(), "Simulated engine speaking");

        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.utterance = utterance;
            state.is_playing = true;
            state.is_paused = false;
            state.stop_at_word = false;
            self.sink.emit(utterance, EngineEvent::Started);
            state.generation
        };

        self.start_speaking_thread(utterance, words, generation);
        Ok(())
    }

    fn stop(&mut self, boundary: StopBoundary) -> Result<(), EngineError> {
        let mut state = lock(&self.state);
        if !state.is_playing {
            return Ok(());
        }

        debug!(?boundary, "Simulated engine stopping");
        match boundary {
            StopBoundary::Immediate => {
                state.generation += 1;
                state.is_playing = false;
                state.is_paused = false;
                state.stop_at_word = false;
                self.sink.emit(state.utterance, EngineEvent::Cancelled);
            }
            StopBoundary::Word => {
                state.is_paused = false;
                state.stop_at_word = true;
            }
        }
        Ok(())
    }
}
