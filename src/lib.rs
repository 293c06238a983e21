//! Core of a type-and-speak app.
//!
//! The user types text, picks a voice and has the text read aloud while the
//! word being spoken is highlighted. This crate holds everything below the
//! widgets:
//!
//! - [`catalog`] groups installed voices for the picker and picks a default
//! - [`preferences`] remembers the chosen voice between launches
//! - [`tracker`] turns engine progress callbacks into a clamped word range
//! - [`update`] and [`app`] wire those together behind a message loop
//! - [`view`] has the small pure helpers a rendering surface needs
//!
//! The speech engine and audio session are traits in [`providers`]; a
//! [`SimulatedEngine`](providers::SimulatedEngine) is included.

pub mod app;
pub mod catalog;
pub mod config;
pub mod locale;
pub mod logging;
pub mod model;
pub mod preferences;
pub mod providers;
pub mod tracker;
pub mod update;
pub mod view;

pub use app::{channel, EventSink, Runtime, Task};
pub use config::Config;
pub use model::{App, LogLevel, Message, SelectedVoice, Services, Voice, VoiceGroup, VoiceQuality};
pub use preferences::{PreferenceStore, VoicePreference};
pub use providers::{AudioSession, EngineEvent, SpeechEngine, StopBoundary, UtteranceId};
pub use tracker::{SpeakingRange, SpeakingState, SpeechProgressTracker};
