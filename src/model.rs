//! Domain model for the application state

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::locale::{system_locale, BuiltinLocaleResolver, LanguageTag, LocaleResolver};
use crate::preferences::PreferenceStore;
use crate::providers::{AudioSession, EngineEvent, SpeechEngine, UtteranceId};
use crate::tracker::SpeechProgressTracker;

/// Engine-reported fidelity tier of a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceQuality {
    #[default]
    Standard,
    Enhanced,
    Premium,
}

impl VoiceQuality {
    /// Enhanced and premium voices are preferred when picking a default.
    pub fn is_high_fidelity(self) -> bool {
        !matches!(self, VoiceQuality::Standard)
    }
}

/// A named, language-tagged synthesis profile provided by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    /// BCP-47 style tag, e.g. "en-US"
    pub language: String,
    #[serde(default)]
    pub quality: VoiceQuality,
}

impl Voice {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        language: impl Into<String>,
        quality: VoiceQuality,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
            quality,
        }
    }
}

/// Voices sharing a language (and region, when the language has several).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceGroup {
    /// "English" or "English (United Kingdom)"
    pub label: String,
    /// Lower-case language code of the group's voices
    pub language: String,
    /// Upper-case region code, `None` for region-less tags
    pub region: Option<String>,
    pub voices: Vec<Voice>,
}

impl VoiceGroup {
    pub fn first_high_fidelity(&self) -> Option<&Voice> {
        self.voices.iter().find(|v| v.quality.is_high_fidelity())
    }
}

/// The voice in use together with the label of the group it was picked from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedVoice {
    pub voice: Voice,
    pub group_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    TextChanged(String),
    SelectVoice(Voice),
    PlayStop,
    /// App returned to the foreground (also sent once at startup)
    Foregrounded,
    VoicesLoaded(Vec<Voice>),
    /// An engine callback for the given utterance
    Engine(UtteranceId, EngineEvent),
    AudioSessionGraceElapsed(u64),
    StopWatchdogElapsed(UtteranceId),
    LogLevelSelected(LogLevel),
}

/// Collaborators the application drives.
pub struct Services {
    pub engine: Box<dyn SpeechEngine>,
    pub audio: Box<dyn AudioSession>,
    pub preferences: PreferenceStore,
    pub resolver: Box<dyn LocaleResolver>,
}

impl Services {
    /// Services with the built-in English locale tables.
    pub fn new(
        engine: Box<dyn SpeechEngine>,
        audio: Box<dyn AudioSession>,
        preferences: PreferenceStore,
    ) -> Self {
        Self {
            engine,
            audio,
            preferences,
            resolver: Box::new(BuiltinLocaleResolver),
        }
    }
}

/// Application state.
///
/// Note: Does not derive `Clone` because the engine and audio session are
/// platform resources that cannot be cloned.
pub struct App {
    pub text: String,
    pub groups: Vec<VoiceGroup>,
    pub selected: Option<SelectedVoice>,
    pub tracker: SpeechProgressTracker,
    pub audio_session_active: bool,
    pub system_locale: LanguageTag,
    pub config: Config,
    /// Where log level changes are persisted; `None` keeps them in memory
    pub config_path: Option<PathBuf>,
    pub engine: Box<dyn SpeechEngine>,
    pub audio: Box<dyn AudioSession>,
    pub preferences: PreferenceStore,
    pub resolver: Box<dyn LocaleResolver>,
    pub(crate) deactivation_generation: u64,
    pub(crate) utterance_generation: UtteranceId,
}

impl App {
    /// Create a new app. The voice catalog stays empty until the first
    /// [`Message::Foregrounded`] or [`Message::VoicesLoaded`].
    pub fn new(services: Services, config: Config, config_path: Option<PathBuf>) -> Self {
        let tracker = SpeechProgressTracker::new(services.engine.offset_unit());
        let system_locale = system_locale(config.system_locale.as_deref());
        Self {
            text: String::new(),
            groups: Vec::new(),
            selected: None,
            tracker,
            audio_session_active: false,
            system_locale,
            config,
            config_path,
            engine: services.engine,
            audio: services.audio,
            preferences: services.preferences,
            resolver: services.resolver,
            deactivation_generation: 0,
            utterance_generation: 0,
        }
    }

    /// No voices are installed (or none were found yet).
    pub fn has_no_voices(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_preference() {
        assert!(!VoiceQuality::Standard.is_high_fidelity());
        assert!(VoiceQuality::Enhanced.is_high_fidelity());
        assert!(VoiceQuality::Premium.is_high_fidelity());
    }

    #[test]
    fn log_level_serializes_lowercase() {
        let json = serde_json::to_string(&LogLevel::Debug).unwrap();
        assert_eq!(json, "\"debug\"");
        let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(level, LogLevel::Warn);
    }

    #[test]
    fn group_prefers_high_fidelity_voice() {
        let group = VoiceGroup {
            label: "English".into(),
            language: "en".into(),
            region: Some("US".into()),
            voices: vec![
                Voice::new("a", "Alex", "en-US", VoiceQuality::Standard),
                Voice::new("b", "Zoe", "en-US", VoiceQuality::Premium),
            ],
        };
        assert_eq!(group.first_high_fidelity().map(|v| v.id.as_str()), Some("b"));
    }
}
