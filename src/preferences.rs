//! Persisted voice selection.
//!
//! A tiny JSON record next to the app's data:
//! `{ "voice": "<name>", "voiceId": "<id>", "lang": "<tag>" }`.
//! Older records lack `voiceId` and are matched by name.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::APP_DIR;
use crate::model::Voice;

pub const PREFERENCE_FILE: &str = "selectedVoice.json";

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("No data directory available for the preference file")]
    NoLocation,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed preference record: {0}")]
    Json(#[from] serde_json::Error),
}

/// The last voice the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicePreference {
    #[serde(rename = "voice")]
    pub voice_name: String,
    #[serde(rename = "voiceId", default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(rename = "lang")]
    pub language: String,
}

impl VoicePreference {
    /// Exact match: same language tag and same id, or same name when the
    /// record predates ids.
    pub fn matches(&self, voice: &Voice) -> bool {
        if voice.language != self.language {
            return false;
        }
        match self.voice_id.as_deref() {
            Some(id) if !id.is_empty() => voice.id == id,
            _ => voice.name == self.voice_name,
        }
    }
}

impl From<&Voice> for VoicePreference {
    fn from(voice: &Voice) -> Self {
        Self {
            voice_name: voice.name.clone(),
            voice_id: Some(voice.id.clone()),
            language: voice.language.clone(),
        }
    }
}

/// Best-effort storage of the selected voice.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// `<data dir>/simple-aac/selectedVoice.json`
    pub fn at_default_location() -> Self {
        Self {
            path: dirs::data_dir().map(|d| d.join(APP_DIR).join(PREFERENCE_FILE)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Remember `voice` for the next launch. Failures are logged and dropped.
    pub fn save(&self, voice: &Voice) {
        match self.try_save(voice) {
            Ok(()) => debug!(voice_id = %voice.id, "Saved voice preference"),
            Err(e) => warn!(error = %e, "Could not save voice preference"),
        }
    }

    pub fn try_save(&self, voice: &Voice) -> Result<(), PreferenceError> {
        let path = self.path.as_ref().ok_or(PreferenceError::NoLocation)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_vec(&VoicePreference::from(voice))?;
        fs::write(path, json).map_err(|source| PreferenceError::Io {
            path: path.clone(),
            source,
        })
    }

    /// The saved record, or `None` if it is absent, unreadable or malformed.
    pub fn load(&self) -> Option<VoicePreference> {
        match self.try_load() {
            Ok(preference) => {
                info!(voice = %preference.voice_name, lang = %preference.language, "Loaded voice preference");
                Some(preference)
            }
            Err(PreferenceError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!("No saved voice preference");
                None
            }
            Err(e) => {
                warn!(error = %e, "Ignoring saved voice preference");
                None
            }
        }
    }

    pub fn try_load(&self) -> Result<VoicePreference, PreferenceError> {
        let path = self.path.as_ref().ok_or(PreferenceError::NoLocation)?;
        let bytes = fs::read(path).map_err(|source| PreferenceError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
