//! Business logic for state transitions

use tracing::{debug, error, info, warn};

use crate::app::Task;
use crate::catalog;
use crate::config;
use crate::logging;
use crate::model::{App, Message, SelectedVoice, Voice};
use crate::providers::{EngineEvent, StopBoundary, UtteranceId};
use crate::tracker::Transition;

pub fn update(app: &mut App, message: Message) -> Task {
    match message {
        Message::TextChanged(text) => {
            if app.tracker.is_speaking() {
                debug!("Text edit ignored while speaking");
            } else {
                app.text = text;
            }
            Task::none()
        }
        Message::SelectVoice(voice) => {
            select_voice(app, voice);
            Task::none()
        }
        Message::PlayStop => play_stop(app),
        Message::Foregrounded => {
            // Voice packs may have been installed while we were away
            if app.groups.is_empty() {
                let voices = app.engine.available_voices();
                load_catalog(app, voices);
            }
            Task::none()
        }
        Message::VoicesLoaded(voices) => {
            load_catalog(app, voices);
            Task::none()
        }
        Message::Engine(utterance, event) => engine_event(app, utterance, event),
        Message::AudioSessionGraceElapsed(generation) => {
            release_audio_session(app, generation);
            Task::none()
        }
        Message::StopWatchdogElapsed(generation) => {
            if generation == app.utterance_generation && app.tracker.is_speaking() {
                warn!(
                    timeout = ?app.config.stop_timeout(),
                    "Engine never confirmed the stop, forcing idle"
                );
                if app.tracker.force_idle() == Transition::Stopped {
                    return schedule_audio_release(app);
                }
            }
            Task::none()
        }
        Message::LogLevelSelected(level) => {
            info!(?level, "Log level selected");
            app.config.log_level = level;
            // Persist the selected log level so future runs remember the choice.
            if let Some(path) = &app.config_path {
                config::save_log_level(path, level);
            }
            logging::set_verbosity(level);
            Task::none()
        }
    }
}

/// Rebuild groups from a fresh voice list and make sure a voice is selected.
fn load_catalog(app: &mut App, voices: Vec<Voice>) {
    app.groups = catalog::build_groups(&voices, app.resolver.as_ref());

    if app.groups.is_empty() {
        warn!("No voices available");
        return;
    }
    info!(voices = voices.len(), groups = app.groups.len(), "Voice catalog loaded");

    // Keep the current choice if it survived the refresh
    if let Some(current) = &app.selected {
        let still_installed = app
            .groups
            .iter()
            .any(|g| g.voices.iter().any(|v| v.id == current.voice.id));
        if still_installed {
            return;
        }
    }

    let saved = app.preferences.load();
    let engine = &app.engine;
    let selected = catalog::resolve_default_voice(
        &app.groups,
        saved.as_ref(),
        &app.system_locale,
        app.resolver.as_ref(),
        |language| engine.default_voice(language),
    );
    app.selected = selected;
}

fn select_voice(app: &mut App, voice: Voice) {
    // The picker is disabled while speaking
    if app.tracker.is_speaking() {
        debug!(voice_id = %voice.id, "Voice selection ignored while speaking");
        return;
    }

    let Some(group) = app.groups.iter().find(|g| g.voices.contains(&voice)) else {
        warn!(voice_id = %voice.id, "Selected voice is not in the catalog");
        return;
    };

    info!(voice_id = %voice.id, group = %group.label, "Voice selected");
    app.preferences.save(&voice);
    app.selected = Some(SelectedVoice {
        group_label: group.label.clone(),
        voice,
    });
}

fn play_stop(app: &mut App) -> Task {
    if app.tracker.is_speaking() {
        info!("Stopping speech");
        if let Err(e) = app.engine.stop(StopBoundary::Immediate) {
            error!(error = %e, "Engine stop failed");
        }
        return Task::after(
            app.config.stop_timeout(),
            Message::StopWatchdogElapsed(app.utterance_generation),
        );
    }

    if app.text.trim().is_empty() {
        debug!("Nothing to speak");
        return Task::none();
    }

    let Some(voice_id) = app.selected.as_ref().map(|s| s.voice.id.clone()) else {
        warn!("No voice selected");
        return Task::none();
    };

    if !app.audio_session_active {
        match app.audio.set_active(true) {
            Ok(()) => app.audio_session_active = true,
            Err(e) => warn!(error = %e, "Could not activate audio session"),
        }
    }

    app.utterance_generation += 1;
    let utterance = app.utterance_generation;
    // Mark speaking before the engine confirms so a pending release stays idle
    app.tracker.begin_utterance(utterance, &app.text);

    info!(utterance, voice_id = %voice_id, chars = app.text.chars().count(), "Speaking");
    if let Err(e) = app.engine.speak(utterance, &app.text, &voice_id) {
        error!(error = %e, "TTS speak failed");
        if app.tracker.force_idle() == Transition::Stopped {
            return schedule_audio_release(app);
        }
    }
    Task::none()
}

fn engine_event(app: &mut App, utterance: UtteranceId, event: EngineEvent) -> Task {
    match app.tracker.apply(utterance, &event) {
        Transition::Stopped => {
            debug!(?event, "Speech ended");
            schedule_audio_release(app)
        }
        Transition::Started => {
            debug!(?event, "Speech started");
            Task::none()
        }
        Transition::Progressed | Transition::Unchanged => Task::none(),
    }
}

/// Release the audio session after a grace period, absorbing quick
/// stop-then-play sequences.
fn schedule_audio_release(app: &mut App) -> Task {
    app.deactivation_generation += 1;
    Task::after(
        app.config.audio_session_grace(),
        Message::AudioSessionGraceElapsed(app.deactivation_generation),
    )
}

fn release_audio_session(app: &mut App, generation: u64) {
    if generation != app.deactivation_generation {
        debug!(generation, "Audio release superseded");
        return;
    }
    if app.tracker.is_speaking() {
        debug!("Still speaking, keeping audio session");
        return;
    }
    if !app.audio_session_active {
        return;
    }

    match app.audio.set_active(false) {
        Ok(()) => {
            app.audio_session_active = false;
            debug!("Audio session released");
        }
        Err(e) => warn!(error = %e, "Could not release audio session"),
    }
}
