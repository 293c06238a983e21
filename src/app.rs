//! Runtime adapter: message loop, delayed tasks and engine event marshalling.
//!
//! Engines report from their own threads through an [`EventSink`]. Every
//! message lands in one channel and is applied to the [`App`] by a single
//! loop, so state is only ever mutated in one place.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::model::{App, Message, Voice};
use crate::providers::{EngineEvent, UtteranceId};
use crate::tracker::{SpeakingRange, SpeakingState};
use crate::update;

pub type Inbox = mpsc::UnboundedReceiver<Message>;

/// Thread-safe handle for posting into the application's message loop.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<Message>,
}

impl EventSink {
    /// Report an engine callback. Safe to call from any thread.
    pub fn emit(&self, utterance: UtteranceId, event: EngineEvent) {
        self.post(Message::Engine(utterance, event));
    }

    pub fn post(&self, message: Message) {
        if self.tx.send(message).is_err() {
            trace!("Message loop gone, dropping message");
        }
    }
}

/// Create the message channel shared by the runtime and the engine.
pub fn channel() -> (EventSink, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx }, rx)
}

/// Follow-up work returned by [`update::update`].
#[must_use]
#[derive(Debug, Default)]
pub struct Task {
    delayed: Vec<(Duration, Message)>,
}

impl Task {
    pub fn none() -> Self {
        Self::default()
    }

    /// Deliver `message` back to the loop after `delay`.
    pub fn after(delay: Duration, message: Message) -> Self {
        Self {
            delayed: vec![(delay, message)],
        }
    }

    pub fn is_none(&self) -> bool {
        self.delayed.is_empty()
    }

    pub fn delayed(&self) -> &[(Duration, Message)] {
        &self.delayed
    }
}

/// Owns the app and drives it from the message channel.
///
/// Must be used from within a tokio runtime: delayed tasks are spawned as
/// timers that post back into the channel.
pub struct Runtime {
    app: App,
    sink: EventSink,
    inbox: Inbox,
}

impl Runtime {
    pub fn new(app: App, sink: EventSink, inbox: Inbox) -> Self {
        Self { app, sink, inbox }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn sink(&self) -> EventSink {
        self.sink.clone()
    }

    /// Load the voice catalog; same as coming to the foreground.
    pub fn start(&mut self) {
        self.dispatch(Message::Foregrounded);
    }

    /// Apply one message and schedule whatever it asks for.
    pub fn dispatch(&mut self, message: Message) {
        trace!(?message, "Dispatching");
        let task = update::update(&mut self.app, message);
        self.spawn(task);
    }

    fn spawn(&self, task: Task) {
        for (delay, message) in task.delayed {
            debug!(?delay, ?message, "Scheduling delayed message");
            let sink = self.sink.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                sink.post(message);
            });
        }
    }

    /// Wait for the next message and apply it.
    pub async fn next(&mut self) -> bool {
        match self.inbox.recv().await {
            Some(message) => {
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    /// Apply every message that is already waiting, without blocking.
    /// Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.inbox.try_recv() {
            self.dispatch(message);
            applied += 1;
        }
        applied
    }

    /// Run until the channel closes. The runtime keeps a sender of its own,
    /// so this only returns if the task is dropped.
    pub async fn run(mut self) {
        while self.next().await {}
    }

    // Presentation-facing reads and actions

    pub fn groups(&self) -> &[crate::model::VoiceGroup] {
        &self.app.groups
    }

    pub fn selected_voice(&self) -> Option<&crate::model::SelectedVoice> {
        self.app.selected.as_ref()
    }

    pub fn speaking_state(&self) -> SpeakingState {
        self.app.tracker.state()
    }

    pub fn speaking_range(&self) -> Option<SpeakingRange> {
        self.app.tracker.range()
    }

    pub fn on_select_voice(&mut self, voice: Voice) {
        self.dispatch(Message::SelectVoice(voice));
    }

    pub fn on_play_stop(&mut self) {
        self.dispatch(Message::PlayStop);
    }

    pub fn on_text_changed(&mut self, text: impl Into<String>) {
        self.dispatch(Message::TextChanged(text.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_carries_one_delayed_message() {
        let task = Task::after(Duration::from_secs(1), Message::StopWatchdogElapsed(3));
        assert!(!task.is_none());
        assert!(matches!(
            task.delayed(),
            [(delay, Message::StopWatchdogElapsed(3))] if *delay == Duration::from_secs(1)
        ));
        assert!(Task::none().is_none());
    }

    #[test]
    fn sink_posts_engine_events() {
        let (sink, mut inbox) = channel();
        let worker = std::thread::spawn(move || sink.emit(7, EngineEvent::Started));
        worker.join().unwrap();
        assert!(matches!(
            inbox.try_recv(),
            Ok(Message::Engine(7, EngineEvent::Started))
        ));
    }

    #[test]
    fn sink_outliving_the_loop_is_harmless() {
        let (sink, inbox) = channel();
        drop(inbox);
        sink.emit(1, EngineEvent::Finished);
    }
}
