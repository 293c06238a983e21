//! Presentation helpers
//!
//! Pure functions a rendering surface uses to draw the picker title, the
//! play/stop button, the highlighted word and to decide when to scroll.

use std::ops::Range;

use crate::locale::TextDirection;
use crate::model::{App, SelectedVoice};
use crate::tracker::{SpeakingRange, SpeakingState};

/// A rectangle in text-view content coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }
}

/// "Samantha (English (United States))"
pub fn voice_menu_title(selected: &SelectedVoice) -> String {
    format!("{} ({})", selected.voice.name, selected.group_label)
}

pub fn play_button_label(state: SpeakingState) -> &'static str {
    match state {
        SpeakingState::Speaking => "❌",
        SpeakingState::Idle => "🔊",
    }
}

/// Byte range of `text` covered by an inclusive scalar range.
pub fn highlight_span(text: &str, range: SpeakingRange) -> Option<Range<usize>> {
    let mut chars = text.char_indices().skip(range.lower);
    let (start, first) = chars.next()?;
    let (last, c) = match range.upper.checked_sub(range.lower)? {
        0 => (start, first),
        extra => chars.nth(extra - 1)?,
    };
    Some(start..last + c.len_utf8())
}

/// Byte range of the word being spoken right now.
pub fn current_highlight(app: &App) -> Option<Range<usize>> {
    let range = app.tracker.range()?;
    highlight_span(app.tracker.utterance(), range)
}

/// Where to scroll so the spoken word stays visible.
///
/// Only re-centres when the word's bottom edge has reached the bottom of the
/// visible area or lies above its top; otherwise returns `None` to avoid
/// jitter on every word.
pub fn scroll_target(span: Rect, visible: Rect) -> Option<Rect> {
    if span.max_y() >= visible.max_y() || span.max_y() <= visible.min_y() {
        Some(Rect::new(span.x, span.y, visible.width, visible.height))
    } else {
        None
    }
}

/// Layout direction for the editor, following the selected voice's language.
pub fn layout_direction(app: &App) -> TextDirection {
    app.selected
        .as_ref()
        .map(|s| app.resolver.text_direction(&s.voice.language))
        .unwrap_or(TextDirection::LeftToRight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Voice, VoiceQuality};

    fn range(lower: usize, upper: usize) -> SpeakingRange {
        SpeakingRange { lower, upper }
    }

    #[test]
    fn highlight_covers_inclusive_range() {
        let text = "hello world";
        let span = highlight_span(text, range(6, 10)).unwrap();
        assert_eq!(&text[span], "world");
    }

    #[test]
    fn highlight_single_scalar() {
        let span = highlight_span("abc", range(1, 1)).unwrap();
        assert_eq!(span, 1..2);
    }

    #[test]
    fn highlight_handles_multibyte_text() {
        let text = "שלום עולם";
        let span = highlight_span(text, range(5, 8)).unwrap();
        assert_eq!(&text[span], "עולם");

        let text = "🙂 héllo";
        let span = highlight_span(text, range(2, 6)).unwrap();
        assert_eq!(&text[span], "héllo");
    }

    #[test]
    fn highlight_out_of_bounds_is_none() {
        assert_eq!(highlight_span("abc", range(3, 3)), None);
        assert_eq!(highlight_span("abc", range(1, 5)), None);
    }

    #[test]
    fn scroll_only_when_word_leaves_view() {
        let visible = Rect::new(0.0, 100.0, 300.0, 200.0);

        let inside = Rect::new(10.0, 150.0, 40.0, 20.0);
        assert_eq!(scroll_target(inside, visible), None);

        let below = Rect::new(10.0, 290.0, 40.0, 20.0);
        assert_eq!(
            scroll_target(below, visible),
            Some(Rect::new(10.0, 290.0, 300.0, 200.0))
        );

        let above = Rect::new(10.0, 60.0, 40.0, 20.0);
        assert_eq!(
            scroll_target(above, visible),
            Some(Rect::new(10.0, 60.0, 300.0, 200.0))
        );
    }

    #[test]
    fn menu_title_and_button() {
        let selected = SelectedVoice {
            voice: Voice::new("id", "Samantha", "en-US", VoiceQuality::Enhanced),
            group_label: "English (United States)".into(),
        };
        assert_eq!(voice_menu_title(&selected), "Samantha (English (United States))");
        assert_eq!(play_button_label(SpeakingState::Idle), "🔊");
        assert_eq!(play_button_label(SpeakingState::Speaking), "❌");
    }
}
