use crate::error::{Result, ShowError};

/// What the audience window should be showing.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Frame {
    Hidden,     // Output window closed
    Blank,      // Output window up, nothing to draw
    Cover,      // Cover image in place of the live page
    Page(usize),
}

/// Pages shown in the operator's current/next previews.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Previews {
    pub current: Option<usize>,
    pub next: Option<usize>,
}

/// Slideshow state. Every transition consumes the old value and returns the
/// new one, so the controller never patches fields piecemeal.
///
/// `current` is always a valid index while `len > 0`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Presentation {
    len: usize,
    current: usize,
    stopped: bool,
    cover_shown: bool,
    live: bool, // output brought up at least once
}

impl Presentation {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_cover_shown(&self) -> bool {
        self.cover_shown
    }

    /// A new deck of `len` pages replaced the old one.
    pub fn opened(self, len: usize) -> Self {
        Self { len, current: 0, live: self.live || len > 0, ..self }
    }

    pub fn go_to(self, index: usize) -> Result<Self> {
        if index >= self.len {
            return Err(ShowError::InvalidIndex { index, len: self.len });
        }
        Ok(Self { current: index, ..self })
    }

    pub fn next(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self { current: (self.current + 1).min(self.len - 1), ..self }
    }

    pub fn prev(self) -> Self {
        Self { current: self.current.saturating_sub(1), ..self }
    }

    pub fn toggle_cover(self, has_cover: bool) -> Result<Self> {
        if !has_cover {
            return Err(ShowError::NoCover);
        }
        let cover_shown = !self.cover_shown;
        Ok(Self { cover_shown, live: self.live || cover_shown, ..self })
    }

    /// Leaving stopped mode always brings the output back up.
    pub fn toggle_stop(self) -> Self {
        let stopped = !self.stopped;
        Self { stopped, live: self.live || !stopped, ..self }
    }

    pub fn frame(&self) -> Frame {
        if self.stopped || !self.live {
            Frame::Hidden
        } else if self.cover_shown {
            Frame::Cover
        } else if self.len > 0 {
            Frame::Page(self.current)
        } else {
            Frame::Blank
        }
    }

    pub fn previews(&self) -> Previews {
        if self.len == 0 {
            return Previews::default();
        }
        let next = self.current + 1;
        Previews { current: Some(self.current), next: (next < self.len).then_some(next) }
    }

    /// Showing the cover locks the presentation open.
    pub fn can_close(&self) -> bool {
        !self.cover_shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_of(len: usize) -> Presentation {
        Presentation::default().opened(len)
    }

    #[test]
    fn starts_hidden_with_no_previews() {
        let state = Presentation::default();
        assert_eq!(state.frame(), Frame::Hidden);
        assert_eq!(state.previews(), Previews::default());
    }

    #[test]
    fn go_to_any_valid_index_selects_it() {
        let state = deck_of(5);
        for index in 0..5 {
            let moved = state.go_to(index).unwrap();
            assert_eq!(moved.current(), index);
            assert_eq!(moved.frame(), Frame::Page(index));
        }
    }

    #[test]
    fn go_to_out_of_range_is_rejected() {
        let state = deck_of(5).go_to(2).unwrap();
        assert!(matches!(state.go_to(5), Err(ShowError::InvalidIndex { index: 5, len: 5 })));
        assert!(matches!(Presentation::default().go_to(0), Err(ShowError::InvalidIndex { .. })));
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let last = deck_of(5).go_to(4).unwrap();
        assert_eq!(last.next(), last);
        assert_eq!(last.previews(), Previews { current: Some(4), next: None });

        let first = last.go_to(0).unwrap();
        assert_eq!(first.prev(), first);
        assert_eq!(first.previews(), Previews { current: Some(0), next: Some(1) });

        let empty = Presentation::default();
        assert_eq!(empty.next(), empty);
        assert_eq!(empty.prev(), empty);
    }

    #[test]
    fn opening_resets_to_first_page() {
        let state = deck_of(5).go_to(3).unwrap().opened(2);
        assert_eq!(state.current(), 0);
        assert_eq!(state.len(), 2);
        assert_eq!(state.frame(), Frame::Page(0));
    }

    #[test]
    fn empty_document_keeps_output_down() {
        assert_eq!(deck_of(0).frame(), Frame::Hidden);
        // but an output that was already up stays up, blank
        assert_eq!(deck_of(3).opened(0).frame(), Frame::Blank);
    }

    #[test]
    fn cover_requires_an_image() {
        let state = deck_of(3);
        assert!(matches!(state.toggle_cover(false), Err(ShowError::NoCover)));
        assert!(!state.is_cover_shown());
    }

    #[test]
    fn cover_overrides_page_until_toggled_back() {
        let state = deck_of(3).go_to(1).unwrap();
        let covered = state.toggle_cover(true).unwrap();
        assert_eq!(covered.frame(), Frame::Cover);
        assert!(!covered.can_close());

        // navigation under the cover still moves the deck
        let moved = covered.next();
        assert_eq!(moved.frame(), Frame::Cover);
        assert_eq!(moved.previews().current, Some(2));

        let uncovered = moved.toggle_cover(true).unwrap();
        assert_eq!(uncovered.frame(), Frame::Page(2));
        assert!(uncovered.can_close());
    }

    #[test]
    fn cover_brings_output_up_without_a_deck() {
        let state = Presentation::default().toggle_cover(true).unwrap();
        assert_eq!(state.frame(), Frame::Cover);
        assert_eq!(state.toggle_cover(true).unwrap().frame(), Frame::Blank);
    }

    #[test]
    fn stop_hides_and_restores_the_same_frame() {
        let state = deck_of(4).go_to(2).unwrap();
        let stopped = state.toggle_stop();
        assert_eq!(stopped.frame(), Frame::Hidden);
        assert_eq!(stopped.next().previews().current, Some(3));
        assert_eq!(stopped.toggle_stop(), state);

        let covered = state.toggle_cover(true).unwrap();
        assert_eq!(covered.toggle_stop().toggle_stop().frame(), Frame::Cover);
    }
}
