use std::path::Path;

use crate::error::{Result, ShowError};
use crate::loader::Loader;
use crate::page::{Deck, Page};
use crate::state::{Frame, Presentation, Previews};
use crate::surface::OutputSurface;

/// Owns the slideshow: deck, cover, presentation state and the output
/// surface. Every operation computes the new state first and then applies
/// the resulting frame to the surface.
pub struct Controller<S: OutputSurface, L: Loader> {
    state: Presentation,
    deck: Deck,
    cover: Option<Page>,
    display: usize,
    // Frame last pushed to the surface; None forces a re-push
    shown: Option<Frame>,
    // Bumped whenever deck / cover are replaced, even if the push then fails
    deck_version: u64,
    cover_version: u64,
    surface: S,
    loader: L,
}

impl<S: OutputSurface, L: Loader> Controller<S, L> {
    pub fn new(surface: S, loader: L, display: usize) -> Self {
        Self {
            state: Presentation::default(),
            deck: Deck::default(),
            cover: None,
            display,
            shown: None,
            deck_version: 0,
            cover_version: 0,
            surface,
            loader,
        }
    }

    pub fn state(&self) -> Presentation {
        self.state
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cover(&self) -> Option<&Page> {
        self.cover.as_ref()
    }

    pub fn deck_version(&self) -> u64 {
        self.deck_version
    }

    pub fn cover_version(&self) -> u64 {
        self.cover_version
    }

    pub fn display(&self) -> usize {
        self.display
    }

    pub fn previews(&self) -> Previews {
        self.state.previews()
    }

    pub fn can_close(&self) -> bool {
        self.state.can_close()
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Replace the deck with the pages of `path`. A load failure changes
    /// nothing; a surface failure is reported after the new deck is in place.
    pub fn open_document(&mut self, path: &Path) -> Result<usize> {
        let deck = self.loader.load_document(path)?;
        let len = deck.len();
        self.deck = deck;
        self.deck_version += 1;
        self.state = self.state.opened(len);
        self.shown = None;
        tracing::info!("Opened {} ({} pages)", path.display(), len);
        self.present(!self.deck.is_empty())?;
        Ok(len)
    }

    /// Select page `index`. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> Result<()> {
        match self.state.go_to(index) {
            Ok(state) => {
                self.state = state;
                tracing::debug!("Page {}/{}", index + 1, self.state.len());
                self.present(false)
            }
            Err(ShowError::InvalidIndex { index, len }) => {
                tracing::debug!("Ignoring page {} of {}", index, len);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn next(&mut self) -> Result<()> {
        self.go_to(self.state.next().current())
    }

    pub fn prev(&mut self) -> Result<()> {
        self.go_to(self.state.prev().current())
    }

    pub fn set_cover(&mut self, path: &Path) -> Result<()> {
        let cover = self.loader.load_image(path)?;
        tracing::info!("Cover set to {} ({}x{})", path.display(), cover.width, cover.height);
        self.cover = Some(cover);
        self.cover_version += 1;
        if self.state.is_cover_shown() {
            self.shown = None;
        }
        self.present(false)
    }

    /// Returns whether the cover is now shown.
    pub fn toggle_cover(&mut self) -> Result<bool> {
        self.state = self.state.toggle_cover(self.cover.is_some())?;
        let shown = self.state.is_cover_shown();
        tracing::info!("Cover {}", if shown { "shown" } else { "hidden" });
        self.present(shown)?;
        Ok(shown)
    }

    /// Returns whether the slideshow is now stopped.
    pub fn toggle_stop(&mut self) -> Result<bool> {
        self.state = self.state.toggle_stop();
        let stopped = self.state.is_stopped();
        tracing::info!("Slideshow {}", if stopped { "stopped" } else { "resumed" });
        self.present(!stopped)?;
        Ok(stopped)
    }

    /// Target another display; applied the next time the output is shown.
    pub fn rebind_display(&mut self, display: usize) {
        tracing::debug!("Output display set to {}", display + 1);
        self.display = display;
    }

    pub fn close(&mut self) {
        self.surface.hide();
    }

    fn present(&mut self, reshow: bool) -> Result<()> {
        let frame = self.state.frame();
        let image = match frame {
            Frame::Hidden => {
                if self.surface.is_visible() {
                    self.surface.hide();
                }
                self.shown = Some(frame);
                return Ok(());
            }
            Frame::Blank => None,
            Frame::Cover => self.cover.as_ref(),
            Frame::Page(index) => self.deck.get(index),
        };

        let visible = self.surface.is_visible();
        if self.shown != Some(frame) || !visible {
            self.surface.set_image(image)?;
        }
        if reshow || !visible {
            self.surface.show(self.display)?;
        }
        self.shown = Some(frame);
        Ok(())
    }
}
