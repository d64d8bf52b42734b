pub mod process;
pub mod protocol;
pub mod window;

use crate::error::Result;
use crate::page::Page;

/// The audience-facing window. Holds the last image it was given so it can
/// re-scale it on resize or replay it when shown again.
pub trait OutputSurface {
    /// Bring the surface up full-screen on `display`, moving it if already up.
    fn show(&mut self, display: usize) -> Result<()>;
    /// Replace the held image; `None` clears it.
    fn set_image(&mut self, image: Option<&Page>) -> Result<()>;
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}
