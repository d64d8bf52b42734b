use crate::constants::NOTICE_DURATION;
use crate::error::ShowError;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// Timed message banner replacing modal message boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: Level,
    pub title: &'static str,
    pub text: String,
    remaining: f32,
}

impl Notice {
    pub fn new(level: Level, title: &'static str, text: impl Into<String>) -> Self {
        Self { level, title, text: text.into(), remaining: NOTICE_DURATION }
    }

    /// How an operation failure is reported to the operator.
    pub fn from_error(error: &ShowError) -> Self {
        match error {
            ShowError::NoCover => Self::new(Level::Warning, "No Cover", "No cover set."),
            ShowError::Load { .. } => Self::new(Level::Error, "Error", error.to_string()),
            ShowError::Surface(_) => Self::new(Level::Error, "Output", error.to_string()),
            ShowError::InvalidIndex { .. } => Self::new(Level::Warning, "Navigation", error.to_string()),
        }
    }

    /// Count down; false once the notice should disappear.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining > 0.0
    }
}
