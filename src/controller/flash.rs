//! Transient status message with a time-to-live

use std::time::{Duration, Instant};

/// A message that clears itself after `ttl`
///
/// Setting a new message replaces the old one and restarts the clock.
#[derive(Debug, Clone)]
pub struct Flash {
    ttl: Duration,
    message: Option<(String, Instant)>,
}

impl Flash {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, message: None }
    }

    /// Shows `text` starting now
    pub fn set(&mut self, text: impl Into<String>) {
        self.set_at(text, Instant::now());
    }

    /// Shows `text` starting at `now`
    pub fn set_at(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text.is_empty() {
            self.message = None;
        } else {
            self.message = Some((text, now + self.ttl));
        }
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    /// Drops the message once its deadline has passed
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, expires_at)) = &self.message {
            if now >= *expires_at {
                self.message = None;
            }
        }
    }

    /// Returns the live message, if any
    pub fn current(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }
}
