//! Scrolling banner text.
//!
//! The message is padded with trailing spaces and repeated so the scroll
//! has no visible seam; each [`Marquee::rotate`] moves the first character
//! to the end. The shell calls `rotate` on its own fast timer (100 ms),
//! independent of alert evaluation.

use std::collections::VecDeque;

/// Gap between repetitions of the message.
pub const PADDING: &str = "     ";
/// Copies of the padded message in the rotation buffer.
pub const REPEAT: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct Marquee {
    message: String,
    buffer: VecDeque<char>,
}

impl Marquee {
    pub fn new(message: impl Into<String>) -> Self {
        let mut marquee = Self::default();
        marquee.set_text(message);
        marquee
    }

    /// Replace the message and restart the scroll from its first character.
    pub fn set_text(&mut self, message: impl Into<String>) {
        self.message = message.into();
        let padded = format!("{}{PADDING}", self.message);
        self.buffer = padded.repeat(REPEAT).chars().collect();
    }

    /// Advance one character.
    pub fn rotate(&mut self) {
        if !self.buffer.is_empty() {
            self.buffer.rotate_left(1);
        }
    }

    /// The un-padded message currently scrolling.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// What the display shows right now.
    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Length of one full cycle in characters.
    pub fn period(&self) -> usize {
        self.buffer.len() / REPEAT
    }
}
