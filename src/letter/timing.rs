use crate::engine::clock::Millis;
use crate::utils::strings;
use std::fmt;

pub const READING_WPM: f64 = 95.0;

pub const BASE_PAUSE_MS: u64 = 2200;
pub const PAUSE_PER_WORD_MS: u64 = 180;
pub const PAUSE_PER_CHAR_MS: u64 = 10;
pub const MIN_PAUSE_MS: u64 = 3500;

pub const MIN_DELAY_MS: Millis = 6500;
pub const MAX_DELAY_MS: Millis = 60_000;

/// Multiplier applied to every computed delay. Always within
/// [`SpeedFactor::MIN`, `SpeedFactor::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    pub const MIN: f64 = 0.6;
    pub const MAX: f64 = 1.4;
    pub const DEFAULT: f64 = 0.82;

    /// Clamps into range. NaN pins to the minimum.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Parses a stored preference; `None` for anything non-numeric or
    /// non-finite.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::new)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for SpeedFactor {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for SpeedFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x", self.0)
    }
}

/// Milliseconds a sentence stays on screen before auto-advancing.
///
/// Reading time follows word count at [`READING_WPM`]; the pause after it grows
/// with words and characters and never drops below [`MIN_PAUSE_MS`]. The sum is
/// scaled by the speed factor and clamped to [`MIN_DELAY_MS`, `MAX_DELAY_MS`].
pub fn delay(sentence: &str, speed: SpeedFactor) -> Millis {
    let words = strings::word_count(sentence) as u64;
    let chars = sentence.chars().count() as u64;

    let read_ms = ((words as f64 / READING_WPM) * 60_000.0).round() as u64;

    let base_pause = BASE_PAUSE_MS + words * PAUSE_PER_WORD_MS + chars * PAUSE_PER_CHAR_MS;
    let pause_ms = base_pause.max(MIN_PAUSE_MS);

    let total = ((read_ms + pause_ms) as f64 * speed.value()).round() as u64;
    total.clamp(MIN_DELAY_MS, MAX_DELAY_MS)
}
