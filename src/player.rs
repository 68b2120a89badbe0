//! Tone player - plays Morse dots and dashes through a [`ToneSink`]

use crate::audio::{ToneSink, SAMPLE_RATE};
use crate::error::{Error, Result};

/// Dash length in dot units
const DASH_MULTIPLIER: u64 = 3;

/// The two Morse symbols
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorseSymbol {
    Dot,
    Dash,
}

impl MorseSymbol {
    /// Parse a `.` or `-` from a textual code
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Self::Dot),
            '-' => Some(Self::Dash),
            _ => None,
        }
    }
}

/// Plays dot and dash tones on demand
///
/// Each call blocks until the tone has finished playing, even though the
/// sink underneath plays asynchronously.
pub struct TonePlayer<S: ToneSink> {
    sink: S,
    frequency_hz: f64,
    dot_duration_ms: u64,
}

impl<S: ToneSink> TonePlayer<S> {
    /// Create a player
    ///
    /// # Arguments
    /// * `sink` - Where tones are sent
    /// * `frequency_hz` - Pitch of every dot and dash
    /// * `dot_duration_ms` - Length of a dot; a dash is three times as long
    ///
    /// # Errors
    /// [`Error::InvalidConfig`] if either value is not strictly positive,
    /// the frequency is not finite, or a dash would be too long to count
    /// in samples.
    pub fn new(sink: S, frequency_hz: f64, dot_duration_ms: i64) -> Result<Self> {
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(Error::InvalidConfig(
                "frequency must be a positive value".to_string(),
            ));
        }
        if dot_duration_ms <= 0 {
            return Err(Error::InvalidConfig(
                "duration must be a positive value".to_string(),
            ));
        }

        let dot_duration_ms = dot_duration_ms as u64;
        let dash_samples = dot_duration_ms
            .checked_mul(DASH_MULTIPLIER)
            .and_then(|dash| dash.checked_mul(u64::from(SAMPLE_RATE)));
        if dash_samples.is_none() {
            return Err(Error::InvalidConfig(format!(
                "duration of {} ms is too long",
                dot_duration_ms
            )));
        }

        Ok(Self {
            sink,
            frequency_hz,
            dot_duration_ms,
        })
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    /// Dot length in milliseconds
    pub fn dot_duration(&self) -> u64 {
        self.dot_duration_ms
    }

    /// Dash length in milliseconds, always three dots
    pub fn dash_duration(&self) -> u64 {
        self.dot_duration_ms * DASH_MULTIPLIER
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Play one symbol and wait for it to finish
    pub fn play(&self, symbol: MorseSymbol) {
        let duration_ms = match symbol {
            MorseSymbol::Dot => self.dot_duration(),
            MorseSymbol::Dash => self.dash_duration(),
        };
        self.sink.enqueue(self.frequency_hz, duration_ms);
        self.sink.wait_until_drained();
    }

    pub fn play_dot(&self) {
        self.play(MorseSymbol::Dot);
    }

    pub fn play_dash(&self) {
        self.play(MorseSymbol::Dash);
    }
}
