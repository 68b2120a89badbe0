//! morse - convert ASCII text to Morse code text and audio
//!
//! The interesting part is the [`audio`] core: a tone queue fed by caller
//! threads and drained by the real-time audio callback, a phase-continuous
//! oscillator, and a blocking "wait until drained" primitive. The
//! [`translator`] turns words into dots and dashes and drives a
//! [`player::TonePlayer`] on top of it.

pub mod audio;
pub mod error;
pub mod io;
pub mod player;
pub mod settings;
pub mod translator;

// Re-export commonly used types
pub use audio::{AudioConfig, AudioEngine, Beeper, ToneSink};
pub use error::{Error, Result};
pub use player::{MorseSymbol, TonePlayer};
pub use settings::Settings;
pub use translator::{to_code, Translator};
