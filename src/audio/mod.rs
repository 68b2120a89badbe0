//! Audio module - real-time tone synthesis
//!
//! This module provides:
//! - Tone queue shared between caller threads and the audio callback
//! - Phase-continuous sine oscillator that renders the queue
//! - Playback synchronizer for blocking until the queue drains
//! - Audio engine for cpal integration

mod engine;
mod oscillator;
mod queue;
mod sync;

/// Output sample rate in Hz
pub const SAMPLE_RATE: u32 = 44100;

/// Mono output
pub const CHANNELS: u16 = 1;

/// Frames requested per hardware callback
pub const BUFFER_FRAMES: u32 = 2048;

/// Default peak value of the generated sine wave
pub const DEFAULT_AMPLITUDE: i16 = 28000;

// Re-export public types
pub use engine::{AudioConfig, AudioEngine, Beeper, ToneSink};
pub use oscillator::{Oscillator, ToneSource};
pub use queue::{samples_for_duration, ToneChunk, ToneQueue, ToneRequest};
pub use sync::PlaybackSync;
