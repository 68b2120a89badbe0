//! Audio engine - owns the cpal output stream and the tone queue
//!
//! [`Beeper`] is the producer-side handle (enqueue + wait). [`AudioEngine`]
//! wraps a `Beeper` together with the cpal stream whose callback runs the
//! matching [`ToneSource`].

use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};

use super::oscillator::{Oscillator, ToneSource};
use super::queue::{samples_for_duration, ToneQueue, ToneRequest};
use super::sync::PlaybackSync;
use super::{BUFFER_FRAMES, CHANNELS, DEFAULT_AMPLITUDE, SAMPLE_RATE};
use crate::error::{Error, Result};

/// Something tones can be sent to and waited on
pub trait ToneSink {
    /// Queue a tone; returns immediately
    fn enqueue(&self, frequency_hz: f64, duration_ms: u64);

    /// Block until every queued tone has been played
    fn wait_until_drained(&self);
}

impl<T: ToneSink + ?Sized> ToneSink for &T {
    fn enqueue(&self, frequency_hz: f64, duration_ms: u64) {
        (**self).enqueue(frequency_hz, duration_ms);
    }

    fn wait_until_drained(&self) {
        (**self).wait_until_drained();
    }
}

/// Audio engine configuration
#[derive(Clone, Copy, Debug)]
pub struct AudioConfig {
    /// Peak sample value of the sine wave
    pub amplitude: i16,
    /// How often a waiting caller re-checks the queue
    pub poll_interval: Duration,
    /// Extra wait after the queue drains, letting the device play out its buffer
    pub flush_delay: Duration,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_AMPLITUDE,
            poll_interval: Duration::from_millis(20),
            flush_delay: Duration::from_millis(200),
        }
    }
}

/// Producer handle on the tone queue
pub struct Beeper {
    queue: Arc<ToneQueue>,
    sync: PlaybackSync,
    config: AudioConfig,
}

impl Beeper {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            queue: Arc::new(ToneQueue::new()),
            sync: PlaybackSync::new(config.poll_interval, config.flush_delay),
            config,
        }
    }

    /// Create the consumer that renders this beeper's queue
    ///
    /// Exactly one source should be driven at a time; it owns the phase.
    pub fn source(&self) -> ToneSource {
        ToneSource::new(
            Arc::clone(&self.queue),
            Oscillator::new(SAMPLE_RATE, self.config.amplitude),
        )
    }

    pub fn queue(&self) -> &ToneQueue {
        &self.queue
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Give up waiting after `deadline`; see [`PlaybackSync::wait_until_drained_timeout`]
    pub fn wait_until_drained_timeout(&self, deadline: Duration) -> bool {
        self.sync.wait_until_drained_timeout(&self.queue, deadline)
    }
}

impl ToneSink for Beeper {
    fn enqueue(&self, frequency_hz: f64, duration_ms: u64) {
        let samples = samples_for_duration(duration_ms, SAMPLE_RATE);
        log::debug!(
            "Queueing {:.1} Hz tone for {} ms ({} samples)",
            frequency_hz,
            duration_ms,
            samples
        );
        self.queue.push(ToneRequest::new(frequency_hz, samples));
    }

    fn wait_until_drained(&self) {
        self.sync.wait_until_drained(&self.queue);
    }
}

/// Convert the rendered i16 block into the device's sample type
fn write_audio_samples<T: SizedSample + FromSample<i16>>(
    data: &mut [T],
    source: &mut ToneSource,
    scratch: &mut [i16],
) {
    for block in data.chunks_mut(scratch.len()) {
        let scratch = &mut scratch[..block.len()];
        source.render(scratch);
        for (out, sample) in block.iter_mut().zip(scratch.iter()) {
            *out = T::from_sample(*sample);
        }
    }
}

fn build_stream<T: SizedSample + FromSample<i16>>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut source: ToneSource,
) -> std::result::Result<cpal::Stream, cpal::BuildStreamError> {
    let mut scratch = vec![0i16; BUFFER_FRAMES as usize];
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            write_audio_samples(data, &mut source, &mut scratch);
        },
        |err| log::error!("Audio stream error: {}", err),
        None,
    )
}

/// Fail early for sample formats the callback cannot write
fn check_sample_format(format: cpal::SampleFormat) -> Result<()> {
    match format {
        cpal::SampleFormat::I16 | cpal::SampleFormat::F32 | cpal::SampleFormat::U16 => Ok(()),
        format => Err(Error::AudioInit(format!(
            "unsupported sample format: {:?}",
            format
        ))),
    }
}

fn build_stream_for_format(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    format: cpal::SampleFormat,
    source: ToneSource,
) -> std::result::Result<cpal::Stream, cpal::BuildStreamError> {
    match format {
        cpal::SampleFormat::I16 => build_stream::<i16>(device, config, source),
        cpal::SampleFormat::F32 => build_stream::<f32>(device, config, source),
        cpal::SampleFormat::U16 => build_stream::<u16>(device, config, source),
        _ => Err(cpal::BuildStreamError::StreamConfigNotSupported),
    }
}

/// Audio output engine
///
/// Opening the engine starts the stream immediately; queued tones play as
/// soon as they are enqueued. Dropping the engine closes the stream.
pub struct AudioEngine {
    beeper: Beeper,

    /// The audio output stream (kept alive to continue playback)
    _stream: cpal::Stream,
}

impl AudioEngine {
    /// Open the default output device and start the stream
    ///
    /// Mono, signed 16-bit samples at 44.1 kHz. Fails with
    /// [`Error::AudioInit`] if there is no usable output device.
    pub fn new(config: AudioConfig) -> Result<Self> {
        log::info!("Starting audio engine...");

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioInit("no output device found".to_string()))?;

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        log::info!("Using output device: {}", device_name);

        let format = device
            .default_output_config()
            .map_err(|e| Error::AudioInit(format!("failed to get output config: {}", e)))?
            .sample_format();
        log::info!("Sample format: {:?}", format);
        check_sample_format(format)?;

        let beeper = Beeper::new(config);

        let mut stream_config = cpal::StreamConfig {
            channels: CHANNELS,
            sample_rate: cpal::SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Fixed(BUFFER_FRAMES),
        };
        let stream = match build_stream_for_format(&device, &stream_config, format, beeper.source())
        {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("Failed to build stream: {}; retrying with the default buffer size", e);
                stream_config.buffer_size = cpal::BufferSize::Default;
                build_stream_for_format(&device, &stream_config, format, beeper.source())
                    .map_err(|e| Error::AudioInit(format!("failed to build stream: {}", e)))?
            }
        };

        stream
            .play()
            .map_err(|e| Error::AudioInit(format!("failed to start stream: {}", e)))?;
        log::info!("Audio started successfully");

        Ok(Self {
            beeper,
            _stream: stream,
        })
    }

    pub fn beeper(&self) -> &Beeper {
        &self.beeper
    }

    pub fn wait_until_drained_timeout(&self, deadline: Duration) -> bool {
        self.beeper.wait_until_drained_timeout(deadline)
    }
}

impl ToneSink for AudioEngine {
    fn enqueue(&self, frequency_hz: f64, duration_ms: u64) {
        self.beeper.enqueue(frequency_hz, duration_ms);
    }

    fn wait_until_drained(&self) {
        self.beeper.wait_until_drained();
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        log::info!("Audio stopped");
    }
}
