//! Phase oscillator and the sample generation routine
//!
//! [`ToneSource`] is what the audio callback runs: it pulls chunks from the
//! shared [`ToneQueue`] and fills the output buffer with a sine wave whose
//! phase carries over from tone to tone, so back-to-back tones join without
//! a click.

use std::f64::consts::TAU;
use std::sync::Arc;

use super::queue::ToneQueue;

/// Continuous sine oscillator
///
/// The phase is measured in "frequency-samples": it advances by the tone's
/// frequency on every sample and one full period is `sample_rate` units.
#[derive(Clone, Debug)]
pub struct Oscillator {
    phase: f64,
    sample_rate: f64,
    amplitude: f64,
}

impl Oscillator {
    pub fn new(sample_rate: u32, amplitude: i16) -> Self {
        Self {
            phase: 0.0,
            sample_rate: f64::from(sample_rate),
            amplitude: f64::from(amplitude),
        }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Produce one sample at the current phase, then advance by `frequency_hz`
    #[inline]
    pub fn next_sample(&mut self, frequency_hz: f64) -> i16 {
        let value = self.amplitude * (self.phase * TAU / self.sample_rate).sin();
        // A non-finite step would turn the phase into NaN for good; such a
        // tone just holds the phase.
        if frequency_hz.is_finite() {
            // Reducing by whole periods leaves the waveform unchanged but keeps
            // the accumulator small enough to stay precise.
            self.phase = (self.phase + frequency_hz).rem_euclid(self.sample_rate);
        }
        value as i16
    }
}

/// The consumer half of the engine: queue plus oscillator
pub struct ToneSource {
    queue: Arc<ToneQueue>,
    oscillator: Oscillator,
}

impl ToneSource {
    pub fn new(queue: Arc<ToneQueue>, oscillator: Oscillator) -> Self {
        Self { queue, oscillator }
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    /// Fill `out` with samples, playing queued tones in order
    ///
    /// Once the queue runs dry the rest of the buffer is silence. Returns the
    /// number of tone samples written. Must never block for long or allocate:
    /// this runs on the audio thread.
    pub fn render(&mut self, out: &mut [i16]) -> usize {
        let mut written = 0;
        while written < out.len() {
            let chunk = match self.queue.take_chunk(out.len() - written) {
                Some(chunk) => chunk,
                None => {
                    out[written..].fill(0);
                    return written;
                }
            };

            for sample in &mut out[written..written + chunk.samples] {
                *sample = self.oscillator.next_sample(chunk.frequency_hz);
            }
            written += chunk.samples;
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::queue::ToneRequest;
    use crate::audio::{DEFAULT_AMPLITUDE, SAMPLE_RATE};

    /// Reference model: an accumulator that is never reduced or reset
    fn model(tones: &[(f64, usize)], len: usize) -> Vec<i16> {
        let mut phase = 0.0f64;
        let mut out = Vec::with_capacity(len);
        for &(freq, count) in tones {
            for _ in 0..count {
                let v = f64::from(DEFAULT_AMPLITUDE)
                    * (phase * 2.0 * std::f64::consts::PI / f64::from(SAMPLE_RATE)).sin();
                out.push(v as i16);
                phase += freq;
            }
        }
        out.resize(len, 0);
        out
    }

    fn source() -> (Arc<ToneQueue>, ToneSource) {
        let queue = Arc::new(ToneQueue::new());
        let source = ToneSource::new(
            Arc::clone(&queue),
            Oscillator::new(SAMPLE_RATE, DEFAULT_AMPLITUDE),
        );
        (queue, source)
    }

    fn assert_close(actual: &[i16], expected: &[i16]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (i32::from(*a) - i32::from(*e)).abs() <= 1,
                "sample {} differs: {} vs {}",
                i,
                a,
                e
            );
        }
    }

    #[test]
    fn test_first_sample_is_zero_phase() {
        let mut osc = Oscillator::new(SAMPLE_RATE, DEFAULT_AMPLITUDE);
        assert_eq!(osc.next_sample(440.0), 0);
        assert_eq!(osc.phase(), 440.0);
    }

    #[test]
    fn test_quarter_period_hits_amplitude() {
        // 11025 Hz at 44.1 kHz: four samples per period
        let mut osc = Oscillator::new(SAMPLE_RATE, DEFAULT_AMPLITUDE);
        let samples: Vec<i16> = (0..4).map(|_| osc.next_sample(11025.0)).collect();
        assert_eq!(samples[0], 0);
        assert_eq!(samples[1], DEFAULT_AMPLITUDE);
        assert!(samples[2].abs() <= 1);
        assert_eq!(samples[3], -DEFAULT_AMPLITUDE);
    }

    #[test]
    fn test_empty_queue_renders_silence() {
        let (_queue, mut source) = source();
        let mut out = [7i16; 64];
        assert_eq!(source.render(&mut out), 0);
        assert!(out.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_phase_continues_across_tone_boundary() {
        let (queue, mut source) = source();
        queue.push(ToneRequest::new(440.0, 441));
        queue.push(ToneRequest::new(880.0, 441));

        let mut out = vec![0i16; 1000];
        let written = source.render(&mut out);
        assert_eq!(written, 882);

        assert_close(&out, &model(&[(440.0, 441), (880.0, 441)], 1000));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_phase_continues_across_calls() {
        let (queue, mut source) = source();
        queue.push(ToneRequest::new(523.25, 3000));

        // Odd block sizes so tone boundaries and buffer boundaries don't line up
        let mut rendered = Vec::new();
        for size in [100, 1024, 77, 2048] {
            let mut block = vec![0i16; size];
            source.render(&mut block);
            rendered.extend_from_slice(&block);
        }

        assert_close(&rendered, &model(&[(523.25, 3000)], rendered.len()));
        assert!(source.oscillator().phase() < f64::from(SAMPLE_RATE));
    }

    #[test]
    fn test_drains_then_pure_silence() {
        let (queue, mut source) = source();
        queue.push(ToneRequest::new(600.0, 300));
        queue.push(ToneRequest::new(700.0, 300));

        let mut first = vec![0i16; 512];
        assert_eq!(source.render(&mut first), 512);
        assert_eq!(queue.len(), 1);

        let mut second = vec![1i16; 512];
        assert_eq!(source.render(&mut second), 88);
        assert!(queue.is_empty());
        assert!(second[88..].iter().all(|&s| s == 0));

        let mut third = vec![1i16; 512];
        assert_eq!(source.render(&mut third), 0);
        assert!(third.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_non_finite_tone_does_not_silence_later_tones() {
        let (queue, mut source) = source();
        queue.push(ToneRequest::new(f64::INFINITY, 1));
        queue.push(ToneRequest::new(f64::NAN, 1));
        queue.push(ToneRequest::new(11025.0, 44));

        let mut out = vec![0i16; 46];
        assert_eq!(source.render(&mut out), 46);
        assert!(source.oscillator().phase().is_finite());

        // The following tone starts from phase 0 and reaches full amplitude
        assert_close(&out[2..], &model(&[(11025.0, 44)], 44));
        assert!(out[2..].iter().any(|&s| s == DEFAULT_AMPLITUDE));
    }

    #[test]
    fn test_degenerate_frequencies_do_not_panic() {
        let (queue, mut source) = source();
        queue.push(ToneRequest::new(0.0, 10));
        queue.push(ToneRequest::new(-440.0, 10));

        let mut out = vec![0i16; 32];
        assert_eq!(source.render(&mut out), 20);
        // zero frequency holds the phase where it was
        assert!(out[..10].iter().all(|&s| s == 0));
    }
}
