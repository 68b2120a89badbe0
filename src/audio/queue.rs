//! Tone queue shared between caller threads and the audio callback
//!
//! Producers append [`ToneRequest`]s from any thread. The audio callback is
//! the only consumer: it claims samples from the front tone a chunk at a time,
//! holding the lock only long enough to update the bookkeeping. Sample
//! computation always happens outside the lock.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::Duration;

/// Initial capacity of the pending tone queue
const INITIAL_CAPACITY: usize = 64;

/// Convert a duration in milliseconds to a sample count (truncating)
///
/// Saturates instead of wrapping for durations too long to count in samples.
pub fn samples_for_duration(duration_ms: u64, sample_rate: u32) -> u64 {
    duration_ms.saturating_mul(u64::from(sample_rate)) / 1000
}

/// A pending tone: a frequency and the number of samples left to play
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneRequest {
    pub frequency_hz: f64,
    pub remaining_samples: u64,
}

impl ToneRequest {
    pub fn new(frequency_hz: f64, remaining_samples: u64) -> Self {
        Self {
            frequency_hz,
            remaining_samples,
        }
    }
}

/// A run of samples claimed from the front of the queue
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneChunk {
    pub frequency_hz: f64,
    pub samples: usize,
}

/// FIFO of pending tones guarded by a mutex
///
/// The condition variable is signalled by the consumer whenever the queue
/// becomes empty, so waiters don't have to spin.
pub struct ToneQueue {
    tones: Mutex<VecDeque<ToneRequest>>,
    drained: Condvar,
}

impl ToneQueue {
    pub fn new() -> Self {
        Self {
            tones: Mutex::new(VecDeque::with_capacity(INITIAL_CAPACITY)),
            drained: Condvar::new(),
        }
    }

    // A panic while holding the lock can't leave the deque half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ToneRequest>> {
        self.tones.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a tone to the back of the queue
    ///
    /// Must not be called from inside the audio callback.
    pub fn push(&self, tone: ToneRequest) {
        self.lock().push_back(tone);
    }

    /// Number of tones waiting or playing
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Claim up to `max_samples` samples of the front tone
    ///
    /// Decrements the front tone and pops it once it has no samples left.
    /// Returns `None` when there is nothing to play, or when a producer
    /// holds the lock right now. Called only by the audio callback; never
    /// blocks or allocates.
    pub fn take_chunk(&self, max_samples: usize) -> Option<ToneChunk> {
        if max_samples == 0 {
            return None;
        }

        let mut tones = match self.tones.try_lock() {
            Ok(tones) => tones,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        loop {
            let front = tones.front_mut()?;
            if front.remaining_samples == 0 {
                tones.pop_front();
                if tones.is_empty() {
                    self.drained.notify_all();
                }
                continue;
            }

            let samples = front.remaining_samples.min(max_samples as u64);
            front.remaining_samples -= samples;
            let chunk = ToneChunk {
                frequency_hz: front.frequency_hz,
                samples: samples as usize,
            };

            if front.remaining_samples == 0 {
                tones.pop_front();
                if tones.is_empty() {
                    self.drained.notify_all();
                }
            }
            return Some(chunk);
        }
    }

    /// Block until the queue is empty or `timeout` elapses
    ///
    /// Re-checks emptiness at least every `poll` even without a notification.
    /// Returns `true` if the queue was observed empty.
    pub(crate) fn wait_empty(&self, poll: Duration, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| std::time::Instant::now() + t);
        let mut tones = self.lock();
        while !tones.is_empty() {
            let wait = match deadline {
                Some(deadline) => {
                    let now = std::time::Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    poll.min(deadline - now)
                }
                None => poll,
            };
            tones = self
                .drained
                .wait_timeout(tones, wait)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

impl Default for ToneQueue {
    fn default() -> Self {
        Self::new()
    }
}
