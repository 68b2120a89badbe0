//! Playback synchronizer - lets a caller block until the tone queue drains

use std::thread;
use std::time::{Duration, Instant};

use super::queue::ToneQueue;

/// Blocking "wait for silence" primitive
///
/// After the queue is observed empty the caller is held for one extra flush
/// delay so the hardware can play out what it has already buffered.
#[derive(Clone, Copy, Debug)]
pub struct PlaybackSync {
    poll_interval: Duration,
    flush_delay: Duration,
}

impl PlaybackSync {
    pub fn new(poll_interval: Duration, flush_delay: Duration) -> Self {
        Self {
            poll_interval,
            flush_delay,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn flush_delay(&self) -> Duration {
        self.flush_delay
    }

    /// Block until `queue` is empty, then wait out the flush delay
    pub fn wait_until_drained(&self, queue: &ToneQueue) {
        let started = Instant::now();
        queue.wait_empty(self.poll_interval, None);
        log::debug!("Tone queue drained after {:?}", started.elapsed());
        thread::sleep(self.flush_delay);
    }

    /// Like [`wait_until_drained`](Self::wait_until_drained) but gives up
    /// once `deadline` has passed
    ///
    /// Returns `false` without the flush delay if the queue was still playing
    /// at the deadline.
    pub fn wait_until_drained_timeout(&self, queue: &ToneQueue, deadline: Duration) -> bool {
        if !queue.wait_empty(self.poll_interval, Some(deadline)) {
            log::debug!("Tone queue still playing after {:?}", deadline);
            return false;
        }
        thread::sleep(self.flush_delay);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::queue::ToneRequest;
    use std::sync::Arc;

    #[test]
    fn test_returns_after_flush_delay_when_empty() {
        let queue = ToneQueue::new();
        let sync = PlaybackSync::new(Duration::from_millis(1), Duration::from_millis(30));

        let started = Instant::now();
        sync.wait_until_drained(&queue);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_waits_for_consumer() {
        let queue = Arc::new(ToneQueue::new());
        queue.push(ToneRequest::new(440.0, 1000));
        let sync = PlaybackSync::new(Duration::from_millis(2), Duration::ZERO);

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(40));
                while !queue.is_empty() {
                    queue.take_chunk(100);
                }
            })
        };

        let started = Instant::now();
        sync.wait_until_drained(&queue);
        assert!(started.elapsed() >= Duration::from_millis(40));
        assert!(queue.is_empty());
        consumer.join().unwrap();
    }

    #[test]
    fn test_timeout_returns_true_when_drained_in_time() {
        let queue = Arc::new(ToneQueue::new());
        queue.push(ToneRequest::new(440.0, 1000));
        let sync = PlaybackSync::new(Duration::from_millis(2), Duration::from_millis(30));

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                while !queue.is_empty() {
                    queue.take_chunk(100);
                }
            })
        };

        let started = Instant::now();
        assert!(sync.wait_until_drained_timeout(&queue, Duration::from_secs(5)));
        assert!(started.elapsed() >= Duration::from_millis(10) + sync.flush_delay());
        assert!(queue.is_empty());
        consumer.join().unwrap();
    }

    #[test]
    fn test_timeout_skips_flush_delay() {
        let queue = ToneQueue::new();
        queue.push(ToneRequest::new(440.0, 1000));
        let sync = PlaybackSync::new(Duration::from_millis(1), Duration::from_secs(10));

        let started = Instant::now();
        assert!(!sync.wait_until_drained_timeout(&queue, Duration::from_millis(20)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
