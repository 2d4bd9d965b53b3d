//! Pluggable cache policies for [`super::WindowReader`] implementations.
//!
//! These are provided for readers built on top of this crate (e.g. a
//! file-backed reader an integrator writes); [`SliceReader`](super::SliceReader)
//! itself needs no cache since the whole source is already resident.

use std::collections::VecDeque;

/// A cache policy over fixed-size windows keyed by their start position.
pub trait CachePolicy<T> {
    /// Record that `value` was produced for the window starting at `start`.
    /// Returns an evicted value, if the policy's capacity was exceeded.
    fn insert(&mut self, start: usize, value: T) -> Option<(usize, T)>;

    /// Look up a previously inserted value for the window starting at `start`.
    fn get(&self, start: usize) -> Option<&T>;
}

/// No caching: every window is recomputed on every access.
#[derive(Default)]
pub struct NoCache;

impl<T> CachePolicy<T> for NoCache {
    fn insert(&mut self, _start: usize, _value: T) -> Option<(usize, T)> {
        None
    }

    fn get(&self, _start: usize) -> Option<&T> {
        None
    }
}

/// Most-recently-used cache of up to `K` windows.
pub struct Mru<T> {
    capacity: usize,
    // Front = most recently used.
    entries: VecDeque<(usize, T)>,
}

impl<T> Mru<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Mru capacity must be positive");
        Mru {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }
}

impl<T> CachePolicy<T> for Mru<T> {
    fn insert(&mut self, start: usize, value: T) -> Option<(usize, T)> {
        self.entries.retain(|(s, _)| *s != start);
        self.entries.push_front((start, value));
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    fn get(&self, start: usize) -> Option<&T> {
        self.entries.iter().find(|(s, _)| *s == start).map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mru_evicts_oldest() {
        let mut cache: Mru<u8> = Mru::new(2);
        assert_eq!(cache.insert(0, 10), None);
        assert_eq!(cache.insert(8, 20), None);
        let evicted = cache.insert(16, 30);
        assert_eq!(evicted, Some((0, 10)));
        assert_eq!(cache.get(8), Some(&20));
        assert_eq!(cache.get(16), Some(&30));
        assert_eq!(cache.get(0), None);
    }
}
