use crate::frame::FrameSet;
use crate::typedef::{FrameId, Timestamp};

use super::replacer::Replacer;

/// Evicts slots round-robin, which replaces pages in the order they were loaded.
pub(crate) struct FifoReplacer {
    pointer: FrameId,
    capacity: usize,
}

impl FifoReplacer {
    pub(crate) fn new(capacity: usize) -> Self {
        FifoReplacer {
            pointer: 0,
            capacity,
        }
    }
}

impl Replacer for FifoReplacer {
    /// Hits and fills never move the pointer; only an eviction does.
    fn evict(&mut self, frames: &FrameSet, _timestamp: Timestamp) -> Option<FrameId> {
        if frames.is_empty() || self.capacity == 0 {
            return None;
        }
        let victim = self.pointer;
        self.pointer = (self.pointer + 1) % self.capacity;
        Some(victim)
    }
}
