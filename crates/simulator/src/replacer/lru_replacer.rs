use crate::frame::FrameSet;
use crate::page::Page;
use crate::typedef::{FrameId, Timestamp};
use std::collections::HashMap;

use super::replacer::Replacer;

pub(crate) struct LruReplacer {
    /// Position at which each resident page was last referenced.
    last_accessed: HashMap<Page, Timestamp>,
}

impl LruReplacer {
    pub(crate) fn new() -> Self {
        LruReplacer {
            last_accessed: HashMap::new(),
        }
    }

    fn last_accessed(&self, page: &Page) -> Option<Timestamp> {
        self.last_accessed.get(page).copied()
    }
}

impl Replacer for LruReplacer {
    /// Records an access and updates the timestamp.
    /// If the page is new, its first access is recorded.
    fn record_access(&mut self, page: &Page, timestamp: Timestamp) {
        self.last_accessed.insert(page.clone(), timestamp);
    }

    /// Evicts the least recently used resident page and forgets its record.
    /// On equal timestamps the lower slot wins.
    fn evict(&mut self, frames: &FrameSet, _timestamp: Timestamp) -> Option<FrameId> {
        // A page with no record sorts first (`None < Some(_)`).
        let (frame_id, page) = frames
            .iter()
            .min_by_key(|(_, page)| self.last_accessed(page))?;

        self.last_accessed.remove(page);
        Some(frame_id)
    }
}
