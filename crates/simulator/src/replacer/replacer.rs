use crate::frame::FrameSet;
use crate::page::Page;
use crate::typedef::{FrameId, Timestamp};

pub trait Replacer {
    /// Record the event that `page` is referenced at position `timestamp`,
    /// either as a hit or as the page just loaded on a fault.
    fn record_access(&mut self, _page: &Page, _timestamp: Timestamp) {}

    /// Picks the slot of a full frame set whose page should be replaced while
    /// serving the reference at `timestamp`.
    /// Returns `None` only when the frame set holds no pages.
    fn evict(&mut self, frames: &FrameSet, timestamp: Timestamp) -> Option<FrameId>;
}
