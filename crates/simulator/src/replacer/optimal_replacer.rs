use crate::frame::FrameSet;
use crate::page::Page;
use crate::typedef::{FrameId, Timestamp};

use super::replacer::Replacer;

/// Distance used for a page that is never referenced again.
const NEVER: Timestamp = Timestamp::MAX;

/// Belady's replacement: evicts the page whose next use lies farthest ahead.
///
/// The replacer sees the whole reference string up front, which is what makes
/// it a yardstick rather than a policy a real kernel could run.
pub(crate) struct OptimalReplacer<'a> {
    reference: &'a [Page],
}

impl<'a> OptimalReplacer<'a> {
    pub(crate) fn new(reference: &'a [Page]) -> Self {
        OptimalReplacer { reference }
    }

    /// Position of the first reference to `page` strictly after `timestamp`.
    fn next_use(&self, page: &Page, timestamp: Timestamp) -> Timestamp {
        let start = timestamp.saturating_add(1).min(self.reference.len());
        self.reference[start..]
            .iter()
            .position(|future| future == page)
            .map_or(NEVER, |offset| start + offset)
    }
}

impl<'a> Replacer for OptimalReplacer<'a> {
    /// On equal distances (including several pages that never recur) the
    /// lowest slot wins.
    fn evict(&mut self, frames: &FrameSet, timestamp: Timestamp) -> Option<FrameId> {
        let mut victim: Option<(FrameId, Timestamp)> = None;

        for (frame_id, page) in frames.iter() {
            let next_use = self.next_use(page, timestamp);
            match victim {
                Some((_, farthest)) if farthest >= next_use => {}
                _ => victim = Some((frame_id, next_use)),
            }
            if next_use == NEVER {
                break;
            }
        }

        victim.map(|(frame_id, _)| frame_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(labels: &[&str]) -> Vec<Page> {
        labels.iter().map(|&label| Page::from(label)).collect()
    }

    fn full_frames(labels: &[&str]) -> FrameSet {
        let mut frames = FrameSet::new(labels.len());
        for &label in labels {
            frames.load(Page::from(label)).unwrap();
        }
        frames
    }

    #[test]
    fn test_next_use() {
        let reference = reference(&["1", "2", "1", "3"]);
        let optimal = OptimalReplacer::new(&reference);

        assert_eq!(optimal.next_use(&Page::from("1"), 0), 2);
        assert_eq!(optimal.next_use(&Page::from("1"), 2), NEVER);
        assert_eq!(optimal.next_use(&Page::from("3"), 0), 3);
        assert_eq!(optimal.next_use(&Page::from("9"), 0), NEVER);
        assert_eq!(optimal.next_use(&Page::from("3"), 3), NEVER);
    }

    #[test]
    fn test_evict_farthest() {
        // At position 3 page 4 faults; 1 is next used at 4, 2 at 5, 3 at 6.
        let reference = reference(&["1", "2", "3", "4", "1", "2", "3"]);
        let frames = full_frames(&["1", "2", "3"]);
        let mut optimal = OptimalReplacer::new(&reference);

        assert_eq!(optimal.evict(&frames, 3), Some(2));
    }

    #[test]
    fn test_never_used_again_wins() {
        let reference = reference(&["1", "2", "3", "4", "1", "2", "1"]);
        let frames = full_frames(&["1", "2", "3"]);
        let mut optimal = OptimalReplacer::new(&reference);

        assert_eq!(optimal.evict(&frames, 3), Some(2));
    }

    #[test]
    fn test_tie_goes_to_lowest_slot() {
        // Neither A nor B recurs.
        let reference = reference(&["A", "B", "C"]);
        let frames = full_frames(&["A", "B"]);
        let mut optimal = OptimalReplacer::new(&reference);

        assert_eq!(optimal.evict(&frames, 2), Some(0));
    }

    #[test]
    fn test_evict_empty() {
        let reference = reference(&["A"]);
        let mut optimal = OptimalReplacer::new(&reference);
        assert_eq!(optimal.evict(&FrameSet::new(1), 0), None);
    }
}
