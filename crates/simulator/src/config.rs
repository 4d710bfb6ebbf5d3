use crate::replacer::Policy;
use crate::segment::SegmentDescriptor;

/// Frame count used when a request does not name one.
pub const DEFAULT_FRAMES: i64 = 3;

/// Policy used when a request does not name one.
pub const DEFAULT_POLICY: Policy = Policy::Fifo;

/// Segment sizes, in pages, laid out when a request carries no segments.
pub const DEFAULT_SEGMENTS: [(&str, usize); 4] =
    [("Code", 2), ("Data", 2), ("Stack", 1), ("Heap", 1)];

pub(crate) fn default_segments() -> Vec<SegmentDescriptor> {
    DEFAULT_SEGMENTS
        .iter()
        .map(|&(name, size)| SegmentDescriptor::new(name, size))
        .collect()
}
