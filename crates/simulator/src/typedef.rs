/// Index of a slot in the frame set.
pub type FrameId = usize;

/// Zero-based position in the reference string.
pub type Timestamp = usize;
