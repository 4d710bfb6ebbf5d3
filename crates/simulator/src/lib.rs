mod config;
mod frame;
mod page;
mod replacer;
mod request;
mod segment;
mod simulator;
mod trace;
mod typedef;

pub use config::{DEFAULT_FRAMES, DEFAULT_POLICY, DEFAULT_SEGMENTS};
pub use frame::FrameSet;
pub use page::Page;
pub use replacer::Policy;
pub use request::{
    error_body, handle, parse_reference_string, SimulationRequest, SimulationResponse,
};
pub use segment::{
    build_segments, MemoryMapEntry, PageTable, PageTableEntry, PageTableImage, SegmentDescriptor,
    SegmentLayout,
};
pub use simulator::{simulate, Simulator};
pub use trace::{SimulationResult, StepRecord};
pub use typedef::{FrameId, Timestamp};

pub type Result<T> = std::result::Result<T, memsim_error::Error>;
