use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::replacer::Policy;

/// What happened at one position of the reference string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based position in the reference string.
    pub step: usize,
    pub page: Page,
    /// Frame contents after this step, in slot order.
    pub frames: Vec<Page>,
    pub hit: bool,
    pub fault: bool,
    /// The page evicted to make room, if the fault found no free slot.
    pub replaced: Option<Page>,
}

impl StepRecord {
    pub(crate) fn hit(step: usize, page: Page, frames: Vec<Page>) -> Self {
        StepRecord {
            step,
            page,
            frames,
            hit: true,
            fault: false,
            replaced: None,
        }
    }

    pub(crate) fn fault(
        step: usize,
        page: Page,
        frames: Vec<Page>,
        replaced: Option<Page>,
    ) -> Self {
        StepRecord {
            step,
            page,
            frames,
            hit: false,
            fault: true,
            replaced,
        }
    }
}

/// The full trace of one simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub algorithm: Policy,
    pub frames_count: usize,
    pub page_faults: usize,
    pub history: Vec<StepRecord>,
}

impl SimulationResult {
    pub fn hits(&self) -> usize {
        self.history.len().saturating_sub(self.page_faults)
    }

    pub fn hit_ratio(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.hits() as f64 / self.history.len() as f64
    }

    pub fn fault_ratio(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.page_faults as f64 / self.history.len() as f64
    }

    /// Pages evicted over the run, in eviction order.
    pub fn evictions(&self) -> impl Iterator<Item = &Page> {
        self.history.iter().filter_map(|step| step.replaced.as_ref())
    }
}
