use log::{debug, info, trace};
use memsim_error::{errinput, Error};

use crate::frame::FrameSet;
use crate::page::Page;
use crate::replacer::replacer::Replacer;
use crate::replacer::Policy;
use crate::trace::{SimulationResult, StepRecord};
use crate::typedef::Timestamp;
use crate::Result;

/// Replays a reference string against a fixed number of frames under one policy.
///
/// All working state (frames, replacer bookkeeping, fault counter, trace) is
/// owned by the simulator and dropped or handed out by [`Simulator::finish`].
pub struct Simulator<'a> {
    policy: Policy,
    reference: &'a [Page],
    frames: FrameSet,
    replacer: Box<dyn Replacer + 'a>,
    cursor: Timestamp,
    page_faults: usize,
    history: Vec<StepRecord>,
}

impl<'a> Simulator<'a> {
    pub fn new(policy: Policy, reference: &'a [Page], frames_count: usize) -> Result<Self> {
        if reference.is_empty() {
            return errinput!("reference string must contain at least one page");
        }
        if frames_count == 0 {
            return errinput!("frame count must be positive");
        }

        Ok(Self {
            policy,
            reference,
            frames: FrameSet::new(frames_count),
            replacer: policy.replacer(reference, frames_count),
            cursor: 0,
            page_faults: 0,
            history: Vec::with_capacity(reference.len()),
        })
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    pub fn page_faults(&self) -> usize {
        self.page_faults
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.reference.len()
    }

    /// Serves the next reference and returns its step record, or `None` once
    /// the reference string is exhausted.
    pub fn step(&mut self) -> Result<Option<&StepRecord>> {
        let reference = self.reference;
        let Some(page) = reference.get(self.cursor) else {
            return Ok(None);
        };
        let timestamp = self.cursor;
        self.cursor += 1;

        let record = if self.frames.contains(page) {
            self.replacer.record_access(page, timestamp);
            StepRecord::hit(timestamp + 1, page.clone(), self.frames.snapshot())
        } else {
            self.page_faults += 1;
            let replaced = self.make_room_for(page, timestamp)?;
            self.replacer.record_access(page, timestamp);
            StepRecord::fault(timestamp + 1, page.clone(), self.frames.snapshot(), replaced)
        };

        trace!(
            "{} step {}: page {} {} -> {:?}",
            self.policy,
            record.step,
            record.page,
            if record.hit { "hit" } else { "fault" },
            record.frames
        );

        self.history.push(record);
        Ok(self.history.last())
    }

    /// Places a faulting page into a free slot, or evicts a victim chosen by
    /// the policy. Returns the evicted page.
    fn make_room_for(&mut self, page: &Page, timestamp: Timestamp) -> Result<Option<Page>> {
        if !self.frames.is_full() {
            self.frames.load(page.clone())?;
            return Ok(None);
        }

        let frame_id = self
            .replacer
            .evict(&self.frames, timestamp)
            .ok_or(Error::OutOfBounds)?;
        let victim = self.frames.replace(frame_id, page.clone())?;

        debug!(
            "{} evicted page {} from frame {} for page {}",
            self.policy, victim, frame_id, page
        );

        Ok(Some(victim))
    }

    /// Serves every remaining reference and returns the finished trace.
    pub fn run(mut self) -> Result<SimulationResult> {
        while self.step()?.is_some() {}
        Ok(self.finish())
    }

    pub fn finish(self) -> SimulationResult {
        info!(
            "{} over {} references with {} frames: {} faults",
            self.policy,
            self.history.len(),
            self.frames.capacity(),
            self.page_faults
        );

        SimulationResult {
            algorithm: self.policy,
            frames_count: self.frames.capacity(),
            page_faults: self.page_faults,
            history: self.history,
        }
    }
}

/// Runs `policy` over `reference` with `frames_count` frames.
pub fn simulate(
    policy: Policy,
    reference: &[Page],
    frames_count: usize,
) -> Result<SimulationResult> {
    Simulator::new(policy, reference, frames_count)?.run()
}
