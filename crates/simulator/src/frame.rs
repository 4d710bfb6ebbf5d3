use memsim_error::Error;

use crate::page::Page;
use crate::typedef::FrameId;
use crate::Result;

/// The physical frames of one simulation run.
///
/// Slots are filled left to right until the set is full. After that a slot is
/// only ever overwritten in place, so a page keeps its slot index for as long
/// as it stays resident.
#[derive(Clone, Debug)]
pub struct FrameSet {
    slots: Vec<Page>,
    capacity: usize,
}

impl FrameSet {
    /// Slots grow as pages are loaded, so `capacity` may exceed anything
    /// that could be allocated up front.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn contains(&self, page: &Page) -> bool {
        self.slots.contains(page)
    }

    /// Slot index currently holding `page`.
    pub fn slot_of(&self, page: &Page) -> Option<FrameId> {
        self.slots.iter().position(|held| held == page)
    }

    pub fn get(&self, frame_id: FrameId) -> Option<&Page> {
        self.slots.get(frame_id)
    }

    /// Resident pages with their slot index, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (FrameId, &Page)> {
        self.slots.iter().enumerate()
    }

    /// Places `page` in the next free slot and returns that slot.
    pub fn load(&mut self, page: Page) -> Result<FrameId> {
        if self.is_full() {
            return Err(Error::OutOfBounds);
        }
        if self.contains(&page) {
            return Err(Error::AlreadyResident(page.to_string()));
        }
        self.slots.push(page);
        Ok(self.slots.len() - 1)
    }

    /// Overwrites the page in `frame_id` with `page` and returns the evicted page.
    pub fn replace(&mut self, frame_id: FrameId, page: Page) -> Result<Page> {
        let slot = self.slots.get_mut(frame_id).ok_or(Error::OutOfBounds)?;
        Ok(std::mem::replace(slot, page))
    }

    /// Owned copy of the slots, in slot order.
    pub fn snapshot(&self) -> Vec<Page> {
        self.slots.clone()
    }
}
