//! Edge latches bridging the interrupt handlers and the main loop.
//!
//! Interrupt handlers only ever set a latch, the main loop is the only
//! context that clears them. Edges arriving between two drains coalesce into
//! a single fired event.

use portable_atomic::{AtomicBool, Ordering};

use crate::channel::{Channel, FiredSet};

pub struct EdgeLatchBank {
    latches: [AtomicBool; Channel::COUNT],
}

impl Default for EdgeLatchBank {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeLatchBank {
    pub const fn new() -> Self {
        EdgeLatchBank {
            latches: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
        }
    }

    /// Records an edge on `channel`. Safe to call from interrupt context.
    pub fn notify(&self, channel: Channel) {
        self.latches[channel.index()].store(true, Ordering::Release);
    }

    /// Reads and clears all latches in one step.
    ///
    /// Must only be called from the main loop. Each latch is swapped to
    /// false, so a notify racing the drain is either part of this snapshot or
    /// stays latched for the next one.
    pub fn drain_all(&self) -> FiredSet {
        let mut fired = [false; Channel::COUNT];
        for (latch, fired) in self.latches.iter().zip(fired.iter_mut()) {
            *fired = latch.swap(false, Ordering::AcqRel);
        }
        FiredSet::new(fired)
    }
}
