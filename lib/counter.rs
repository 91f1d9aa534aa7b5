//! Bounded weighted accumulator.

use crate::channel::FiredSet;
use crate::COUNTER_MAX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeightedCounter {
    value: u16,
}

impl WeightedCounter {
    pub const fn new() -> Self {
        WeightedCounter { value: 0 }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    /// Applies one cycle worth of fired channels and returns the new value.
    pub fn apply(&mut self, fired: FiredSet) -> u16 {
        self.value = next_value(self.value, fired);
        self.value
    }
}

/// Adds the weights of all fired channels to `value`.
///
/// The wrap check runs once per cycle on the total: a sum above
/// [`COUNTER_MAX`] becomes zero and the overflow is discarded. `value` must
/// itself be in range, as held by [`WeightedCounter`].
pub(crate) fn next_value(value: u16, fired: FiredSet) -> u16 {
    debug_assert!(value <= COUNTER_MAX, "counter above maximum");
    // 9999 + 1111 fits comfortably into u16.
    let sum = value + fired.weight();
    if sum > COUNTER_MAX {
        0
    } else {
        sum
    }
}
