//! Input channels and the per-cycle fired-set.

use core::ops::Index;

/// One of the four weighted input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

impl Channel {
    pub const COUNT: usize = 4;

    /// All channels in latch order.
    pub const ALL: [Channel; Channel::COUNT] = [Channel::A, Channel::B, Channel::C, Channel::D];

    /// Increment contributed to the counter each time this channel fires.
    pub const fn weight(self) -> u16 {
        match self {
            Channel::A => 1,
            Channel::B => 10,
            Channel::C => 100,
            Channel::D => 1000,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Snapshot of which channels fired since the previous drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FiredSet([bool; Channel::COUNT]);

impl FiredSet {
    pub const fn new(fired: [bool; Channel::COUNT]) -> Self {
        FiredSet(fired)
    }

    /// Builds a set with exactly the given channels fired.
    pub fn of(channels: &[Channel]) -> Self {
        let mut fired = [false; Channel::COUNT];
        for channel in channels {
            fired[channel.index()] = true;
        }
        FiredSet(fired)
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&f| f)
    }

    /// Iterates over the channels that fired.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::ALL
            .into_iter()
            .filter(move |channel| self.0[channel.index()])
    }

    /// Sum of the weights of all fired channels.
    pub fn weight(&self) -> u16 {
        self.channels().map(Channel::weight).sum()
    }
}

impl Index<Channel> for FiredSet {
    type Output = bool;

    fn index(&self, channel: Channel) -> &bool {
        &self.0[channel.index()]
    }
}
