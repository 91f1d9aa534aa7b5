//! Main loop: drains the edge latches, updates the counter and redraws.

use embedded_hal::blocking::delay::DelayMs;

use crate::counter::WeightedCounter;
use crate::display::Display;
use crate::error::Result;
use crate::hw::Lcd;
use crate::latch::EdgeLatchBank;
use crate::POLL_INTERVAL_MS;

/// Application context owned by the main loop.
///
/// The counter and the render pipeline are only ever touched from here; the
/// latch bank is shared with the interrupt handlers.
pub struct Dispatcher<'a, LCD>
where
    LCD: Lcd,
{
    latches: &'a EdgeLatchBank,
    counter: WeightedCounter,
    display: Display<LCD>,
}

impl<'a, LCD> Dispatcher<'a, LCD>
where
    LCD: Lcd,
{
    pub fn new(latches: &'a EdgeLatchBank, display: Display<LCD>) -> Self {
        Dispatcher {
            latches,
            counter: WeightedCounter::new(),
            display,
        }
    }

    /// Runs one loop iteration without the trailing wait.
    ///
    /// Returns the new counter value when at least one channel fired.
    ///
    /// A cycle without edges still hands the current value to the display,
    /// so a redraw that failed earlier is retried; an up to date panel makes
    /// that a no-op.
    pub fn poll(&mut self) -> Result<Option<u16>, LCD::Error> {
        let fired = self.latches.drain_all();
        if fired.is_empty() {
            self.display.update(self.counter.value())?;
            return Ok(None);
        }

        let count = self.counter.apply(fired);
        #[cfg(feature = "defmt")]
        defmt::info!("Button pressed, count: {=u16}", count);

        self.display.update(count)?;
        Ok(Some(count))
    }

    /// Polls forever, waiting [`POLL_INTERVAL_MS`] after every iteration.
    pub fn run<D>(&mut self, delay: &mut D) -> !
    where
        D: DelayMs<u16>,
    {
        loop {
            if let Err(_e) = self.poll() {
                #[cfg(feature = "defmt")]
                defmt::error!("Failed to redraw count");
            }
            delay.delay_ms(POLL_INTERVAL_MS);
        }
    }

    pub fn count(&self) -> u16 {
        self.counter.value()
    }

    pub fn display(&self) -> &Display<LCD> {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::display::tests::MockLcd;

    fn dispatcher(latches: &EdgeLatchBank) -> Dispatcher<'_, MockLcd> {
        Dispatcher::new(latches, Display::new(MockLcd::default()).unwrap())
    }

    #[test]
    fn idle_cycles_never_redraw() {
        let latches = EdgeLatchBank::new();
        let mut dispatcher = dispatcher(&latches);

        for _ in 0..100 {
            assert_eq!(dispatcher.poll().unwrap(), None);
        }
        assert_eq!(dispatcher.display().lcd().refreshes(), 1);
        assert_eq!(dispatcher.display().lcd().text, "0");
    }

    #[test]
    fn d_fired_in_three_cycles() {
        let latches = EdgeLatchBank::new();
        let mut dispatcher = dispatcher(&latches);

        for expected in [1000, 2000, 3000] {
            latches.notify(Channel::D);
            assert_eq!(dispatcher.poll().unwrap(), Some(expected));
            assert_eq!(dispatcher.poll().unwrap(), None);
        }
        assert_eq!(dispatcher.count(), 3000);
        assert_eq!(dispatcher.display().lcd().text, "3000");
    }

    #[test]
    fn burst_within_one_cycle_counts_once() {
        let latches = EdgeLatchBank::new();
        let mut dispatcher = dispatcher(&latches);

        for _ in 0..3 {
            latches.notify(Channel::B);
        }
        assert_eq!(dispatcher.poll().unwrap(), Some(10));
    }

    #[test]
    fn simultaneous_channels_wrap_once() {
        let latches = EdgeLatchBank::new();
        let mut dispatcher = dispatcher(&latches);

        // 9 x D, 9 x C, 5 x B -> 9950
        for channel in [Channel::D, Channel::C] {
            for _ in 0..9 {
                latches.notify(channel);
                dispatcher.poll().unwrap();
            }
        }
        for _ in 0..5 {
            latches.notify(Channel::B);
            dispatcher.poll().unwrap();
        }
        assert_eq!(dispatcher.count(), 9950);

        latches.notify(Channel::A);
        latches.notify(Channel::C);
        assert_eq!(dispatcher.poll().unwrap(), Some(0));
        assert_eq!(dispatcher.display().lcd().text, "0");
    }

    #[test]
    fn failed_redraw_catches_up_on_idle_cycle() {
        let latches = EdgeLatchBank::new();
        let mut dispatcher = dispatcher(&latches);

        dispatcher.display.lcd_mut().fail_refresh = true;
        latches.notify(Channel::A);
        assert!(dispatcher.poll().is_err());
        assert_eq!(dispatcher.count(), 1);
        assert_eq!(dispatcher.display().last_value(), 0);

        dispatcher.display.lcd_mut().fail_refresh = false;
        for _ in 0..50 {
            assert_eq!(dispatcher.poll().unwrap(), None);
        }
        assert_eq!(dispatcher.display().last_value(), 1);
        assert_eq!(dispatcher.display().lcd().text, "1");
        // Startup frame plus the single retried redraw.
        assert_eq!(dispatcher.display().lcd().refreshes(), 2);
    }

    #[test]
    fn wrap_back_to_zero_still_redraws() {
        let latches = EdgeLatchBank::new();
        let mut dispatcher = dispatcher(&latches);

        for _ in 0..10 {
            latches.notify(Channel::D);
            dispatcher.poll().unwrap();
        }
        assert_eq!(dispatcher.count(), 0);
        // Startup plus nine values, 10000 wrapped to a 0 that differs from 9000.
        assert_eq!(dispatcher.display().lcd().refreshes(), 11);
    }
}
