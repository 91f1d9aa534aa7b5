#![cfg_attr(not(test), no_std)]

#[cfg(feature = "firmware")]
use core::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "firmware")]
use defmt_rtt as _; // global logger
#[cfg(feature = "firmware")]
use panic_probe as _;

pub mod channel;
pub mod counter;
pub mod dispatcher;
pub mod display;
pub mod error;
pub mod hw;
pub mod latch;
pub mod startup;

/// Largest value the counter can hold before wrapping back to zero.
pub const COUNTER_MAX: u16 = 9999;

/// Minimum period of one main loop iteration.
pub const POLL_INTERVAL_MS: u16 = 10;

#[cfg(feature = "firmware")]
static COUNT: AtomicUsize = AtomicUsize::new(0);
#[cfg(feature = "firmware")]
defmt::timestamp!("{=usize}", {
    let n = COUNT.load(Ordering::Relaxed);
    COUNT.store(n + 1, Ordering::Relaxed);
    n
});

/// Terminates the application and makes `probe-run` exit with exit-code = 0
#[cfg(feature = "firmware")]
pub fn exit() -> ! {
    loop {
        cortex_m::asm::bkpt();
    }
}

/// Stops the firmware after a failed startup.
///
/// Hard failures panic so `probe-run` reports a non-zero exit code, soft
/// failures leave through [`exit`].
#[cfg(feature = "firmware")]
pub fn abort<LCDER>(error: error::Error<LCDER>) -> ! {
    if error.status() < 0 {
        defmt::panic!("startup failed with status {=i32}", error.status());
    }
    exit()
}
