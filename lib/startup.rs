//! Bring-up of the input lines and the display.
//!
//! Nothing is left half configured for the main loop: every input is checked
//! before any is configured, and edge interrupts are only unmasked once every
//! line is configured.

use crate::channel::Channel;
use crate::display::Display;
use crate::error::{Error, Result};
use crate::hw::{EdgeInput, Lcd};

/// Input lines indexed by [`Channel::index`].
pub type Inputs<'a, E> = [&'a mut dyn EdgeInput<Error = E>; Channel::COUNT];

pub fn init_inputs<E, LCDER>(mut inputs: Inputs<'_, E>) -> Result<(), LCDER> {
    for (channel, input) in Channel::ALL.iter().zip(inputs.iter()) {
        if !input.is_ready() {
            #[cfg(feature = "defmt")]
            defmt::error!("Button not ready");
            return Err(Error::InputNotReady(*channel));
        }
    }

    for (channel, input) in Channel::ALL.iter().zip(inputs.iter_mut()) {
        if input.configure_input().is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to configure button pins");
            return Err(Error::InputConfig(*channel));
        }
    }

    for (channel, input) in Channel::ALL.iter().zip(inputs.iter_mut()) {
        if input.configure_interrupt().is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to configure button interrupts");
            return Err(Error::InterruptConfig(*channel));
        }
    }

    for input in inputs.iter_mut() {
        input.enable_interrupt();
    }

    #[cfg(feature = "defmt")]
    defmt::info!("Buttons initialized");
    Ok(())
}

pub fn init_display<LCD>(lcd: LCD) -> Result<Display<LCD>, LCD::Error>
where
    LCD: Lcd,
{
    if !lcd.is_ready() {
        #[cfg(feature = "defmt")]
        defmt::error!("Display device not ready");
        return Err(Error::DisplayNotReady);
    }
    Display::new(lcd)
}
