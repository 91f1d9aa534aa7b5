//! Collaborator traits and the STM32G070 board adapters implementing them.

#[cfg(feature = "firmware")]
mod buttons;
#[cfg(feature = "firmware")]
mod helper;
#[cfg(feature = "firmware")]
mod lcd;

#[cfg(feature = "firmware")]
pub use buttons::{ButtonIrq, ExtiButton, ExtiError};
#[cfg(feature = "firmware")]
pub use helper::*;
#[cfg(feature = "firmware")]
pub use lcd::{IliError, IliLcd};

/// Element on the render surface that can be updated on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Widget {
    Count,
}

/// Part of the render surface pushed to the panel by [`Lcd::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Area {
    Widget(Widget),
    All,
}

/// Render surface: text widgets backed by a physical panel.
///
/// Text set on a widget becomes visible only once the widget is marked dirty
/// and a refresh covering it is performed.
pub trait Lcd {
    type Error;
    fn is_ready(&self) -> bool;
    fn set_text(&mut self, widget: Widget, text: &str) -> Result<(), Self::Error>;
    fn mark_dirty(&mut self, widget: Widget);
    fn refresh(&mut self, area: Area) -> Result<(), Self::Error>;
    fn turn_on(&mut self) -> Result<(), Self::Error>;
}

/// Edge-triggered input line feeding one channel.
pub trait EdgeInput {
    type Error;
    fn is_ready(&self) -> bool;
    /// Input mode with pull bias.
    fn configure_input(&mut self) -> Result<(), Self::Error>;
    /// Interrupt on the edge to the active level, left masked.
    fn configure_interrupt(&mut self) -> Result<(), Self::Error>;
    /// Starts delivering the configured edge interrupt.
    fn enable_interrupt(&mut self);
}
