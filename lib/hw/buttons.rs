use stm32g0xx_hal::stm32g0::stm32g070::{EXTI, GPIOC, RCC};

use crate::channel::Channel;
use crate::hw::helper::BUTTON_LINES;
use crate::hw::EdgeInput;
use crate::latch::EdgeLatchBank;

// EXTICRx port selection value for GPIOC
const PORT_C: u32 = 0x02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExtiError {
    // EXTI line already routed to another pin
    LineInUse(u8),
}

/// Active-low push button on a GPIOC pin, delivering falling edges via EXTI.
pub struct ExtiButton<P> {
    _pin: P,
    line: u8,
}

impl<P> ExtiButton<P> {
    pub fn new(pin: P, channel: Channel) -> Self {
        ExtiButton {
            _pin: pin,
            line: BUTTON_LINES[channel.index()],
        }
    }

    fn mask(&self) -> u32 {
        1 << self.line
    }
}

impl<P> EdgeInput for ExtiButton<P> {
    type Error = ExtiError;

    fn is_ready(&self) -> bool {
        // SAFETY: read-only access to the port clock enable bits.
        let rcc = unsafe { &(*RCC::ptr()) };
        rcc.iopenr.read().iopcen().bit_is_set()
    }

    fn configure_input(&mut self) -> Result<(), Self::Error> {
        // SAFETY: the owned pin token guarantees exclusive use of these bits.
        let gpioc = unsafe { &(*GPIOC::ptr()) };
        let offset = 2 * self.line as u32;
        // Pull-up
        // SAFETY: 0b01 is the pull-up encoding, other pins keep their bits.
        gpioc
            .pupdr
            .modify(|r, w| unsafe { w.bits((r.bits() & !(0b11 << offset)) | (0b01 << offset)) });
        // Input mode
        // SAFETY: 0b00 is input mode, other pins keep their bits.
        gpioc
            .moder
            .modify(|r, w| unsafe { w.bits(r.bits() & !(0b11 << offset)) });
        Ok(())
    }

    fn configure_interrupt(&mut self) -> Result<(), Self::Error> {
        // SAFETY: runs during init before ButtonIrq takes EXTI, only this line's bits are touched.
        let exti = unsafe { &(*EXTI::ptr()) };
        let mask = self.mask();
        if exti.imr1.read().bits() & mask != 0 {
            return Err(ExtiError::LineInUse(self.line));
        }

        // One byte per line selects the source port
        let shift = 8 * (self.line as u32 % 4);
        let select = |bits: u32| (bits & !(0xff << shift)) | (PORT_C << shift);
        // SAFETY: PORT_C is a valid port selector, other lines keep their byte.
        match self.line / 4 {
            0 => exti.exticr1.modify(|r, w| unsafe { w.bits(select(r.bits())) }),
            1 => exti.exticr2.modify(|r, w| unsafe { w.bits(select(r.bits())) }),
            2 => exti.exticr3.modify(|r, w| unsafe { w.bits(select(r.bits())) }),
            _ => exti.exticr4.modify(|r, w| unsafe { w.bits(select(r.bits())) }),
        }

        // Falling edge is the press of an active-low button
        // SAFETY: every bit of the trigger registers is a valid line select.
        exti.rtsr1.modify(|r, w| unsafe { w.bits(r.bits() & !mask) });
        // SAFETY: as above.
        exti.ftsr1.modify(|r, w| unsafe { w.bits(r.bits() | mask) });
        Ok(())
    }

    fn enable_interrupt(&mut self) {
        // SAFETY: runs during init before ButtonIrq takes EXTI, only this line's bits are touched.
        let exti = unsafe { &(*EXTI::ptr()) };
        let mask = self.mask();
        // Drop edges seen before the line was armed
        // SAFETY: writing one clears the pending flag of this line only.
        exti.fpr1.write(|w| unsafe { w.bits(mask) });
        // SAFETY: setting the mask bit only unmasks this line.
        exti.imr1.modify(|r, w| unsafe { w.bits(r.bits() | mask) });
    }
}

/// Interrupt side of the buttons.
pub struct ButtonIrq {
    exti: EXTI,
}

impl ButtonIrq {
    pub fn new(exti: EXTI) -> Self {
        ButtonIrq { exti }
    }

    /// Acknowledges a pending edge of `channel` and latches it.
    pub fn latch_pending(&mut self, latches: &EdgeLatchBank, channel: Channel) {
        let mask = 1 << BUTTON_LINES[channel.index()];
        if self.exti.fpr1.read().bits() & mask != 0 {
            // SAFETY: writing one clears the pending flag of this line only.
            self.exti.fpr1.write(|w| unsafe { w.bits(mask) });
            latches.notify(channel);
        }
    }
}
