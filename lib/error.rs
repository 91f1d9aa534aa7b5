use crate::channel::Channel;

pub type Result<T, LCDER> = core::result::Result<T, Error<LCDER>>;

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<LCD> {
    // Input device behind a channel is not ready
    InputNotReady(Channel),
    // Pin could not be set up as input
    InputConfig(Channel),
    // Edge interrupt could not be set up
    InterruptConfig(Channel),
    // Display device is not ready
    DisplayNotReady,
    // Hw LCD error
    Lcd(LCD),
    // Buffer
    BufferWrite,
}

impl<LCD> Error<LCD> {
    /// Status reported when startup is aborted with this error.
    ///
    /// A missing display is a soft failure and reports success.
    pub fn status(&self) -> i32 {
        match self {
            Error::DisplayNotReady => 0,
            _ => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_failures_are_hard() {
        for channel in Channel::ALL {
            assert_eq!(Error::<()>::InputNotReady(channel).status(), -1);
            assert_eq!(Error::<()>::InputConfig(channel).status(), -1);
            assert_eq!(Error::<()>::InterruptConfig(channel).status(), -1);
        }
    }

    #[test]
    fn missing_display_is_soft() {
        assert_eq!(Error::<()>::DisplayNotReady.status(), 0);
    }

    #[test]
    fn lcd_errors_are_hard() {
        assert_eq!(Error::Lcd(()).status(), -1);
        assert_eq!(Error::<()>::BufferWrite.status(), -1);
    }
}
