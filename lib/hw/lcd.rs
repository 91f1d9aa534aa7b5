use core::convert::Infallible;
use display_interface_parallel_gpio::WriteOnlyDataCommand;
use embedded_graphics::drawable::Drawable;
use embedded_graphics::fonts::{Font24x32, Text};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Primitive;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::style::{PrimitiveStyle, TextStyle};
use embedded_graphics::DrawTarget;
use ili9341::{DisplaySize320x480, Error, Ili9341, Orientation};
use stm32g0xx_hal::hal::blocking::delay::DelayMs;
use stm32g0xx_hal::hal::digital::v2::OutputPin;

use crate::display::{Color, CountLabel, CountText};
use crate::hw::{Area, Lcd, Widget};

#[derive(Debug)]
pub enum IliError {
    Ili(Error<Infallible>),
    NotReady,
    TextOverflow,
}

/// ILI9341 panel holding a single count label.
pub struct IliLcd<I, R, B> {
    ili: Option<Ili9341<I, R>>,
    backlight: B,
    text: CountText,
    dirty: bool,
}

impl<I, R, B> IliLcd<I, R, B>
where
    I: WriteOnlyDataCommand,
    R: OutputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
{
    /// Resets the panel. A panel that does not answer is kept as not ready.
    pub fn new<D>(interface: I, reset: R, backlight: B, delay: &mut D) -> Self
    where
        D: DelayMs<u16>,
    {
        let ili = Ili9341::new(
            interface,
            reset,
            delay,
            Orientation::Landscape,
            DisplaySize320x480,
        )
        .ok();

        IliLcd {
            ili,
            backlight,
            text: CountText::new(),
            dirty: false,
        }
    }

    fn draw_label(&mut self) -> Result<(), IliError> {
        let ili = self.ili.as_mut().ok_or(IliError::NotReady)?;
        let background = Rectangle::new(CountLabel::TOP_LEFT, CountLabel::BOTTOM_RIGHT)
            .into_styled(PrimitiveStyle::with_fill(Color::BACKGROUND));
        draw(ili, &background)?;

        let text = Text::new(
            CountLabel::visible(&self.text),
            CountLabel::text_position(&self.text),
        )
        .into_styled(TextStyle::new(Font24x32, Color::TEXT));
        draw(ili, &text)?;

        self.dirty = false;
        Ok(())
    }
}

impl<I, R, B> Lcd for IliLcd<I, R, B>
where
    I: WriteOnlyDataCommand,
    R: OutputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
{
    type Error = IliError;

    fn is_ready(&self) -> bool {
        self.ili.is_some()
    }

    fn set_text(&mut self, widget: Widget, text: &str) -> Result<(), Self::Error> {
        match widget {
            Widget::Count => {
                self.text.clear();
                self.text
                    .push_str(text)
                    .map_err(|_| IliError::TextOverflow)
            }
        }
    }

    fn mark_dirty(&mut self, widget: Widget) {
        match widget {
            Widget::Count => self.dirty = true,
        }
    }

    fn refresh(&mut self, area: Area) -> Result<(), Self::Error> {
        match area {
            Area::Widget(Widget::Count) if self.dirty => self.draw_label(),
            Area::Widget(Widget::Count) => Ok(()),
            Area::All => {
                let ili = self.ili.as_mut().ok_or(IliError::NotReady)?;
                ili.clear(Color::BACKGROUND).map_err(IliError::Ili)?;
                self.draw_label()
            }
        }
    }

    fn turn_on(&mut self) -> Result<(), Self::Error> {
        self.backlight.set_high().ok();
        Ok(())
    }
}

fn draw<I, R, D>(ili: &mut Ili9341<I, R>, drawable: D) -> Result<(), IliError>
where
    I: WriteOnlyDataCommand,
    R: OutputPin<Error = Infallible>,
    D: Drawable<Rgb565>,
{
    drawable.draw(ili).map_err(IliError::Ili)
}
