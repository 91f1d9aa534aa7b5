use core::fmt::Write;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::Point;
use heapless::String;

use crate::error::{Error, Result};
use crate::hw::{Area, Lcd, Widget};

/// Counter text, long enough for any value up to `COUNTER_MAX`.
pub type CountText = String<8>;

/// Render pipeline for the counter value.
///
/// Only values that differ from the last rendered one reach the panel.
pub struct Display<LCD>
where
    LCD: Lcd,
{
    last_value: u16,
    lcd: LCD,
}

impl<LCD> Display<LCD>
where
    LCD: Lcd,
{
    /// Draws the initial value, turns the panel on and paints the whole UI once.
    pub fn new(lcd: LCD) -> Result<Self, LCD::Error> {
        let mut display = Display { last_value: 0, lcd };
        display.init()?;
        Ok(display)
    }

    pub fn update(&mut self, value: u16) -> Result<(), LCD::Error> {
        if value != self.last_value {
            self.draw_value(value)?;
            self.last_value = value;
        }
        Ok(())
    }

    pub fn last_value(&self) -> u16 {
        self.last_value
    }

    pub fn lcd(&self) -> &LCD {
        &self.lcd
    }

    #[cfg(test)]
    pub(crate) fn lcd_mut(&mut self) -> &mut LCD {
        &mut self.lcd
    }

    fn draw_value(&mut self, value: u16) -> Result<(), LCD::Error> {
        let text = format_value(value)?;
        self.lcd
            .set_text(Widget::Count, &text)
            .map_err(Error::Lcd)?;
        self.lcd.mark_dirty(Widget::Count);
        self.lcd
            .refresh(Area::Widget(Widget::Count))
            .map_err(Error::Lcd)
    }

    fn init(&mut self) -> Result<(), LCD::Error> {
        let text = format_value(self.last_value)?;
        self.lcd
            .set_text(Widget::Count, &text)
            .map_err(Error::Lcd)?;
        self.lcd.turn_on().map_err(Error::Lcd)?;
        self.lcd.refresh(Area::All).map_err(Error::Lcd)
    }
}

/// Formats `value` in base 10 without padding or leading zeros.
pub fn format_value<LCDER>(value: u16) -> Result<CountText, LCDER> {
    let mut buffer = CountText::new();
    write!(&mut buffer, "{}", value).map_err(|_| Error::BufferWrite)?;
    Ok(buffer)
}

pub struct Dimension;

impl Dimension {
    pub const WIDTH: i32 = 480;
    pub const HEIGHT: i32 = 320;
}

/// Fixed box holding the counter text, centred on the screen.
pub struct CountLabel;

impl CountLabel {
    pub const WIDTH: i32 = 100;
    pub const HEIGHT: i32 = 50;

    pub const GLYPH_WIDTH: i32 = 24;
    pub const GLYPH_HEIGHT: i32 = 32;

    pub const TOP_LEFT: Point = Point::new(
        (Dimension::WIDTH - CountLabel::WIDTH) / 2,
        (Dimension::HEIGHT - CountLabel::HEIGHT) / 2,
    );
    pub const BOTTOM_RIGHT: Point = Point::new(
        CountLabel::TOP_LEFT.x + CountLabel::WIDTH - 1,
        CountLabel::TOP_LEFT.y + CountLabel::HEIGHT - 1,
    );

    const MAX_GLYPHS: usize = (CountLabel::WIDTH / CountLabel::GLYPH_WIDTH) as usize;

    /// Part of `text` that fits into the label, the rest is clipped.
    pub fn visible(text: &str) -> &str {
        let end = text
            .char_indices()
            .nth(CountLabel::MAX_GLYPHS)
            .map_or(text.len(), |(i, _)| i);
        &text[..end]
    }

    /// Top left corner of `text` centred inside the label.
    pub fn text_position(text: &str) -> Point {
        let glyphs = CountLabel::visible(text).chars().count() as i32;
        let text_width = glyphs * CountLabel::GLYPH_WIDTH;
        Point::new(
            CountLabel::TOP_LEFT.x + (CountLabel::WIDTH - text_width) / 2,
            CountLabel::TOP_LEFT.y + (CountLabel::HEIGHT - CountLabel::GLYPH_HEIGHT) / 2,
        )
    }
}

pub struct Color;

impl Color {
    pub const BACKGROUND: Rgb565 = Rgb565::WHITE;
    pub const TEXT: Rgb565 = Rgb565::BLACK;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        SetText(Widget, std::string::String),
        MarkDirty(Widget),
        Refresh(Area),
        TurnOn,
    }

    #[derive(Default)]
    pub(crate) struct MockLcd {
        pub(crate) not_ready: bool,
        pub(crate) fail_refresh: bool,
        pub(crate) calls: Vec<Call>,
        pub(crate) text: std::string::String,
    }

    impl MockLcd {
        pub(crate) fn refreshes(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, Call::Refresh(_)))
                .count()
        }
    }

    impl Lcd for MockLcd {
        type Error = &'static str;

        fn is_ready(&self) -> bool {
            !self.not_ready
        }

        fn set_text(&mut self, widget: Widget, text: &str) -> core::result::Result<(), Self::Error> {
            self.calls.push(Call::SetText(widget, text.into()));
            self.text = text.into();
            Ok(())
        }

        fn mark_dirty(&mut self, widget: Widget) {
            self.calls.push(Call::MarkDirty(widget));
        }

        fn refresh(&mut self, area: Area) -> core::result::Result<(), Self::Error> {
            if self.fail_refresh {
                return Err("bus error");
            }
            self.calls.push(Call::Refresh(area));
            Ok(())
        }

        fn turn_on(&mut self) -> core::result::Result<(), Self::Error> {
            self.calls.push(Call::TurnOn);
            Ok(())
        }
    }

    #[test]
    fn startup_renders_zero_then_full_refresh() {
        let display = Display::new(MockLcd::default()).unwrap();
        assert_eq!(
            display.lcd().calls,
            vec![
                Call::SetText(Widget::Count, "0".into()),
                Call::TurnOn,
                Call::Refresh(Area::All),
            ]
        );
        assert_eq!(display.last_value(), 0);
    }

    #[test]
    fn unchanged_value_is_not_redrawn() {
        let mut display = Display::new(MockLcd::default()).unwrap();
        display.update(0).unwrap();
        assert_eq!(display.lcd().refreshes(), 1);
    }

    #[test]
    fn changed_value_redraws_only_the_label() {
        let mut display = Display::new(MockLcd::default()).unwrap();
        display.update(3000).unwrap();

        assert_eq!(
            display.lcd().calls[3..],
            [
                Call::SetText(Widget::Count, "3000".into()),
                Call::MarkDirty(Widget::Count),
                Call::Refresh(Area::Widget(Widget::Count)),
            ]
        );
        assert_eq!(display.last_value(), 3000);
    }

    #[test]
    fn same_value_twice_refreshes_once() {
        let mut display = Display::new(MockLcd::default()).unwrap();
        display.update(42).unwrap();
        display.update(42).unwrap();
        // One startup refresh plus one for 42.
        assert_eq!(display.lcd().refreshes(), 2);
    }

    #[test]
    fn failed_refresh_keeps_previous_value() {
        let mut display = Display::new(MockLcd::default()).unwrap();
        display.lcd.fail_refresh = true;
        assert_eq!(display.update(7), Err(Error::Lcd("bus error")));
        assert_eq!(display.last_value(), 0);

        display.lcd.fail_refresh = false;
        display.update(7).unwrap();
        assert_eq!(display.last_value(), 7);
        assert_eq!(display.lcd().text, "7");
    }

    #[test]
    fn format_has_no_leading_zeros() {
        assert_eq!(format_value::<()>(0).unwrap().as_str(), "0");
        assert_eq!(format_value::<()>(7).unwrap().as_str(), "7");
        assert_eq!(format_value::<()>(1010).unwrap().as_str(), "1010");
        assert_eq!(format_value::<()>(9999).unwrap().as_str(), "9999");
    }

    #[test]
    fn label_is_centred_on_screen() {
        assert_eq!(CountLabel::TOP_LEFT, Point::new(190, 135));
        assert_eq!(CountLabel::BOTTOM_RIGHT, Point::new(289, 184));
    }

    #[test]
    fn text_is_centred_in_label() {
        assert_eq!(CountLabel::text_position("0"), Point::new(228, 144));
        assert_eq!(CountLabel::text_position("9999"), Point::new(192, 144));
    }

    #[test]
    fn long_text_is_clipped() {
        assert_eq!(CountLabel::visible("9999"), "9999");
        assert_eq!(CountLabel::visible("123456"), "1234");
        assert_eq!(CountLabel::text_position("123456"), CountLabel::text_position("1234"));
    }
}
