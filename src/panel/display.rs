//! SSD1306 OLED implementation of the `FrontPanel` trait.
//!
//! The UI core draws in the panel layout's 160x64 coordinate space
//! (8-pixel rows, 12-pixel text cells); this adapter maps that onto the
//! 128x64 module: columns scale by 128/160, text renders in 6x10 and
//! 10x20 monospace fonts.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::config::DISPLAY_COLS;
use crate::hal::FrontPanel;

type Driver<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// The physical panel.
pub struct OledPanel<I2C> {
    driver: Driver<I2C>,
}

impl<I2C> OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the module and clear the screen.
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        let _ = driver.init();
        driver.clear_buffer();
        let _ = driver.flush();
        Self { driver }
    }

    /// Map a layout column (of 160) onto the 128-px module.
    fn x(col: u8) -> i32 {
        i32::from(col) * 128 / i32::from(DISPLAY_COLS)
    }

    fn text_style(inverted: bool) -> MonoTextStyle<'static, BinaryColor> {
        let (fg, bg) = if inverted {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        };
        MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(fg)
            .background_color(bg)
            .build()
    }
}

impl<I2C> FrontPanel for OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear_all(&mut self) {
        self.driver.clear_buffer();
        let _ = self.driver.flush();
    }

    fn clear(&mut self, row0: u8, col0: u8, row1: u8, col1: u8, fill: u8) {
        let x0 = Self::x(col0);
        let width = (Self::x(col1) - x0).max(0) as u32;

        // The fill byte repeats down every 8-pixel row band: bit n of
        // the pattern lights pixel row `row * 8 + n`.
        for row in row0..row1 {
            for bit in 0..8u8 {
                let lit = fill & (1 << bit) != 0;
                let color = if lit { BinaryColor::On } else { BinaryColor::Off };
                let line = Rectangle::new(
                    Point::new(x0, i32::from(row) * 8 + i32::from(bit)),
                    Size::new(width, 1),
                );
                let _ = line
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(&mut self.driver);
            }
        }
        let _ = self.driver.flush();
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str, inverted: bool) {
        let origin = Point::new(Self::x(col), i32::from(row) * 8);
        let _ = Text::with_baseline(text, origin, Self::text_style(inverted), Baseline::Top)
            .draw(&mut self.driver);
        let _ = self.driver.flush();
    }

    fn draw_big_numbers(&mut self, row: u8, col: u8, text: &str) {
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_10X20)
            .text_color(BinaryColor::On)
            .background_color(BinaryColor::Off)
            .build();
        let origin = Point::new(Self::x(col), i32::from(row) * 8 + 6);
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut self.driver);
        let _ = self.driver.flush();
    }

    fn set_contrast(&mut self, level: u8) {
        // The module exposes five brightness presets; bucket the 0..=63
        // panel level onto them.
        let brightness = match level {
            0..=12 => Brightness::DIMMEST,
            13..=25 => Brightness::DIM,
            26..=38 => Brightness::NORMAL,
            39..=51 => Brightness::BRIGHT,
            _ => Brightness::BRIGHTEST,
        };
        let _ = self.driver.set_brightness(brightness);
    }
}
