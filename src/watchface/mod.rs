//! Watchface descriptors
//!
//! A watchface is a background bitmap plus two text slots, the time (`text1`)
//! and the date (`text2`). [`layout`] turns a descriptor and the two strings
//! into pixel positions, [`render`] draws them and hands the frame to the panel.

pub mod catalog;
pub mod layout;
pub mod render;

use embedded_graphics::{
    mono_font::MonoFont,
    pixelcolor::BinaryColor,
    prelude::*,
};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// How the time and date strings are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Time and date side by side, positioned as one block by `text1`'s position
    SingleLine,
    /// Time and date positioned independently
    TwoLine,
}

/// Position along one screen axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Center the text's measured extent on the axis
    Center,
    /// Start at this percentage of the screen extent, not range checked
    Percent(u8),
}

impl Position {
    /// Start coordinate for something `extent` pixels long on an axis of `screen` pixels
    ///
    /// Division truncates toward zero, so oversized text centers to a negative start.
    pub fn resolve(self, screen: u32, extent: u32) -> i32 {
        match self {
            Position::Center => (screen as i32 - extent as i32) / 2,
            Position::Percent(pct) => screen as i32 * i32::from(pct) / 100,
        }
    }
}

/// Font, color and position of one string
#[derive(Clone, Copy)]
pub struct TextSlot {
    pub x: Position,
    pub y: Position,
    pub color: BinaryColor,
    pub font: &'static MonoFont<'static>,
}

impl TextSlot {
    /// Black text centered on both axes
    pub const fn centered(font: &'static MonoFont<'static>) -> Self {
        TextSlot {
            x: Position::Center,
            y: Position::Center,
            color: BinaryColor::On,
            font,
        }
    }

    pub const fn at(mut self, x: Position, y: Position) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub const fn color(mut self, color: BinaryColor) -> Self {
        self.color = color;
        self
    }
}

/// Packed 1bpp image, rows MSB first with a stride of `ceil(width / 8)` bytes
#[derive(Debug, Clone, Copy)]
pub struct Bitmap {
    pub data: &'static [u8],
    pub width: u32,
    pub height: u32,
}

impl Bitmap {
    /// Full screen bitmap
    pub const fn full_screen(data: &'static [u8]) -> Self {
        Bitmap {
            data,
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }

    pub const fn row_stride(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Bytes needed for the declared size
    pub const fn required_len(&self) -> usize {
        self.row_stride() * self.height as usize
    }

    /// Data covers the declared size
    pub fn is_complete(&self) -> bool {
        self.width > 0 && self.height > 0 && self.data.len() >= self.required_len()
    }

    /// Draw the set bits at `origin` in `color`, clear bits leave the target untouched
    ///
    /// Incomplete bitmaps (for example an asset that was missing at build time)
    /// are skipped with a warning.
    pub fn draw<D>(&self, target: &mut D, origin: Point, color: BinaryColor) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        if !self.is_complete() {
            log::warn!(
                "Bitmap has {} bytes, {}x{} needs {}, skipping",
                self.data.len(),
                self.width,
                self.height,
                self.required_len()
            );
            return Ok(());
        }

        let stride = self.row_stride();
        let (width, height) = (self.width, self.height);
        let pixels = (0..height).flat_map(move |y| {
            let row = &self.data[y as usize * stride..(y as usize + 1) * stride];
            (0..width).filter_map(move |x| {
                let set = row[(x / 8) as usize] & (0x80 >> (x % 8)) != 0;
                set.then(|| Pixel(origin + Point::new(x as i32, y as i32), color))
            })
        });
        target.draw_iter(pixels)
    }
}

/// Static description of one watchface
#[derive(Clone, Copy)]
pub struct WatchFace {
    pub name: &'static str,
    pub bitmap: Bitmap,
    /// Top-left corner of the bitmap
    pub bitmap_origin: Point,
    pub bitmap_color: BinaryColor,
    pub layout: LayoutMode,
    /// Show the time as `"H:MM"` by cutting the meridiem off
    pub no_ampm: bool,
    /// Time
    pub text1: TextSlot,
    /// Date
    pub text2: TextSlot,
}

/// First five characters of `time`
///
/// Assumes the `"H:MM AM"` / `"HH:MM AM"` shape produced by
/// [`crate::rtc::format::format_time`]: single digit hours keep the trailing
/// space (`"6:24 "`), double digit hours lose nothing but the meridiem.
pub fn strip_meridiem(time: &str) -> String {
    time.chars().take(5).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Frame;
    use embedded_graphics::primitives::Rectangle;

    #[test]
    fn meridiem_is_cut_to_five_characters() {
        assert_eq!(strip_meridiem("6:24 AM"), "6:24 ");
        assert_eq!(strip_meridiem("12:05 PM"), "12:05");
        assert_eq!(strip_meridiem("ERR"), "ERR");
    }

    #[test]
    fn resolve_truncates_toward_zero() {
        assert_eq!(Position::Center.resolve(200, 51), 74);
        assert_eq!(Position::Center.resolve(200, 203), -1);
        assert_eq!(Position::Percent(33).resolve(200, 999), 66);
        assert_eq!(Position::Percent(150).resolve(200, 0), 300);
    }

    static CHECKER: [u8; 2] = [0b1010_0000, 0b0101_0000];

    #[test]
    fn bitmap_draws_only_set_bits() {
        let mut frame = Frame::new();
        frame.clear(BinaryColor::On).unwrap();
        let bitmap = Bitmap {
            data: &CHECKER,
            width: 4,
            height: 2,
        };

        bitmap
            .draw(&mut frame, Point::new(10, 20), BinaryColor::Off)
            .unwrap();

        // Set bits painted white, clear bits kept their ink
        assert_eq!(frame.pixel(10, 20), Some(BinaryColor::Off));
        assert_eq!(frame.pixel(11, 20), Some(BinaryColor::On));
        assert_eq!(frame.pixel(12, 20), Some(BinaryColor::Off));
        assert_eq!(frame.pixel(11, 21), Some(BinaryColor::Off));
        assert_eq!(frame.pixel(10, 21), Some(BinaryColor::On));
    }

    #[test]
    fn empty_bitmap_is_skipped() {
        let mut frame = Frame::new();
        Bitmap::full_screen(&[])
            .draw(&mut frame, Point::zero(), BinaryColor::On)
            .unwrap();
        assert_eq!(frame.ink_in(&Rectangle::new(Point::zero(), Size::new(200, 200))), 0);
    }
}
