//! Frame buffer and the panel abstraction the renderer draws through.

use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PointsIter, Rectangle},
};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

const BYTES_PER_ROW: usize = (SCREEN_WIDTH as usize).div_ceil(8);
const FRAME_BYTES: usize = BYTES_PER_ROW * SCREEN_HEIGHT as usize;

/// Which waveform the panel uses to show a frame.
///
/// Both variants redraw the complete 200x200 frame. They only differ in how the
/// controller drives the pixels there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Slow update that resets every pixel, clears ghosting
    Full,
    /// Fast differential update, leaves some ghosting behind over time
    Partial,
}

/// A display that can show a complete [`Frame`] in one call.
///
/// Implementations may need several bus transfers and busy waits, callers see a
/// single blocking operation.
pub trait EpdPanel {
    /// Error reported by the panel
    type Error: core::fmt::Debug;

    /// Transfer `frame` and refresh the panel with the given waveform
    fn present(&mut self, frame: &Frame, refresh: Refresh) -> Result<(), Self::Error>;
}

/// 1bpp frame buffer covering the whole panel.
///
/// Rows are packed MSB first, the same layout the SSD1681 RAM expects. A set bit is
/// white (`BinaryColor::Off`), a cleared bit is black ink (`BinaryColor::On`).
#[derive(Clone)]
pub struct Frame {
    buffer: [u8; FRAME_BYTES],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// A blank, white frame
    pub const fn new() -> Self {
        Frame {
            buffer: [0xFF; FRAME_BYTES],
        }
    }

    /// Raw panel bytes
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Color at `(x, y)`, `None` outside the panel
    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return None;
        }
        let (index, mask) = Self::locate(x, y);
        if self.buffer[index] & mask == 0 {
            Some(BinaryColor::On)
        } else {
            Some(BinaryColor::Off)
        }
    }

    /// Number of ink pixels inside `area`
    pub fn ink_in(&self, area: &Rectangle) -> usize {
        area.points()
            .filter(|p| {
                p.x >= 0 && p.y >= 0 && self.pixel(p.x as u32, p.y as u32) == Some(BinaryColor::On)
            })
            .count()
    }

    fn locate(x: u32, y: u32) -> (usize, u8) {
        let index = y as usize * BYTES_PER_ROW + x as usize / 8;
        (index, 0x80 >> (x % 8))
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        let (index, mask) = Self::locate(x, y);
        match color {
            BinaryColor::On => self.buffer[index] &= !mask,
            BinaryColor::Off => self.buffer[index] |= mask,
        }
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels.into_iter() {
            if coord.x < 0
                || coord.y < 0
                || coord.x >= SCREEN_WIDTH as i32
                || coord.y >= SCREEN_HEIGHT as i32
            {
                continue;
            }
            self.set_pixel(coord.x as u32, coord.y as u32, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0x00,
            BinaryColor::Off => 0xFF,
        };
        self.buffer.fill(fill);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn new_frame_is_white() {
        let frame = Frame::new();
        assert!(frame.buffer().iter().all(|b| *b == 0xFF));
        assert_eq!(frame.buffer().len(), 5000);
        assert_eq!(frame.pixel(0, 0), Some(BinaryColor::Off));
        assert_eq!(frame.pixel(200, 0), None);
    }

    #[test]
    fn ink_clears_bits_msb_first() {
        let mut frame = Frame::new();
        Pixel(Point::new(0, 0), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();
        Pixel(Point::new(9, 1), BinaryColor::On)
            .draw(&mut frame)
            .unwrap();

        assert_eq!(frame.buffer()[0], 0x7F);
        assert_eq!(frame.buffer()[25 + 1], 0xBF);
        assert_eq!(frame.pixel(9, 1), Some(BinaryColor::On));
    }

    #[test]
    fn out_of_bounds_pixels_are_clipped() {
        let mut frame = Frame::new();
        Rectangle::new(Point::new(-10, 190), Size::new(30, 30))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .unwrap();

        // 20 columns by 10 rows survive the clip
        assert_eq!(frame.ink_in(&frame.bounding_box()), 200);
    }

    #[test]
    fn clear_fills_whole_buffer() {
        let mut frame = Frame::new();
        frame.clear(BinaryColor::On).unwrap();
        assert!(frame.buffer().iter().all(|b| *b == 0x00));
        frame.clear(BinaryColor::Off).unwrap();
        assert!(frame.buffer().iter().all(|b| *b == 0xFF));
    }
}
