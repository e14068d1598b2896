//! SSD1681 ePaper Display Driver
//!
//! Used in the GDEH0154D67 1.54" 200x200 black/white panel.
//!
//! This driver is losely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers but built for my needs.
//!
//!
//! ### Usage
//! The driver does not own a frame buffer. To display something you:
//!
//! 1. draw onto a [`crate::display::Frame`], preferably
//! with [`embedded_graphics`](https://github.com/jamwaffles/embedded-graphics).
//! 1. hand the frame to [`driver::Ssd1681::update_full`] or [`driver::Ssd1681::update_partial`],
//! or through the [`crate::display::EpdPanel`] trait.
//! 1. put the controller to sleep with [`driver::Ssd1681::sleep`] until the next minute.
//!
//!

pub mod driver;
pub mod interface;

mod cmd;
mod flag;

pub use driver::Ssd1681;

/// Display height, pixels vertically
pub const HEIGHT: u16 = 200;

/// Display width, pixels horizontally
pub const WIDTH: u16 = 200;

/// Bytes in one full 1bpp frame
pub const BUFFER_SIZE: usize = WIDTH as usize / 8 * HEIGHT as usize;
