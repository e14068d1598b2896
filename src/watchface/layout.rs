//! Text placement for the two watchface layouts
//!
//! Text is measured by drawing it at the origin with the alphabetic baseline and
//! recording which pixels get ink. The offset of that ink box tells how far the
//! glyphs reach left of and above the cursor, so `cursor = target - offset` puts
//! the top-left corner of the inked text exactly on the target.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text},
};

use super::{LayoutMode, WatchFace};
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH, SINGLE_LINE_GUTTER};

/// Measured extent of a string relative to its cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBounds {
    /// Top-left of the box relative to the cursor, `y` is negative above the baseline
    pub offset: Point,
    pub size: Size,
}

/// Where one string ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPlacement {
    pub bounds: TextBounds,
    /// Top-left corner of the measured box on screen
    pub origin: Point,
    /// Cursor handed to the text renderer, alphabetic baseline
    pub cursor: Point,
}

impl SlotPlacement {
    fn at(origin: Point, bounds: TextBounds) -> Self {
        SlotPlacement {
            bounds,
            origin,
            cursor: origin - bounds.offset,
        }
    }
}

/// Placement of time and date for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub text1: SlotPlacement,
    pub text2: SlotPlacement,
}

/// Draw target that only tracks the extent of the ink it receives
#[derive(Default)]
struct InkBounds {
    min: Option<Point>,
    max: Point,
}

impl InkBounds {
    fn record(&mut self, point: Point) {
        match self.min {
            None => {
                self.min = Some(point);
                self.max = point;
            }
            Some(min) => {
                self.min = Some(min.component_min(point));
                self.max = self.max.component_max(point);
            }
        }
    }
}

impl Dimensions for InkBounds {
    fn bounding_box(&self) -> Rectangle {
        // Glyphs reach above and left of the cursor, so the canvas spans both signs
        Rectangle::new(Point::new(-0x4000, -0x4000), Size::new(0x8000, 0x8000))
    }
}

impl DrawTarget for InkBounds {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color.is_on() {
                self.record(point);
            }
        }
        Ok(())
    }
}

/// Ink bounding box of `text` in `font`
///
/// A string that puts no ink down, empty or only spaces, has zero size and offset.
pub fn measure(text: &str, font: &MonoFont<'_>) -> TextBounds {
    let mut ink = InkBounds::default();
    let style = MonoTextStyle::new(font, BinaryColor::On);
    match Text::with_baseline(text, Point::zero(), style, Baseline::Alphabetic).draw(&mut ink) {
        Ok(_) => {}
        Err(never) => match never {},
    }

    match ink.min {
        Some(min) => TextBounds {
            offset: min,
            size: Size::new((ink.max.x - min.x + 1) as u32, (ink.max.y - min.y + 1) as u32),
        },
        None => TextBounds {
            offset: Point::zero(),
            size: Size::zero(),
        },
    }
}

/// Compute where `text1` and `text2` go on `face`
///
/// `text1` is expected to be final, meridiem stripping happens before.
pub fn place(face: &WatchFace, text1: &str, text2: &str) -> Placement {
    let b1 = measure(text1, face.text1.font);
    let b2 = measure(text2, face.text2.font);

    match face.layout {
        LayoutMode::SingleLine => {
            // One block, positioned by text1; text2's own position is not used
            let total_w = b1.size.width + b2.size.width + SINGLE_LINE_GUTTER as u32;
            let total_h = b1.size.height.max(b2.size.height);
            let origin_x = face.text1.x.resolve(SCREEN_WIDTH, total_w);
            let baseline_y = face.text1.y.resolve(SCREEN_HEIGHT, total_h);

            let text2_x = origin_x + b1.size.width as i32 + SINGLE_LINE_GUTTER;
            Placement {
                text1: SlotPlacement::at(Point::new(origin_x, baseline_y), b1),
                text2: SlotPlacement::at(Point::new(text2_x, baseline_y), b2),
            }
        }
        LayoutMode::TwoLine => {
            let origin1 = Point::new(
                face.text1.x.resolve(SCREEN_WIDTH, b1.size.width),
                face.text1.y.resolve(SCREEN_HEIGHT, b1.size.height),
            );
            let origin2 = Point::new(
                face.text2.x.resolve(SCREEN_WIDTH, b2.size.width),
                face.text2.y.resolve(SCREEN_HEIGHT, b2.size.height),
            );
            Placement {
                text1: SlotPlacement::at(origin1, b1),
                text2: SlotPlacement::at(origin2, b2),
            }
        }
    }
}
