//! Draw a watchface and push it to the panel

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

use super::layout::{self, Placement};
use super::{strip_meridiem, WatchFace};
use crate::display::{EpdPanel, Frame, Refresh};

/// Draw `face` with the given strings onto any binary draw target
///
/// Order: white background, bitmap, time, date. Later draws overwrite earlier
/// ones, there is no blending.
pub fn draw_face<D>(target: &mut D, face: &WatchFace, time: &str, date: &str) -> Result<Placement, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let time = if face.no_ampm {
        strip_meridiem(time)
    } else {
        time.to_string()
    };
    let placement = layout::place(face, &time, date);

    target.clear(BinaryColor::Off)?;
    face.bitmap.draw(target, face.bitmap_origin, face.bitmap_color)?;

    let style1 = MonoTextStyle::new(face.text1.font, face.text1.color);
    Text::with_baseline(&time, placement.text1.cursor, style1, Baseline::Alphabetic).draw(target)?;

    let style2 = MonoTextStyle::new(face.text2.font, face.text2.color);
    Text::with_baseline(date, placement.text2.cursor, style2, Baseline::Alphabetic).draw(target)?;

    Ok(placement)
}

/// Owns the panel and the frame buffer drawn for it
pub struct Renderer<P> {
    panel: P,
    frame: Frame,
}

impl<P: EpdPanel> Renderer<P> {
    pub fn new(panel: P) -> Self {
        Renderer {
            panel,
            frame: Frame::new(),
        }
    }

    /// Draw `face` and show it with one panel update
    pub fn render(
        &mut self,
        face: &WatchFace,
        time: &str,
        date: &str,
        refresh: Refresh,
    ) -> Result<Placement, P::Error> {
        let placement = match draw_face(&mut self.frame, face, time, date) {
            Ok(placement) => placement,
            Err(never) => match never {},
        };
        log::debug!(
            "Rendering '{}' ({:?}): time at {:?}, date at {:?}",
            face.name,
            refresh,
            placement.text1.origin,
            placement.text2.origin
        );
        self.panel.present(&self.frame, refresh)?;
        Ok(placement)
    }

    /// Last frame drawn
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{PanelFailed, RecordingPanel};
    use super::*;
    use crate::watchface::{Bitmap, LayoutMode, Position, TextSlot};
    use embedded_graphics::mono_font::ascii::FONT_10X20;
    use embedded_graphics::primitives::Rectangle;

    static TOP_HALF_BLACK: [u8; 5000] = {
        let mut data = [0u8; 5000];
        let mut i = 0;
        while i < 2500 {
            data[i] = 0xFF;
            i += 1;
        }
        data
    };

    fn face(no_ampm: bool) -> WatchFace {
        WatchFace {
            name: "test",
            bitmap: Bitmap::full_screen(&TOP_HALF_BLACK),
            bitmap_origin: Point::zero(),
            bitmap_color: BinaryColor::On,
            layout: LayoutMode::TwoLine,
            no_ampm,
            // White time over the black half, black date below
            text1: TextSlot::centered(&FONT_10X20)
                .at(Position::Center, Position::Percent(10))
                .color(BinaryColor::Off),
            text2: TextSlot::centered(&FONT_10X20).at(Position::Center, Position::Percent(75)),
        }
    }

    fn ink(frame: &Frame, origin: Point, size: Size) -> usize {
        frame.ink_in(&Rectangle::new(origin, size))
    }

    #[test]
    fn render_draws_bitmap_then_text_and_presents_once() {
        let mut renderer = Renderer::new(RecordingPanel::default());

        let placement = renderer
            .render(&face(false), "6:24 AM", "Oct 25", Refresh::Full)
            .unwrap();

        let panel = renderer.panel_mut();
        assert_eq!(panel.frames.len(), 1);
        let (frame, refresh) = &panel.frames[0];
        assert_eq!(*refresh, Refresh::Full);

        // White glyphs punched into the black half
        let t = placement.text1;
        let box_area = (t.bounds.size.width * t.bounds.size.height) as usize;
        let inked = ink(frame, t.origin, t.bounds.size);
        assert!(inked < box_area, "time should clear some bitmap pixels");

        // Date sits on white background and leaves ink
        let d = placement.text2;
        assert!(ink(frame, d.origin, d.bounds.size) > 0);

        // Nothing drawn outside bitmap and text on the lower half
        assert_eq!(ink(frame, Point::new(0, 100), Size::new(200, 40)), 0);
    }

    #[test]
    fn no_ampm_measures_the_stripped_time() {
        let mut renderer = Renderer::new(RecordingPanel::default());

        let full = renderer
            .render(&face(false), "12:05 PM", "Dec 1", Refresh::Partial)
            .unwrap();
        let stripped = renderer
            .render(&face(true), "12:05 PM", "Dec 1", Refresh::Partial)
            .unwrap();

        assert_eq!(full.text1.bounds, layout::measure("12:05 PM", &FONT_10X20));
        assert_eq!(stripped.text1.bounds, layout::measure("12:05", &FONT_10X20));
        assert!(stripped.text1.bounds.size.width < full.text1.bounds.size.width);
    }

    #[test]
    fn frame_is_redrawn_from_scratch() {
        let mut renderer = Renderer::new(RecordingPanel::default());
        let mut plain = face(false);
        plain.bitmap = Bitmap::full_screen(&[]);

        renderer
            .render(&face(false), "1:00 AM", "Jan 1", Refresh::Full)
            .unwrap();
        renderer
            .render(&plain, "1:00 AM", "Jan 1", Refresh::Partial)
            .unwrap();

        // The earlier bitmap does not survive into the second frame
        assert_eq!(ink(renderer.frame(), Point::zero(), Size::new(200, 10)), 0);
    }

    #[test]
    fn panel_errors_are_returned() {
        let mut renderer = Renderer::new(RecordingPanel {
            fail: true,
            ..Default::default()
        });

        assert_eq!(
            renderer.render(&face(false), "1:00 AM", "Jan 1", Refresh::Full),
            Err(PanelFailed)
        );
    }
}
