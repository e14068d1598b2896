//! Built-in watchfaces
//!
//! Background images come from `assets/watchfaces/<name>.png`, converted to
//! 200x200 1bpp by `build.rs`. A face whose PNG was missing at build time has an
//! empty bitmap and renders text only.

use embedded_graphics::{mono_font::ascii, pixelcolor::BinaryColor, prelude::Point};

use super::{Bitmap, LayoutMode, Position, TextSlot, WatchFace};
use crate::config::WATCHFACE;

macro_rules! face_bitmap {
    ($name:literal) => {
        Bitmap::full_screen(include_bytes!(concat!(
            env!("OUT_DIR"),
            "/",
            $name,
            ".bin"
        )))
    };
}

const FACES: &[WatchFace] = &[
    WatchFace {
        name: "atat",
        bitmap: face_bitmap!("atat"),
        bitmap_origin: Point::zero(),
        bitmap_color: BinaryColor::On,
        layout: LayoutMode::SingleLine,
        no_ampm: false,
        text1: TextSlot::centered(&profont::PROFONT_18_POINT)
            .at(Position::Center, Position::Percent(84)),
        text2: TextSlot::centered(&profont::PROFONT_12_POINT),
    },
    WatchFace {
        name: "atdp",
        bitmap: face_bitmap!("atdp"),
        bitmap_origin: Point::zero(),
        bitmap_color: BinaryColor::On,
        layout: LayoutMode::TwoLine,
        no_ampm: false,
        text1: TextSlot::centered(&profont::PROFONT_24_POINT)
            .at(Position::Center, Position::Percent(4)),
        text2: TextSlot::centered(&profont::PROFONT_14_POINT)
            .at(Position::Center, Position::Percent(86)),
    },
    WatchFace {
        name: "b1",
        bitmap: face_bitmap!("b1"),
        bitmap_origin: Point::zero(),
        bitmap_color: BinaryColor::On,
        layout: LayoutMode::SingleLine,
        no_ampm: true,
        text1: TextSlot::centered(&profont::PROFONT_24_POINT),
        text2: TextSlot::centered(&profont::PROFONT_18_POINT),
    },
    WatchFace {
        name: "giraffe1",
        bitmap: face_bitmap!("giraffe1"),
        bitmap_origin: Point::zero(),
        bitmap_color: BinaryColor::On,
        layout: LayoutMode::TwoLine,
        no_ampm: true,
        text1: TextSlot::centered(&profont::PROFONT_24_POINT)
            .at(Position::Percent(5), Position::Percent(6)),
        text2: TextSlot::centered(&ascii::FONT_10X20)
            .at(Position::Percent(4), Position::Percent(88)),
    },
    WatchFace {
        name: "mountain2",
        bitmap: face_bitmap!("mountain2"),
        bitmap_origin: Point::zero(),
        bitmap_color: BinaryColor::On,
        layout: LayoutMode::TwoLine,
        no_ampm: false,
        text1: TextSlot::centered(&profont::PROFONT_18_POINT)
            .at(Position::Center, Position::Percent(8)),
        text2: TextSlot::centered(&profont::PROFONT_12_POINT)
            .at(Position::Center, Position::Percent(22)),
    },
    WatchFace {
        name: "stormtrooper3_floyd",
        bitmap: face_bitmap!("stormtrooper3_floyd"),
        bitmap_origin: Point::zero(),
        bitmap_color: BinaryColor::On,
        layout: LayoutMode::SingleLine,
        no_ampm: false,
        // White text on the dark band at the bottom of the image
        text1: TextSlot::centered(&ascii::FONT_9X15_BOLD)
            .at(Position::Center, Position::Percent(90))
            .color(BinaryColor::Off),
        text2: TextSlot::centered(&ascii::FONT_9X15).color(BinaryColor::Off),
    },
    WatchFace {
        name: "stormtrooper3",
        bitmap: face_bitmap!("stormtrooper3"),
        bitmap_origin: Point::zero(),
        bitmap_color: BinaryColor::On,
        layout: LayoutMode::SingleLine,
        no_ampm: false,
        text1: TextSlot::centered(&ascii::FONT_9X15_BOLD)
            .at(Position::Center, Position::Percent(90)),
        text2: TextSlot::centered(&ascii::FONT_9X15),
    },
];

/// Every face, in catalog order
pub fn all() -> &'static [WatchFace] {
    FACES
}

pub fn by_name(name: &str) -> Option<&'static WatchFace> {
    FACES.iter().find(|face| face.name == name)
}

/// Face at `index`, wrapping around the end of the catalog
pub fn get(index: usize) -> &'static WatchFace {
    &FACES[index % FACES.len()]
}

/// Face chosen with `WATCHFACE=<name>` at build time, the first entry otherwise
pub fn selected() -> &'static WatchFace {
    resolve(WATCHFACE)
}

fn resolve(name: Option<&str>) -> &'static WatchFace {
    match name {
        Some(name) => by_name(name).unwrap_or_else(|| {
            log::warn!("Unknown watchface '{}', using '{}'", name, FACES[0].name);
            &FACES[0]
        }),
        None => &FACES[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        for (i, face) in all().iter().enumerate() {
            let first = all().iter().position(|f| f.name == face.name);
            assert_eq!(first, Some(i), "duplicate {}", face.name);
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("giraffe1").map(|f| f.layout), Some(LayoutMode::TwoLine));
        assert!(by_name("nope").is_none());
    }

    #[test]
    fn get_wraps_around() {
        let n = all().len();
        assert_eq!(get(n).name, get(0).name);
        assert_eq!(get(n + 2).name, get(2).name);
    }

    #[test]
    fn selection_falls_back_to_first_face() {
        assert_eq!(resolve(None).name, "atat");
        assert_eq!(resolve(Some("unknown")).name, "atat");
        assert_eq!(resolve(Some("mountain2")).name, "mountain2");
    }

    #[test]
    fn bitmaps_are_full_screen_or_absent() {
        for face in all() {
            let len = face.bitmap.data.len();
            assert!(len == 0 || len == 5000, "{} has {} bytes", face.name, len);
        }
    }
}
