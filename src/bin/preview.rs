//! Render every watchface into a PNG on the host
//!
//! ```text
//! cargo run --features preview --bin preview -- [--output-dir DIR] [--time "6:24 AM"] [--date "Oct 25"] [--face NAME]
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use embedded_graphics::pixelcolor::BinaryColor;
use image::{GrayImage, Luma};

use epaper_watch::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use epaper_watch::watchface::{catalog, render::draw_face, WatchFace};
use epaper_watch::Frame;

struct Options {
    output_dir: PathBuf,
    time: String,
    date: String,
    face: Option<String>,
}

impl Options {
    fn parse() -> anyhow::Result<Self> {
        let mut options = Options {
            output_dir: PathBuf::from("previews"),
            time: "6:24 AM".to_string(),
            date: "Oct 25".to_string(),
            face: None,
        };

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            let mut value = || args.next().with_context(|| format!("{} needs a value", arg));
            match arg.as_str() {
                "--output-dir" | "-o" => options.output_dir = PathBuf::from(value()?),
                "--time" => options.time = value()?,
                "--date" => options.date = value()?,
                "--face" => options.face = Some(value()?),
                "--list" | "-l" => {
                    for face in catalog::all() {
                        println!("{}", face.name);
                    }
                    std::process::exit(0);
                }
                other => bail!("Unknown argument '{}'", other),
            }
        }
        Ok(options)
    }
}

fn to_image(frame: &Frame) -> GrayImage {
    GrayImage::from_fn(SCREEN_WIDTH, SCREEN_HEIGHT, |x, y| match frame.pixel(x, y) {
        Some(BinaryColor::On) => Luma([0u8]),
        _ => Luma([255u8]),
    })
}

fn render(face: &WatchFace, options: &Options) -> anyhow::Result<PathBuf> {
    let mut frame = Frame::new();
    let placement = match draw_face(&mut frame, face, &options.time, &options.date) {
        Ok(placement) => placement,
        Err(never) => match never {},
    };

    let path = options.output_dir.join(format!("preview_{}.png", face.name));
    to_image(&frame)
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{:<20} time at ({}, {}) {}x{}, date at ({}, {}) {}x{}{}",
        face.name,
        placement.text1.origin.x,
        placement.text1.origin.y,
        placement.text1.bounds.size.width,
        placement.text1.bounds.size.height,
        placement.text2.origin.x,
        placement.text2.origin.y,
        placement.text2.bounds.size.width,
        placement.text2.bounds.size.height,
        if face.bitmap.is_complete() { "" } else { "  (no background)" }
    );
    Ok(path)
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse()?;

    let faces: Vec<&WatchFace> = match &options.face {
        Some(name) => vec![catalog::by_name(name).with_context(|| format!("No watchface named '{}'", name))?],
        None => catalog::all().iter().collect(),
    };

    std::fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("Cannot create {}", options.output_dir.display()))?;

    for face in faces {
        render(face, &options)?;
    }
    println!("Previews written to {}", options.output_dir.display());
    Ok(())
}
