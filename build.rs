use image::GenericImageView;
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Watchface backgrounds, `assets/watchfaces/<name>.png` becomes `$OUT_DIR/<name>.bin`
const WATCHFACES: &[&str] = &[
    "atat",
    "atdp",
    "b1",
    "giraffe1",
    "mountain2",
    "stormtrooper3_floyd",
    "stormtrooper3",
];

/// Panel size, every background is converted to full screen
const SCREEN_WIDTH: u32 = 200;
const SCREEN_HEIGHT: u32 = 200;

/// Luma below this becomes ink
const THRESHOLD: u8 = 128;

/// Convert PNG image to 2-color format at build time
///
/// Output rows are packed MSB first, a set bit is a dark pixel.
fn convert_image_to_binary(
    input_path: &Path,
    output_path: &Path,
    target_width: u32,
    target_height: u32,
    threshold: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed={}", input_path.display());

    // Check if input file exists
    if !input_path.exists() {
        println!(
            "cargo:warning=Image file '{}' not found, watchface renders without background",
            input_path.display()
        );
        // Create empty file so build doesn't fail
        let mut file = File::create(output_path)?;
        file.write_all(&[])?;
        return Ok(());
    }

    // Load the image
    let img = image::open(input_path)?;

    // Calculate aspect-ratio-preserving dimensions
    let orig_width = img.width();
    let orig_height = img.height();
    let orig_ratio = orig_width as f32 / orig_height as f32;
    let target_ratio = target_width as f32 / target_height as f32;

    let (new_width, new_height) = if orig_ratio > target_ratio {
        // Image is wider than target - fit to width
        (target_width, (target_width as f32 / orig_ratio) as u32)
    } else {
        // Image is taller than target - fit to height
        ((target_height as f32 * orig_ratio) as u32, target_height)
    };

    // Resize the image maintaining aspect ratio
    let resized = img.resize(
        new_width,
        new_height,
        image::imageops::FilterType::Lanczos3,
    );
    // resize() keeps the ratio itself and may round one side down
    let (new_width, new_height) = resized.dimensions();

    // Convert to grayscale
    let gray = resized.to_luma8();

    let bytes_per_row = target_width.div_ceil(8);
    let total_bytes = (bytes_per_row * target_height) as usize;
    let mut buffer = vec![0u8; total_bytes];

    // Calculate centering offsets
    let offset_x = (target_width - new_width) / 2;
    let offset_y = (target_height - new_height) / 2;

    for y in 0..target_height {
        for x in 0..target_width {
            let img_x = x.checked_sub(offset_x).filter(|ix| *ix < new_width);
            let img_y = y.checked_sub(offset_y).filter(|iy| *iy < new_height);

            // Outside the image is white
            let brightness = match (img_x, img_y) {
                (Some(ix), Some(iy)) => gray.get_pixel(ix, iy)[0],
                _ => 255,
            };

            if brightness < threshold {
                let byte_index = (y * bytes_per_row + x / 8) as usize;
                let bit_index = 7 - (x % 8);
                buffer[byte_index] |= 1 << bit_index;
            }
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(&buffer)?;

    println!(
        "cargo:warning=Converted {} ({}x{} -> {}x{} at offset {},{})",
        input_path.display(),
        orig_width,
        orig_height,
        new_width,
        new_height,
        offset_x,
        offset_y
    );
    Ok(())
}

fn main() {
    // ESP-IDF link arguments are only needed for the firmware, host builds run tests and the preview
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Get output directory
    let out_dir = env::var("OUT_DIR").unwrap();
    let asset_dir = Path::new("assets").join("watchfaces");
    println!("cargo:rerun-if-changed={}", asset_dir.display());

    for name in WATCHFACES {
        let input = asset_dir.join(format!("{}.png", name));
        let output = Path::new(&out_dir).join(format!("{}.bin", name));

        if let Err(e) = convert_image_to_binary(
            &input,
            &output,
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            THRESHOLD,
        ) {
            println!("cargo:warning=Failed to convert {}: {}", input.display(), e);
            // The catalog includes every file, an empty one keeps the build going
            if let Err(e) = File::create(&output) {
                panic!("Cannot write {}: {}", output.display(), e);
            }
        }
    }
}
