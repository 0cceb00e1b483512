//! PNG output: `slide_<n>.png`, RGBA8 with a 300 dpi pHYs chunk.

use std::{fs::File, io::BufWriter, path::Path};

use anyhow::Context;

use crate::{
    core::SlideIndex,
    error::{DeckstripError, DeckstripResult},
    render::{FrameRgba, unpremultiply_rgba8},
};

pub const OUTPUT_DPI: u32 = 300;

/// Deterministic output name for a slide, keyed by its 1-based global index.
pub fn slide_file_name(index: SlideIndex) -> String {
    format!("slide_{}.png", index.0)
}

fn pixels_per_meter(dpi: u32) -> u32 {
    (f64::from(dpi) / 0.0254).round() as u32
}

/// Write one frame. Premultiplied input is converted to straight alpha; the
/// error carries the file path so a failed write is never silent.
pub fn write_png(path: &Path, frame: &FrameRgba) -> DeckstripResult<()> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(DeckstripError::render("frame byte length mismatch"));
    }

    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8(&mut data);
    }

    let file =
        File::create(path).with_context(|| format!("create output file '{}'", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let ppm = pixels_per_meter(OUTPUT_DPI);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("write png header '{}'", path.display()))?;
    writer
        .write_image_data(&data)
        .with_context(|| format!("write png data '{}'", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("finish png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn file_names_use_global_index() {
        assert_eq!(slide_file_name(SlideIndex(1)), "slide_1.png");
        assert_eq!(slide_file_name(SlideIndex(12)), "slide_12.png");
    }

    #[test]
    fn dpi_maps_to_pixels_per_meter() {
        assert_eq!(pixels_per_meter(300), 11811);
        assert_eq!(pixels_per_meter(72), 2835);
    }

    #[test]
    fn rejects_byte_length_mismatch() {
        let frame = FrameRgba {
            width: 2,
            height: 2,
            data: vec![0; 3],
            premultiplied: false,
        };
        let path = PathBuf::from("target").join("encode_png_bad.png");
        assert!(write_png(&path, &frame).is_err());
    }

    #[test]
    fn written_png_carries_density_metadata() {
        let dir = PathBuf::from("target").join("encode_png_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("slide_1.png");

        let frame = FrameRgba {
            width: 2,
            height: 2,
            data: vec![
                0xfb, 0x6f, 0x92, 0xff, //
                0, 0, 0, 0, //
                0x33, 0x3f, 0x4c, 0xff, //
                0x59, 0x74, 0x7b, 0xff,
            ],
            premultiplied: false,
        };
        write_png(&path, &frame).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (2, 2));
        let dims = info.pixel_dims.unwrap();
        assert_eq!(dims.unit, png::Unit::Meter);
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
    }
}
