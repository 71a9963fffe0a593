use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::bilateral::{bilateral_filter, GaussianEuclideanColorDistance};
use imageproc::morphology::open;
use std::io::Cursor;
use thiserror::Error;

/// Listings narrower than this are upscaled before recognition.
pub const MIN_OCR_WIDTH: u32 = 800;

/// 9 px window.
const BILATERAL_RADIUS: u8 = 4;
const BILATERAL_SIGMA_COLOR: f32 = 75.0;
const BILATERAL_SIGMA_SPACE: f32 = 75.0;

#[cfg(test)]
const INK: u8 = 0;
#[cfg(test)]
const PAPER: u8 = 255;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Normalize an already decoded capture and return PNG bytes.
pub fn prepare_image(img: &DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    encode_as_png(DynamicImage::ImageLuma8(normalize(img)?))
}

/// Grayscale → upscale narrow captures → bilateral smoothing → Otsu
/// binarization → opening. The result only contains 0 and 255.
pub fn normalize(img: &DynamicImage) -> Result<GrayImage, PreprocessError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(PreprocessError::EmptyImage { width: img.width(), height: img.height() });
    }

    let gray = upscale_to_min_width(img.to_luma8());
    let smoothed = bilateral_filter(
        &gray,
        BILATERAL_RADIUS,
        BILATERAL_SIGMA_SPACE,
        GaussianEuclideanColorDistance::new(BILATERAL_SIGMA_COLOR),
    );
    let level = otsu_level(&smoothed);
    let binary = threshold(&smoothed, level, ThresholdType::Binary);

    Ok(open_ink(&binary))
}

fn upscale_to_min_width(gray: GrayImage) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w >= MIN_OCR_WIDTH {
        return gray;
    }
    let new_h = (u64::from(h) * u64::from(MIN_OCR_WIDTH) / u64::from(w)).max(1);
    let new_h = u32::try_from(new_h).unwrap_or(u32::MAX);
    imageops::resize(&gray, MIN_OCR_WIDTH, new_h, FilterType::CatmullRom)
}

/// Opening of the ink layer with the smallest square element. Ink specks
/// and hairlines under 3 px are removed; glyph strokes survive.
fn open_ink(binary: &GrayImage) -> GrayImage {
    // imageproc treats non-zero pixels as foreground, and ink is 0.
    let mut ink = binary.clone();
    imageops::invert(&mut ink);
    let mut opened = open(&ink, Norm::LInf, 1);
    imageops::invert(&mut opened);
    opened
}

fn encode_as_png(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
