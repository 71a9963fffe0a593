use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture unavailable: {0}")]
    Unavailable(String),
    #[error("Listing {0} does not exist on this page")]
    NoSuchListing(usize),
    #[error("Bounding box {0:?} lies outside the page")]
    EmptyRegion(BoundingBox),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pixel rectangle of a listing element on a full-page screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
}

/// Source of listing screenshots for one results page, usually a browser
/// session driven elsewhere.
pub trait RegionCapture {
    /// Number of listing elements discovered on the current page.
    fn listing_count(&mut self) -> Result<usize, CaptureError>;

    /// Screenshot of a single listing element.
    fn capture_listing(&mut self, index: usize) -> Result<DynamicImage, CaptureError>;

    /// Screenshot of the whole visible page.
    fn capture_full_page(&mut self) -> Result<DynamicImage, CaptureError>;

    /// Where listing `index` sits on the full-page screenshot.
    fn listing_bounds(&mut self, index: usize) -> Result<BoundingBox, CaptureError>;
}

/// Capture listing `index`, falling back to a crop of the full page when the
/// element screenshot fails.
pub fn capture_with_fallback<C: RegionCapture + ?Sized>(
    capture: &mut C,
    index: usize,
) -> Result<DynamicImage, CaptureError> {
    match capture.capture_listing(index) {
        Ok(img) => Ok(img),
        Err(err) => {
            tracing::warn!(index, error = %err, "element capture failed, cropping full page");
            let page = capture.capture_full_page()?;
            let bounds = capture.listing_bounds(index)?;
            crop_to_bounds(&page, bounds)
        }
    }
}

/// Crop `page` to `bounds`, clamped to the page edges.
pub fn crop_to_bounds(page: &DynamicImage, bounds: BoundingBox) -> Result<DynamicImage, CaptureError> {
    let page_w = i64::from(page.width());
    let page_h = i64::from(page.height());

    let left = bounds.left.clamp(0, page_w);
    let top = bounds.top.clamp(0, page_h);
    let right = bounds.left.saturating_add(i64::from(bounds.width)).clamp(0, page_w);
    let bottom = bounds.top.saturating_add(i64::from(bounds.height)).clamp(0, page_h);

    if right <= left || bottom <= top {
        return Err(CaptureError::EmptyRegion(bounds));
    }

    // All four values are within 0..=u32::MAX after clamping to the page.
    Ok(page.crop_imm(left as u32, top as u32, (right - left) as u32, (bottom - top) as u32))
}

// ── Directory-backed capture ──────────────────────────────────────────────────

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Listing screenshots already saved to a directory, one file per listing,
/// read in natural file-name order (`job_2` before `job_10`).
pub struct DirectoryCapture {
    files: Vec<PathBuf>,
}

impl DirectoryCapture {
    pub fn open(dir: &Path) -> Result<Self, CaptureError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_image_path(&path) {
                files.push(path);
            }
        }
        files.sort_by_cached_key(|p| natural_key(p));
        Ok(Self { files })
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum NameChunk {
    /// Digit run without leading zeros, ordered by length then digits.
    Number(usize, String),
    Text(String),
}

fn natural_key(path: &Path) -> Vec<NameChunk> {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let mut chunks = Vec::new();
    let mut rest = name.as_str();
    while let Some(first) = rest.chars().next() {
        let is_digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != is_digit)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        chunks.push(if is_digit {
            let digits = run.trim_start_matches('0');
            NameChunk::Number(digits.len(), digits.to_string())
        } else {
            NameChunk::Text(run.to_string())
        });
        rest = tail;
    }
    chunks
}

impl RegionCapture for DirectoryCapture {
    fn listing_count(&mut self) -> Result<usize, CaptureError> {
        Ok(self.files.len())
    }

    fn capture_listing(&mut self, index: usize) -> Result<DynamicImage, CaptureError> {
        let path = self.files.get(index).ok_or(CaptureError::NoSuchListing(index))?;
        Ok(image::open(path)?)
    }

    fn capture_full_page(&mut self) -> Result<DynamicImage, CaptureError> {
        Err(CaptureError::Unavailable("saved screenshots have no full page".into()))
    }

    fn listing_bounds(&mut self, _index: usize) -> Result<BoundingBox, CaptureError> {
        Err(CaptureError::Unavailable("saved screenshots have no page layout".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma};

    fn page(width: u32, height: u32) -> DynamicImage {
        let img: GrayImage = ImageBuffer::from_fn(width, height, |x, y| Luma([((x + y) % 256) as u8]));
        DynamicImage::ImageLuma8(img)
    }

    /// Element screenshots fail for the listed indices.
    struct FlakyBrowser {
        broken: Vec<usize>,
        full_page_calls: usize,
    }

    impl RegionCapture for FlakyBrowser {
        fn listing_count(&mut self) -> Result<usize, CaptureError> {
            Ok(3)
        }

        fn capture_listing(&mut self, index: usize) -> Result<DynamicImage, CaptureError> {
            if self.broken.contains(&index) {
                Err(CaptureError::Unavailable("element moved out of bounds".into()))
            } else {
                Ok(page(50, 20))
            }
        }

        fn capture_full_page(&mut self) -> Result<DynamicImage, CaptureError> {
            self.full_page_calls += 1;
            Ok(page(300, 600))
        }

        fn listing_bounds(&mut self, index: usize) -> Result<BoundingBox, CaptureError> {
            Ok(BoundingBox { left: 10, top: 100 * index as i64, width: 120, height: 80 })
        }
    }

    #[test]
    fn element_capture_used_when_available() {
        let mut b = FlakyBrowser { broken: vec![], full_page_calls: 0 };
        let img = capture_with_fallback(&mut b, 0).unwrap();
        assert_eq!((img.width(), img.height()), (50, 20));
        assert_eq!(b.full_page_calls, 0);
    }

    #[test]
    fn falls_back_to_full_page_crop() {
        let mut b = FlakyBrowser { broken: vec![1], full_page_calls: 0 };
        let img = capture_with_fallback(&mut b, 1).unwrap();
        assert_eq!((img.width(), img.height()), (120, 80));
        assert_eq!(b.full_page_calls, 1);
        // Top-left of the crop is page pixel (10, 100).
        assert_eq!(img.to_luma8().get_pixel(0, 0)[0], 110);
    }

    #[test]
    fn crop_clamps_to_page() {
        let p = page(100, 100);
        let img = crop_to_bounds(&p, BoundingBox { left: -20, top: 90, width: 50, height: 40 }).unwrap();
        assert_eq!((img.width(), img.height()), (30, 10));
    }

    #[test]
    fn crop_outside_page_is_error() {
        let p = page(100, 100);
        let err = crop_to_bounds(&p, BoundingBox { left: 150, top: 0, width: 10, height: 10 }).unwrap_err();
        assert!(matches!(err, CaptureError::EmptyRegion(_)));
        let err = crop_to_bounds(&p, BoundingBox { left: 0, top: 0, width: 0, height: 10 }).unwrap_err();
        assert!(matches!(err, CaptureError::EmptyRegion(_)));
    }

    #[test]
    fn directory_capture_reads_images_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        page(8, 4).save(dir.path().join("b.png")).unwrap();
        page(6, 3).save(dir.path().join("a.png")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let mut cap = DirectoryCapture::open(dir.path()).unwrap();
        assert_eq!(cap.listing_count().unwrap(), 2);
        assert_eq!(cap.capture_listing(0).unwrap().width(), 6);
        assert_eq!(cap.capture_listing(1).unwrap().width(), 8);
        assert!(matches!(cap.capture_listing(2), Err(CaptureError::NoSuchListing(2))));
    }

    #[test]
    fn directory_capture_orders_numbers_naturally() {
        let dir = tempfile::tempdir().unwrap();
        for (name, width) in [("job_10.png", 10), ("job_2.png", 2), ("job_1.png", 1), ("job_002b.png", 3)] {
            page(width, 2).save(dir.path().join(name)).unwrap();
        }
        let mut cap = DirectoryCapture::open(dir.path()).unwrap();
        let widths: Vec<u32> = (0..4).map(|i| cap.capture_listing(i).unwrap().width()).collect();
        assert_eq!(widths, [1, 2, 3, 10]);
    }

    #[test]
    fn crop_with_extreme_bounds_does_not_overflow() {
        let p = page(40, 30);
        let img = crop_to_bounds(&p, BoundingBox { left: i64::MAX - 5, top: 0, width: u32::MAX, height: 10 });
        assert!(matches!(img, Err(CaptureError::EmptyRegion(_))));
        let img = crop_to_bounds(&p, BoundingBox { left: i64::MIN, top: 0, width: u32::MAX, height: 10 });
        assert!(matches!(img, Err(CaptureError::EmptyRegion(_))));
        let img = crop_to_bounds(&p, BoundingBox { left: -5, top: -5, width: u32::MAX, height: u32::MAX }).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn directory_capture_has_no_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut cap = DirectoryCapture::open(dir.path()).unwrap();
        assert!(matches!(capture_with_fallback(&mut cap, 0), Err(CaptureError::Unavailable(_))));
    }

    #[test]
    fn image_extensions_recognized() {
        assert!(is_image_path(Path::new("job_0001.PNG")));
        assert!(is_image_path(Path::new("x/y.jpeg")));
        assert!(!is_image_path(Path::new("raw.txt")));
        assert!(!is_image_path(Path::new("noext")));
    }
}
