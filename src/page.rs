use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use exif::{In, Reader, Tag, Value};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{Result, ShowError};

/// A rendered page or cover, kept PNG encoded so it can be handed to the
/// output process as-is and turned into a texture on either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub width: u32,
    pub height: u32,
    pub png: Arc<Vec<u8>>,
}

impl Page {
    pub fn from_image(image: &DynamicImage) -> std::result::Result<Self, image::ImageError> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self { width: image.width(), height: image.height(), png: Arc::new(png) })
    }

    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> std::result::Result<Self, String> {
        let buffer = RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| format!("pixel buffer does not match {}x{}", width, height))?;
        Self::from_image(&DynamicImage::ImageRgba8(buffer)).map_err(|e| e.to_string())
    }
}

/// Ordered pages of one document. Replaced wholesale on every open.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pages: Vec<Page>,
}

impl Deck {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

// --- Load Cover Image, Apply EXIF Orientation ---
pub fn load_cover(path: &Path) -> Result<Page> {
    let bytes = fs::read(path).map_err(|e| ShowError::load(path, e))?;
    decode_cover(&bytes).map_err(|e| ShowError::load(path, e))
}

pub fn decode_cover(bytes: &[u8]) -> std::result::Result<Page, image::ImageError> {
    let image = image::load_from_memory(bytes)?;
    let image = apply_orientation(image, exif_orientation(bytes));
    Page::from_image(&image)
}

fn exif_orientation(bytes: &[u8]) -> u16 {
    // Only containers carrying EXIF (JPEG mostly) have an orientation, default is upright
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY).map(|f| &f.value) {
            Some(Value::Short(values)) if !values.is_empty() => values[0],
            _ => 1,
        },
        Err(e) => {
            tracing::debug!("no EXIF orientation: {}", e);
            1
        }
    }
}

// 1 = upright, 3 = 180 deg, 6 = 90 deg clockwise, 8 = 90 deg counter-clockwise,
// 2/4/5/7 are the mirrored variants of those.
fn apply_orientation(image: DynamicImage, orientation: u16) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255])));
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn decodes_png_cover_without_exif() {
        let page = decode_cover(&png_bytes(40, 30)).unwrap();
        assert_eq!((page.width, page.height), (40, 30));
        assert!(image::load_from_memory(&page.png).is_ok());
    }

    #[test]
    fn rejects_garbage_cover() {
        assert!(decode_cover(b"definitely not an image").is_err());
    }

    #[test]
    fn missing_cover_file_is_a_load_failure() {
        let err = load_cover(Path::new("/nonexistent/cover.png")).unwrap_err();
        assert!(matches!(err, ShowError::Load { .. }));
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(40, 30));
        let turned = apply_orientation(image.clone(), 6);
        assert_eq!((turned.width(), turned.height()), (30, 40));
        let flipped = apply_orientation(image, 3);
        assert_eq!((flipped.width(), flipped.height()), (40, 30));
    }

    #[test]
    fn every_orientation_moves_a_corner_pixel_to_the_upright_position() {
        // 3x2 image, marked in the top-right corner
        let mark = image::Rgba([255, 255, 255, 255]);
        let mut stored = RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 0, 255]));
        stored.put_pixel(2, 0, mark);
        let stored = DynamicImage::ImageRgba8(stored);

        let cases = [
            (1, (3, 2), (2, 0)),
            (2, (3, 2), (0, 0)), // mirrored horizontally
            (3, (3, 2), (0, 1)),
            (4, (3, 2), (2, 1)), // mirrored vertically
            (5, (2, 3), (0, 2)), // transpose
            (6, (2, 3), (1, 2)),
            (7, (2, 3), (1, 0)), // transverse
            (8, (2, 3), (0, 0)),
        ];
        for (orientation, size, (x, y)) in cases {
            let upright = apply_orientation(stored.clone(), orientation).to_rgba8();
            assert_eq!(upright.dimensions(), size, "orientation {}", orientation);
            assert_eq!(*upright.get_pixel(x, y), mark, "orientation {}", orientation);
            let marked = upright.pixels().filter(|p| **p == mark).count();
            assert_eq!(marked, 1, "orientation {}", orientation);
        }
    }

    #[test]
    fn rgba_buffer_must_match_dimensions() {
        assert!(Page::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(Page::from_rgba(2, 2, vec![0; 15]).is_err());
    }
}
