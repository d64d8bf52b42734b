use raylib::prelude::*;
use crate::constants::*;

/// Largest rectangle with the image's aspect ratio that fits `bounds`, centred.
pub fn fit_rect(width: f32, height: f32, bounds: Rectangle) -> Rectangle {
    if width <= 0.0 || height <= 0.0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Rectangle::new(bounds.x + bounds.width * 0.5, bounds.y + bounds.height * 0.5, 0.0, 0.0);
    }
    let scale = (bounds.width / width).min(bounds.height / height);
    let (w, h) = (width * scale, height * scale);
    Rectangle::new(
        bounds.x + (bounds.width - w) * 0.5,
        bounds.y + (bounds.height - h) * 0.5,
        w,
        h,
    )
}

/// Preview box size, shrunk from the default when `available_w` is narrower.
pub fn preview_size(available_w: f32) -> (f32, f32) {
    let w = PREVIEW_WIDTH.min(available_w.max(0.0));
    (w, w * PREVIEW_HEIGHT / PREVIEW_WIDTH)
}

/// Texture size for an image shrunk to fit `max_w` x `max_h`, or `None`
/// when it already fits. Never upscales.
pub fn downscaled_size(width: i32, height: i32, max_w: f32, max_h: f32) -> Option<(i32, i32)> {
    if width <= 0 || height <= 0 || (width as f32 <= max_w && height as f32 <= max_h) {
        return None;
    }
    let fitted = fit_rect(width as f32, height as f32, Rectangle::new(0.0, 0.0, max_w, max_h));
    Some(((fitted.width.round() as i32).max(1), (fitted.height.round() as i32).max(1)))
}

/// Horizontally scrolling row of page thumbnails.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailStrip {
    pub area: Rectangle,
    pub scroll: f32,
}

impl ThumbnailStrip {
    pub fn new() -> Self {
        Self { area: Rectangle::new(0.0, 0.0, 0.0, 0.0), scroll: 0.0 }
    }

    fn pitch() -> f32 {
        THUMB_WIDTH + THUMB_GAP
    }

    /// Cell of thumbnail `index`, including its number label.
    pub fn cell(&self, index: usize) -> Rectangle {
        Rectangle::new(
            self.area.x + THUMB_GAP + index as f32 * Self::pitch() - self.scroll,
            self.area.y + THUMB_GAP * 0.5,
            THUMB_WIDTH,
            THUMB_HEIGHT + THUMB_LABEL_HEIGHT,
        )
    }

    pub fn content_width(len: usize) -> f32 {
        THUMB_GAP + len as f32 * Self::pitch()
    }

    pub fn max_scroll(&self, len: usize) -> f32 {
        (Self::content_width(len) - self.area.width).max(0.0)
    }

    pub fn scroll_by(&mut self, delta: f32, len: usize) {
        self.scroll = (self.scroll + delta).clamp(0.0, self.max_scroll(len));
    }

    /// Adjust the scroll offset so thumbnail `index` is fully inside the area.
    pub fn reveal(&mut self, index: usize, len: usize) {
        let cell = self.cell(index);
        let left = self.area.x;
        let right = self.area.x + self.area.width;
        if cell.x < left {
            self.scroll -= left - cell.x + THUMB_GAP;
        } else if cell.x + cell.width > right {
            self.scroll += cell.x + cell.width - right + THUMB_GAP;
        }
        self.scroll = self.scroll.clamp(0.0, self.max_scroll(len));
    }

    pub fn hit(&self, point: Vector2, len: usize) -> Option<usize> {
        if !self.area.check_collision_point_rec(point) {
            return None;
        }
        (0..len).find(|&i| self.cell(i).check_collision_point_rec(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_pages_shrink_to_thumbnail_textures() {
        assert_eq!(downscaled_size(2384, 1684, THUMB_TEXTURE_WIDTH, THUMB_TEXTURE_HEIGHT), Some((382, 270)));
        assert_eq!(downscaled_size(3840, 2160, PREVIEW_WIDTH, PREVIEW_HEIGHT), Some((800, 450)));
        assert_eq!(downscaled_size(400, 200, THUMB_TEXTURE_WIDTH, THUMB_TEXTURE_HEIGHT), None);
        assert_eq!(downscaled_size(0, 10, THUMB_TEXTURE_WIDTH, THUMB_TEXTURE_HEIGHT), None);
    }

    #[test]
    fn wide_image_is_letterboxed() {
        let r = fit_rect(1600.0, 900.0, Rectangle::new(0.0, 0.0, 800.0, 800.0));
        assert_eq!((r.x, r.y, r.width, r.height), (0.0, 175.0, 800.0, 450.0));
    }

    #[test]
    fn tall_image_is_pillarboxed_and_upscaled() {
        let r = fit_rect(100.0, 200.0, Rectangle::new(10.0, 20.0, 1920.0, 1080.0));
        assert!((r.width - 540.0).abs() < 0.01 && (r.height - 1080.0).abs() < 0.01);
        assert!((r.x - 700.0).abs() < 0.01 && (r.y - 20.0).abs() < 0.01);
    }

    #[test]
    fn degenerate_sizes_collapse_to_centre() {
        let r = fit_rect(0.0, 10.0, Rectangle::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!((r.x, r.y, r.width, r.height), (50.0, 25.0, 0.0, 0.0));
    }

    #[test]
    fn preview_shrinks_but_never_grows() {
        assert_eq!(preview_size(2000.0), (PREVIEW_WIDTH, PREVIEW_HEIGHT));
        assert_eq!(preview_size(400.0), (400.0, 225.0));
    }

    fn strip(width: f32) -> ThumbnailStrip {
        ThumbnailStrip { area: Rectangle::new(0.0, 500.0, width, 250.0), scroll: 0.0 }
    }

    #[test]
    fn clicks_map_to_thumbnails() {
        let mut s = strip(1000.0);
        let second = s.cell(1);
        let inside = Vector2::new(second.x + 5.0, second.y + 5.0);
        assert_eq!(s.hit(inside, 10), Some(1));
        assert_eq!(s.hit(inside, 1), None);
        assert_eq!(s.hit(Vector2::new(THUMB_GAP * 0.5, 600.0), 10), None);

        s.scroll_by(THUMB_WIDTH + THUMB_GAP, 10);
        assert_eq!(s.hit(inside, 10), Some(2));
    }

    #[test]
    fn scrolling_is_bounded() {
        let mut s = strip(1000.0);
        s.scroll_by(-50.0, 10);
        assert_eq!(s.scroll, 0.0);
        s.scroll_by(1e6, 10);
        assert_eq!(s.scroll, s.max_scroll(10));
        s.scroll_by(1e6, 2);
        assert_eq!(s.scroll, 0.0);
    }

    #[test]
    fn reveal_brings_current_page_into_view() {
        let mut s = strip(1000.0);
        s.reveal(9, 10);
        let cell = s.cell(9);
        assert!(cell.x >= 0.0 && cell.x + cell.width <= 1000.0);

        s.reveal(0, 10);
        assert_eq!(s.scroll, 0.0);
    }
}
