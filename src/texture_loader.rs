use raylib::prelude::*;
use crate::layout::{downscaled_size, fit_rect};
use crate::page::Page;

// --- Decode PNG Bytes, Create Texture ---
pub fn load_png_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    png: &[u8],
) -> Result<Texture2D, String> {
    let image = Image::load_image_from_mem(".png", png)
        .map_err(|e| format!("Failed to decode image data: {}", e))?;

    let texture = rl.load_texture_from_image(thread, &image)
        .map_err(|e| format!("Failed to create texture: {}", e))?;

    // CPU copy is no longer needed once uploaded
    drop(image);

    Ok(texture)
}

/// Upload `page` shrunk to fit `max_w` x `max_h`, so full-resolution
/// renders never sit in GPU memory just to be drawn small.
pub fn load_page_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    page: &Page,
    max_w: f32,
    max_h: f32,
) -> Result<Texture2D, String> {
    let mut image = Image::load_image_from_mem(".png", &page.png)
        .map_err(|e| format!("Failed to decode image data: {}", e))?;

    if let Some((w, h)) = downscaled_size(image.width(), image.height(), max_w, max_h) {
        image.resize(w, h);
    }

    rl.load_texture_from_image(thread, &image)
        .map_err(|e| format!("Failed to create texture: {}", e))
}

/// Draw `texture` scaled to fit `bounds`, aspect preserved, centred.
pub fn draw_fitted(d: &mut impl RaylibDraw, texture: &Texture2D, bounds: Rectangle) {
    let (w, h) = (texture.width() as f32, texture.height() as f32);
    d.draw_texture_pro(
        texture,
        Rectangle::new(0.0, 0.0, w, h),
        fit_rect(w, h, bounds),
        Vector2::new(0.0, 0.0),
        0.0,
        Color::WHITE,
    );
}
