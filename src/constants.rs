use raylib::prelude::Color;

pub const FPS: u32 = 60;                        // Frames per second for both windows

pub const RENDER_SCALE: f32 = 2.0;              // PDF rasterisation zoom factor
pub const BLINK_INTERVAL: f32 = 0.5;            // Stop/cover button blink period (seconds)
pub const IDENTIFY_DURATION: f32 = 2.0;         // Display test label lifetime (seconds)
pub const NOTICE_DURATION: f32 = 4.0;           // On-screen notification lifetime (seconds)

pub const OPERATOR_WIDTH: i32 = 1600;           // Operator window size before maximising
pub const OPERATOR_HEIGHT: i32 = 1000;

pub const PREVIEW_WIDTH: f32 = 800.0;           // Current/next preview box size
pub const PREVIEW_HEIGHT: f32 = 450.0;
pub const THUMB_WIDTH: f32 = 320.0;             // Thumbnail strip cell size
pub const THUMB_HEIGHT: f32 = 180.0;
pub const THUMB_TEXTURE_WIDTH: f32 = 480.0;     // Strip textures are shrunk to this
pub const THUMB_TEXTURE_HEIGHT: f32 = 270.0;
pub const THUMB_GAP: f32 = 16.0;
pub const THUMB_LABEL_HEIGHT: f32 = 24.0;

pub const BUTTON_HEIGHT: f32 = 48.0;
pub const BUTTON_FONT: i32 = 20;
pub const LABEL_FONT: i32 = 16;
pub const IDENTIFY_FONT: i32 = 48;
pub const MARGIN: f32 = 10.0;

pub const BACKGROUND: Color = Color::new(0x12, 0x12, 0x12, 0xFF);
pub const PREVIEW_BACKGROUND: Color = Color::new(0x1E, 0x1E, 0x1E, 0xFF);
pub const STRIP_BACKGROUND: Color = Color::new(0x87, 0x87, 0x87, 0xFF);
pub const BUTTON_COLOR: Color = Color::new(0xFF, 0x9A, 0x91, 0xFF);
pub const IDENTIFY_BACKGROUND: Color = Color::new(0x47, 0x43, 0x43, 0xFF);
