use ab_glyph::{FontVec, PxScale};
use image::{imageops, imageops::FilterType, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;
use tracing::{debug, warn};

use super::errors::RenderError;

/// TrueType font used for every text overlay
pub struct Typeface {
    font: FontVec,
}

impl Typeface {
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(bytes).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self { font })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub fn rgb(color: [u8; 3]) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

/// Drawing helpers over one RGBA buffer.
///
/// Without a typeface text calls are no-ops, and missing image files are
/// skipped, so a panel always renders.
pub struct Painter<'a> {
    image: &'a mut RgbaImage,
    typeface: Option<&'a Typeface>,
}

impl<'a> Painter<'a> {
    pub fn new(image: &'a mut RgbaImage, typeface: Option<&'a Typeface>) -> Self {
        Self { image, typeface }
    }

    /// Blends a solid rectangle over the buffer at `opacity`
    pub fn fill_blended(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 3], opacity: f32) {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let overlay = Rgba([color[0], color[1], color[2], alpha]);
        let x_end = (x + width).min(self.image.width());
        let y_end = (y + height).min(self.image.height());
        for py in y..y_end {
            for px in x..x_end {
                self.image.get_pixel_mut(px, py).blend(&overlay);
            }
        }
    }

    /// Loads an image file resized to `width`×`height` and draws it; returns
    /// false when the file is missing or unreadable
    pub fn draw_asset(&mut self, path: &Path, x: i64, y: i64, width: u32, height: u32) -> bool {
        match load_asset(path) {
            Some(asset) => {
                let resized = imageops::resize(&asset, width, height, FilterType::Triangle);
                imageops::overlay(self.image, &resized, x, y);
                true
            }
            None => false,
        }
    }

    pub fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(self.image, image, x, y);
    }

    /// Draws `text` with its vertical center on `y`; `x` is the anchor for `align`
    pub fn text(&mut self, text: &str, x: i32, y: i32, size: f32, color: Rgba<u8>, align: Align) {
        let Some(typeface) = self.typeface else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let scale = PxScale::from(size);
        let (width, height) = text_size(scale, &typeface.font, text);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width as i32 / 2,
            Align::Right => x - width as i32,
        };
        draw_text_mut(
            self.image,
            color,
            left,
            y - height as i32 / 2,
            scale,
            &typeface.font,
            text,
        );
    }
}

pub fn load_asset(path: &Path) -> Option<RgbaImage> {
    if !path.is_file() {
        debug!(path = %path.display(), "Asset missing; skipped");
        return None;
    }
    match image::open(path) {
        Ok(asset) => Some(asset.to_rgba8()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Asset unreadable; skipped");
            None
        }
    }
}

/// Multiplies every pixel's alpha by `opacity`
pub fn fade(image: &mut RgbaImage, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    for pixel in image.pixels_mut() {
        pixel[3] = (f32::from(pixel[3]) * opacity).round() as u8;
    }
}
