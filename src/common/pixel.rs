use image::{imageops, imageops::FilterType, Rgba, RgbaImage};

use super::error::BufferSizeMismatch;

// Color
//------------------------------------------------------------------------------

pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;

/// Splits a packed `0xAARRGGBB` value into `[r, g, b, a]`.
pub const fn argb_to_rgba(argb: u32) -> [u8; 4] {
    [(argb >> 16) as u8, (argb >> 8) as u8, argb as u8, (argb >> 24) as u8]
}

pub const fn rgba_to_argb([r, g, b, a]: [u8; 4]) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

// Pixel buffer
//------------------------------------------------------------------------------

/// Row-major ARGB raster. The pixel count always equals `width * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, BufferSizeMismatch> {
        if pixels.len() != width as usize * height as usize {
            return Err(BufferSizeMismatch { width, height, len: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn filled(width: u32, height: u32, argb: u32) -> Self {
        Self { width, height, pixels: vec![argb; width as usize * height as usize] }
    }

    fn new_empty(width: u32, height: u32) -> Self {
        Self { width, height, pixels: Vec::new() }
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> u32,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Nearest neighbour resize, the unfiltered scaling used for tiles and logos.
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        if self.dimensions() == (width, height) {
            return self.clone();
        }
        if width == 0 || height == 0 {
            return Self::new_empty(width, height);
        }
        let scaled = imageops::resize(&self.to_rgba_image(), width, height, FilterType::Nearest);
        Self::from(&scaled)
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(argb_to_rgba(self.pixels[(y * self.width + x) as usize]))
        })
    }
}

impl From<&RgbaImage> for PixelBuffer {
    fn from(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| rgba_to_argb(p.0)).collect();
        Self { width, height, pixels }
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        Self::from(&img)
    }
}

impl From<&PixelBuffer> for RgbaImage {
    fn from(buf: &PixelBuffer) -> Self {
        buf.to_rgba_image()
    }
}
