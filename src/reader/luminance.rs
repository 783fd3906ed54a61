use image::GrayImage;

use crate::common::PixelBuffer;

// Luminance map
//------------------------------------------------------------------------------

/// Grayscale view of a pixel buffer, the common input of every binarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuminanceMap(GrayImage);

impl LuminanceMap {
    /// Single pass over the buffer. Green is weighted twice as red and blue, alpha is ignored.
    pub fn extract(buf: &PixelBuffer) -> Self {
        let (w, h) = buf.dimensions();
        let samples = buf.pixels().iter().map(|&p| luminance(p)).collect::<Vec<_>>();
        // Length invariant of PixelBuffer guarantees the raw buffer fits
        let img = GrayImage::from_raw(w, h, samples).unwrap_or_else(|| GrayImage::new(w, h));
        Self(img)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.0.get_pixel(x, y)[0]
    }

    pub fn image(&self) -> &GrayImage {
        &self.0
    }
}

impl From<GrayImage> for LuminanceMap {
    fn from(img: GrayImage) -> Self {
        Self(img)
    }
}

impl From<&PixelBuffer> for LuminanceMap {
    fn from(buf: &PixelBuffer) -> Self {
        Self::extract(buf)
    }
}

fn luminance(argb: u32) -> u8 {
    let r = (argb >> 16) & 0xFF;
    let g2 = (argb >> 7) & 0x1FE;
    let b = argb & 0xFF;
    ((r + g2 + b) >> 2) as u8
}

#[cfg(test)]
pub(crate) fn gray(w: u32, h: u32, f: impl Fn(u32, u32) -> u8) -> LuminanceMap {
    LuminanceMap(GrayImage::from_fn(w, h, |x, y| image::Luma([f(x, y)])))
}
