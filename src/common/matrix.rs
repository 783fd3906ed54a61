// Bit matrix
//------------------------------------------------------------------------------

/// Row-major boolean grid where `true` marks a dark (foreground) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    w: u32,
    h: u32,
    bits: Vec<bool>,
}

/// Output of a binarizer, input of a symbol reader.
pub type BinaryBitmap = BitMatrix;

/// Output of a symbol writer, already laid out at raster resolution.
pub type SymbolMatrix = BitMatrix;

impl BitMatrix {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h, bits: vec![false; w as usize * h as usize] }
    }

    pub fn from_fn<F>(w: u32, h: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut bits = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                bits.push(f(x, y));
            }
        }
        Self { w, h, bits }
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    /// Out of bound cells read as light.
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.w && y < self.h && self.bits[(y * self.w + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, dark: bool) {
        if x < self.w && y < self.h {
            self.bits[(y * self.w + x) as usize] = dark;
        }
    }

    /// Marks a `sz`×`sz` square with top left corner at `(x, y)` as dark.
    pub fn fill_square(&mut self, x: u32, y: u32, sz: u32) {
        for dy in 0..sz {
            for dx in 0..sz {
                self.set(x + dx, y + dy, true);
            }
        }
    }

    pub fn count_dark(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}
