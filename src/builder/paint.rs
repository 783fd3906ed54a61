use crate::common::{PixelBuffer, SymbolMatrix};

// Painter
//------------------------------------------------------------------------------

/// Colors a module raster. Dark pixels take the tile pixel at the same position when a tile
/// is given, otherwise `fg`. Light pixels always take `bg`.
pub fn paint(matrix: &SymbolMatrix, fg: u32, bg: u32, tile: Option<&PixelBuffer>) -> PixelBuffer {
    let (w, h) = (matrix.width(), matrix.height());
    // An empty tile has nothing to sample from
    let tile = tile.filter(|t| t.width() > 0 && t.height() > 0).map(|t| t.scaled(w, h));

    PixelBuffer::from_fn(w, h, |x, y| {
        if !matrix.get(x, y) {
            return bg;
        }
        tile.as_ref().and_then(|t| t.get(x, y)).unwrap_or(fg)
    })
}
