pub mod binarize;
pub mod luminance;
pub mod symbol;

use log::{debug, warn};

use crate::common::{DecodeFailure, PixelBuffer, ReadError, DECODE_HINTS};
use binarize::{AdaptiveBinarizer, Binarizer, GlobalHistogramBinarizer};
use luminance::LuminanceMap;
use symbol::{ChainedReader, SymbolReader};

// Reader
//------------------------------------------------------------------------------

/// Decode pipeline: one luminance pass, then each binarizer in turn until the symbol
/// reader accepts a bitmap.
pub struct QRReader {
    reader: Box<dyn SymbolReader>,
    binarizers: Vec<Box<dyn Binarizer>>,
}

impl Default for QRReader {
    /// Adaptive binarization first, global histogram as the single fallback. QR symbols go
    /// through `rqrr`, every other format through `rxing`.
    fn default() -> Self {
        Self::new(
            Box::new(ChainedReader::default()),
            vec![Box::new(AdaptiveBinarizer), Box::new(GlobalHistogramBinarizer)],
        )
    }
}

impl QRReader {
    pub fn new(reader: Box<dyn SymbolReader>, binarizers: Vec<Box<dyn Binarizer>>) -> Self {
        Self { reader, binarizers }
    }

    pub fn read(&self, buf: &PixelBuffer) -> Result<String, DecodeFailure> {
        debug!("Extracting luminance from {}x{} buffer...", buf.width(), buf.height());
        let luma = LuminanceMap::extract(buf);
        self.read_luminance(&luma)
    }

    pub fn read_luminance(&self, luma: &LuminanceMap) -> Result<String, DecodeFailure> {
        let mut causes = Vec::with_capacity(self.binarizers.len());
        for b in self.binarizers.iter() {
            debug!("Decoding with {} binarizer...", b.name());
            match self.try_binarizer(b.as_ref(), luma) {
                Ok(text) => {
                    debug!("Decoded {} bytes with {} binarizer", text.len(), b.name());
                    return Ok(text);
                }
                Err(e) => {
                    debug!("{} binarizer failed: {e}", b.name());
                    causes.push(format!("{}: {e}", b.name()));
                }
            }
        }
        warn!("No symbol decoded ({})", causes.join("; "));
        Err(DecodeFailure)
    }

    fn try_binarizer(&self, b: &dyn Binarizer, luma: &LuminanceMap) -> Result<String, ReadError> {
        let bitmap = b.binarize(luma)?;
        self.reader.read(&bitmap, &DECODE_HINTS)
    }
}

/// Recovers the text of the symbol depicted in `buf` with the default two-pass pipeline.
pub fn decode(buf: &PixelBuffer) -> Result<String, DecodeFailure> {
    QRReader::default().read(buf)
}
