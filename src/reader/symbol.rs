use std::collections::HashSet;

use log::debug;
use rqrr::PreparedImage;
use rxing::{
    common::HybridBinarizer,
    multi::{GenericMultipleBarcodeReader, MultipleBarcodeReader},
    BarcodeFormat, Luma8LuminanceSource, MultiFormatReader,
};

use crate::common::{BinaryBitmap, DecodeHints, ReadError, ReadResult, SymbolFormat};

// Symbol reader trait
//------------------------------------------------------------------------------

/// Locates and decodes a symbol in an already binarized image.
pub trait SymbolReader: Send + Sync {
    fn read(&self, bitmap: &BinaryBitmap, hints: &DecodeHints) -> ReadResult<String>;
}

// Rqrr reader
//------------------------------------------------------------------------------

/// QR reader backed by `rqrr`. Other formats in the hints are left to other readers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrReader;

impl SymbolReader for RqrrReader {
    fn read(&self, bitmap: &BinaryBitmap, hints: &DecodeHints) -> ReadResult<String> {
        if !hints.accepts(SymbolFormat::QrCode) {
            return Err(ReadError::UnsupportedFormat);
        }

        let (w, h) = (bitmap.width() as usize, bitmap.height() as usize);
        let mut img =
            PreparedImage::prepare_from_bitmap(w, h, |x, y| bitmap.get(x as u32, y as u32));
        let grids = img.detect_grids();
        debug!("Found {} candidate grid(s)", grids.len());

        // Without try harder only the most prominent grid is examined
        let limit = if hints.try_harder { grids.len() } else { 1 };
        let mut last_err = ReadError::SymbolNotFound;
        for grid in grids.iter().take(limit) {
            let mut payload = Vec::new();
            match grid.decode_to(&mut payload) {
                Ok(_meta) => return decode_payload(&payload, hints),
                Err(e) => {
                    debug!("Grid rejected: {e:?}");
                    last_err = ReadError::Malformed(format!("{e:?}"));
                }
            }
        }
        Err(last_err)
    }
}

// Rxing reader
//------------------------------------------------------------------------------

/// Reader for every format except QR, backed by `rxing`. The bitmap is handed over as a
/// pure black and white luminance source, so the dark/light decision stays with our
/// binarizers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RxingReader;

impl SymbolReader for RxingReader {
    fn read(&self, bitmap: &BinaryBitmap, hints: &DecodeHints) -> ReadResult<String> {
        let formats = hints
            .possible_formats
            .iter()
            .filter(|&&f| f != SymbolFormat::QrCode)
            .map(|&f| barcode_format(f))
            .collect::<HashSet<_>>();
        if formats.is_empty() {
            return Err(ReadError::UnsupportedFormat);
        }

        let (w, h) = (bitmap.width(), bitmap.height());
        let mut luma = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                luma.push(if bitmap.get(x, y) { 0 } else { 255 });
            }
        }

        let rx_hints: rxing::DecodingHintDictionary = rxing::DecodeHints {
            TryHarder: Some(hints.try_harder),
            PossibleFormats: Some(formats),
            ..Default::default()
        }
        .into();

        let source = Luma8LuminanceSource::new(luma, w, h);
        let mut rx_bitmap = rxing::BinaryBitmap::new(HybridBinarizer::new(source));
        let mut reader = GenericMultipleBarcodeReader::new(MultiFormatReader::default());
        match reader.decode_multiple_with_hints(&mut rx_bitmap, &rx_hints) {
            Ok(results) => match results.first() {
                Some(res) => {
                    debug!("Read {:?} symbol", res.getBarcodeFormat());
                    Ok(res.getText().to_string())
                }
                None => Err(ReadError::SymbolNotFound),
            },
            Err(e) => {
                debug!("No barcode found: {e:?}");
                Err(ReadError::SymbolNotFound)
            }
        }
    }
}

fn barcode_format(format: SymbolFormat) -> BarcodeFormat {
    match format {
        SymbolFormat::Aztec => BarcodeFormat::AZTEC,
        SymbolFormat::Codabar => BarcodeFormat::CODABAR,
        SymbolFormat::Code39 => BarcodeFormat::CODE_39,
        SymbolFormat::Code93 => BarcodeFormat::CODE_93,
        SymbolFormat::Code128 => BarcodeFormat::CODE_128,
        SymbolFormat::DataMatrix => BarcodeFormat::DATA_MATRIX,
        SymbolFormat::Ean8 => BarcodeFormat::EAN_8,
        SymbolFormat::Ean13 => BarcodeFormat::EAN_13,
        SymbolFormat::Itf => BarcodeFormat::ITF,
        SymbolFormat::MaxiCode => BarcodeFormat::MAXICODE,
        SymbolFormat::Pdf417 => BarcodeFormat::PDF_417,
        SymbolFormat::QrCode => BarcodeFormat::QR_CODE,
        SymbolFormat::Rss14 => BarcodeFormat::RSS_14,
        SymbolFormat::RssExpanded => BarcodeFormat::RSS_EXPANDED,
        SymbolFormat::UpcA => BarcodeFormat::UPC_A,
        SymbolFormat::UpcE => BarcodeFormat::UPC_E,
        SymbolFormat::UpcEanExtension => BarcodeFormat::UPC_EAN_EXTENSION,
    }
}

// Chained reader
//------------------------------------------------------------------------------

/// Tries each reader in order on the same bitmap. A reader that does not support any
/// requested format never hides the failure of one that does.
pub struct ChainedReader {
    readers: Vec<Box<dyn SymbolReader>>,
}

impl ChainedReader {
    pub fn new(readers: Vec<Box<dyn SymbolReader>>) -> Self {
        Self { readers }
    }
}

impl Default for ChainedReader {
    /// `rqrr` for QR, then `rxing` for the remaining formats.
    fn default() -> Self {
        Self::new(vec![Box::new(RqrrReader), Box::new(RxingReader)])
    }
}

impl SymbolReader for ChainedReader {
    fn read(&self, bitmap: &BinaryBitmap, hints: &DecodeHints) -> ReadResult<String> {
        let mut err = ReadError::UnsupportedFormat;
        for r in self.readers.iter() {
            match r.read(bitmap, hints) {
                Ok(text) => return Ok(text),
                Err(ReadError::UnsupportedFormat) => {}
                Err(e) => err = e,
            }
        }
        Err(err)
    }
}

fn decode_payload(payload: &[u8], hints: &DecodeHints) -> ReadResult<String> {
    hints
        .charset
        .decode_without_bom_handling_and_without_replacement(payload)
        .map(|text| text.into_owned())
        .ok_or_else(|| ReadError::InvalidCharset(hints.charset.name().to_string()))
}

#[cfg(test)]
mod symbol_tests {
    use encoding_rs::SHIFT_JIS;

    use rxing::{BarcodeFormat, MultiFormatWriter, Writer};

    use super::{decode_payload, ChainedReader, RqrrReader, RxingReader, SymbolReader};
    use crate::common::{
        BinaryBitmap, BitMatrix, DecodeHints, ReadError, ReadResult, SymbolFormat, DECODE_HINTS,
    };

    fn code128(text: &str) -> BitMatrix {
        let writer = MultiFormatWriter::default();
        let m = writer.encode(text, &BarcodeFormat::CODE_128, 400, 50).unwrap();
        BitMatrix::from_fn(m.width(), m.height(), |x, y| m.get(x, y))
    }

    fn formats(formats: &[SymbolFormat]) -> DecodeHints {
        DecodeHints { possible_formats: formats.to_vec(), ..DecodeHints::default() }
    }

    struct Fixed(ReadResult<String>);

    impl SymbolReader for Fixed {
        fn read(&self, _bitmap: &BinaryBitmap, _hints: &DecodeHints) -> ReadResult<String> {
            self.0.clone()
        }
    }

    #[test]
    fn test_decode_payload_utf8() {
        let text = "Hello, world!🌎";
        assert_eq!(decode_payload(text.as_bytes(), &DECODE_HINTS).unwrap(), text);
    }

    #[test]
    fn test_decode_payload_invalid_utf8() {
        let res = decode_payload(&[0x48, 0xFF, 0xFE], &DECODE_HINTS);
        assert_eq!(res, Err(ReadError::InvalidCharset("UTF-8".to_string())));
    }

    #[test]
    fn test_decode_payload_shift_jis() {
        let hints = DecodeHints { charset: SHIFT_JIS, ..DecodeHints::default() };
        assert_eq!(decode_payload(&[0x82, 0xA0], &hints).unwrap(), "あ");
    }

    #[test]
    fn test_blank_bitmap() {
        let bmp = BitMatrix::new(100, 100);
        assert_eq!(RqrrReader.read(&bmp, &DECODE_HINTS), Err(ReadError::SymbolNotFound));
    }

    #[test]
    fn test_qr_not_requested() {
        let hints = DecodeHints {
            possible_formats: vec![SymbolFormat::Ean13, SymbolFormat::Code128],
            ..DecodeHints::default()
        };
        let bmp = BitMatrix::new(100, 100);
        assert_eq!(RqrrReader.read(&bmp, &hints), Err(ReadError::UnsupportedFormat));
    }

    #[test]
    fn test_rxing_code128() {
        let bmp = code128("QRPIX-128");
        assert_eq!(RxingReader.read(&bmp, &DECODE_HINTS).unwrap(), "QRPIX-128");
        assert_eq!(RqrrReader.read(&bmp, &DECODE_HINTS), Err(ReadError::SymbolNotFound));
    }

    #[test]
    fn test_rxing_blank_bitmap() {
        let bmp = BitMatrix::new(100, 100);
        assert_eq!(RxingReader.read(&bmp, &DECODE_HINTS), Err(ReadError::SymbolNotFound));
    }

    #[test]
    fn test_rxing_qr_only() {
        let bmp = code128("QRPIX-128");
        let hints = formats(&[SymbolFormat::QrCode]);
        assert_eq!(RxingReader.read(&bmp, &hints), Err(ReadError::UnsupportedFormat));
    }

    #[test]
    fn test_chain_reads_both() {
        let chain = ChainedReader::default();
        assert_eq!(chain.read(&code128("chained"), &DECODE_HINTS).unwrap(), "chained");
        let hints = formats(&[SymbolFormat::QrCode]);
        assert_eq!(chain.read(&code128("chained"), &hints), Err(ReadError::SymbolNotFound));
    }

    #[test]
    fn test_chain_errors() {
        let bmp = BitMatrix::new(10, 10);
        let chain = ChainedReader::new(vec![
            Box::new(Fixed(Err(ReadError::SymbolNotFound))),
            Box::new(Fixed(Err(ReadError::UnsupportedFormat))),
        ]);
        assert_eq!(chain.read(&bmp, &DECODE_HINTS), Err(ReadError::SymbolNotFound));

        let chain = ChainedReader::new(vec![
            Box::new(Fixed(Err(ReadError::UnsupportedFormat))),
            Box::new(Fixed(Err(ReadError::UnsupportedFormat))),
        ]);
        assert_eq!(chain.read(&bmp, &DECODE_HINTS), Err(ReadError::UnsupportedFormat));

        let chain = ChainedReader::new(vec![
            Box::new(Fixed(Err(ReadError::Malformed("bad".into())))),
            Box::new(Fixed(Ok("second".into()))),
        ]);
        assert_eq!(chain.read(&bmp, &DECODE_HINTS).unwrap(), "second");

        let chain = ChainedReader::new(Vec::new());
        assert_eq!(chain.read(&bmp, &DECODE_HINTS), Err(ReadError::UnsupportedFormat));
    }
}
