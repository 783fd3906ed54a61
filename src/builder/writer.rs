use log::{debug, warn};
use qrcode::{
    types::{QrError, Version},
    EcLevel, QrCode,
};

use crate::common::{
    BitMatrix, ECLevel, EncodeError, EncodeHints, EncodeResult, SymbolFormat, SymbolMatrix,
};

// Symbol writer trait
//------------------------------------------------------------------------------

/// Produces the module matrix of `text`, laid out over a `w`×`h` raster.
pub trait SymbolWriter {
    fn write(
        &self,
        text: &str,
        format: SymbolFormat,
        w: u32,
        h: u32,
        hints: &EncodeHints,
    ) -> EncodeResult<SymbolMatrix>;
}

// Qrcode writer
//------------------------------------------------------------------------------

const MIN_VERSION: i16 = 1;
const MAX_VERSION: i16 = 40;

/// QR writer backed by the `qrcode` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrCodeWriter;

impl SymbolWriter for QrCodeWriter {
    fn write(
        &self,
        text: &str,
        format: SymbolFormat,
        w: u32,
        h: u32,
        hints: &EncodeHints,
    ) -> EncodeResult<SymbolMatrix> {
        if format != SymbolFormat::QrCode {
            return Err(EncodeError::UnsupportedFormat(format.to_string()));
        }

        let (data, _, lossy) = hints.charset.encode(text);
        if lossy {
            // encoding_rs substitutes HTML numeric references such as "&#127758;"
            warn!(
                "Characters not representable in {} were written as numeric references",
                hints.charset.name()
            );
        }

        // Without a level the lowest one is used, maximizing capacity
        let ecl = hints.ec_level.unwrap_or(ECLevel::L);
        let code = match (hints.min_version, hints.max_version) {
            (None, None) => QrCode::with_error_correction_level(&data, ecl.into())?,
            (min, max) => {
                let min = min.unwrap_or(MIN_VERSION);
                let max = max.unwrap_or(MAX_VERSION);
                find_version(&data, ecl, min, max)?
            }
        };
        debug!("Encoded {} bytes into {}x{} modules", data.len(), code.width(), code.width());

        render(&code, w, h, hints.margin)
    }
}

fn find_version(data: &[u8], ecl: ECLevel, min: i16, max: i16) -> EncodeResult<QrCode> {
    if min < MIN_VERSION || max > MAX_VERSION || min > max {
        return Err(EncodeError::InvalidVersionRange(min, max));
    }
    for v in min..=max {
        match QrCode::with_version(data, Version::Normal(v), ecl.into()) {
            Ok(code) => return Ok(code),
            Err(QrError::DataTooLong) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(EncodeError::DataTooLong)
}

/// Scales the modules by the largest integer factor that fits the quiet zone and symbol in
/// the raster, then centers the result. Leftover pixels become part of the quiet zone.
fn render(code: &QrCode, w: u32, h: u32, margin: u32) -> EncodeResult<SymbolMatrix> {
    let input_w = code.width() as u32;
    let Some(qr_w) = margin.checked_mul(2).and_then(|m| m.checked_add(input_w)) else {
        return Err(EncodeError::SymbolDoesNotFit { symbol: u32::MAX, width: w, height: h });
    };
    if w < qr_w || h < qr_w {
        return Err(EncodeError::SymbolDoesNotFit { symbol: qr_w, width: w, height: h });
    }

    let module_sz = std::cmp::min(w / qr_w, h / qr_w);
    let left = (w - input_w * module_sz) / 2;
    let top = (h - input_w * module_sz) / 2;

    let mut res = BitMatrix::new(w, h);
    for r in 0..input_w {
        for c in 0..input_w {
            if code[(c as usize, r as usize)] == qrcode::Color::Dark {
                res.fill_square(left + c * module_sz, top + r * module_sz, module_sz);
            }
        }
    }
    Ok(res)
}

impl From<ECLevel> for EcLevel {
    fn from(ecl: ECLevel) -> Self {
        match ecl {
            ECLevel::L => EcLevel::L,
            ECLevel::M => EcLevel::M,
            ECLevel::Q => EcLevel::Q,
            ECLevel::H => EcLevel::H,
        }
    }
}

impl From<QrError> for EncodeError {
    fn from(e: QrError) -> Self {
        match e {
            QrError::DataTooLong => EncodeError::DataTooLong,
            e => EncodeError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod writer_tests {
    use test_case::test_case;

    use encoding_rs::SHIFT_JIS;

    use super::{render, QrCodeWriter, SymbolWriter};
    use crate::common::{ECLevel, EncodeError, EncodeHints, SymbolFormat};

    #[test]
    fn test_render_layout() {
        let code = qrcode::QrCode::with_error_correction_level(b"01234567", qrcode::EcLevel::H)
            .unwrap();
        assert_eq!(code.width(), 21);

        // 21 + 2 * 4 = 29 modules, 100 / 29 = 3 px each, 63 px symbol centered in 100
        let m = render(&code, 100, 100, 4).unwrap();
        assert_eq!((m.width(), m.height()), (100, 100));
        let (left, top) = (18, 18);

        // Top left finder pattern: dark ring, light ring, dark core
        assert!(m.get(left, top));
        assert!(m.get(left + 20, top));
        assert!(!m.get(left + 3, top + 3));
        assert!(m.get(left + 6, top + 6));
        assert!(!m.get(left - 1, top));
        assert!(!m.get(left, top - 1));

        // Quiet zone is light
        for i in 0..100 {
            assert!(!m.get(i, 0));
            assert!(!m.get(0, i));
            assert!(!m.get(i, 99));
            assert!(!m.get(99, i));
        }
    }

    #[test]
    fn test_render_non_square() {
        let code = qrcode::QrCode::with_error_correction_level(b"01234567", qrcode::EcLevel::H)
            .unwrap();
        let m = render(&code, 200, 60, 0).unwrap();
        assert_eq!((m.width(), m.height()), (200, 60));

        // 60 / 21 = 2 px modules, symbol is 42 px wide
        let (left, top) = ((200 - 42) / 2, (60 - 42) / 2);
        assert!(m.get(left, top));
        assert!(m.get(left + 1, top + 1));
        assert!(!m.get(left - 1, top));
        let dark = code.to_colors().into_iter().filter(|&c| c == qrcode::Color::Dark).count();
        assert_eq!(m.count_dark(), dark * 4);
    }

    #[test_case(0, 200; "zero width")]
    #[test_case(200, 0; "zero height")]
    #[test_case(0, 0; "zero area")]
    #[test_case(28, 200; "narrower than quiet zone")]
    fn test_write_does_not_fit(w: u32, h: u32) {
        let res = QrCodeWriter.write("hello", SymbolFormat::QrCode, w, h, &EncodeHints::default());
        assert!(matches!(res, Err(EncodeError::SymbolDoesNotFit { symbol: 29, .. })));
    }

    #[test_case(u32::MAX / 2 + 1; "doubled overflows")]
    #[test_case(u32::MAX / 2 - 5; "sum overflows")]
    #[test_case(u32::MAX; "max")]
    fn test_write_huge_margin(margin: u32) {
        let hints = EncodeHints::default().margin(margin);
        let res = QrCodeWriter.write("hello", SymbolFormat::QrCode, 200, 200, &hints);
        assert!(matches!(res, Err(EncodeError::SymbolDoesNotFit { width: 200, height: 200, .. })));
    }

    #[test]
    fn test_write_unrepresentable_chars() {
        let hints = EncodeHints { charset: SHIFT_JIS, ..EncodeHints::default() };
        let lossy = QrCodeWriter.write("a🌎", SymbolFormat::QrCode, 200, 200, &hints).unwrap();
        let escaped =
            QrCodeWriter.write("a&#127758;", SymbolFormat::QrCode, 200, 200, &hints).unwrap();
        assert_eq!(lossy, escaped);
    }

    #[test]
    fn test_write_unsupported_format() {
        let hints = EncodeHints::default();
        let res = QrCodeWriter.write("hello", SymbolFormat::Aztec, 200, 200, &hints);
        assert_eq!(res, Err(EncodeError::UnsupportedFormat("AZTEC".to_string())));
    }

    #[test]
    fn test_write_data_too_long() {
        let data = "1234567890".repeat(306);
        let hints = EncodeHints::default().ec_level(Some(ECLevel::H));
        let res = QrCodeWriter.write(&data, SymbolFormat::QrCode, 2000, 2000, &hints);
        assert_eq!(res, Err(EncodeError::DataTooLong));
    }

    #[test]
    fn test_write_version_range() {
        // Version 5 is 37 modules, 37 + 0 margin fits 37 px exactly
        let hints = EncodeHints::default().margin(0).versions(Some(5), Some(6));
        let m = QrCodeWriter.write("hi", SymbolFormat::QrCode, 37, 37, &hints).unwrap();
        assert!(m.get(0, 0));
        assert!(m.get(36, 0));
        assert!(m.get(0, 36));

        let hints = EncodeHints::default().versions(Some(1), Some(1)).ec_level(Some(ECLevel::H));
        let res = QrCodeWriter.write(&"a".repeat(20), SymbolFormat::QrCode, 200, 200, &hints);
        assert_eq!(res, Err(EncodeError::DataTooLong));
    }

    #[test_case(Some(0), Some(3); "below one")]
    #[test_case(Some(3), Some(41); "above forty")]
    #[test_case(Some(7), Some(3); "inverted")]
    fn test_write_invalid_version_range(min: Option<i16>, max: Option<i16>) {
        let hints = EncodeHints::default().versions(min, max);
        let res = QrCodeWriter.write("hi", SymbolFormat::QrCode, 400, 400, &hints);
        assert!(matches!(res, Err(EncodeError::InvalidVersionRange(..))));
    }
}
