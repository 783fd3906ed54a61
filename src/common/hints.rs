use std::fmt::{Display, Error, Formatter};

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;

use super::error::{EncodeError, EncodeResult};

// Symbol format
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum SymbolFormat {
    Aztec,
    Codabar,
    Code39,
    Code93,
    Code128,
    DataMatrix,
    Ean8,
    Ean13,
    Itf,
    MaxiCode,
    Pdf417,
    QrCode,
    Rss14,
    RssExpanded,
    UpcA,
    UpcE,
    UpcEanExtension,
}

impl SymbolFormat {
    pub const ALL: [SymbolFormat; 17] = [
        Self::Aztec,
        Self::Codabar,
        Self::Code39,
        Self::Code93,
        Self::Code128,
        Self::DataMatrix,
        Self::Ean8,
        Self::Ean13,
        Self::Itf,
        Self::MaxiCode,
        Self::Pdf417,
        Self::QrCode,
        Self::Rss14,
        Self::RssExpanded,
        Self::UpcA,
        Self::UpcE,
        Self::UpcEanExtension,
    ];
}

impl Display for SymbolFormat {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = match *self {
            Self::Aztec => "AZTEC",
            Self::Codabar => "CODABAR",
            Self::Code39 => "CODE_39",
            Self::Code93 => "CODE_93",
            Self::Code128 => "CODE_128",
            Self::DataMatrix => "DATA_MATRIX",
            Self::Ean8 => "EAN_8",
            Self::Ean13 => "EAN_13",
            Self::Itf => "ITF",
            Self::MaxiCode => "MAXICODE",
            Self::Pdf417 => "PDF_417",
            Self::QrCode => "QR_CODE",
            Self::Rss14 => "RSS_14",
            Self::RssExpanded => "RSS_EXPANDED",
            Self::UpcA => "UPC_A",
            Self::UpcE => "UPC_E",
            Self::UpcEanExtension => "UPC_EAN_EXTENSION",
        };
        f.write_str(name)
    }
}

// Error correction level
//------------------------------------------------------------------------------

/// Redundancy tier, roughly the share of codewords that can be restored:
/// L ~7%, M ~15%, Q ~25%, H ~30%.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ECLevel {
    L,
    M,
    Q,
    H,
}

// Charset
//------------------------------------------------------------------------------

/// Resolves a WHATWG encoding label such as `"utf-8"` or `"shift_jis"`.
pub fn resolve_charset(label: &str) -> EncodeResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| EncodeError::UnknownCharset(label.to_string()))
}

// Decode hints
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DecodeHints {
    pub possible_formats: Vec<SymbolFormat>,
    pub try_harder: bool,
    pub charset: &'static Encoding,
}

impl DecodeHints {
    pub fn accepts(&self, format: SymbolFormat) -> bool {
        self.possible_formats.contains(&format)
    }
}

impl Default for DecodeHints {
    fn default() -> Self {
        Self { possible_formats: SymbolFormat::ALL.to_vec(), try_harder: true, charset: UTF_8 }
    }
}

/// Hints shared by every decode: all known formats, try harder, UTF-8.
pub static DECODE_HINTS: Lazy<DecodeHints> = Lazy::new(DecodeHints::default);

// Encode hints
//------------------------------------------------------------------------------

pub const DEFAULT_MARGIN: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct EncodeHints {
    pub charset: &'static Encoding,
    pub ec_level: Option<ECLevel>,
    pub margin: u32,
    pub min_version: Option<i16>,
    pub max_version: Option<i16>,
}

impl EncodeHints {
    pub fn new(charset: &str) -> EncodeResult<Self> {
        Ok(Self { charset: resolve_charset(charset)?, ..Self::default() })
    }

    pub fn ec_level(mut self, ec_level: Option<ECLevel>) -> Self {
        self.ec_level = ec_level;
        self
    }

    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn versions(mut self, min: Option<i16>, max: Option<i16>) -> Self {
        self.min_version = min;
        self.max_version = max;
        self
    }
}

impl Default for EncodeHints {
    fn default() -> Self {
        Self {
            charset: UTF_8,
            ec_level: None,
            margin: DEFAULT_MARGIN,
            min_version: None,
            max_version: None,
        }
    }
}
