use thiserror::Error;

// Buffer error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
#[error("pixel count {len} does not match {width}x{height}")]
pub struct BufferSizeMismatch {
    pub width: u32,
    pub height: u32,
    pub len: usize,
}

// Encode error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EncodeError {
    // Rejected before the symbol encoder runs
    #[error("empty data")]
    EmptyData,
    #[error("unknown character set: {0}")]
    UnknownCharset(String),

    // Symbol encoder
    #[error("data too long")]
    DataTooLong,
    #[error("invalid version range {0}..={1}")]
    InvalidVersionRange(i16, i16),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("symbol of {symbol} px does not fit in {width}x{height} raster")]
    SymbolDoesNotFit { symbol: u32, width: u32, height: u32 },
    #[error("symbol encoder failed: {0}")]
    Backend(String),
}

pub type EncodeResult<T> = Result<T, EncodeError>;

// Read error
//------------------------------------------------------------------------------

/// Cause of a single failed decode pass. Logged by the reader, never returned to callers of
/// [`crate::QRReader::read`].
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ReadError {
    // Binarizer
    #[error("image of {0}x{1} px is too small to binarize")]
    ImageTooSmall(u32, u32),
    #[error("luminance histogram has no distinct peaks")]
    FlatHistogram,

    // Symbol reader
    #[error("none of the requested formats is supported")]
    UnsupportedFormat,
    #[error("symbol not found")]
    SymbolNotFound,
    #[error("symbol could not be decoded: {0}")]
    Malformed(String),
    #[error("payload is not valid {0}")]
    InvalidCharset(String),
}

pub type ReadResult<T> = Result<T, ReadError>;

// Decode failure
//------------------------------------------------------------------------------

/// Returned when every binarization pass failed to produce a decodable symbol.
#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
#[error("no symbol could be decoded")]
pub struct DecodeFailure;
