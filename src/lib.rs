//! # qrpix
//!
//! A Rust library for turning text into QR code rasters and reading text back from raw ARGB
//! pixel buffers. Symbol construction and grid decoding are delegated to the `qrcode`, `rqrr`
//! and `rxing` crates; this crate owns everything around them.
//!
//! ## Features
//!
//! - **QR Code Generation**: Render a symbol into a raster of any size, with custom colors, quiet
//!   zone, error correction level, character set and version bounds
//! - **Tiles & Logos**: Replace dark modules with pixels of an image, or overlay a centered logo
//! - **Barcode Reading**: Decode QR codes and 1-D or other 2-D barcodes from a packed ARGB
//!   buffer with an adaptive binarization pass and a global histogram fallback
//! - **Pluggable Stages**: Binarizers, symbol readers and symbol writers are traits
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrpix::encode_plain;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Black on white, no quiet zone, lowest error correction level
//! let img = encode_plain("Hello, World!", 200)?;
//! assert_eq!(img.dimensions(), (200, 200));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrpix::{ECLevel, PixelBuffer, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let logo = PixelBuffer::filled(16, 16, 0xFFD0_2020);
//! let img = QRBuilder::new("Hello, World!")
//!     .size(300, 300)                   // Raster size in pixels
//!     .ec_level(ECLevel::H)             // If not provided, the lowest level L is used
//!     .margin(2)                        // Quiet zone in modules, defaults to 4
//!     .colors(0xFF20_2050, 0xFFFF_FFF0) // ARGB foreground & background
//!     .logo(&logo, 0.15)                // Logo covering 15% of width and height
//!     .build()?;
//!
//! assert_eq!(img.dimensions(), (300, 300));
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading a QR Code
//!
//! ```rust
//! use qrpix::{decode, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = QRBuilder::new("Hello, World!").size(200, 200).build()?;
//! assert_eq!(decode(&img)?, "Hello, World!");
//! # Ok(())
//! # }
//! ```
//!
//! ## Decode Pipeline
//!
//! 1. Luminance is extracted once, green weighted twice as red and blue
//! 2. The adaptive binarizer thresholds each 8x8 block against its 5x5 block neighbourhood
//! 3. Each bitmap goes to `rqrr` for QR and then to `rxing` for every other format
//! 4. If no reader accepts that bitmap, the global histogram binarizer retries with a single
//!    threshold
//! 5. If both fail, [`DecodeFailure`] is returned
//!
//! Every decode accepts the 17 known symbol formats, tries harder and reads payloads as UTF-8,
//! see [`DECODE_HINTS`].

pub mod builder;
pub(crate) mod common;
pub mod reader;

pub use builder::{encode_plain, QRBuilder};
pub use common::{
    argb_to_rgba, resolve_charset, rgba_to_argb, BinaryBitmap, BitMatrix, BufferSizeMismatch,
    DecodeFailure, DecodeHints, ECLevel, EncodeError, EncodeHints, EncodeResult, PixelBuffer,
    ReadError, ReadResult, SymbolFormat, SymbolMatrix, BLACK, DECODE_HINTS, DEFAULT_MARGIN, WHITE,
};
pub use reader::{decode, QRReader};
