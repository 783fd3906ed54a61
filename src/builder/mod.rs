mod logo;
mod paint;
mod writer;

pub use logo::{composite, normalize_percent, DEFAULT_LOGO_PERCENT};
pub use paint::paint;
pub use writer::{QrCodeWriter, SymbolWriter};

use log::debug;

use crate::common::{
    ECLevel, EncodeError, EncodeHints, EncodeResult, PixelBuffer, SymbolFormat, BLACK,
    DEFAULT_MARGIN, WHITE,
};

pub const DEFAULT_CHARSET: &str = "utf-8";

pub struct QRBuilder<'a> {
    text: &'a str,
    width: u32,
    height: u32,
    ec_level: Option<ECLevel>,
    margin: u32,
    foreground: u32,
    background: u32,
    logo: Option<&'a PixelBuffer>,
    logo_percent: f32,
    tile: Option<&'a PixelBuffer>,
    charset: &'a str,
    min_version: Option<i16>,
    max_version: Option<i16>,
}

impl<'a> QRBuilder<'a> {
    /// Black on white with a 4 module quiet zone. The raster size starts at 0x0 and must be
    /// set with [`QRBuilder::size`] before building.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            width: 0,
            height: 0,
            ec_level: None,
            margin: DEFAULT_MARGIN,
            foreground: BLACK,
            background: WHITE,
            logo: None,
            logo_percent: DEFAULT_LOGO_PERCENT,
            tile: None,
            charset: DEFAULT_CHARSET,
            min_version: None,
            max_version: None,
        }
    }

    pub fn text(&mut self, text: &'a str) -> &mut Self {
        self.text = text;
        self
    }

    pub fn size(&mut self, width: u32, height: u32) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = Some(ec_level);
        self
    }

    pub fn unset_ec_level(&mut self) -> &mut Self {
        self.ec_level = None;
        self
    }

    /// Quiet zone width in modules.
    pub fn margin(&mut self, margin: u32) -> &mut Self {
        self.margin = margin;
        self
    }

    /// ARGB colors of dark and light modules.
    pub fn colors(&mut self, foreground: u32, background: u32) -> &mut Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    pub fn foreground(&mut self, argb: u32) -> &mut Self {
        self.foreground = argb;
        self
    }

    pub fn background(&mut self, argb: u32) -> &mut Self {
        self.background = argb;
        self
    }

    /// Logo centered over the symbol, covering `percent` of the raster's width and height.
    /// Percents outside (0, 1] fall back to [`DEFAULT_LOGO_PERCENT`].
    pub fn logo(&mut self, logo: &'a PixelBuffer, percent: f32) -> &mut Self {
        self.logo = Some(logo);
        self.logo_percent = percent;
        self
    }

    pub fn unset_logo(&mut self) -> &mut Self {
        self.logo = None;
        self
    }

    /// Image stretched over the raster whose pixels replace the foreground color.
    pub fn tile(&mut self, tile: &'a PixelBuffer) -> &mut Self {
        self.tile = Some(tile);
        self
    }

    pub fn unset_tile(&mut self) -> &mut Self {
        self.tile = None;
        self
    }

    /// Encoding label used to turn the text into bytes, e.g. `"utf-8"` or `"shift_jis"`.
    pub fn charset(&mut self, charset: &'a str) -> &mut Self {
        self.charset = charset;
        self
    }

    /// Bounds on the symbol version. The smallest version in range that fits is used.
    pub fn versions(&mut self, min: Option<i16>, max: Option<i16>) -> &mut Self {
        self.min_version = min;
        self.max_version = max;
        self
    }

    pub fn metadata(&self) -> String {
        format!(
            "{{ Size: {}x{}, Ec level: {:?}, Margin: {}, Charset: {}, Logo: {}, Tile: {} }}",
            self.width,
            self.height,
            self.ec_level,
            self.margin,
            self.charset,
            self.logo.is_some(),
            self.tile.is_some()
        )
    }
}

impl QRBuilder<'_> {
    pub fn build(&self) -> EncodeResult<PixelBuffer> {
        self.build_with(&QrCodeWriter)
    }

    /// Same pipeline as [`QRBuilder::build`] with a caller supplied symbol writer.
    pub fn build_with(&self, writer: &dyn SymbolWriter) -> EncodeResult<PixelBuffer> {
        debug!("Generating QR {}...", self.metadata());
        if self.text.is_empty() {
            return Err(EncodeError::EmptyData);
        }

        let hints = EncodeHints::new(self.charset)?
            .ec_level(self.ec_level)
            .margin(self.margin)
            .versions(self.min_version, self.max_version);

        debug!("Encoding text...");
        let (w, h) = (self.width, self.height);
        let matrix = writer.write(self.text, SymbolFormat::QrCode, w, h, &hints)?;

        debug!("Painting modules...");
        let img = paint(&matrix, self.foreground, self.background, self.tile);

        if self.logo.is_some() {
            debug!("Compositing logo...");
        }
        Ok(composite(img, self.logo, self.logo_percent))
    }
}

/// Black on white square symbol with no quiet zone and the lowest error correction level.
pub fn encode_plain(text: &str, size: u32) -> EncodeResult<PixelBuffer> {
    QRBuilder::new(text).size(size, size).ec_level(ECLevel::L).margin(0).build()
}
