use std::error::Error;

use qrpix::{decode, ECLevel, PixelBuffer, QRBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let data = "https://example.com/qrpix";

    // Dark blue diamond on a transparent background as the logo
    let logo = PixelBuffer::from_fn(64, 64, |x, y| {
        let d = (x as i32 - 32).abs() + (y as i32 - 32).abs();
        if d < 30 {
            0xFF1E_3A8A
        } else {
            0x0000_0000
        }
    });

    // Dark modules are painted with a horizontal gradient
    let tile = PixelBuffer::from_fn(256, 1, |x, _| 0xFF00_0000 | (x / 4) << 16 | 0x30);

    let img = QRBuilder::new(data)
        .size(400, 400)
        .ec_level(ECLevel::H) // High level so the symbol survives the logo
        .margin(2)
        .background(0xFFFF_FBF0)
        .tile(&tile)
        .logo(&logo, 0.2)
        .build()?;

    img.to_rgba_image().save("logo_qr.png")?;
    println!("Logo QR code saved to: logo_qr.png");

    // Read it back to make sure the logo left it decodable
    println!("Decoded message: {}", decode(&img)?);

    Ok(())
}
