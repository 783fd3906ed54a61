use std::{env, error::Error};

use qrpix::{PixelBuffer, QRReader};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let qr_path = env::args().nth(1).unwrap_or_else(|| "logo_qr.png".to_string());
    let img = image::open(&qr_path)?.to_rgba8();
    let buf = PixelBuffer::from(&img);

    match QRReader::default().read(&buf) {
        Ok(msg) => {
            println!("Successfully decoded QR code from: {qr_path}");
            println!("Decoded message: {msg}");
        }
        Err(e) => println!("No QR code decoded from {qr_path}: {e}"),
    }

    Ok(())
}
