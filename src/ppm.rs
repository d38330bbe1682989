//! Writing bitmaps to image files
//!
//! P6 PPM is written by hand; everything else goes through the `image`
//! crate. Pixels are written as stored, premultiplied.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::bitmap::Bitmap;

/// Failure writing an image file
#[derive(Debug, Error)]
pub enum PpmError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Write a PPM file
///
/// P6 - Binary Portable Pixmap, 8 bits each of red, green, blue, row major.
/// Alpha is dropped.
pub fn write_ppm<P: AsRef<Path>>(bitmap: &Bitmap, filename: P) -> Result<(), PpmError> {
    let mut fd = File::create(filename)?;
    write!(fd, "P6 {} {} 255 ", bitmap.width(), bitmap.height())?;
    let mut buf = Vec::with_capacity(bitmap.width() * bitmap.height() * 3);
    for &p in bitmap.pixels() {
        buf.push(p.r() as u8);
        buf.push(p.g() as u8);
        buf.push(p.b() as u8);
    }
    fd.write_all(&buf)?;
    Ok(())
}

/// Write a PNG (or any format the `image` crate infers from the extension)
pub fn write_png<P: AsRef<Path>>(bitmap: &Bitmap, filename: P) -> Result<(), PpmError> {
    let mut buf = Vec::with_capacity(bitmap.width() * bitmap.height() * 4);
    for &p in bitmap.pixels() {
        buf.extend_from_slice(&[p.r() as u8, p.g() as u8, p.b() as u8, p.a() as u8]);
    }
    image::save_buffer(
        filename.as_ref(),
        &buf,
        bitmap.width() as u32,
        bitmap.height() as u32,
        image::ColorType::Rgba8,
    )?;
    Ok(())
}
