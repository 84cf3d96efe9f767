//! Image export: PPM (P6) and PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Framebuffer;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Quantize the framebuffer to packed 8-bit RGB, top row first.
///
/// Each channel is clamped to [0, 1] and raised to `gamma` before
/// scaling to 255 (the path tracer uses gamma 0.6, the rasterizer 1.0).
pub fn to_rgb8(fb: &Framebuffer, gamma: f32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(fb.width() * fb.height() * 3);
    for p in fb.pixels() {
        bytes.push((255.0 * p.x.clamp(0.0, 1.0).powf(gamma)) as u8);
        bytes.push((255.0 * p.y.clamp(0.0, 1.0).powf(gamma)) as u8);
        bytes.push((255.0 * p.z.clamp(0.0, 1.0).powf(gamma)) as u8);
    }
    bytes
}

/// Write a binary PPM: `P6\n<w> <h>\n255\n` followed by packed RGB.
pub fn save_ppm<P: AsRef<Path>>(fb: &Framebuffer, path: P, gamma: f32) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);

    write!(out, "P6\n{} {}\n255\n", fb.width(), fb.height())?;
    out.write_all(&to_rgb8(fb, gamma))?;
    out.flush()?;

    log::info!("wrote {}", path.as_ref().display());
    Ok(())
}

/// Write a PNG via the `image` crate.
pub fn save_png<P: AsRef<Path>>(fb: &Framebuffer, path: P, gamma: f32) -> Result<(), ExportError> {
    let buf = image::RgbImage::from_raw(
        fb.width() as u32,
        fb.height() as u32,
        to_rgb8(fb, gamma),
    )
    .ok_or_else(|| {
        ExportError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "framebuffer size mismatch",
        ))
    })?;
    buf.save(path.as_ref())?;

    log::info!("wrote {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimmer_math::Vec3;

    #[test]
    fn test_rgb8_quantization() {
        let mut fb = Framebuffer::new(1, 1);
        fb.set_pixel(0, 0, Vec3::new(0.0, 0.5, 2.0));

        let bytes = to_rgb8(&fb, 1.0);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 127);
        assert_eq!(bytes[2], 255); // clamped before scaling
    }

    #[test]
    fn test_rgb8_gamma() {
        let mut fb = Framebuffer::new(1, 1);
        fb.set_pixel(0, 0, Vec3::splat(0.25));

        let bytes = to_rgb8(&fb, 0.6);
        let expected = (255.0 * 0.25f32.powf(0.6)) as u8;
        assert_eq!(bytes[0], expected);
    }

    #[test]
    fn test_ppm_header() {
        let fb = Framebuffer::new(3, 2);
        let dir = std::env::temp_dir().join("glimmer_ppm_test.ppm");
        save_ppm(&fb, &dir, 1.0).unwrap();

        let data = std::fs::read(&dir).unwrap();
        assert!(data.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(data.len(), 11 + 3 * 2 * 3);
        std::fs::remove_file(&dir).ok();
    }
}
