//! Writes rendered frames to disk as PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use warpfield_starfield::{IndexedBuffer, Palette, PixelTarget};

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to create capture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("RGBA data is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// `frame_00042.png` inside `dir`.
pub fn frame_path(dir: &Path, frame: u64) -> PathBuf {
    dir.join(format!("frame_{frame:05}.png"))
}

/// Encodes tightly packed RGBA8 pixels as a PNG stream into `writer`.
pub fn encode_rgba<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<(), CaptureError> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(CaptureError::SizeMismatch {
            expected,
            actual: rgba.len(),
        });
    }

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(rgba)?;
    png_writer.finish()?;
    Ok(())
}

/// Resolves `buffer` through `palette` and writes it to `path`.
pub fn capture_frame(
    buffer: &IndexedBuffer,
    palette: &Palette,
    path: &Path,
) -> Result<(), CaptureError> {
    let rgba = buffer.to_rgba8(palette);
    let file = BufWriter::new(File::create(path)?);
    encode_rgba(file, buffer.width(), buffer.height(), &rgba)?;
    tracing::debug!("captured {}", path.display());
    Ok(())
}
