//! Canvas to PNG encoding.

use color_walk::Canvas;
use std::io::Cursor;

use crate::error::RenderError;

/// Encode a completed canvas as an 8-bit RGB PNG.
///
/// With `optimize` set, the fast first encode is re-compressed with oxipng.
pub fn render_canvas(canvas: &Canvas, optimize: bool) -> Result<Vec<u8>, RenderError> {
    if !canvas.is_complete() {
        return Err(RenderError::Incomplete {
            painted: canvas.painted_count(),
            cells: canvas.width() as usize * canvas.height() as usize,
        });
    }

    let png_bytes = encode_rgb(canvas.width(), canvas.height(), &canvas.to_rgb())?;
    if !optimize {
        return Ok(png_bytes);
    }

    // Re-compress with oxipng (zopfli + adaptive filter selection)
    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    );
    match optimized {
        Ok(optimized) => Ok(optimized),
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, serving unoptimized image");
            Ok(png_bytes)
        }
    }
}

/// Encode a row-major `[r, g, b, ...]` buffer.
pub fn encode_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Vec<u8>, RenderError> {
    let expected = width as usize * height as usize * 3;
    if rgb.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: rgb.len(),
        });
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(rgb)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
