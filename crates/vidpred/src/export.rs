// Export: write frames, grids and animations to disk
//
//   save_image("frame.png", &frame)?;
//   save_grid("batch.png", &rows, 1)?;
//   save_gif("rollout.gif", &steps, DEFAULT_GIF_DELAY)?;
//
// The still-image format follows the file extension. GIFs loop forever.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, RgbaImage};
use tracing::debug;

use vidpred_core::{Error, Frame, Result};

use crate::color::{to_rgb_image, to_rgba_bytes};
use crate::grid::tile_grid;

/// Time each GIF frame is shown.
pub const DEFAULT_GIF_DELAY: Duration = Duration::from_millis(250);

fn encode_err(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::ImageEncode {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Save one frame as an 8-bit RGB image.
pub fn save_image(path: impl AsRef<Path>, frame: &Frame) -> Result<()> {
    let path = path.as_ref();
    to_rgb_image(frame)
        .save(path)
        .map_err(|e| encode_err(path, e))?;
    debug!(path = %path.display(), shape = %frame.shape(), "saved image");
    Ok(())
}

/// Tile `rows` into a grid (white separators, `padding` between rows) and
/// save it.
pub fn save_grid(path: impl AsRef<Path>, rows: &[Vec<Frame>], padding: usize) -> Result<()> {
    let grid = tile_grid(rows, padding)?;
    save_image(path, &grid)
}

/// Save an animated GIF. Each step is a grid of frames, tiled with rows flush
/// against each other; every step must produce the same grid size.
pub fn save_gif(path: impl AsRef<Path>, steps: &[Vec<Vec<Frame>>], delay: Duration) -> Result<()> {
    let path = path.as_ref();
    if steps.is_empty() {
        vidpred_core::bail!("cannot write a GIF with no frames");
    }

    let mut frames = Vec::with_capacity(steps.len());
    let mut size = None;
    for step in steps {
        let grid = tile_grid(step, 0)?;
        let s = grid.shape();
        match size {
            None => size = Some(s),
            Some(first) if first != s => return Err(Error::shape_mismatch(first, s)),
            Some(_) => {}
        }
        let buf = RgbaImage::from_raw(s.width as u32, s.height as u32, to_rgba_bytes(&grid))
            .ok_or_else(|| encode_err(path, "frame buffer does not match its dimensions"))?;
        frames.push(image::Frame::from_parts(
            buf,
            0,
            0,
            Delay::from_saturating_duration(delay),
        ));
    }

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| encode_err(path, e))?;
    encoder
        .encode_frames(frames)
        .map_err(|e| encode_err(path, e))?;
    debug!(path = %path.display(), frames = steps.len(), "saved gif");
    Ok(())
}
