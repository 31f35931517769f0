// Grid tiling for visual inspection
//
// Frames of one shape are laid out left to right with a one-pixel separator,
// and the resulting rows are stacked top to bottom with `padding` pixels
// between them. Every separator is white.
//
//   row width   = n * w + (n - 1) * ROW_PADDING
//   grid height = r * h + (r - 1) * padding

use vidpred_core::{Error, Frame, FrameShape, Result};

/// Value used for separators in saved grids (white).
pub const PAD_VALUE: f64 = 1.0;

/// Separator between the frames of one grid row.
pub const ROW_PADDING: usize = 1;

fn common_shape<'a>(frames: impl IntoIterator<Item = &'a Frame>) -> Result<Option<FrameShape>> {
    let mut shape = None;
    for f in frames {
        match shape {
            None => shape = Some(f.shape()),
            Some(s) if s != f.shape() => return Err(Error::shape_mismatch(s, f.shape())),
            Some(_) => {}
        }
    }
    Ok(shape)
}

/// Tile `frames` horizontally into one frame.
pub fn tile_row(frames: &[Frame], padding: usize) -> Result<Frame> {
    let Some(s) = common_shape(frames)? else {
        vidpred_core::bail!("cannot tile an empty row");
    };
    let n = frames.len();
    let out_w = n * s.width + (n - 1) * padding;
    let mut out = Frame::filled(FrameShape::new(s.channels, s.height, out_w), PAD_VALUE);

    for (i, f) in frames.iter().enumerate() {
        let x0 = i * (s.width + padding);
        for c in 0..s.channels {
            let src = f.channel(c);
            let dst = out.channel_mut(c);
            for y in 0..s.height {
                let from = &src[y * s.width..(y + 1) * s.width];
                dst[y * out_w + x0..y * out_w + x0 + s.width].copy_from_slice(from);
            }
        }
    }
    Ok(out)
}

/// Tile rows of frames into one frame: each row with [`tile_row`] and
/// [`ROW_PADDING`], then the strips stacked vertically `padding` pixels apart.
/// Every row must hold the same number of frames.
pub fn tile_grid(rows: &[Vec<Frame>], padding: usize) -> Result<Frame> {
    let strips = rows
        .iter()
        .map(|r| tile_row(r, ROW_PADDING))
        .collect::<Result<Vec<_>>>()?;
    let Some(s) = common_shape(&strips)? else {
        vidpred_core::bail!("cannot tile an empty grid");
    };
    let r = strips.len();
    let out_h = r * s.height + (r - 1) * padding;
    let mut out = Frame::filled(FrameShape::new(s.channels, out_h, s.width), PAD_VALUE);
    let plane = s.plane_len();

    for (i, strip) in strips.iter().enumerate() {
        let offset = i * (s.height + padding) * s.width;
        for c in 0..s.channels {
            out.channel_mut(c)[offset..offset + plane].copy_from_slice(strip.channel(c));
        }
    }
    Ok(out)
}
