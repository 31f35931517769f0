// Colour conversion between planar float frames and 8-bit images

use image::RgbImage;

use vidpred_core::frame::LUMA_WEIGHTS;
use vidpred_core::{Frame, FrameShape};

/// Collapse an RGB frame to one luma channel. Single-channel frames are
/// returned unchanged.
pub fn rgb_to_gray(frame: &Frame) -> Frame {
    let s = frame.shape();
    if s.channels != 3 {
        return frame.clone();
    }
    let mut out = Frame::zeros(FrameShape::new(1, s.height, s.width));
    let (r, g, b) = (frame.channel(0), frame.channel(1), frame.channel(2));
    for (i, v) in out.data_mut().iter_mut().enumerate() {
        *v = LUMA_WEIGHTS[0] * r[i] + LUMA_WEIGHTS[1] * g[i] + LUMA_WEIGHTS[2] * b[i];
    }
    out
}

/// Render a frame as an 8-bit RGB image.
///
/// Values are clamped to `[0, 1]`, shifted so the smallest becomes 0, capped
/// at 1 and scaled by 255 with truncation. One-channel frames are replicated
/// into all three channels; only the first three channels of wider frames are
/// used.
pub fn to_rgb_image(frame: &Frame) -> RgbImage {
    let s = frame.shape();
    let mut f = frame.clone();
    f.map_inplace(|v| v.clamp(0.0, 1.0));
    let min = f.data().iter().copied().fold(f64::INFINITY, f64::min);
    f.map_inplace(|v| (v - min).min(1.0));
    let to_byte = |v: f64| (v * 255.0) as u8;

    let planes: [&[f64]; 3] = if s.channels >= 3 {
        [f.channel(0), f.channel(1), f.channel(2)]
    } else {
        [f.channel(0); 3]
    };

    RgbImage::from_fn(s.width as u32, s.height as u32, |x, y| {
        let i = y as usize * s.width + x as usize;
        image::Rgb([to_byte(planes[0][i]), to_byte(planes[1][i]), to_byte(planes[2][i])])
    })
}

/// Clamp to `[0, 1]` and scale to bytes, interleaved RGBA with opaque alpha.
pub(crate) fn to_rgba_bytes(frame: &Frame) -> Vec<u8> {
    let s = frame.shape();
    let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
    let mut out = Vec::with_capacity(s.plane_len() * 4);
    for i in 0..s.plane_len() {
        if s.channels >= 3 {
            out.extend([
                byte(frame.channel(0)[i]),
                byte(frame.channel(1)[i]),
                byte(frame.channel(2)[i]),
            ]);
        } else {
            let v = byte(frame.channel(0)[i]);
            out.extend([v, v, v]);
        }
        out.push(u8::MAX);
    }
    out
}
