// Frame decoding: image file on disk to a normalised [C, H, W] frame

use std::path::Path;

use image::imageops::FilterType;
use image::GenericImageView;

use vidpred_core::frame::LUMA_WEIGHTS;
use vidpred_core::{Error, Frame, FrameShape, Result};

use crate::config::ChannelMode;

/// Turns a frame file into pixel data.
///
/// The sampler calls this once per frame it loads. Implementations must return
/// frames of one fixed shape for a given configuration.
pub trait FrameDecoder {
    fn decode(&self, path: &Path) -> Result<Frame>;
}

/// [`FrameDecoder`] backed by the `image` crate.
///
/// Frames whose size differs from `size` are resized with a Lanczos3 filter.
/// Pixels are divided by 255. Gray frames use the Rec. 601 luma weights.
#[derive(Debug, Clone)]
pub struct ImageFileDecoder {
    size: Option<(u32, u32)>,
    channels: ChannelMode,
}

impl ImageFileDecoder {
    pub fn new(channels: ChannelMode) -> Self {
        ImageFileDecoder {
            size: None,
            channels,
        }
    }

    /// Resize decoded frames to (width, height).
    pub fn resize(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }
}

impl FrameDecoder for ImageFileDecoder {
    fn decode(&self, path: &Path) -> Result<Frame> {
        if !path.is_file() {
            return Err(Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "frame file not found"),
            ));
        }
        let img = image::open(path).map_err(|e| Error::ImageDecode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let img = match self.size {
            Some((w, h)) if img.dimensions() != (w, h) => {
                img.resize_exact(w, h, FilterType::Lanczos3)
            }
            _ => img,
        };

        let (w, h) = img.dimensions();
        let (w, h) = (w as usize, h as usize);
        let rgb = img.to_rgb8();
        let raw = rgb.as_raw();
        let npix = w * h;
        let data = match self.channels {
            ChannelMode::Gray => raw
                .chunks_exact(3)
                .map(|px| {
                    let luma: f64 = px
                        .iter()
                        .zip(LUMA_WEIGHTS)
                        .map(|(&v, k)| v as f64 * k)
                        .sum();
                    luma / 255.0
                })
                .collect(),
            ChannelMode::Rgb => {
                // [H, W, C] interleaved -> [C, H, W] planar
                let mut data = vec![0.0f64; 3 * npix];
                for i in 0..npix {
                    data[i] = raw[i * 3] as f64 / 255.0;
                    data[npix + i] = raw[i * 3 + 1] as f64 / 255.0;
                    data[2 * npix + i] = raw[i * 3 + 2] as f64 / 255.0;
                }
                data
            }
        };

        Frame::new(data, FrameShape::new(self.channels.channels(), h, w))
    }
}
