use fast_image_resize as fr;
use image::{ImageFormat, ImageReader, RgbaImage};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

mod canvas;
mod config;
mod error;

pub use canvas::{centering_offset, pad_to_square};
pub use config::{icon_file_name, IconConfig, DEFAULT_SIZES};
pub use error::{RasterizeError, WriteFailure};

/// Lanczos with three lobes, used for both down and upscaling.
pub const FILTER: fr::FilterType = fr::FilterType::Lanczos3;

/// Renders every size in `config` and writes them as png files.
///
/// Returns the written paths in request order. When some sizes fail the
/// remaining ones are still attempted and the error lists both outcomes.
pub fn rasterize(config: &IconConfig) -> Result<Vec<PathBuf>, RasterizeError> {
    if let Some(&size) = config.sizes.iter().find(|size| **size == 0) {
        return Err(RasterizeError::InvalidSize(size));
    }
    let scaler = Scaler::open(&config.source)?;
    scaler.write_all(&config.out_dir, &config.sizes)
}

/// A source image letterboxed into a square RGBA canvas.
pub struct Scaler {
    img: RgbaImage,
}

impl Scaler {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RasterizeError> {
        let path = path.as_ref();
        let unreadable = |source| RasterizeError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        let metadata = file.metadata().map_err(unreadable)?;
        if !metadata.is_file() {
            return Err(unreadable(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "not a regular file",
            )));
        }
        let mut reader = ImageReader::new(BufReader::new(file));
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }
        let img = reader
            .with_guessed_format()
            .map_err(unreadable)?
            .decode()
            .map_err(|source| RasterizeError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(
            "decoded {} ({}x{} {:?})",
            path.display(),
            img.width(),
            img.height(),
            img.color()
        );
        Self::new(img.to_rgba8())
    }

    pub fn new(img: RgbaImage) -> Result<Self, RasterizeError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(RasterizeError::EmptyImage);
        }
        let (x, y) = centering_offset(width, height);
        let img = pad_to_square(img);
        tracing::debug!(
            "padded {}x{} to {}x{} at offset ({}, {})",
            width,
            height,
            img.width(),
            img.height(),
            x,
            y
        );
        Ok(Self { img })
    }

    /// The padded square canvas.
    pub fn canvas(&self) -> &RgbaImage {
        &self.img
    }

    /// Resamples the canvas to `size` x `size` px.
    ///
    /// Color channels are premultiplied by alpha while filtering, so the
    /// transparent bars never bleed black into the content edge.
    pub fn resize(&self, size: u32) -> Result<RgbaImage, RasterizeError> {
        let side = self.img.width();
        if size > side {
            tracing::warn!("upscaling {}px canvas to {}px", side, size);
        }
        let resample = |source: Box<dyn std::error::Error + Send + Sync>| {
            RasterizeError::Resample { size, source }
        };
        let src =
            fr::images::ImageRef::new(side, side, self.img.as_raw(), fr::PixelType::U8x4)
                .map_err(|e| resample(e.into()))?;
        let mut dst = fr::images::Image::new(size, size, fr::PixelType::U8x4);
        // Multiplying by alpha before filtering is on by default.
        let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(FILTER));
        fr::Resizer::new()
            .resize(&src, &mut dst, Some(&options))
            .map_err(|e| resample(e.into()))?;
        RgbaImage::from_raw(size, size, dst.into_vec())
            .ok_or_else(|| resample("resized buffer has the wrong length".into()))
    }

    pub fn write<P: AsRef<Path>>(&self, path: P, size: u32) -> Result<(), RasterizeError> {
        let path = path.as_ref();
        self.resize(size)?
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| RasterizeError::Write {
                written: Vec::new(),
                failures: vec![WriteFailure {
                    size,
                    path: path.to_path_buf(),
                    source,
                }],
            })
    }

    /// Writes `icon{size}.png` into `out_dir` for each size.
    ///
    /// Resampling runs in parallel over the shared canvas, writes happen in
    /// request order so duplicate sizes never race on the same file.
    pub fn write_all(
        &self,
        out_dir: &Path,
        sizes: &[u32],
    ) -> Result<Vec<PathBuf>, RasterizeError> {
        let icons = sizes
            .par_iter()
            .map(|&size| Ok((size, self.resize(size)?)))
            .collect::<Result<Vec<(u32, RgbaImage)>, RasterizeError>>()?;
        let mut written = Vec::with_capacity(icons.len());
        let mut failures = Vec::new();
        for (size, icon) in icons {
            let path = config::output_path(out_dir, size);
            match icon.save_with_format(&path, ImageFormat::Png) {
                Ok(()) => {
                    tracing::info!("wrote {}", path.display());
                    written.push(path);
                }
                Err(source) => {
                    tracing::error!("failed to write {}: {}", path.display(), source);
                    failures.push(WriteFailure { size, path, source });
                }
            }
        }
        if failures.is_empty() {
            Ok(written)
        } else {
            Err(RasterizeError::Write { written, failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn wide_scaler() -> Scaler {
        Scaler::new(RgbaImage::from_pixel(512, 256, Rgba([0, 128, 255, 255]))).unwrap()
    }

    fn assert_no_dark_fringe(icon: &RgbaImage) {
        let mut edges = 0;
        for (x, y, pixel) in icon.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }
            if pixel[3] < 255 {
                edges += 1;
            }
            assert!(
                pixel[0] >= 250 && pixel[1] >= 250 && pixel[2] >= 250,
                "content edge darkened to {:?} at ({}, {})",
                pixel,
                x,
                y
            );
        }
        assert!(edges > 0, "expected partially transparent edge pixels");
    }

    #[test]
    fn rejects_empty_image() {
        assert!(matches!(
            Scaler::new(RgbaImage::new(0, 12)),
            Err(RasterizeError::EmptyImage)
        ));
    }

    #[test]
    fn resize_is_square() {
        let scaler = wide_scaler();
        assert_eq!(scaler.canvas().dimensions(), (512, 512));
        for size in [1, 16, 48, 128, 600] {
            assert_eq!(scaler.resize(size).unwrap().dimensions(), (size, size));
        }
    }

    #[test]
    fn bars_stay_transparent() {
        let scaler = wide_scaler();
        for size in DEFAULT_SIZES {
            let icon = scaler.resize(size).unwrap();
            let last = size - 1;
            for x in 0..size {
                assert_eq!(icon.get_pixel(x, 0)[3], 0, "top bar at {size}px");
                assert_eq!(icon.get_pixel(x, last)[3], 0, "bottom bar at {size}px");
            }
            assert!(icon.get_pixel(size / 2, size / 2)[3] >= 250);
        }
    }

    #[test]
    fn white_wide_source_keeps_white_edges() {
        let scaler = Scaler::new(RgbaImage::from_pixel(512, 256, WHITE)).unwrap();
        for size in DEFAULT_SIZES {
            assert_no_dark_fringe(&scaler.resize(size).unwrap());
        }
    }

    #[test]
    fn white_tall_source_keeps_white_edges() {
        let scaler = Scaler::new(RgbaImage::from_pixel(150, 400, WHITE)).unwrap();
        for size in DEFAULT_SIZES {
            let icon = scaler.resize(size).unwrap();
            assert_eq!(icon.get_pixel(0, size / 2)[3], 0);
            assert_no_dark_fringe(&icon);
        }
    }

    #[test]
    fn zero_size_is_rejected_before_reading() {
        let config = IconConfig::new("does/not/exist.png", "out").with_sizes([16, 0]);
        assert!(matches!(
            rasterize(&config),
            Err(RasterizeError::InvalidSize(0))
        ));
    }
}
