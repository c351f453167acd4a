use image::ImageError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RasterizeError {
    #[error("icon size must be positive, got {0}")]
    InvalidSize(u32),

    /// The source is missing, not a regular file, or could not be read.
    #[error("could not read source image {}: {}", .path.display(), .source)]
    SourceNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {}", .path.display())]
    Decode { path: PathBuf, source: ImageError },

    #[error("source image has no pixels")]
    EmptyImage,

    #[error("failed to resample canvas to {size}px")]
    Resample {
        size: u32,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Some icons could not be written. The others are on disk and listed
    /// in `written`.
    #[error("{} icon(s) could not be written", .failures.len())]
    Write {
        written: Vec<PathBuf>,
        failures: Vec<WriteFailure>,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("failed to write {size}px icon to {}", .path.display())]
pub struct WriteFailure {
    pub size: u32,
    pub path: PathBuf,
    pub source: ImageError,
}
