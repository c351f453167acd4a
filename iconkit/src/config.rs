use std::path::{Path, PathBuf};

/// Icon sizes required by a browser extension manifest.
pub const DEFAULT_SIZES: [u32; 3] = [16, 48, 128];

/// File name of the icon rendered at `size` x `size` px.
pub fn icon_file_name(size: u32) -> String {
    format!("icon{}.png", size)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconConfig {
    /// Image to render the icons from.
    pub source: PathBuf,
    /// Existing directory receiving `icon{size}.png` files.
    pub out_dir: PathBuf,
    /// Side lengths to render, in order. Duplicates overwrite the same file.
    pub sizes: Vec<u32>,
}

impl IconConfig {
    pub fn new(source: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            out_dir: out_dir.into(),
            sizes: DEFAULT_SIZES.to_vec(),
        }
    }

    pub fn with_sizes(mut self, sizes: impl IntoIterator<Item = u32>) -> Self {
        self.sizes = sizes.into_iter().collect();
        self
    }

    pub fn output_path(&self, size: u32) -> PathBuf {
        output_path(&self.out_dir, size)
    }
}

pub(crate) fn output_path(out_dir: &Path, size: u32) -> PathBuf {
    out_dir.join(icon_file_name(size))
}
