use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    assets::decode::{decode_image, decode_image_resized},
    foundation::error::{WrappedError, WrappedResult},
};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone)]
pub struct PreparedFont {
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for PreparedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedFont")
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Templates, fonts and cover art read from disk ahead of rendering.
///
/// Every asset is addressed by its normalized asset-root relative path. Loading front-loads all
/// IO so renderers only ever look things up.
#[derive(Clone, Debug)]
pub struct AssetStore {
    root: PathBuf,
    images: HashMap<String, PreparedImage>,
    fonts: HashMap<String, PreparedFont>,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
            fonts: HashMap::new(),
        }
    }

    pub fn load_image(&mut self, source: &str) -> WrappedResult<()> {
        let key = normalize_rel_path(source)?;
        if self.images.contains_key(&key) {
            return Ok(());
        }
        let bytes = self.read_bytes(&key)?;
        let image = decode_image(&bytes)
            .map_err(|e| WrappedError::asset(format!("image '{key}': {e}")))?;
        self.insert_image(&key, image)
    }

    /// Load `source` resampled to a fixed size, stored under `source`.
    pub fn load_image_resized(&mut self, source: &str, width: u32, height: u32) -> WrappedResult<()> {
        let key = normalize_rel_path(source)?;
        let bytes = self.read_bytes(&key)?;
        let image = decode_image_resized(&bytes, width, height)
            .map_err(|e| WrappedError::asset(format!("image '{key}': {e}")))?;
        self.insert_image(&key, image)
    }

    pub fn load_font(&mut self, source: &str) -> WrappedResult<()> {
        let key = normalize_rel_path(source)?;
        if self.fonts.contains_key(&key) {
            return Ok(());
        }
        let bytes = self.read_bytes(&key)?;
        self.fonts.insert(
            key,
            PreparedFont {
                bytes: Arc::new(bytes),
            },
        );
        Ok(())
    }

    /// Register an already decoded image under `source`, replacing any previous entry.
    pub fn insert_image(&mut self, source: &str, image: PreparedImage) -> WrappedResult<()> {
        let key = normalize_rel_path(source)?;
        self.images.insert(key, image);
        Ok(())
    }

    pub fn image(&self, source: &str) -> WrappedResult<&PreparedImage> {
        let key = normalize_rel_path(source)?;
        self.images
            .get(&key)
            .ok_or_else(|| WrappedError::asset(format!("image '{key}' was not loaded")))
    }

    pub fn font(&self, source: &str) -> WrappedResult<&PreparedFont> {
        let key = normalize_rel_path(source)?;
        self.fonts
            .get(&key)
            .ok_or_else(|| WrappedError::asset(format!("font '{key}' was not loaded")))
    }

    /// First of `candidates` that exists under the asset root.
    pub fn find_existing<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        candidates
            .iter()
            .copied()
            .find(|c| self.root.join(Path::new(c)).is_file())
    }

    fn read_bytes(&self, norm_path: &str) -> WrappedResult<Vec<u8>> {
        let path = self.root.join(Path::new(norm_path));
        std::fs::read(&path)
            .map_err(|e| WrappedError::asset(format!("read '{}': {e}", path.display())))
    }
}

/// Normalize and validate asset-root relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> WrappedResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(WrappedError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(WrappedError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(WrappedError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(WrappedError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
