//! Texture handles.
//!
//! The core never decodes image data; a texture is an opaque, shareable
//! payload that a renderer may upload or ignore.
use log::debug;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::TextureError;

/// Opaque handle to texture bytes loaded from disk
#[derive(Clone)]
pub struct Texture {
    path: PathBuf,
    data: Arc<[u8]>,
}

impl Texture {
    pub fn from_bytes(path: impl Into<PathBuf>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True when both handles share the same payload
    pub fn ptr_eq(&self, other: &Texture) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("path", &self.path)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Load a texture file into a shareable handle
pub fn load_texture<P: AsRef<Path>>(path: P) -> Result<Texture, TextureError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| TextureError::AssetNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded texture {} ({} bytes)", path.display(), data.len());
    Ok(Texture::from_bytes(path, data))
}
