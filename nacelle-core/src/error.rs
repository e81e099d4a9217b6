//! Error types for asset loading
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or parsing a text mesh
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh file could not be opened or read
    #[error("mesh not found: {}", path.display())]
    AssetNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A token that should be numeric could not be parsed
    #[error("line {line}: cannot parse number from '{token}'")]
    Parse { line: usize, token: String },

    /// A face directive is structurally invalid
    #[error("line {line}: malformed face: {reason}")]
    MalformedFace { line: usize, reason: String },
}

/// Errors raised while loading a texture
#[derive(Error, Debug)]
pub enum TextureError {
    /// The texture file could not be opened or read
    #[error("texture not found: {}", path.display())]
    AssetNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Any failure while loading the assets of a scene object
#[derive(Error, Debug)]
pub enum AssetError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

impl AssetError {
    /// True when the failure is a missing file rather than bad content
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AssetError::Mesh(MeshError::AssetNotFound { .. })
                | AssetError::Texture(TextureError::AssetNotFound { .. })
        )
    }
}

/// Result type using AssetError
pub type Result<T> = std::result::Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let missing = AssetError::from(MeshError::AssetNotFound {
            path: PathBuf::from("gone.obj"),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert!(missing.is_not_found());

        let bad = AssetError::from(MeshError::Parse {
            line: 3,
            token: "x".to_string(),
        });
        assert!(!bad.is_not_found());
        assert_eq!(bad.to_string(), "line 3: cannot parse number from 'x'");
    }
}
