//! Manifest error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    /// No manifest exists for the organisation yet.
    #[error("manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading or writing the file failed.
    #[error("manifest I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file or an uploaded document is not a valid manifest.
    #[error("invalid manifest YAML: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// The manifest could not be serialized.
    #[error("failed to encode manifest: {0}")]
    Encode(#[source] serde_yaml::Error),

    /// The organisation id cannot be used as a file name component.
    #[error("organisation id {0:?} is not usable as a manifest name")]
    InvalidOrgId(String),
}
