//! Loading the binary fixture from disk.

use std::path::{Path, PathBuf};

use ldpcheck_domain::BinaryFixture;
use thiserror::Error;

/// Errors that can occur when loading a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("failed to read fixture {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file has no content to upload.
    #[error("fixture {} is empty", path.display())]
    Empty {
        /// File that was read.
        path: PathBuf,
    },
}

/// Reads a fixture file, guessing its media type from the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is empty.
pub async fn load_fixture(path: &Path) -> Result<BinaryFixture, FixtureError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("fixture")
        .to_string();
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    BinaryFixture::new(file_name, content_type, bytes).ok_or_else(|| FixtureError::Empty {
        path: path.to_path_buf(),
    })
}

/// Loads the configured fixture, or the built-in one when none is set.
///
/// # Errors
///
/// Returns an error if a configured file cannot be loaded.
pub async fn resolve_fixture(path: Option<&Path>) -> Result<BinaryFixture, FixtureError> {
    match path {
        Some(path) => load_fixture(path).await,
        None => Ok(BinaryFixture::builtin()),
    }
}
