use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a whole file into memory.
///
/// # Errors
/// Returns `SourceError::Io` when the file cannot be opened or read.
pub fn load_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    Ok(fs::read(path)?)
}
