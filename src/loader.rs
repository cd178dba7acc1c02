//! Reading the input file.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Read the whole file at `path` into memory.
///
/// Fails with [`Error::NotFound`] before touching anything else when the
/// path does not exist.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;
    log::debug!("Loaded {} ({} bytes)", path.display(), data.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load(dir.path().join("missing.pdf")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_load_reads_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.pdf");
        let bytes: Vec<u8> = (0..=255).cycle().take(10_000).collect();
        fs::write(&path, &bytes).unwrap();

        assert_eq!(load(&path).unwrap(), bytes);
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
