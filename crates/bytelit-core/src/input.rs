//! Loading input files.
//!
//! Input is read completely into memory before rendering. The checks here
//! (empty input, size limit) gate the call to the encoder; the encoder itself
//! accepts anything.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Default upper bound on input size (512 MiB)
pub const MAX_INPUT_SIZE: u64 = 512 * 1024 * 1024;

/// Configurable input reader
#[derive(Debug, Clone)]
pub struct InputLoader {
    /// Largest accepted file in bytes (0 = unlimited)
    pub max_size: u64,
    /// Accept zero-length files
    pub allow_empty: bool,
}

impl Default for InputLoader {
    fn default() -> Self {
        Self {
            max_size: MAX_INPUT_SIZE,
            allow_empty: false,
        }
    }
}

impl InputLoader {
    /// Creates a loader with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the size limit (0 = unlimited)
    pub fn max_size(mut self, max: u64) -> Self {
        self.max_size = max;
        self
    }

    /// Sets whether zero-length files are accepted
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Check a file's size against the limits without reading it
    pub fn check(&self, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        let size = fs::metadata(path)
            .map_err(|e| Error::file_read(path, e))?
            .len();
        self.check_size(path, size)?;
        Ok(size)
    }

    /// Read the whole file, enforcing the limits
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        self.check(path)?;

        trace!("Reading {}", path.display());
        let data = fs::read(path).map_err(|e| Error::file_read(path, e))?;
        // The file may have changed between the metadata call and the read
        self.check_size(path, data.len() as u64)?;

        debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(data)
    }

    fn check_size(&self, path: &Path, size: u64) -> Result<()> {
        if size == 0 && !self.allow_empty {
            return Err(Error::empty_input(path));
        }
        if self.max_size > 0 && size > self.max_size {
            return Err(Error::InputTooLarge {
                path: path.to_path_buf(),
                size,
                max: self.max_size,
            });
        }
        Ok(())
    }
}

/// Read a whole file, accepting any size including zero
pub fn read_input(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    InputLoader::new().max_size(0).allow_empty(true).load(path)
}

/// Read a whole file, rejecting zero-length content
pub fn read_nonempty(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    InputLoader::new().max_size(0).load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_input() {
        let file = file_with(b"\x00\xffdata");
        assert_eq!(read_input(file.path()).unwrap(), b"\x00\xffdata");
    }

    #[test]
    fn test_empty_input() {
        let file = file_with(b"");
        assert!(read_input(file.path()).unwrap().is_empty());
        assert!(matches!(
            read_nonempty(file.path()),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_size_limit() {
        let file = file_with(&[0u8; 100]);
        let loader = InputLoader::new().max_size(64);
        assert!(matches!(
            loader.load(file.path()),
            Err(Error::InputTooLarge { size: 100, max: 64, .. })
        ));
        assert_eq!(InputLoader::new().max_size(100).check(file.path()).unwrap(), 100);
    }
}
