//! Override-or-bundled table text loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads an override table; a missing file is `Ok(None)`
pub fn read_override(path: &Path) -> Result<Option<String>, TableError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(TableError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Returns the override text when readable, otherwise `bundled`.
///
/// Read failures are logged and never propagated.
pub fn load_text(override_path: Option<&Path>, bundled: &str, kind: &str) -> String {
    if let Some(path) = override_path {
        match read_override(path) {
            Ok(Some(text)) => {
                debug!("Loaded {} table from {}", kind, path.display());
                return text;
            }
            Ok(None) => {}
            Err(e) => warn!("{}; using bundled {} table", e, kind),
        }
    }
    bundled.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_override_used_when_present() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id,name\n1,Custom").unwrap();
        let text = load_text(Some(file.path()), "bundled", "affix");
        assert!(text.contains("Custom"));
    }

    #[test]
    fn test_missing_override_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(read_override(&path).unwrap().is_none());
        assert_eq!(load_text(Some(&path), "bundled", "affix"), "bundled");
        assert_eq!(load_text(None, "bundled", "affix"), "bundled");
    }

    #[test]
    fn test_unreadable_override_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0xc3]).unwrap();
        assert!(read_override(file.path()).is_err());
        assert_eq!(load_text(Some(file.path()), "bundled", "skill"), "bundled");
    }
}
