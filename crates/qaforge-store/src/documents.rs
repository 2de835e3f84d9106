//! Document discovery and reading

use crate::StoreError;
use md5::{Digest, Md5};
use qaforge_domain::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Lowercase hex MD5 of `bytes`
pub fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// A directory of plain-text documents
///
/// Only the top level of the directory is scanned. Files are matched by
/// extension, case-insensitively, and returned sorted by name so runs are
/// reproducible.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DocumentSource {
    /// Create a source over `root`
    ///
    /// # Errors
    ///
    /// `StoreError::Config` when `root` is not an existing directory or no
    /// extensions are given.
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::Config(format!(
                "Source directory not found: {}",
                root.display()
            )));
        }
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(StoreError::Config("No document extensions configured".to_string()));
        }
        Ok(Self { root, extensions })
    }

    /// Source directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List matching files, sorted by file name
    pub fn discover(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            StoreError::Config(format!("Cannot list {}: {}", self.root.display(), e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && self.matches(&path) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        debug!("Discovered {} documents in {}", paths.len(), self.root.display());
        Ok(paths)
    }

    /// Read one document, hashing the exact bytes that become its text
    pub fn read(&self, path: &Path) -> Result<Document, StoreError> {
        let read_error = |reason: String| StoreError::Read {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = fs::read(path).map_err(|e| read_error(e.to_string()))?;
        let hash_md5 = md5_hex(&bytes);
        let size = bytes.len() as u64;
        let text = String::from_utf8(bytes)
            .map_err(|e| read_error(format!("not valid UTF-8: {}", e.utf8_error())))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| read_error("path has no file name".to_string()))?;
        let absolute = fs::canonicalize(path).map_err(|e| read_error(e.to_string()))?;

        Ok(Document {
            name,
            path: absolute,
            text,
            hash_md5,
            size,
        })
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_md5_known_vectors() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_missing_directory_is_config_error() {
        let result = DocumentSource::new("/definitely/not/here", vec!["md".to_string()]);
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_no_extensions_is_config_error() {
        let dir = TempDir::new().unwrap();
        let result = DocumentSource::new(dir.path(), vec![".".to_string()]);
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("a.MD"), "a").unwrap();
        fs::write(dir.path().join("notes.txt"), "t").unwrap();
        fs::create_dir(dir.path().join("sub.md")).unwrap();

        let source = DocumentSource::new(dir.path(), vec![".md".to_string()]).unwrap();
        let names: Vec<_> = source
            .discover()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.MD", "b.md"]);
    }

    #[test]
    fn test_read_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.md");
        fs::write(&path, "Line1\nLine2\nLine3").unwrap();

        let source = DocumentSource::new(dir.path(), vec!["md".to_string()]).unwrap();
        let doc = source.read(&path).unwrap();

        assert_eq!(doc.name, "A.md");
        assert_eq!(doc.text, "Line1\nLine2\nLine3");
        assert_eq!(doc.size, 17);
        assert_eq!(doc.hash_md5, md5_hex(b"Line1\nLine2\nLine3"));
        assert!(doc.path.is_absolute());
    }

    #[test]
    fn test_read_invalid_utf8_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.md");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let source = DocumentSource::new(dir.path(), vec!["md".to_string()]).unwrap();
        assert!(matches!(source.read(&path), Err(StoreError::Read { .. })));
    }
}
