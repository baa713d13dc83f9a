// Common test utilities for checking documents on disk

use confcheck::diagnostic::Report;
use confcheck::document::Document;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary configuration directory with documents written into it.
#[allow(dead_code)]
pub struct ConfigDir {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl ConfigDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write `content` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn load(&self, names: &[&str]) -> Vec<Document> {
        names
            .iter()
            .map(|name| Document::from_file(&self.dir.path().join(name)).unwrap())
            .collect()
    }
}

/// Codes of every finding in report order.
#[allow(dead_code)]
pub fn codes(report: &Report) -> Vec<&'static str> {
    report.diagnostics.iter().map(|d| d.code).collect()
}

/// Parse a document from a string, panicking on syntax errors.
#[allow(dead_code)]
pub fn doc(origin: &str, text: &str) -> Document {
    Document::from_str(origin, text).unwrap()
}
