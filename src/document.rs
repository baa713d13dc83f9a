// src/document.rs - A parsed configuration document and where it came from

use crate::diagnostic::Diagnostics;
use crate::error::{ConfigError, Result};
use log::debug;
use std::path::Path;
use toml::Value;

/// Top-level sections the editor understands.
pub const KNOWN_SECTIONS: &[&str] = &[
    "theme",
    "editor",
    "keys",
    "language-server",
    "language",
    "grammar",
    "use-grammars",
];

#[derive(Debug, Clone)]
pub struct Document {
    origin: String,
    root: toml::Table,
}

impl Document {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded {} ({} bytes)", path.display(), content.len());
        Self::from_str(&path.display().to_string(), &content)
    }

    // Not `FromStr`: the origin travels with the text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(origin: &str, content: &str) -> Result<Self> {
        let root: toml::Table = toml::from_str(content).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string().trim_end().to_string(),
        })?;
        Ok(Self {
            origin: origin.to_string(),
            root,
        })
    }

    pub fn from_table(origin: &str, root: toml::Table) -> Self {
        Self {
            origin: origin.to_string(),
            root,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn root(&self) -> &toml::Table {
        &self.root
    }

    pub fn get(&self, section: &str) -> Option<&Value> {
        self.root.get(section)
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// Report top-level sections the editor would not recognise.
    pub fn check_sections(&self, diags: &mut Diagnostics) {
        for section in self.sections() {
            if !KNOWN_SECTIONS.contains(&section) {
                diags.warn(
                    "unknown-section",
                    section,
                    format!("unknown top-level section `{}`", section),
                );
            }
        }
    }
}
