use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for the checker itself, read from `confcheck.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CheckerConfig {
    pub strict: bool,
    /// Server names accepted as defined even without a `[language-server.X]` table.
    pub extra_language_servers: Vec<String>,
    pub extra_themes: Vec<String>,
    pub theme_dirs: Vec<PathBuf>,
}

impl CheckerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: CheckerConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            origin: path.display().to_string(),
            message: e.to_string().trim_end().to_string(),
        })?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config: CheckerConfig = toml::from_str("").unwrap();
        assert_eq!(config, CheckerConfig::default());
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("confcheck.toml");
        fs::write(
            &path,
            "strict = true\nextra-language-servers = [\"my-lsp\"]\ntheme-dirs = [\"/opt/themes\"]\n",
        )
        .unwrap();

        let config = CheckerConfig::from_file(&path).unwrap();
        assert!(config.strict);
        assert_eq!(config.extra_language_servers, vec!["my-lsp"]);
        assert_eq!(config.theme_dirs, vec![PathBuf::from("/opt/themes")]);
        assert!(config.extra_themes.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("confcheck.toml");
        fs::write(&path, "strictness = 1\n").unwrap();

        assert!(matches!(
            CheckerConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = CheckerConfig::from_file(Path::new("/nonexistent/confcheck.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
