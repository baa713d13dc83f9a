// src/theme.rs - Resolving the `theme` setting against built-in and user themes

use crate::diagnostic::Diagnostics;
use crate::error::{ConfigError, Result};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

#[derive(Debug, Clone)]
pub struct ThemeInfo {
    pub name: String,
    pub inherits: Option<String>,
}

/// Outcome of following a theme's `inherits` chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeResolution {
    /// The chain ends in a built-in theme or a theme with no parent.
    Resolved(Vec<String>),
    NotFound(String),
    Cycle(Vec<String>),
}

pub struct ThemeLoader {
    theme_directories: Vec<PathBuf>,
    builtin: Vec<String>,
    theme_cache: HashMap<String, ThemeInfo>,
}

impl ThemeLoader {
    pub fn new(builtin: Vec<String>) -> Self {
        Self {
            theme_directories: Vec::new(),
            builtin,
            theme_cache: HashMap::new(),
        }
    }

    pub fn add_theme_directory(&mut self, path: PathBuf) {
        if path.exists() {
            self.theme_directories.push(path);
        }
    }

    pub fn discover_themes(&mut self) -> Vec<ThemeInfo> {
        let mut themes = Vec::new();

        for dir in &self.theme_directories {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    match parse_theme_info(&path) {
                        Ok(info) => themes.push(info),
                        Err(e) => warn!("skipping theme {}: {}", path.display(), e),
                    }
                }
            }
        }

        self.theme_cache.clear();
        for theme in &themes {
            self.theme_cache.insert(theme.name.clone(), theme.clone());
        }
        debug!("discovered {} user theme(s)", themes.len());

        themes.sort_by(|a, b| a.name.cmp(&b.name));
        themes
    }

    pub fn theme_exists(&self, name: &str) -> bool {
        self.theme_cache.contains_key(name) || self.builtin.iter().any(|b| b == name)
    }

    pub fn get_theme_info(&self, name: &str) -> Option<&ThemeInfo> {
        self.theme_cache.get(name)
    }

    /// All resolvable theme names, sorted.
    pub fn list_themes(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .builtin
            .iter()
            .cloned()
            .chain(self.theme_cache.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Follow `inherits` from `name`. User themes shadow built-ins of the
    /// same name; built-ins end the chain. A user theme that inherits its
    /// own name extends the built-in it shadows, so a name already taken
    /// from a user file falls through to the built-in. Reaching a visited
    /// user theme with no built-in to fall to is a cycle.
    pub fn resolve(&self, name: &str) -> ThemeResolution {
        let mut chain: Vec<String> = Vec::new();
        let mut visited: Vec<&str> = Vec::new();
        let mut current = name.to_string();
        loop {
            let user_theme = if visited.contains(&current.as_str()) {
                None
            } else {
                self.theme_cache.get_key_value(&current)
            };
            chain.push(current.clone());
            match user_theme {
                Some((key, info)) => {
                    visited.push(key.as_str());
                    match &info.inherits {
                        Some(parent) => current = parent.clone(),
                        None => return ThemeResolution::Resolved(chain),
                    }
                }
                None if self.builtin.contains(&current) => {
                    return ThemeResolution::Resolved(chain);
                }
                None if visited.contains(&current.as_str()) => {
                    return ThemeResolution::Cycle(chain);
                }
                None => return ThemeResolution::NotFound(current),
            }
        }
    }
}

fn parse_theme_info(path: &Path) -> Result<ThemeInfo> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        origin: path.display().to_string(),
        message: e.to_string().trim_end().to_string(),
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ConfigError::Invalid(format!("bad theme file name {}", path.display())))?
        .to_string();

    let inherits = value
        .get("inherits")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(ThemeInfo { name, inherits })
}

/// Check every theme name the `theme` setting refers to.
pub fn check_theme(theme: &Value, loader: &ThemeLoader, diags: &mut Diagnostics) {
    let names: Vec<(String, &str)> = match theme {
        Value::String(name) => vec![("theme".to_string(), name.as_str())],
        Value::Table(table) => ["light", "dark"]
            .iter()
            .filter_map(|variant| {
                table
                    .get(*variant)
                    .and_then(Value::as_str)
                    .map(|name| (format!("theme.{}", variant), name))
            })
            .collect(),
        // Type errors are reported by the settings check.
        _ => Vec::new(),
    };

    for (location, name) in names {
        match loader.resolve(name) {
            ThemeResolution::Resolved(_) => {}
            ThemeResolution::NotFound(missing) if missing == name => diags.warn(
                "unknown-theme",
                location,
                format!("no built-in or user theme named `{}`", name),
            ),
            ThemeResolution::NotFound(missing) => diags.warn(
                "unknown-theme",
                location,
                format!("theme `{}` inherits from unknown theme `{}`", name, missing),
            ),
            ThemeResolution::Cycle(chain) => diags.error(
                "theme-inherits-cycle",
                location,
                format!("theme inheritance loops: {}", chain.join(" -> ")),
            ),
        }
    }
}
