// src/language/registry.rs - `[[language]]` entries and the server table they reference

use super::formatter::{FormatterConfig, find_executable};
use super::server::{
    BUILTIN_SERVERS, FeatureFilter, LanguageServerConfig, LanguageServerFeature,
    LanguageServerFeatures,
};
use crate::diagnostic::Diagnostics;
use crate::keymap::trie::child_location;
use log::debug;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use toml::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FileType {
    Extension(String),
    Glob { glob: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndentationConfiguration {
    pub tab_width: usize,
    pub unit: String,
}

/// One `[[language]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguageConfig {
    pub name: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub file_types: Vec<FileType>,
    #[serde(default)]
    pub roots: Vec<String>,
    #[serde(default)]
    pub comment_token: Option<String>,
    #[serde(default)]
    pub auto_format: Option<bool>,
    #[serde(default)]
    pub formatter: Option<FormatterConfig>,
    #[serde(default)]
    pub indent: Option<IndentationConfiguration>,
    #[serde(default)]
    pub grammar: Option<String>,
    /// Parsed separately so each entry gets its own diagnostic.
    #[serde(skip)]
    pub language_servers: Vec<LanguageServerFeatures>,
}

/// Languages in definition order plus the servers defined alongside them.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    languages: Vec<LanguageConfig>,
    servers: BTreeMap<String, LanguageServerConfig>,
}

fn parse_features(
    value: &Value,
    location: &str,
    diags: &mut Diagnostics,
) -> Option<BTreeSet<LanguageServerFeature>> {
    let Some(items) = value.as_array() else {
        diags.error(
            "invalid-type",
            location,
            format!("expected an array of feature names, found {}", value.type_str()),
        );
        return None;
    };
    let mut features = BTreeSet::new();
    for (i, item) in items.iter().enumerate() {
        let item_location = format!("{}[{}]", location, i);
        match item.as_str().map(str::parse::<LanguageServerFeature>) {
            Some(Ok(feature)) => {
                features.insert(feature);
            }
            Some(Err(e)) => diags.error("unknown-feature", item_location, e),
            None => diags.error(
                "invalid-type",
                item_location,
                format!("expected a feature name, found {}", item.type_str()),
            ),
        }
    }
    Some(features)
}

fn parse_server_ref(
    value: &Value,
    location: &str,
    diags: &mut Diagnostics,
) -> Option<LanguageServerFeatures> {
    let table = match value {
        Value::String(name) => return Some(LanguageServerFeatures::new(name.clone())),
        Value::Table(table) => table,
        other => {
            diags.error(
                "invalid-type",
                location,
                format!("expected a server name or table, found {}", other.type_str()),
            );
            return None;
        }
    };

    let Some(name) = table.get("name").and_then(Value::as_str) else {
        diags.error("missing-field", location, "server reference needs a `name`");
        return None;
    };

    for key in table.keys() {
        if !matches!(key.as_str(), "name" | "only-features" | "except-features") {
            diags.warn(
                "unknown-option",
                child_location(location, key),
                format!("`{}` is not a field of a server reference", key),
            );
        }
    }

    let only = table
        .get("only-features")
        .and_then(|v| parse_features(v, &child_location(location, "only-features"), diags));
    let except = table
        .get("except-features")
        .and_then(|v| parse_features(v, &child_location(location, "except-features"), diags));

    let filter = match (only, except) {
        (Some(_), Some(_)) => {
            diags.error(
                "conflicting-features",
                location,
                format!(
                    "`{}` sets both `only-features` and `except-features`",
                    name
                ),
            );
            return None;
        }
        (Some(only), None) => FeatureFilter::Only(only),
        (None, Some(except)) => FeatureFilter::Except(except),
        (None, None) => FeatureFilter::All,
    };

    Some(LanguageServerFeatures {
        name: name.to_string(),
        filter,
    })
}

fn parse_language(
    value: &Value,
    location: &str,
    diags: &mut Diagnostics,
) -> Option<LanguageConfig> {
    let mut table = match value {
        Value::Table(table) => table.clone(),
        other => {
            diags.error(
                "invalid-type",
                location,
                format!("a language entry must be a table, found {}", other.type_str()),
            );
            return None;
        }
    };
    let servers = table.remove("language-servers");

    let mut language: LanguageConfig = match Value::Table(table).try_into() {
        Ok(language) => language,
        Err(e) => {
            diags.error("invalid-language", location, e.to_string().trim_end().to_string());
            return None;
        }
    };

    if let Some(formatter) = &language.formatter
        && formatter.command.trim().is_empty()
    {
        diags.error(
            "invalid-value",
            child_location(location, "formatter"),
            "formatter command is empty",
        );
    }

    let servers_location = child_location(location, "language-servers");
    match servers {
        None => {}
        Some(Value::Array(items)) => {
            let mut seen = BTreeSet::new();
            for (i, item) in items.iter().enumerate() {
                let item_location = format!("{}[{}]", servers_location, i);
                let Some(server) = parse_server_ref(item, &item_location, diags) else {
                    continue;
                };
                if !seen.insert(server.name.clone()) {
                    diags.warn(
                        "duplicate-language-server",
                        item_location,
                        format!("`{}` is listed more than once", server.name),
                    );
                    continue;
                }
                language.language_servers.push(server);
            }
        }
        Some(other) => diags.error(
            "invalid-type",
            servers_location,
            format!("expected an array, found {}", other.type_str()),
        ),
    }

    Some(language)
}

impl Registry {
    /// Read `[[language]]` and `[language-server.*]` from a document table.
    /// Each entry is checked on its own so one bad entry hides nothing else.
    pub fn from_table(root: &toml::Table, diags: &mut Diagnostics) -> Self {
        let mut registry = Registry::default();

        match root.get("language-server") {
            None => {}
            Some(Value::Table(servers)) => {
                for (name, value) in servers {
                    let location = child_location("language-server", name);
                    match value.clone().try_into::<LanguageServerConfig>() {
                        Ok(server) => {
                            if server.command.as_deref().is_some_and(|c| c.trim().is_empty()) {
                                diags.error(
                                    "invalid-value",
                                    child_location(&location, "command"),
                                    "server command is empty",
                                );
                            }
                            registry.servers.insert(name.clone(), server);
                        }
                        Err(e) => diags.error(
                            "invalid-language-server",
                            location,
                            e.to_string().trim_end().to_string(),
                        ),
                    }
                }
            }
            Some(other) => diags.error(
                "invalid-type",
                "language-server",
                format!("expected a table, found {}", other.type_str()),
            ),
        }

        match root.get("language") {
            None => {}
            Some(Value::Array(entries)) => {
                let mut seen: HashMap<String, usize> = HashMap::new();
                for (i, entry) in entries.iter().enumerate() {
                    let location = format!("language[{}]", i);
                    let Some(language) = parse_language(entry, &location, diags) else {
                        continue;
                    };
                    if let Some(first) = seen.get(&language.name) {
                        diags.error(
                            "duplicate-language",
                            location,
                            format!(
                                "language `{}` is already defined at language[{}]",
                                language.name, first
                            ),
                        );
                        continue;
                    }
                    seen.insert(language.name.clone(), i);
                    registry.languages.push(language);
                }
            }
            Some(other) => diags.error(
                "invalid-type",
                "language",
                format!("expected an array of tables, found {}", other.type_str()),
            ),
        }

        debug!(
            "registry: {} language(s), {} server(s)",
            registry.languages.len(),
            registry.servers.len()
        );
        registry
    }

    /// Every server reference must name a defined or built-in server.
    /// Servers defined but never referenced are noted.
    pub fn check_references(&self, extra_servers: &[String], diags: &mut Diagnostics) {
        let mut referenced = BTreeSet::new();
        for language in &self.languages {
            for (j, server) in language.language_servers.iter().enumerate() {
                referenced.insert(server.name.as_str());
                if self.servers.contains_key(&server.name)
                    || BUILTIN_SERVERS.contains(&server.name.as_str())
                    || extra_servers.contains(&server.name)
                {
                    continue;
                }
                diags.error(
                    "unknown-language-server",
                    format!("language[{:?}].language-servers[{}]", language.name, j),
                    format!(
                        "`{}` (used by `{}`) has no [language-server.{}] definition",
                        server.name, language.name, server.name
                    ),
                );
            }
        }

        for name in self.servers.keys() {
            if !referenced.contains(name.as_str()) {
                diags.info(
                    "unused-language-server",
                    child_location("language-server", name),
                    format!("`{}` is defined but no language uses it", name),
                );
            }
        }
    }

    /// A server table without `command` must adjust a built-in or extra
    /// server. Meant for the merged registry, where an earlier document's
    /// `command` has already been layered in.
    pub fn check_definitions(&self, extra_servers: &[String], diags: &mut Diagnostics) {
        for (name, server) in &self.servers {
            if server.command.is_some()
                || BUILTIN_SERVERS.contains(&name.as_str())
                || extra_servers.contains(name)
            {
                continue;
            }
            diags.error(
                "missing-field",
                child_location("language-server", name),
                format!("`{}` is not a built-in server and needs a `command`", name),
            );
        }
    }

    /// Look up formatter and server executables on `PATH`.
    pub fn check_commands(&self, diags: &mut Diagnostics) {
        for language in &self.languages {
            if let Some(formatter) = &language.formatter
                && !formatter.command.is_empty()
                && find_executable(&formatter.command).is_none()
            {
                diags.warn(
                    "command-not-found",
                    format!("language[{:?}].formatter.command", language.name),
                    format!(
                        "formatter `{}` for `{}` is not on PATH",
                        formatter.command, language.name
                    ),
                );
            }
        }
        for (name, server) in &self.servers {
            if let Some(command) = &server.command
                && !command.is_empty()
                && find_executable(command).is_none()
            {
                diags.warn(
                    "command-not-found",
                    child_location(&child_location("language-server", name), "command"),
                    format!("`{}` is not on PATH", command),
                );
            }
        }
    }

    pub fn get_language_by_name(&self, name: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|l| l.name == name)
    }

    pub fn get_server(&self, name: &str) -> Option<&LanguageServerConfig> {
        self.servers.get(name)
    }

    pub fn languages(&self) -> impl Iterator<Item = &LanguageConfig> {
        self.languages.iter()
    }
}
