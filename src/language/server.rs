// src/language/server.rs - `[language-server.<name>]` definitions and per-language server references

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use toml::Value;

/// Server names the editor ships definitions for.
pub const BUILTIN_SERVERS: &[&str] = &[
    "bash-language-server",
    "clangd",
    "cmake-language-server",
    "css-languageserver",
    "vscode-css-language-server",
    "vscode-html-language-server",
    "vscode-json-language-server",
    "deno-lsp",
    "dockerfile-language-server",
    "docker-compose-langserver",
    "elixir-ls",
    "elm-language-server",
    "gopls",
    "golangci-lint-lsp",
    "haskell-language-server",
    "jdtls",
    "julia",
    "kotlin-language-server",
    "lua-language-server",
    "marksman",
    "markdown-oxide",
    "nil",
    "nixd",
    "ocamllsp",
    "omnisharp",
    "intelephense",
    "pylsp",
    "pyright",
    "basedpyright",
    "ruff",
    "jedi",
    "solargraph",
    "ruby-lsp",
    "rust-analyzer",
    "metals",
    "sourcekit-lsp",
    "svelteserver",
    "taplo",
    "terraform-ls",
    "texlab",
    "typescript-language-server",
    "vuels",
    "yaml-language-server",
    "zls",
];

/// Editor features a server can be included in or excluded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageServerFeature {
    Format,
    GotoDeclaration,
    GotoDefinition,
    GotoTypeDefinition,
    GotoReference,
    GotoImplementation,
    SignatureHelp,
    Hover,
    DocumentHighlight,
    Completion,
    CodeAction,
    WorkspaceCommand,
    DocumentSymbols,
    WorkspaceSymbols,
    Diagnostics,
    RenameSymbol,
    InlayHints,
    DocumentColors,
}

const FEATURE_NAMES: &[(&str, LanguageServerFeature)] = &[
    ("format", LanguageServerFeature::Format),
    ("goto-declaration", LanguageServerFeature::GotoDeclaration),
    ("goto-definition", LanguageServerFeature::GotoDefinition),
    ("goto-type-definition", LanguageServerFeature::GotoTypeDefinition),
    ("goto-reference", LanguageServerFeature::GotoReference),
    ("goto-implementation", LanguageServerFeature::GotoImplementation),
    ("signature-help", LanguageServerFeature::SignatureHelp),
    ("hover", LanguageServerFeature::Hover),
    ("document-highlight", LanguageServerFeature::DocumentHighlight),
    ("completion", LanguageServerFeature::Completion),
    ("code-action", LanguageServerFeature::CodeAction),
    ("workspace-command", LanguageServerFeature::WorkspaceCommand),
    ("document-symbols", LanguageServerFeature::DocumentSymbols),
    ("workspace-symbols", LanguageServerFeature::WorkspaceSymbols),
    ("diagnostics", LanguageServerFeature::Diagnostics),
    ("rename-symbol", LanguageServerFeature::RenameSymbol),
    ("inlay-hints", LanguageServerFeature::InlayHints),
    ("document-colors", LanguageServerFeature::DocumentColors),
];

impl FromStr for LanguageServerFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FEATURE_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, feature)| *feature)
            .ok_or_else(|| format!("unknown language server feature `{}`", s))
    }
}

impl fmt::Display for LanguageServerFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = FEATURE_NAMES
            .iter()
            .find(|(_, feature)| feature == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown");
        f.write_str(name)
    }
}

/// How a language restricts one of its servers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeatureFilter {
    #[default]
    All,
    Only(BTreeSet<LanguageServerFeature>),
    Except(BTreeSet<LanguageServerFeature>),
}

/// An entry of a language's `language-servers` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageServerFeatures {
    pub name: String,
    pub filter: FeatureFilter,
}

impl LanguageServerFeatures {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter: FeatureFilter::All,
        }
    }
}

/// A `[language-server.<name>]` table. `command` may be left out when the
/// table only adjusts a server defined elsewhere.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguageServerConfig {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub required_root_patterns: Vec<String>,
    #[serde(default)]
    pub config: Option<Value>,
}

impl LanguageServerConfig {
    /// The `config` payload as the JSON the server would be sent.
    pub fn config_json(&self) -> Option<serde_json::Value> {
        self.config.as_ref().map(toml_to_json)
    }
}

/// Convert a TOML value to JSON. Datetimes become strings and non-finite
/// floats become `null`.
pub fn toml_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(n) => serde_json::Value::from(*n),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(toml_to_json).collect()),
        Value::Table(table) => serde_json::Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names() {
        assert_eq!(
            "format".parse::<LanguageServerFeature>(),
            Ok(LanguageServerFeature::Format)
        );
        assert_eq!(LanguageServerFeature::InlayHints.to_string(), "inlay-hints");
        assert!("formatting".parse::<LanguageServerFeature>().is_err());
    }

    #[test]
    fn test_server_config_deserialize() {
        let value: Value = toml::from_str(
            r#"
command = "rust-analyzer"
[config]
checkOnSave = { command = "clippy" }
cargo.features = "all"
"#,
        )
        .unwrap();
        let config: LanguageServerConfig = value.try_into().unwrap();

        assert_eq!(config.command.as_deref(), Some("rust-analyzer"));
        assert!(config.args.is_empty());
        let json = config.config_json().unwrap();
        assert_eq!(json["checkOnSave"]["command"], "clippy");
        assert_eq!(json["cargo"]["features"], "all");
    }

    #[test]
    fn test_config_only_table() {
        let value: Value = toml::from_str("[config]\ncheck.command = \"clippy\"\n").unwrap();
        let config: LanguageServerConfig = value.try_into().unwrap();

        assert!(config.command.is_none());
        assert_eq!(config.config_json().unwrap()["check"]["command"], "clippy");
    }

    #[test]
    fn test_datetime_payload_becomes_string() {
        let value: Value = toml::from_str("when = 1979-05-27T07:32:00Z").unwrap();
        let json = toml_to_json(&value);
        assert_eq!(json["when"], "1979-05-27T07:32:00Z");
    }
}
