// src/validate.rs - Run every check over a document set

use crate::config::CheckerConfig;
use crate::diagnostic::{Diagnostics, Report};
use crate::discovery;
use crate::document::Document;
use crate::keymap::Keymaps;
use crate::language::Registry;
use crate::merge::merge_documents;
use crate::settings::{Settings, check_settings};
use crate::theme::{ThemeLoader, check_theme};
use log::{debug, info};
use std::path::PathBuf;

/// Origin label for findings that only exist once documents are layered.
pub const MERGED_ORIGIN: &str = "<merged>";

#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Look formatter and server executables up on `PATH`.
    pub check_commands: bool,
    pub extra_language_servers: Vec<String>,
    pub extra_themes: Vec<String>,
    pub theme_dirs: Vec<PathBuf>,
}

impl ValidateOptions {
    pub fn from_config(config: &CheckerConfig) -> Self {
        Self {
            check_commands: false,
            extra_language_servers: config.extra_language_servers.clone(),
            extra_themes: config.extra_themes.clone(),
            theme_dirs: config.theme_dirs.clone(),
        }
    }

    fn theme_loader(&self) -> ThemeLoader {
        let mut builtin = discovery::list_builtin_themes();
        builtin.extend(self.extra_themes.iter().cloned());
        let mut loader = ThemeLoader::new(builtin);
        for dir in &self.theme_dirs {
            loader.add_theme_directory(dir.clone());
        }
        loader.discover_themes();
        loader
    }
}

/// Check `docs` in load order and collect every finding.
pub fn validate(docs: &[Document], options: &ValidateOptions) -> Report {
    let loader = options.theme_loader();
    let mut diags = Diagnostics::default();

    for doc in docs {
        debug!("checking {}", doc.origin());
        diags.set_origin(doc.origin());
        doc.check_sections(&mut diags);
        check_settings(doc.root(), &mut diags);
        if let Some(theme) = Settings::from_table(doc.root()).theme() {
            check_theme(theme, &loader, &mut diags);
        }
        // Entry-level language findings belong to the document that has them.
        Registry::from_table(doc.root(), &mut diags);
    }

    Keymaps::from_documents(docs, &mut diags);

    // References may point at servers defined in another document.
    let merged = merge_documents(docs);
    let registry = Registry::from_table(&merged, &mut Diagnostics::default());
    diags.set_origin(MERGED_ORIGIN);
    registry.check_definitions(&options.extra_language_servers, &mut diags);
    registry.check_references(&options.extra_language_servers, &mut diags);
    if options.check_commands {
        registry.check_commands(&mut diags);
    }

    let report = diags.into_report();
    info!(
        "checked {} document(s): {} finding(s)",
        docs.len(),
        report.diagnostics.len()
    );
    report
}

/// The layered document set as one table. The `keys` section is rebuilt
/// from the layered keymaps so nested bindings merge the way the editor
/// resolves them. Bindings that fail to parse are left out; their
/// findings go to `diags`.
pub fn merged_table(docs: &[Document], diags: &mut Diagnostics) -> toml::Table {
    let mut merged = merge_documents(docs);
    if merged.contains_key("keys") {
        let keymaps = Keymaps::from_documents(docs, diags);
        merged.insert("keys".to_string(), keymaps.to_value());
    }
    merged
}

/// Keymaps for `docs` after layering, ignoring findings.
pub fn layered_keymaps(docs: &[Document]) -> Keymaps {
    Keymaps::from_documents(docs, &mut Diagnostics::default())
}

/// Theme names that would resolve under `options`.
pub fn available_themes(options: &ValidateOptions) -> Vec<String> {
    options.theme_loader().list_themes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;

    fn docs(items: &[(&str, &str)]) -> Vec<Document> {
        items
            .iter()
            .map(|(origin, text)| Document::from_str(origin, text).unwrap())
            .collect()
    }

    fn codes(report: &Report) -> Vec<&'static str> {
        report.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_clean_set_has_no_findings() {
        let docs = docs(&[
            (
                "config.toml",
                "theme = \"onedark\"\n[editor]\nmouse = false\n[keys.normal]\nret = [\"move_line_down\", \"goto_first_nonwhitespace\"]\n",
            ),
            (
                "languages.toml",
                "[[language]]\nname = \"rust\"\nlanguage-servers = [\"rust-analyzer\"]\n",
            ),
        ]);
        let report = validate(&docs, &ValidateOptions::default());
        assert!(report.diagnostics.is_empty(), "{:?}", codes(&report));
    }

    #[test]
    fn test_findings_carry_their_origin() {
        let docs = docs(&[
            ("config.toml", "theme = \"nope\"\n[editor]\nmouse = 1\n"),
            (
                "languages.toml",
                "[[language]]\nname = \"go\"\nlanguage-servers = [\"golsp\"]\n",
            ),
        ]);
        let report = validate(&docs, &ValidateOptions::default());

        let found: Vec<_> = report
            .diagnostics
            .iter()
            .map(|d| (d.origin.as_str(), d.code))
            .collect();
        assert_eq!(
            found,
            vec![
                (MERGED_ORIGIN, "unknown-language-server"),
                ("config.toml", "invalid-type"),
                ("config.toml", "unknown-theme"),
            ]
        );
        assert!(report.has_errors(false));
    }

    #[test]
    fn test_server_defined_in_other_document_resolves() {
        let docs = docs(&[
            ("base.toml", "[language-server.golsp]\ncommand = \"golsp\"\n"),
            (
                "user.toml",
                "[[language]]\nname = \"go\"\nlanguage-servers = [\"golsp\"]\n",
            ),
        ]);
        let report = validate(&docs, &ValidateOptions::default());
        assert!(report.diagnostics.is_empty(), "{:?}", codes(&report));
    }

    #[test]
    fn test_extra_names_from_options() {
        let docs = docs(&[(
            "config.toml",
            "theme = \"company\"\n[[language]]\nname = \"go\"\nlanguage-servers = [\"golsp\"]\n",
        )]);
        let options = ValidateOptions {
            extra_language_servers: vec!["golsp".to_string()],
            extra_themes: vec!["company".to_string()],
            ..Default::default()
        };
        let report = validate(&docs, &options);
        assert!(report.diagnostics.is_empty(), "{:?}", codes(&report));
    }

    #[test]
    fn test_override_is_a_note() {
        let docs = docs(&[
            ("a.toml", "[keys.normal]\nx = \"undo\"\n"),
            ("b.toml", "[keys.normal]\nx = \"redo\"\n"),
        ]);
        let report = validate(&docs, &ValidateOptions::default());
        assert_eq!(codes(&report), vec!["binding-override"]);
        assert_eq!(report.diagnostics[0].severity, Severity::Info);
        assert!(!report.has_errors(true));
    }

    #[test]
    fn test_merged_table_layers_nested_keys() {
        let docs = docs(&[
            ("a.toml", "[keys.normal.space]\nf = \"file_picker\"\n"),
            ("b.toml", "[keys.normal.space]\nb = \"buffer_picker\"\n"),
        ]);
        let mut diags = Diagnostics::default();
        let merged = merged_table(&docs, &mut diags);
        let space = merged["keys"]["normal"]["space"].as_table().unwrap();
        assert_eq!(space.len(), 2);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_merged_table_reports_dropped_bindings() {
        let docs = docs(&[
            ("a.toml", "[keys.normal]\nx = \"undo\"\n\"Q-x\" = \"redo\"\n"),
            ("b.toml", "[keys.normal]\ny = \"\"\nz = \":set-option rulers  80\"\n"),
        ]);
        let mut diags = Diagnostics::default();
        let merged = merged_table(&docs, &mut diags);

        let normal = merged["keys"]["normal"].as_table().unwrap();
        let keys: Vec<_> = normal.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x", "z"]);
        assert_eq!(normal["z"].as_str(), Some(":set-option rulers  80"));

        let dropped: Vec<_> = diags
            .iter()
            .map(|d| (d.origin.as_str(), d.code, d.location.as_str()))
            .collect();
        assert_eq!(
            dropped,
            vec![
                ("a.toml", "invalid-key", "keys.normal.Q-x"),
                ("b.toml", "invalid-command", "keys.normal.y"),
            ]
        );
    }

    #[test]
    fn test_config_only_server_override() {
        let layered = docs(&[
            (
                "base.toml",
                "[language-server.golsp]\ncommand = \"golsp\"\n\n[[language]]\nname = \"go\"\nlanguage-servers = [\"golsp\"]\n",
            ),
            ("user.toml", "[language-server.golsp.config]\nbuildFlags = [\"-tags=dev\"]\n"),
        ]);
        let report = validate(&layered, &ValidateOptions::default());
        assert!(report.diagnostics.is_empty(), "{:?}", codes(&report));

        let orphan = docs(&[(
            "user.toml",
            "[language-server.golsp.config]\nx = 1\n\n[[language]]\nname = \"go\"\nlanguage-servers = [\"golsp\"]\n",
        )]);
        let report = validate(&orphan, &ValidateOptions::default());
        let found: Vec<_> = report
            .diagnostics
            .iter()
            .map(|d| (d.origin.as_str(), d.code, d.location.as_str()))
            .collect();
        assert_eq!(found, vec![(MERGED_ORIGIN, "missing-field", "language-server.golsp")]);
    }
}
