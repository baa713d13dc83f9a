// src/settings/mod.rs - The `theme` and `editor` settings as dotted-path options

pub mod schema;

use crate::diagnostic::Diagnostics;
use crate::keymap::trie::child_location;
use schema::{OptionKind, OptionSpec, RENDER_CHOICES, ROOT, THEME_VARIANTS, WHITESPACE_RENDER};
use toml::Value;
use unicode_segmentation::UnicodeSegmentation;

/// Read-only view over the settings sections of a (merged) document.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    root: toml::Table,
}

impl Settings {
    /// Keep only the sections the option schema covers.
    pub fn from_table(table: &toml::Table) -> Self {
        let root = ROOT
            .iter()
            .filter_map(|spec| {
                table
                    .get(spec.name)
                    .map(|value| (spec.name.to_string(), value.clone()))
            })
            .collect();
        Self { root }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut value = self.root.get(parts.next()?)?;
        for part in parts {
            value = value.as_table()?.get(part)?;
        }
        Some(value)
    }

    pub fn theme(&self) -> Option<&Value> {
        self.root.get("theme")
    }

    /// Every non-table value with its dotted path, in document order.
    pub fn leaves(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        for (key, value) in &self.root {
            collect_leaves(key.clone(), value, &mut out);
        }
        out
    }
}

fn collect_leaves<'a>(path: String, value: &'a Value, out: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Table(table) => {
            for (key, child) in table {
                collect_leaves(format!("{}.{}", path, key), child, out);
            }
        }
        leaf => out.push((path, leaf)),
    }
}

/// Check `theme` and `editor` against the option schema.
pub fn check_settings(table: &toml::Table, diags: &mut Diagnostics) {
    for (key, value) in table {
        if let Some(spec) = schema::lookup(ROOT, key) {
            check_value(value, spec, key, diags);
        }
    }
}

fn check_group(
    table: &toml::Table,
    specs: &[OptionSpec],
    location: &str,
    diags: &mut Diagnostics,
) {
    for (key, value) in table {
        let child = child_location(location, key);
        match schema::lookup(specs, key) {
            Some(spec) => check_value(value, spec, &child, diags),
            None => diags.warn(
                "unknown-option",
                child,
                format!("`{}` is not an option of `{}`", key, location),
            ),
        }
    }
}

fn invalid_type(value: &Value, expected: &str, location: &str, diags: &mut Diagnostics) {
    diags.error(
        "invalid-type",
        location,
        format!("expected {}, found {}", expected, value.type_str()),
    );
}

fn check_value(value: &Value, spec: &OptionSpec, location: &str, diags: &mut Diagnostics) {
    check_kind(value, &spec.kind, location, diags);
}

fn check_kind(value: &Value, kind: &OptionKind, location: &str, diags: &mut Diagnostics) {
    match (kind, value) {
        (OptionKind::Any, _) => {}
        (OptionKind::Bool, Value::Boolean(_)) => {}
        (OptionKind::Bool, other) => invalid_type(other, "a boolean", location, diags),
        (OptionKind::Integer { min }, Value::Integer(n)) => {
            if n < min {
                diags.error(
                    "invalid-value",
                    location,
                    format!("{} is below the minimum of {}", n, min),
                );
            }
        }
        (OptionKind::Integer { .. }, other) => invalid_type(other, "an integer", location, diags),
        (OptionKind::String, Value::String(_)) => {}
        (OptionKind::String, other) => invalid_type(other, "a string", location, diags),
        (OptionKind::Char, Value::String(s)) => {
            if s.graphemes(true).count() != 1 {
                diags.error(
                    "invalid-value",
                    location,
                    format!("{:?} must be exactly one character", s),
                );
            }
        }
        (OptionKind::Char, other) => invalid_type(other, "a single character", location, diags),
        (OptionKind::Choice(choices), Value::String(s)) => {
            if !choices.contains(&s.as_str()) {
                diags.error(
                    "invalid-value",
                    location,
                    format!("`{}` is not one of: {}", s, choices.join(", ")),
                );
            }
        }
        (OptionKind::Choice(_), other) => invalid_type(other, "a string", location, diags),
        (OptionKind::List(item), Value::Array(items)) => {
            for (i, element) in items.iter().enumerate() {
                check_kind(element, item, &format!("{}[{}]", location, i), diags);
            }
        }
        (OptionKind::List(_), other) => invalid_type(other, "an array", location, diags),
        (OptionKind::Group(specs), Value::Table(table)) => {
            check_group(table, specs, location, diags)
        }
        (OptionKind::Group(_), other) => invalid_type(other, "a table", location, diags),
        (OptionKind::WhitespaceRender, Value::String(_)) => {
            check_kind(value, &OptionKind::Choice(RENDER_CHOICES), location, diags)
        }
        (OptionKind::WhitespaceRender, Value::Table(table)) => {
            check_group(table, WHITESPACE_RENDER, location, diags)
        }
        (OptionKind::WhitespaceRender, other) => {
            invalid_type(other, "a string or a table", location, diags)
        }
        (OptionKind::Theme, Value::String(_)) => {}
        (OptionKind::Theme, Value::Table(table)) => {
            check_group(table, THEME_VARIANTS, location, diags);
            for variant in ["light", "dark"] {
                if !table.contains_key(variant) {
                    diags.error(
                        "missing-field",
                        location,
                        format!("a theme table needs `light` and `dark`; `{}` is missing", variant),
                    );
                }
            }
        }
        (OptionKind::Theme, other) => invalid_type(other, "a string or a table", location, diags),
    }
}
