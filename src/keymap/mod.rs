// src/keymap/mod.rs - Per-mode binding tables from `[keys.<mode>]`

pub mod command;
pub mod key;
pub mod trie;

pub use command::MappableCommand;
pub use key::{KeyChord, KeyParseError};
pub use trie::{Binding, KeyTrie, KeyTrieNode};

use crate::diagnostic::Diagnostics;
use crate::document::Document;
use crate::mode::Mode;
use log::debug;
use std::collections::BTreeMap;
use toml::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymaps {
    modes: BTreeMap<Mode, KeyTrieNode>,
}

impl Keymaps {
    /// Read the `keys` section of a single document.
    pub fn from_document(doc: &Document, diags: &mut Diagnostics) -> Self {
        let mut keymaps = Keymaps::default();
        let Some(keys) = doc.get("keys") else {
            return keymaps;
        };
        let Value::Table(keys) = keys else {
            diags.error(
                "invalid-type",
                "keys",
                format!("`keys` must be a table, found {}", keys.type_str()),
            );
            return keymaps;
        };

        for (mode_name, table) in keys {
            let location = format!("keys.{}", mode_name);
            let mode: Mode = match mode_name.parse() {
                Ok(mode) => mode,
                Err(e) => {
                    diags.error("unknown-mode", location, e);
                    continue;
                }
            };
            let Value::Table(table) = table else {
                diags.error(
                    "invalid-type",
                    location,
                    format!("a mode's bindings must be a table, found {}", table.type_str()),
                );
                continue;
            };
            let node = KeyTrieNode::from_table(table, &location, diags);
            debug!("{}: {} {} binding(s)", doc.origin(), node.len(), mode);
            keymaps.modes.insert(mode, node);
        }
        keymaps
    }

    /// Read every document's keymaps and layer them in order.
    pub fn from_documents<'a, I>(docs: I, diags: &mut Diagnostics) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut keymaps = Keymaps::default();
        for doc in docs {
            diags.set_origin(doc.origin());
            let layer = Keymaps::from_document(doc, diags);
            keymaps.layer(layer, diags);
        }
        keymaps
    }

    /// Layer `other` on top; later bindings win.
    pub fn layer(&mut self, other: Keymaps, diags: &mut Diagnostics) {
        for (mode, node) in other.modes {
            match self.modes.get_mut(&mode) {
                Some(existing) => existing.merge(node, &format!("keys.{}", mode), diags),
                None => {
                    self.modes.insert(mode, node);
                }
            }
        }
    }

    pub fn get(&self, mode: Mode) -> Option<&KeyTrieNode> {
        self.modes.get(&mode)
    }

    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        self.modes.keys().copied()
    }

    /// Flattened leaf bindings for `mode`, in definition order.
    pub fn bindings(&self, mode: Mode) -> Vec<Binding<'_>> {
        self.modes
            .get(&mode)
            .map(KeyTrieNode::flatten)
            .unwrap_or_default()
    }

    /// The `keys` section this keymap serialises back to.
    pub fn to_value(&self) -> Value {
        Value::Table(
            self.modes
                .iter()
                .map(|(mode, node)| (mode.to_string(), Value::Table(node.to_table())))
                .collect(),
        )
    }
}
