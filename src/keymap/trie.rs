// src/keymap/trie.rs - Binding tables as a trie of chords

use super::command::MappableCommand;
use super::key::KeyChord;
use crate::diagnostic::Diagnostics;
use std::fmt;
use toml::Value;

/// What a chord is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyTrie {
    Command(MappableCommand),
    /// Several commands run in order from a single chord.
    Sequence(Vec<MappableCommand>),
    /// A prefix (leader) key opening further bindings.
    Node(KeyTrieNode),
}

/// Child bindings in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTrieNode {
    children: Vec<(KeyChord, KeyTrie)>,
}

/// One flattened binding: the full chord path and the leaf it reaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<'a> {
    pub keys: Vec<KeyChord>,
    pub target: &'a KeyTrie,
}

impl fmt::Display for Binding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.keys.iter().map(ToString::to_string).collect();
        write!(f, "{} => {}", keys.join(" "), self.target)
    }
}

pub(crate) fn child_location(parent: &str, key: &str) -> String {
    let needs_quotes = key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    match (parent.is_empty(), needs_quotes) {
        (true, false) => key.to_string(),
        (true, true) => format!("{:?}", key),
        (false, false) => format!("{}.{}", parent, key),
        (false, true) => format!("{}.{:?}", parent, key),
    }
}

fn parse_command(text: &str, location: &str, diags: &mut Diagnostics) -> Option<MappableCommand> {
    match MappableCommand::parse(text) {
        Ok(command) => {
            if !command.is_known() {
                diags.warn(
                    "unknown-command",
                    location,
                    format!("`{}` is not a known editor command", command),
                );
            }
            Some(command)
        }
        Err(e) => {
            diags.error("invalid-command", location, format!("`{}`: {}", text, e));
            None
        }
    }
}

impl KeyTrie {
    /// Build a trie from a binding value, reporting problems as diagnostics.
    /// Returns `None` when the value cannot be bound at all.
    pub fn from_value(value: &Value, location: &str, diags: &mut Diagnostics) -> Option<Self> {
        match value {
            Value::String(text) => parse_command(text, location, diags).map(KeyTrie::Command),
            Value::Array(items) => {
                if items.is_empty() {
                    diags.error("empty-sequence", location, "command sequence is empty");
                    return None;
                }
                let mut commands = Vec::with_capacity(items.len());
                let mut valid = true;
                for (i, item) in items.iter().enumerate() {
                    let item_location = format!("{}[{}]", location, i);
                    match item {
                        Value::String(text) => {
                            match parse_command(text, &item_location, diags) {
                                Some(command) => commands.push(command),
                                None => valid = false,
                            }
                        }
                        other => {
                            diags.error(
                                "invalid-sequence",
                                item_location,
                                format!(
                                    "sequence entries must be command names, found {}",
                                    other.type_str()
                                ),
                            );
                            valid = false;
                        }
                    }
                }
                valid.then_some(KeyTrie::Sequence(commands))
            }
            Value::Table(table) => Some(KeyTrie::Node(KeyTrieNode::from_table(
                table, location, diags,
            ))),
            other => {
                diags.error(
                    "invalid-binding",
                    location,
                    format!(
                        "a binding must be a command, a list of commands or a table, found {}",
                        other.type_str()
                    ),
                );
                None
            }
        }
    }

    pub fn node(&self) -> Option<&KeyTrieNode> {
        match self {
            KeyTrie::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Follow `keys` from this trie.
    pub fn search(&self, keys: &[KeyChord]) -> Option<&KeyTrie> {
        let mut trie = self;
        for key in keys {
            trie = trie.node()?.get(key)?;
        }
        Some(trie)
    }

    /// Short label for listings: the command's kind, `sequence` or `group`.
    pub fn kind(&self) -> &'static str {
        match self {
            KeyTrie::Command(command) => command.kind(),
            KeyTrie::Sequence(_) => "sequence",
            KeyTrie::Node(_) => "group",
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            KeyTrie::Command(command) => Value::String(command.to_string()),
            KeyTrie::Sequence(commands) => Value::Array(
                commands
                    .iter()
                    .map(|c| Value::String(c.to_string()))
                    .collect(),
            ),
            KeyTrie::Node(node) => Value::Table(node.to_table()),
        }
    }
}

impl fmt::Display for KeyTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyTrie::Command(command) => write!(f, "{}", command),
            KeyTrie::Sequence(commands) => {
                let names: Vec<String> = commands.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", names.join(", "))
            }
            KeyTrie::Node(node) => write!(f, "{{{} binding(s)}}", node.len()),
        }
    }
}

impl KeyTrieNode {
    pub fn from_table(table: &toml::Table, location: &str, diags: &mut Diagnostics) -> Self {
        let mut node = KeyTrieNode::default();
        // Spelling of each chord as first written, for duplicate messages.
        let mut spellings: Vec<(KeyChord, &str)> = Vec::with_capacity(table.len());

        for (key, value) in table {
            let key_location = child_location(location, key);
            let chord: KeyChord = match key.parse() {
                Ok(chord) => chord,
                Err(e) => {
                    diags.error("invalid-key", key_location, format!("`{}`: {}", key, e));
                    continue;
                }
            };
            let Some(trie) = KeyTrie::from_value(value, &key_location, diags) else {
                continue;
            };

            if let Some((_, first)) = spellings.iter().find(|(c, _)| *c == chord) {
                diags.error(
                    "duplicate-binding",
                    key_location,
                    format!(
                        "`{}` and `{}` are the same chord `{}`; the later binding wins",
                        first, key, chord
                    ),
                );
            } else {
                spellings.push((chord, key.as_str()));
            }
            node.insert(chord, trie);
        }
        node
    }

    pub fn get(&self, key: &KeyChord) -> Option<&KeyTrie> {
        self.children
            .iter()
            .find(|(chord, _)| chord == key)
            .map(|(_, trie)| trie)
    }

    /// Bind `key`, returning what it was bound to before.
    pub fn insert(&mut self, key: KeyChord, trie: KeyTrie) -> Option<KeyTrie> {
        match self.children.iter_mut().find(|(chord, _)| *chord == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, trie)),
            None => {
                self.children.push((key, trie));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyChord, &KeyTrie)> {
        self.children.iter().map(|(chord, trie)| (chord, trie))
    }

    /// Layer `other` over this node. Nested nodes merge; any other collision
    /// is won by `other` and reported as an override.
    pub fn merge(&mut self, other: KeyTrieNode, location: &str, diags: &mut Diagnostics) {
        for (chord, incoming) in other.children {
            let chord_location = child_location(location, &chord.to_string());
            let Some(index) = self.children.iter().position(|(c, _)| *c == chord) else {
                self.children.push((chord, incoming));
                continue;
            };
            match (&mut self.children[index].1, incoming) {
                (KeyTrie::Node(current), KeyTrie::Node(incoming)) => {
                    current.merge(incoming, &chord_location, diags);
                }
                (current, incoming) => {
                    diags.info(
                        "binding-override",
                        chord_location,
                        format!("`{}` was bound to {}, now {}", chord, current, incoming),
                    );
                    *current = incoming;
                }
            }
        }
    }

    /// Every leaf binding reachable from this node, depth first.
    pub fn flatten(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Vec<KeyChord>, out: &mut Vec<Binding<'a>>) {
        for (chord, trie) in &self.children {
            prefix.push(*chord);
            match trie {
                KeyTrie::Node(node) => node.collect_leaves(prefix, out),
                leaf => out.push(Binding {
                    keys: prefix.clone(),
                    target: leaf,
                }),
            }
            prefix.pop();
        }
    }

    pub fn to_table(&self) -> toml::Table {
        self.children
            .iter()
            .map(|(chord, trie)| (chord.to_string(), trie.to_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;

    fn node(text: &str, diags: &mut Diagnostics) -> KeyTrieNode {
        let table: toml::Table = toml::from_str(text).unwrap();
        KeyTrieNode::from_table(&table, "keys.normal", diags)
    }

    fn chord(s: &str) -> KeyChord {
        s.parse().unwrap()
    }

    #[test]
    fn test_sequence_is_one_binding() {
        let mut diags = Diagnostics::new("config.toml");
        let node = node(
            r#"ret = ["move_line_down", "goto_first_nonwhitespace"]"#,
            &mut diags,
        );

        assert!(diags.is_empty());
        let bindings = node.flatten();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].keys, vec![chord("ret")]);
        assert_eq!(bindings[0].target.kind(), "sequence");
        match bindings[0].target {
            KeyTrie::Sequence(commands) => {
                assert_eq!(commands.len(), 2);
                assert_eq!(commands[0].to_string(), "move_line_down");
                assert_eq!(commands[1].to_string(), "goto_first_nonwhitespace");
            }
            other => panic!("expected a sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_leader_tree_flattens_with_prefix() {
        let mut diags = Diagnostics::new("config.toml");
        let node = node(
            r#"
[space]
f = "file_picker"
[space.g]
s = ":sh git status"
"#,
            &mut diags,
        );
        assert!(diags.is_empty());

        let rows: Vec<String> = node.flatten().iter().map(ToString::to_string).collect();
        assert_eq!(
            rows,
            vec![
                "space f => file_picker".to_string(),
                "space g s => :sh git status".to_string(),
            ]
        );
        let kinds: Vec<_> = node.flatten().iter().map(|b| b.target.kind()).collect();
        assert_eq!(kinds, vec!["static", "shell"]);
        assert_eq!(node.get(&chord("space")).unwrap().kind(), "group");
    }

    #[test]
    fn test_equivalent_spellings_are_duplicates() {
        let mut diags = Diagnostics::new("config.toml");
        let node = node(
            r#"
"C-A-x" = "undo"
"A-C-x" = "redo"
"#,
            &mut diags,
        );

        let dupes: Vec<_> = diags.iter().filter(|d| d.code == "duplicate-binding").collect();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].severity, Severity::Error);
        assert_eq!(node.len(), 1);
        assert_eq!(node.get(&chord("C-A-x")).unwrap().to_string(), "redo");
    }

    #[test]
    fn test_bad_values_reported() {
        let mut diags = Diagnostics::new("config.toml");
        let node = node(
            r#"
a = []
b = [["nested"]]
c = 3
"X-d" = "undo"
e = "move line"
"#,
            &mut diags,
        );

        let codes: Vec<_> = diags.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![
                "empty-sequence",
                "invalid-sequence",
                "invalid-binding",
                "invalid-key",
                "invalid-command"
            ]
        );
        assert!(node.is_empty());
    }

    #[test]
    fn test_merge_is_last_defined_wins() {
        let mut diags = Diagnostics::new("base.toml");
        let mut base = node("w = \"move_next_word_start\"\n[g]\nd = \"goto_definition\"\n", &mut diags);
        let overlay = node("w = \":write\"\n[g]\nr = \"goto_reference\"\n", &mut diags);

        base.merge(overlay, "keys.normal", &mut diags);

        assert_eq!(base.get(&chord("w")).unwrap().to_string(), ":write");
        let g = base.get(&chord("g")).unwrap();
        assert!(g.search(&[chord("d")]).is_some());
        assert!(g.search(&[chord("r")]).is_some());

        let overrides: Vec<_> = diags.iter().filter(|d| d.code == "binding-override").collect();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].location, "keys.normal.w");
    }

    #[test]
    fn test_to_value_round_trip() {
        let mut diags = Diagnostics::new("config.toml");
        let original = node(
            r#"
"C-s" = ":write"
ret = ["move_line_down", "goto_first_nonwhitespace"]
[space]
f = "file_picker"
"#,
            &mut diags,
        );
        let table = original.to_table();
        let reparsed = KeyTrieNode::from_table(&table, "keys.normal", &mut diags);

        assert!(diags.is_empty());
        assert_eq!(original, reparsed);
        let keys: Vec<_> = table.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["C-s", "ret", "space"]);
    }

    #[test]
    fn test_child_location_quotes_odd_keys() {
        assert_eq!(child_location("keys.normal", "C-s"), "keys.normal.C-s");
        assert_eq!(child_location("keys.normal", "."), "keys.normal.\".\"");
        assert_eq!(child_location("", "theme"), "theme");
    }
}
