// Property-based tests using proptest
// Random chords, documents and layers that unit tests do not enumerate

mod common;

use confcheck::diagnostic::Diagnostics;
use confcheck::keymap::{KeyChord, KeyTrieNode};
use confcheck::merge::merge_values;
use crossterm::event::{KeyCode, KeyModifiers};
use proptest::prelude::*;
use toml::Value;

fn modifiers() -> impl Strategy<Value = KeyModifiers> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(ctrl, alt, shift, meta)| {
            let mut modifiers = KeyModifiers::NONE;
            if ctrl {
                modifiers |= KeyModifiers::CONTROL;
            }
            if alt {
                modifiers |= KeyModifiers::ALT;
            }
            if shift {
                modifiers |= KeyModifiers::SHIFT;
            }
            if meta {
                modifiers |= KeyModifiers::META;
            }
            modifiers
        },
    )
}

fn key_code() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        prop::char::range('a', 'z').prop_map(KeyCode::Char),
        prop::char::range('A', 'Z').prop_map(KeyCode::Char),
        prop::char::range('0', '9').prop_map(KeyCode::Char),
        prop::sample::select(vec!['-', ' ', '<', '>', ',', '!']).prop_map(KeyCode::Char),
        (1u8..=24).prop_map(KeyCode::F),
        Just(KeyCode::Enter),
        Just(KeyCode::Esc),
        Just(KeyCode::Tab),
    ]
}

// Property: the canonical spelling of a chord parses back to the same chord
proptest! {
    #[test]
    fn chord_display_reparses(code in key_code(), modifiers in modifiers()) {
        let chord = KeyChord::new(code, modifiers);
        let spelled = chord.to_string();
        let reparsed: KeyChord = spelled.parse().unwrap();
        prop_assert_eq!(reparsed, chord, "spelled as {}", spelled);
    }
}

// Property: `S-x` and `X` are the same chord, with or without other modifiers
proptest! {
    #[test]
    fn shift_letter_is_uppercase(c in prop::char::range('a', 'z'), ctrl in any::<bool>()) {
        let prefix = if ctrl { "C-" } else { "" };
        let shifted: KeyChord = format!("{}S-{}", prefix, c).parse().unwrap();
        let upper: KeyChord = format!("{}{}", prefix, c.to_ascii_uppercase()).parse().unwrap();
        prop_assert_eq!(shifted, upper);
        prop_assert!(!shifted.modifiers.contains(KeyModifiers::SHIFT));
    }
}

// Property: modifier order never changes the chord
proptest! {
    #[test]
    fn modifier_order_is_ignored(
        c in prop::char::range('a', 'z'),
        order in Just(vec!["C", "A", "Meta"]).prop_shuffle()
    ) {
        let shuffled: KeyChord = format!("{}-{}", order.join("-"), c).parse().unwrap();
        let canonical: KeyChord = format!("C-A-Meta-{}", c).parse().unwrap();
        prop_assert_eq!(shuffled, canonical);
    }
}

// Property: two spellings of one chord in the same table are one duplicate
proptest! {
    #[test]
    fn equivalent_spellings_are_duplicates(c in prop::char::range('a', 'z')) {
        let table: toml::Table = toml::from_str(&format!(
            "\"C-S-{c}\" = \"undo\"\n\"C-{upper}\" = \"redo\"\n",
            c = c,
            upper = c.to_ascii_uppercase()
        ))
        .unwrap();

        let mut diags = Diagnostics::new("config.toml");
        let node = KeyTrieNode::from_table(&table, "keys.normal", &mut diags);

        prop_assert_eq!(node.len(), 1);
        let duplicates = diags.iter().filter(|d| d.code == "duplicate-binding").count();
        prop_assert_eq!(duplicates, 1);
    }
}

// Property: distinct chords never collide
proptest! {
    #[test]
    fn distinct_letters_never_collide(
        letters in prop::collection::btree_set(prop::char::range('a', 'z'), 1..10)
    ) {
        let text: String = letters
            .iter()
            .map(|c| format!("\"A-{}\" = \"undo\"\n", c))
            .collect();
        let table: toml::Table = toml::from_str(&text).unwrap();

        let mut diags = Diagnostics::new("config.toml");
        let node = KeyTrieNode::from_table(&table, "keys.normal", &mut diags);

        prop_assert!(diags.is_empty());
        prop_assert_eq!(node.len(), letters.len());
    }
}

fn settings_table() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::Boolean),
        (0i64..1000).prop_map(Value::Integer),
        "[a-z]{1,8}".prop_map(Value::String),
    ];
    prop::collection::btree_map("[a-z]{1,6}", leaf, 0..6).prop_flat_map(|editor| {
        prop::collection::btree_map("[a-z]{1,6}", (0i64..10).prop_map(Value::Integer), 0..4)
            .prop_map(move |keys| {
                let mut root = toml::Table::new();
                root.insert(
                    "editor".to_string(),
                    Value::Table(editor.clone().into_iter().collect()),
                );
                root.insert("keys".to_string(), Value::Table(keys.into_iter().collect()));
                Value::Table(root)
            })
    })
}

// Property: layering a document over itself changes nothing
proptest! {
    #[test]
    fn merge_is_idempotent(doc in settings_table()) {
        let merged = merge_values(doc.clone(), doc.clone(), 3);
        prop_assert_eq!(merged, doc);
    }
}

// Property: every scalar in the overlay wins
proptest! {
    #[test]
    fn overlay_scalars_win(base in settings_table(), overlay in settings_table()) {
        let merged = merge_values(base.clone(), overlay.clone(), 3);
        for (section, table) in overlay.as_table().unwrap() {
            for (key, value) in table.as_table().unwrap() {
                prop_assert_eq!(&merged[section.as_str()][key.as_str()], value);
            }
        }
        for (section, table) in base.as_table().unwrap() {
            for key in table.as_table().unwrap().keys() {
                prop_assert!(merged[section.as_str()].get(key).is_some());
            }
        }
    }
}
