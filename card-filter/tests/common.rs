#![allow(dead_code)]
//! Shared catalog fixture for `card-filter` integration tests.

use card_filter::*;
use std::{fs, path::PathBuf};
use tempdir::TempDir;

pub const CATALOG: &str = r#"{
    "vocabulary": {
        "Discipline": [
            {"name": "Dominate", "aliases": ["dom"]},
            {"name": "Obfuscate", "aliases": ["obf"]},
            {"name": "Presence", "aliases": ["pre"]}
        ],
        "Expansion": [
            {"name": "Ancient Hearts", "aliases": ["AH"]},
            {"name": "Jyhad", "aliases": ["Jyh"]}
        ],
        "Clan": [
            {"name": "Toreador"},
            {"name": "Toreador antitribu"},
            {"name": "Brujah"},
            {"name": "Ventrue"}
        ]
    },
    "cards": [
        {
            "name": "Anson",
            "card_types": ["Vampire"],
            "clans": ["Toreador"],
            "disciplines": ["dom", "pre"],
            "sects": ["Camarilla"],
            "group": 1,
            "capacity": 8,
            "text": "Independent. Anson can untap once each turn.",
            "printings": [{"expansion": "Jyhad", "rarity": "Vampire"}]
        },
        {
            "name": "Aire of Elation",
            "card_types": ["Action Modifier"],
            "disciplines": ["Presence"],
            "cost": 1,
            "text": "Only usable during a political action. +1 bleed.",
            "printings": [{"expansion": "AH", "rarity": "Common"}]
        },
        {
            "name": "Akram",
            "card_types": ["Vampire"],
            "clans": ["Brujah"],
            "disciplines": ["obf"],
            "sects": ["Sabbat"],
            "group": 2,
            "capacity": 7,
            "printings": [{"expansion": "Jyhad", "rarity": "Vampire"}]
        }
    ],
    "physical_cards": [
        {"card": "Anson", "expansion": "Jyhad"},
        {"card": "Aire of Elation", "expansion": "AH"},
        {"card": "Aire of Elation"},
        {"card": "Akram", "expansion": "Jyhad"}
    ],
    "card_sets": [
        {"name": "Toreador Deck", "author": "Camille", "description": "Presence bleed", "cards": [0, 1, 2]},
        {"name": "Sideboard", "author": "Camille", "parent": "Toreador Deck", "cards": [3]},
        {"name": "Unused", "author": "Someone Else"}
    ]
}"#;

pub fn catalog() -> Catalog {
    Catalog::from_json_str(CATALOG).unwrap()
}

pub fn engine() -> FilterEngine {
    FilterEngine::new(catalog())
}

/// Names matched by `filter` over its default universe, in catalog order.
pub fn names(engine: &mut FilterEngine, filter: &str) -> Vec<String> {
    let matches = engine.run(filter, None).unwrap();
    matches
        .names(engine.catalog())
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn names_in(engine: &mut FilterEngine, filter: &str, source: Source) -> Vec<String> {
    let matches = engine.run(filter, Some(source)).unwrap();
    matches
        .names(engine.catalog())
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn write_catalog(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("catalog.json");
    fs::write(&path, contents).unwrap();
    path
}
