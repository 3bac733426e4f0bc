mod common;
use card_filter::*;
use common::*;
use std::collections::BTreeMap;

fn clan(values: &[&str]) -> Predicate {
    Predicate::Attribute {
        attribute: Attribute::Clan,
        values: values.iter().map(|v| v.to_string()).collect(),
    }
}

fn card_type(value: &str) -> Predicate {
    Predicate::Attribute {
        attribute: Attribute::CardType,
        values: [value.to_string()].into_iter().collect(),
    }
}

fn agree(catalog: &Catalog, parsed: &Predicate, by_hand: &Predicate) {
    for (id, card) in catalog.cards() {
        assert_eq!(
            parsed.matches(catalog, id),
            by_hand.matches(catalog, id),
            "disagree on {}",
            card.name
        );
    }
    for (id, _) in catalog.physical_cards() {
        assert_eq!(parsed.matches(catalog, id), by_hand.matches(catalog, id));
    }
}

#[test]
fn parsed_predicates_agree_with_hand_built_ones() {
    let mut engine = engine();
    let cases = [
        (
            "CardType = \"Vampire\" AND Clan = \"Toreador\"",
            card_type("Vampire").and(clan(&["Toreador"])).unwrap(),
        ),
        (
            "Clan = \"Brujah\", \"Toreador\" OR CardType = \"Action Modifier\"",
            clan(&["Brujah", "Toreador"])
                .or(card_type("Action Modifier"))
                .unwrap(),
        ),
        ("NOT (Clan = \"Toreador\")", clan(&["Toreador"]).not()),
        (
            "CardType = \"Vampire\" AND Clan = \"Brujah\" OR Clan = \"Toreador\"",
            card_type("Vampire")
                .and(clan(&["Brujah"]))
                .unwrap()
                .or(clan(&["Toreador"]))
                .unwrap(),
        ),
    ];
    for (text, by_hand) in cases {
        let parsed = engine.compile(text, BuildOptions::strict()).unwrap();
        agree(engine.catalog(), &parsed.predicate, &by_hand);
    }
}

#[test]
fn printed_filter_builds_an_equivalent_predicate() {
    let mut engine = engine();
    for text in [
        "Clan in \"brujah\" || Discipline = \"dom\" && Group = 1",
        "NOT (Clan = \"Toreador\" OR Clan = \"Brujah\") AND CardText = \"bleed\"",
        "CardSet = \"Sideboard\" OR PhysicalExpansion = \"AH\"",
    ] {
        let node = engine.parse(text).unwrap();
        let printed = node.to_string();
        let original = engine.build(&node, BuildOptions::strict()).unwrap();
        let reparsed = engine.compile(&printed, BuildOptions::strict()).unwrap();
        agree(engine.catalog(), &original.predicate, &reparsed.predicate);
    }
}

#[test]
fn and_or_order_does_not_change_results() {
    let mut engine = engine();
    let pairs = [
        (
            "Clan = \"Toreador\" AND CardType = \"Vampire\"",
            "CardType = \"Vampire\" AND Clan = \"Toreador\"",
        ),
        (
            "Group = 1 AND (Capacity = 8 AND Sect = \"Camarilla\")",
            "(Group = 1 AND Capacity = 8) AND Sect = \"Camarilla\"",
        ),
        (
            "Clan = \"Brujah\" OR Cost = 1",
            "Cost = 1 OR Clan = \"Brujah\"",
        ),
    ];
    for (a, b) in pairs {
        assert_eq!(names(&mut engine, a), names(&mut engine, b));
    }
}

#[test]
fn combining_with_the_empty_filter_changes_nothing() {
    let mut engine = engine();
    let empty = engine.parse("").unwrap();
    let other = engine.parse("Clan = \"Brujah\"").unwrap();
    let combined = empty.and(other.clone());
    assert_eq!(combined, other);

    let empty = engine.compile("", BuildOptions::strict()).unwrap().predicate;
    let brujah = engine
        .compile("Clan = \"Brujah\"", BuildOptions::strict())
        .unwrap()
        .predicate;
    let combined = empty.and(brujah.clone()).unwrap();
    agree(engine.catalog(), &combined, &brujah);
}

#[test]
fn templates_bind_variables_before_building() {
    let mut engine = engine();
    let template = engine.parse("Clan = $clan AND CardType = \"Vampire\"").unwrap();
    let err = engine.build(&template, BuildOptions::strict()).unwrap_err();
    assert!(matches!(err, FilterError::UnboundVariable { .. }));

    let mut bindings = BTreeMap::new();
    bindings.insert("$clan".to_string(), vec!["Brujah".to_string()]);
    let built = engine
        .build(&template.bind(&bindings).unwrap(), BuildOptions::strict())
        .unwrap();
    let matches = engine.execute(&built.predicate, None).unwrap();
    assert_eq!(matches.names(engine.catalog()), ["Akram"]);
}
