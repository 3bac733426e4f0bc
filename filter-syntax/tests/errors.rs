mod common;
use common::*;
use filter_syntax::*;

#[test]
fn illegal_characters_are_all_reported() {
    let err = parse_err("Clan = \"a\" ! Sect = \"b\" #");
    let positions: Vec<usize> = err
        .illegal_characters()
        .iter()
        .map(|c| c.position)
        .collect();
    assert_eq!(positions, [11, 24]);
    assert_eq!(err.position, 11);
    assert!(err.to_string().contains("2 illegal character(s)"));
}

#[test]
fn single_ampersand_is_illegal() {
    let err = parse_err("Clan = \"a\" & Sect = \"b\"");
    assert_eq!(
        err.illegal_characters(),
        [IllegalChar {
            ch: '&',
            position: 11
        }]
    );
}

#[test]
fn missing_values() {
    let err = parse_err("Clan =");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedEnd {
            expected: "a quoted string or an integer"
        }
    );
    assert_eq!(err.position, 6);

    let err = parse_err("Clan = \"a\",");
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedEnd { .. }));
}

#[test]
fn missing_operator_between_type_and_value() {
    let err = parse_err("Clan \"Ventrue\"");
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    assert_eq!(err.position, 5);
}

#[test]
fn dangling_boolean_operators() {
    assert!(matches!(
        parse_err("Clan = \"a\" AND").kind,
        ParseErrorKind::UnexpectedEnd { .. }
    ));
    assert!(matches!(
        parse_err("OR Clan = \"a\"").kind,
        ParseErrorKind::UnexpectedToken { .. }
    ));
    assert!(matches!(
        parse_err("NOT").kind,
        ParseErrorKind::UnexpectedEnd { .. }
    ));
}

#[test]
fn empty_parentheses() {
    let err = parse_err("()");
    assert_eq!(err.position, 1);
}

#[test]
fn value_list_with_a_variable_is_rejected() {
    let err = parse_err("Clan = \"a\", $clan");
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    assert_eq!(err.position, 12);
}

#[test]
fn unquoted_values_name_the_word() {
    let err = parse_err("Clan = \"a\" OR Sect = Sabbat");
    assert_eq!(err.kind, ParseErrorKind::UnquotedValue("Sabbat".into()));
    assert_eq!(err.position, 21);
}

#[test]
fn error_message_carries_position() {
    let err = parse_err("Bogus = \"x\"");
    assert_eq!(
        err.to_string(),
        "unknown filter type `Bogus` (at byte 0)"
    );
}

#[test]
fn lossy_lexing_still_yields_tokens_for_display() {
    let report = lex_lossy("Clan = \"a\" % Sect", &keywords());
    assert!(!report.is_clean());
    assert_eq!(report.tokens.len(), 4);
    assert_eq!(report.tokens[3].kind, TokenKind::FilterType);
}
