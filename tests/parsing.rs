use pushfit::data::{parse_test_cases, LiteralKind};
use pushfit::types::{TestCase, Value};
use pushfit::PushfitError;

#[test]
fn test_two_integer_cases() {
    let cases = parse_test_cases("[[1 2][3 5]]", LiteralKind::Integer).unwrap();
    let parsed: Vec<TestCase> = cases.iter().copied().collect();
    assert_eq!(
        parsed,
        vec![
            TestCase::new(Value::Integer(1), Value::Integer(2)),
            TestCase::new(Value::Integer(3), Value::Integer(5)),
        ]
    );
}

#[test]
fn test_single_element_case_is_malformed() {
    assert!(matches!(
        parse_test_cases("[[1]]", LiteralKind::Integer),
        Err(PushfitError::MalformedCase { index: 0, .. })
    ));
}

#[test]
fn test_parenthesised_cases_parse_like_brackets() {
    let brackets = parse_test_cases("[[1 2][3 5]]", LiteralKind::Integer).unwrap();
    let parens = parse_test_cases("( ( 1 2 ) ( 3 5 ) )", LiteralKind::Integer).unwrap();
    assert_eq!(brackets, parens);
}

#[test]
fn test_unbalanced_text_is_a_parse_error() {
    assert!(matches!(
        parse_test_cases("[[1 2][3 5]", LiteralKind::Integer),
        Err(PushfitError::Parse(_))
    ));
}

#[test]
fn test_error_messages_name_the_case() {
    let err = parse_test_cases("[[1 2][x 5]]", LiteralKind::Integer).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("#1"));
    assert!(message.contains("\"x\""));
}
