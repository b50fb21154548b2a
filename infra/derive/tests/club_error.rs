use club_derive::club_error;
use std::borrow::Cow;

#[club_error]
pub enum DemoError {
    #[error("Record not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i64, DemoError> {
    Ok(raw.parse::<i64>()?)
}

#[test]
fn source_errors_convert_through_question_mark() {
    let error = parse("abc").unwrap_err();
    assert!(matches!(error, DemoError::Parse { context: None, .. }));
    assert!(error.to_string().starts_with("Parse error: "));
}

#[test]
fn context_is_attached_to_source_results() {
    let error = "x".parse::<i64>().context("reading court number").unwrap_err();
    assert!(error.to_string().starts_with("Parse error (reading court number): "));
}

#[test]
fn context_is_attached_to_own_results() {
    let result: Result<(), DemoError> =
        Err(DemoError::NotFound { message: Cow::Borrowed("member 7"), context: None });
    let error = result.context("loading profile").unwrap_err();
    assert_eq!(error.to_string(), "Record not found (loading profile): member 7");
}

#[test]
fn strings_become_internal_errors() {
    let borrowed: DemoError = "pool exhausted".into();
    let owned: DemoError = String::from("queue closed").into();
    assert_eq!(borrowed.to_string(), "Internal error: pool exhausted");
    assert!(matches!(owned, DemoError::Internal { ref message, .. } if message == "queue closed"));
}

#[test]
fn club_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/club_error_pass.rs");
}
