use std::collections::HashMap;
use std::sync::Arc;

use crate::constants;
use crate::driver::{By, Key};
use crate::errors::AutomationError;
use crate::tests::mock::{MockDriver, MockNode};
use crate::tests::{init_tracing, maximo_with};

/// A record form with one plain labeled input, one decorated (required)
/// label and one detached label, the typical mix of a Maximo detail tab.
fn record_form() -> Arc<MockDriver> {
    let mock = MockDriver::new();

    mock.insert(
        "label-summary",
        MockNode::new()
            .classes("text label")
            .text(" Summary: ")
            .attr("for", "summary-input-id"),
    );
    mock.insert(
        "summary-input",
        MockNode::new().id("summary-input-id").attr("value", "old text"),
    );
    mock.register(By::id("summary-input-id"), &["summary-input"]);

    // Required-field labels carry a third marker class and different
    // semantics; the resolver must pass them over.
    mock.insert(
        "label-owner-required",
        MockNode::new()
            .classes("text label required")
            .text("Owner:")
            .attr("for", "owner-input-id"),
    );
    mock.insert("owner-input", MockNode::new().id("owner-input-id"));
    mock.register(By::id("owner-input-id"), &["owner-input"]);

    mock.insert(
        "label-detached",
        MockNode::new().classes("text label").text("Site:"),
    );

    mock.register(
        By::css(constants::LABEL_MARKER_CSS),
        &["label-detached", "label-owner-required", "label-summary"],
    );

    mock
}

#[tokio::test]
async fn sets_the_input_behind_a_label() {
    init_tracing();
    let mock = record_form();
    let maximo = maximo_with(&mock);

    maximo
        .set_named_input("Summary:", "Replace the card reader")
        .await
        .unwrap();

    assert_eq!(mock.value_of("summary-input"), "Replace the card reader");
    assert_eq!(mock.keys_sent("summary-input"), vec![Key::Tab]);
}

#[tokio::test]
async fn decorated_labels_are_passed_over() {
    init_tracing();
    let mock = record_form();
    let maximo = maximo_with(&mock);

    // "Owner:" only exists as a decorated label, so the scan never
    // touches its input and the target stays unset.
    let mut targets = HashMap::new();
    targets.insert("Owner:".to_string(), "somebody".to_string());
    targets.insert("Summary:".to_string(), "fixed".to_string());
    let result = maximo.set_named_inputs(targets).await;

    assert_eq!(mock.value_of("owner-input"), "");
    assert_eq!(mock.value_of("summary-input"), "fixed");
    // The scan completed its pass; an unmatched target is not an error.
    result.unwrap();
}

#[tokio::test]
async fn rerendering_page_is_retried_until_it_settles() {
    init_tracing();
    let mock = record_form();
    // Each fault fails one scan attempt at its first element access.
    mock.set_stale_faults(4);
    let maximo = maximo_with(&mock);

    maximo.set_named_input("Summary:", "eventually").await.unwrap();
    assert_eq!(mock.value_of("summary-input"), "eventually");
}

#[tokio::test]
async fn retry_budget_exhaustion_is_terminal() {
    init_tracing();
    let mock = record_form();
    mock.set_stale_faults(5);
    let maximo = maximo_with(&mock);

    let err = maximo
        .set_named_input("Summary:", "never")
        .await
        .unwrap_err();
    match err {
        AutomationError::RetriesExhausted { attempts, message } => {
            assert_eq!(attempts, 5);
            assert!(message.contains("Summary:"), "got {message}");
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn set_value_reads_back_through_the_resolver() {
    init_tracing();
    let mock = record_form();
    let maximo = maximo_with(&mock);

    maximo.set_named_input("Summary:", "CLOSED").await.unwrap();

    let input = maximo.get_named_input("Summary:").unwrap();
    assert_eq!(input.attr_or_empty("value").unwrap(), "CLOSED");
}

#[tokio::test]
async fn reads_back_through_the_same_label() {
    init_tracing();
    let mock = record_form();
    let maximo = maximo_with(&mock);

    let input = maximo.get_named_input("Summary:").unwrap();
    assert_eq!(input.attr_or_empty("value").unwrap(), "old text");
}

#[tokio::test]
async fn unknown_label_is_not_found() {
    init_tracing();
    let mock = record_form();
    let maximo = maximo_with(&mock);

    let err = maximo.get_named_input("Priority:").unwrap_err();
    assert!(
        matches!(err, AutomationError::ElementNotFound(_)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn label_pointing_at_a_missing_input_is_reported() {
    init_tracing();
    let mock = MockDriver::new();
    mock.insert(
        "label-orphan",
        MockNode::new()
            .classes("text label")
            .text("Asset:")
            .attr("for", "asset-input-id"),
    );
    mock.register(By::css(constants::LABEL_MARKER_CSS), &["label-orphan"]);
    let maximo = maximo_with(&mock);

    let err = maximo.get_named_input("Asset:").unwrap_err();
    match err {
        AutomationError::ElementNotFound(message) => {
            assert!(message.contains("asset-input-id"), "got {message}");
        }
        other => panic!("expected ElementNotFound, got {other:?}"),
    }
}
