use serde_json::json;

use crate::constants;
use crate::driver::By;
use crate::errors::AutomationError;
use crate::tests::mock::{MockDriver, MockNode};
use crate::tests::{init_tracing, maximo_with};

#[tokio::test]
async fn ready_probe_reflects_the_page_flag() {
    init_tracing();
    let mock = MockDriver::new();
    let maximo = maximo_with(&mock);

    mock.set_script_result(constants::READY_PROBE_SCRIPT, json!(true));
    assert!(maximo.is_ready().unwrap());

    mock.set_script_result(constants::READY_PROBE_SCRIPT, json!(false));
    assert!(!maximo.is_ready().unwrap());
}

#[tokio::test]
async fn non_boolean_probe_result_counts_as_not_ready() {
    init_tracing();
    let mock = MockDriver::new();
    let maximo = maximo_with(&mock);

    mock.set_script_result(constants::READY_PROBE_SCRIPT, json!("maybe"));
    assert!(!maximo.is_ready().unwrap());
}

#[tokio::test]
async fn idle_page_is_ready_immediately() {
    init_tracing();
    let mock = MockDriver::new();
    let maximo = maximo_with(&mock);

    maximo.wait_until_ready().await.unwrap();
}

#[tokio::test]
async fn waits_out_a_busy_indicator_that_disappears() {
    init_tracing();
    let mock = MockDriver::new();
    mock.insert("busy", MockNode::new().id(constants::BUSY_INDICATOR_ID));
    // The overlay survives three probes, then leaves the DOM.
    mock.register_until(By::id(constants::BUSY_INDICATOR_ID), &["busy"], 3);
    let maximo = maximo_with(&mock);

    maximo.wait_until_ready().await.unwrap();
}

#[tokio::test]
async fn hidden_busy_indicator_counts_as_gone() {
    init_tracing();
    let mock = MockDriver::new();
    mock.insert(
        "busy",
        MockNode::new().id(constants::BUSY_INDICATOR_ID).hidden(),
    );
    mock.register(By::id(constants::BUSY_INDICATOR_ID), &["busy"]);
    let maximo = maximo_with(&mock);

    maximo.wait_until_ready().await.unwrap();
}

#[tokio::test]
async fn persistent_busy_indicator_times_out() {
    init_tracing();
    let mock = MockDriver::new();
    mock.insert("busy", MockNode::new().id(constants::BUSY_INDICATOR_ID));
    mock.register(By::id(constants::BUSY_INDICATOR_ID), &["busy"]);
    let maximo = maximo_with(&mock);

    let err = maximo.wait_until_ready().await.unwrap_err();
    assert!(matches!(err, AutomationError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn waits_out_a_long_operation_after_the_busy_indicator() {
    init_tracing();
    let mock = MockDriver::new();
    mock.insert("longop", MockNode::new().id(constants::LONGOP_DIALOG_ID));
    // One presence probe plus one disappearance probe, then gone; the
    // follow-up round must re-verify and succeed.
    mock.register_until(By::id(constants::LONGOP_DIALOG_ID), &["longop"], 2);
    let maximo = maximo_with(&mock);

    maximo.wait_until_ready().await.unwrap();
}

#[tokio::test]
async fn input_becomes_editable_once_the_readonly_class_drops() {
    init_tracing();
    let mock = MockDriver::new();
    mock.insert(
        "status-input",
        MockNode::new()
            .id("status-input-id")
            .attr_sequence("class", &["fld_ro text", "fld_ro text"]),
    );
    mock.register(By::id("status-input-id"), &["status-input"]);
    let maximo = maximo_with(&mock);

    let input = maximo
        .wait_for_input_editable(&By::id("status-input-id"), None)
        .await
        .unwrap();
    assert_eq!(input.id_or_empty(), "status-input-id");
}

#[tokio::test]
async fn input_that_stays_readonly_times_out() {
    init_tracing();
    let mock = MockDriver::new();
    mock.insert(
        "status-input",
        MockNode::new().id("status-input-id").classes("fld_ro text"),
    );
    mock.register(By::id("status-input-id"), &["status-input"]);
    let maximo = maximo_with(&mock);

    let err = maximo
        .wait_for_input_editable(&By::id("status-input-id"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AutomationError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn zero_sized_input_is_not_visible() {
    init_tracing();
    let mock = MockDriver::new();
    mock.insert(
        "ghost-input",
        MockNode::new().id("ghost-input-id").zero_sized(),
    );
    mock.register(By::id("ghost-input-id"), &["ghost-input"]);
    let maximo = maximo_with(&mock);

    let err = maximo
        .wait_for_input_editable(&By::id("ghost-input-id"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AutomationError::Timeout(_)), "got {err:?}");
}
