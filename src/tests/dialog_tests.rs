use std::sync::Arc;

use crate::constants;
use crate::dialog::{classify_message, message_into_error, DialogKind, MessagePattern};
use crate::driver::By;
use crate::errors::AutomationError;
use crate::tests::mock::{MockDriver, MockNode};
use crate::tests::{init_tracing, maximo_with};

/// A background picker dialog plus a foreground message box, the way
/// Maximo stacks them after a conflicting save.
fn stacked_dialogs(message: &str) -> Arc<MockDriver> {
    let mock = MockDriver::new();

    mock.insert("picker", MockNode::new().id("m1f2e3d4c-dialog_inner"));
    mock.insert("picker-wait", MockNode::new().classes("wait hidden"));
    mock.register(
        By::id("m1f2e3d4c-dialog_inner_dialogwait"),
        &["picker-wait"],
    );

    mock.insert("msgbox", MockNode::new().id(constants::MSGBOX_INNER_ID));
    mock.insert("msgbox-wait", MockNode::new().classes("wait wait_modal"));
    mock.register(
        By::id("msgbox-dialog_inner_dialogwait"),
        &["msgbox-wait"],
    );

    mock.insert("msgbox-title", MockNode::new().text(" System Message "));
    mock.register_scoped(
        "msgbox",
        By::css(constants::DIALOG_TITLE_CSS),
        &["msgbox-title"],
    );

    mock.insert("msgbox-content", MockNode::new());
    mock.register_scoped(
        "msgbox",
        By::css(constants::DIALOG_BODY_CSS),
        &["msgbox-content"],
    );
    mock.insert("msgbox-body", MockNode::new().text(message));
    mock.register_scoped(
        "msgbox-content",
        By::css(constants::DIALOG_BODY_TEXT_CSS),
        &["msgbox-body"],
    );

    mock.insert("msgbox-ok", MockNode::new().text(" OK "));
    mock.insert("msgbox-no", MockNode::new().text("No"));
    mock.register_scoped(
        "msgbox-content",
        By::css(constants::DIALOG_BUTTONS_CSS),
        &["msgbox-ok", "msgbox-no"],
    );

    mock.register(
        By::css(constants::DIALOG_INNER_CSS),
        &["picker", "msgbox"],
    );
    mock
}

const CONFLICT_BODY: &str =
    "Record CHG1042 \n has been updated by another user. Your changes have not been saved. ";

#[tokio::test]
async fn only_the_modal_container_is_foreground() {
    init_tracing();
    let mock = stacked_dialogs(CONFLICT_BODY);
    let maximo = maximo_with(&mock);

    let dialogs = maximo.detect_dialogs().unwrap();
    assert_eq!(dialogs.len(), 2);
    assert!(!dialogs[0].is_foreground);
    assert_eq!(dialogs[0].kind, DialogKind::Generic);
    assert!(dialogs[1].is_foreground);
    assert_eq!(dialogs[1].kind, DialogKind::MessageBox);
}

#[tokio::test]
async fn foreground_dialog_is_classified_and_normalized() {
    init_tracing();
    let mock = stacked_dialogs(CONFLICT_BODY);
    let maximo = maximo_with(&mock);

    let dialog = maximo.foreground_dialog().unwrap().unwrap();
    assert_eq!(dialog.title, "System Message");
    assert_eq!(
        dialog.body,
        "Record CHG1042 has been updated by another user. \
         Your changes have not been saved."
    );
    assert_eq!(dialog.classify(), Some(MessagePattern::UpdatedByAnotherUser));
    assert!(dialog.button("OK").is_some());
    assert!(dialog.button("No").is_some());
}

#[tokio::test]
async fn first_of_two_modal_layers_wins() {
    init_tracing();
    let mock = stacked_dialogs(CONFLICT_BODY);
    // A render glitch can leave the modal marker on two wait layers at
    // once; document order breaks the tie.
    mock.insert("picker-wait", MockNode::new().classes("wait wait_modal"));
    let maximo = maximo_with(&mock);

    let dialogs = maximo.detect_dialogs().unwrap();
    assert!(dialogs.iter().all(|d| d.is_foreground));

    let foreground = maximo.foreground_dialog().unwrap().unwrap();
    assert_eq!(foreground.kind, DialogKind::Generic);
}

#[tokio::test]
async fn clicking_a_missing_button_lists_the_available_ones() {
    init_tracing();
    let mock = stacked_dialogs(CONFLICT_BODY);
    let maximo = maximo_with(&mock);

    let dialog = maximo.foreground_dialog().unwrap().unwrap();
    let err = dialog.click_button("Cancel").unwrap_err();
    match err {
        AutomationError::ElementNotFound(message) => {
            assert!(message.contains("Cancel"), "got {message}");
        }
        other => panic!("expected ElementNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn save_prompt_is_declined_once() {
    init_tracing();
    let mock =
        stacked_dialogs("Do you want to save your changes before continuing? ");
    let maximo = maximo_with(&mock);

    assert!(maximo.dismiss_save_prompt().await.unwrap());
    assert_eq!(mock.clicks("msgbox-no"), 1);
    assert_eq!(mock.clicks("msgbox-ok"), 0);
}

#[tokio::test]
async fn save_prompt_guard_ignores_other_dialogs() {
    init_tracing();
    let mock = stacked_dialogs(CONFLICT_BODY);
    let maximo = maximo_with(&mock);

    assert!(!maximo.dismiss_save_prompt().await.unwrap());
    assert_eq!(mock.clicks("msgbox-no"), 0);
}

#[tokio::test]
async fn concurrent_edit_is_acknowledged() {
    init_tracing();
    let mock = stacked_dialogs(CONFLICT_BODY);
    let maximo = maximo_with(&mock);

    assert!(maximo.acknowledge_conflict().await.unwrap());
    assert_eq!(mock.clicks("msgbox-ok"), 1);
}

#[tokio::test]
async fn conflict_guard_is_a_no_op_without_dialogs() {
    init_tracing();
    let mock = MockDriver::new();
    let maximo = maximo_with(&mock);

    assert!(!maximo.acknowledge_conflict().await.unwrap());
    assert!(!maximo.dismiss_save_prompt().await.unwrap());
    assert!(maximo.foreground_dialog().unwrap().is_none());
}

#[test]
fn message_table_covers_the_known_patterns() {
    let cases = [
        (
            "BMXAA4129E - Do you want to save your changes before continuing?",
            Some(MessagePattern::SaveBeforeContinuing),
        ),
        (
            "Record has been updated by another user. Your changes have not been saved.",
            Some(MessagePattern::UpdatedByAnotherUser),
        ),
        (
            "Errors exist in the application that prevent this action from being performed.",
            Some(MessagePattern::ValidationErrors),
        ),
        (
            "The transition of status from QUEUED to CLOSED is not allowed.",
            Some(MessagePattern::TransitionNotPermitted),
        ),
        (
            "Change SCHEDULED DATE is not reach to start Activity CHG1042.",
            Some(MessagePattern::ScheduledDateNotReached),
        ),
        (
            "No records were found that match the specified query.",
            Some(MessagePattern::NoRecordsFound),
        ),
        ("Something entirely different happened.", None),
    ];
    for (text, expected) in cases {
        assert_eq!(classify_message(text), expected, "for {text:?}");
    }
}

#[test]
fn only_business_rule_patterns_are_conflicts() {
    assert!(MessagePattern::UpdatedByAnotherUser.is_conflict());
    assert!(MessagePattern::ValidationErrors.is_conflict());
    assert!(MessagePattern::TransitionNotPermitted.is_conflict());
    assert!(MessagePattern::ScheduledDateNotReached.is_conflict());
    assert!(!MessagePattern::SaveBeforeContinuing.is_conflict());
    assert!(!MessagePattern::NoRecordsFound.is_conflict());
}

#[test]
fn conflict_messages_become_typed_conflicts() {
    init_tracing();
    let err = message_into_error(
        "The transition of status from QUEUED to CLOSED is not allowed.".to_string(),
    );
    assert!(
        matches!(err, AutomationError::ApplicationConflict(_)),
        "got {err:?}"
    );

    let err = message_into_error("Anything the table does not know.".to_string());
    assert!(
        matches!(err, AutomationError::UnclassifiedMessage(_)),
        "got {err:?}"
    );
}
