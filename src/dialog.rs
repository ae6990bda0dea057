//! Modal dialog detection and classification.
//!
//! Maximo renders multiple stacked dialog containers even when only one is
//! interactive; the actively modal one is the only one whose wait layer
//! carries the `wait_modal` class. Foreground detection therefore never
//! assumes the last-rendered container is the active one.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::constants;
use crate::driver::By;
use crate::errors::AutomationError;
use crate::{Element, Maximo};

/// The shape of a dialog container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// A regular dialog (forms, pickers, confirmation prompts).
    Generic,
    /// A message box reporting an application-level condition.
    MessageBox,
}

/// Snapshot of one dialog container, valid until the next DOM-mutating
/// action.
#[derive(Debug)]
pub struct Dialog {
    pub is_foreground: bool,
    pub kind: DialogKind,
    pub title: String,
    /// Body text, flattened and whitespace-normalized.
    pub body: String,
    /// Visible push-buttons keyed by their trimmed text.
    pub buttons: HashMap<String, Element>,
}

impl Dialog {
    pub fn button(&self, label: &str) -> Option<&Element> {
        self.buttons.get(label)
    }

    pub fn click_button(&self, label: &str) -> Result<(), AutomationError> {
        match self.buttons.get(label) {
            Some(button) => button.click(),
            None => Err(AutomationError::ElementNotFound(format!(
                "dialog '{}' has no '{label}' button (has: {:?})",
                self.title,
                self.buttons.keys().collect::<Vec<_>>()
            ))),
        }
    }

    /// Match the body against the recognized message patterns.
    pub fn classify(&self) -> Option<MessagePattern> {
        classify_message(&self.body)
    }
}

/// Recognized application messages.
///
/// The host UI reports business-rule conditions as free text inside
/// message boxes; this is the single table mapping known substrings to
/// typed conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePattern {
    /// "Save your changes before continuing?" prompt on navigation away
    /// from a dirty record.
    SaveBeforeContinuing,
    /// The record was updated by another user; changes were not saved.
    UpdatedByAnotherUser,
    /// Validation errors prevent the requested action.
    ValidationErrors,
    /// The requested status transition is not permitted.
    TransitionNotPermitted,
    /// The activity cannot start before its scheduled date. Reported
    /// verbatim, grammar included, as the deployed build phrases it.
    ScheduledDateNotReached,
    /// A query matched no records.
    NoRecordsFound,
}

const MESSAGE_PATTERNS: &[(&str, MessagePattern)] = &[
    (
        "Do you want to save your changes before continuing?",
        MessagePattern::SaveBeforeContinuing,
    ),
    (
        "has been updated by another user. Your changes have not been saved",
        MessagePattern::UpdatedByAnotherUser,
    ),
    (
        "Errors exist in the application that prevent this action from being performed",
        MessagePattern::ValidationErrors,
    ),
    (
        "The transition of status from",
        MessagePattern::TransitionNotPermitted,
    ),
    (
        "Change SCHEDULED DATE is not reach to start Activity",
        MessagePattern::ScheduledDateNotReached,
    ),
    (
        "No records were found that match the specified query",
        MessagePattern::NoRecordsFound,
    ),
];

/// Look a message text up in the pattern table.
pub fn classify_message(text: &str) -> Option<MessagePattern> {
    MESSAGE_PATTERNS
        .iter()
        .find(|(needle, _)| text.contains(needle))
        .map(|(_, pattern)| *pattern)
}

impl MessagePattern {
    /// Whether this pattern reports a business-rule conflict the caller
    /// must decide about, as opposed to an informational prompt.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            MessagePattern::UpdatedByAnotherUser
                | MessagePattern::ValidationErrors
                | MessagePattern::TransitionNotPermitted
                | MessagePattern::ScheduledDateNotReached
        )
    }
}

/// Classify a message-box text into the typed error for it. Unknown
/// messages are warned about and surfaced as `UnclassifiedMessage`, never
/// silently swallowed.
pub(crate) fn message_into_error(text: String) -> AutomationError {
    match classify_message(&text) {
        Some(pattern) if pattern.is_conflict() => AutomationError::ApplicationConflict(text),
        _ => {
            warn!(message = %text, "application message not recognized");
            AutomationError::UnclassifiedMessage(text)
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Maximo {
    /// Scan the DOM for dialog containers and return them all, foreground
    /// or not.
    pub fn detect_dialogs(&self) -> Result<Vec<Dialog>, AutomationError> {
        let mut dialogs = Vec::new();

        for inner in self
            .driver
            .find_elements(&By::css(constants::DIALOG_INNER_CSS))?
        {
            let Some(id) = inner.id() else {
                continue;
            };

            let wait_layer = format!("{id}{}", constants::DIALOG_WAIT_SUFFIX);
            let is_foreground = match self.driver.find_element(&By::id(&wait_layer)) {
                Ok(layer) => layer.has_class(constants::FOREGROUND_MARKER_CLASS)?,
                Err(AutomationError::ElementNotFound(_)) => false,
                Err(e) => return Err(e),
            };

            let kind = if id.starts_with(constants::MSGBOX_ID_PREFIX) {
                DialogKind::MessageBox
            } else {
                DialogKind::Generic
            };

            let title = match inner.find_element(&By::css(constants::DIALOG_TITLE_CSS)) {
                Ok(head) => head.text()?.trim().to_string(),
                Err(AutomationError::ElementNotFound(_)) => String::new(),
                Err(e) => return Err(e),
            };

            let mut body = String::new();
            let mut buttons = HashMap::new();
            match inner.find_element(&By::css(constants::DIALOG_BODY_CSS)) {
                Ok(content) => {
                    match content.find_element(&By::css(constants::DIALOG_BODY_TEXT_CSS)) {
                        Ok(body_div) => body = collapse_whitespace(&body_div.text()?),
                        Err(AutomationError::ElementNotFound(_)) => {}
                        Err(e) => return Err(e),
                    }
                    for button in content.find_elements(&By::css(constants::DIALOG_BUTTONS_CSS))? {
                        let label = button.text()?.trim().to_string();
                        if !label.is_empty() {
                            buttons.insert(label, button);
                        }
                    }
                }
                Err(AutomationError::ElementNotFound(_)) => {}
                Err(e) => return Err(e),
            }

            dialogs.push(Dialog {
                is_foreground,
                kind,
                title,
                body,
                buttons,
            });
        }

        if !dialogs.is_empty() {
            debug!(count = dialogs.len(), "dialogs detected");
        }
        Ok(dialogs)
    }

    /// The first dialog flagged as foreground, or `None`.
    pub fn foreground_dialog(&self) -> Result<Option<Dialog>, AutomationError> {
        Ok(self
            .detect_dialogs()?
            .into_iter()
            .find(|dialog| dialog.is_foreground))
    }

    /// Stale-save guard: if the foreground dialog asks whether to save
    /// changes before continuing, decline it and re-establish readiness.
    /// Returns whether a prompt was dismissed. Used before navigating away
    /// from a dirty record.
    pub async fn dismiss_save_prompt(&self) -> Result<bool, AutomationError> {
        if let Some(dialog) = self.foreground_dialog()? {
            if dialog.classify() == Some(MessagePattern::SaveBeforeContinuing) {
                debug!(body = %dialog.body, "save prompt detected, declining");
                dialog.click_button("No")?;
                self.wait_until_ready().await?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Concurrent-edit guard: if the foreground dialog reports an update
    /// by another user, acknowledge it and report the conflict as a bool
    /// instead of raising. Whether to retry is the caller's decision.
    pub async fn acknowledge_conflict(&self) -> Result<bool, AutomationError> {
        if let Some(dialog) = self.foreground_dialog()? {
            if dialog.classify() == Some(MessagePattern::UpdatedByAnotherUser) {
                debug!(body = %dialog.body, "concurrent edit reported, acknowledging");
                dialog.click_button("OK")?;
                self.wait_until_ready().await?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}
