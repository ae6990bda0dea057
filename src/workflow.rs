//! Workflow-level status changes, built on the dialog classifier and the
//! named-field resolver.

use tracing::{error, info, instrument};

use crate::constants;
use crate::dialog::{classify_message, message_into_error, MessagePattern};
use crate::driver::By;
use crate::errors::AutomationError;
use crate::Maximo;

/// Drives the "Change Status/Group/Owner" workflow dialog of the current
/// record.
pub struct RouteWorkflow<'a> {
    maximo: &'a Maximo,
}

impl Maximo {
    pub fn route_workflow(&self) -> RouteWorkflow<'_> {
        RouteWorkflow { maximo: self }
    }

    /// Route the record's workflow from the toolbar button.
    ///
    /// A "Complete Workflow Assignment" dialog, if one appears, is
    /// confirmed; a message box after that is classified and raised.
    #[instrument(skip(self))]
    pub async fn route_workflow_from_toolbar(&self) -> Result<(), AutomationError> {
        self.driver
            .find_element(&By::id(constants::ROUTE_WF_TOOLBAR_ID))?
            .click()?;
        self.wait_until_ready().await?;

        if let Some(dialog) = self.foreground_dialog()? {
            if dialog.title.contains(constants::COMPLETE_ASSIGNMENT_TITLE) {
                dialog.click_button("OK")?;
                self.wait_until_ready().await?;
            }
        }

        if let Some(message) = self.message_box_text()? {
            error!(%message, "message box after routing workflow");
            self.acknowledge_message_box(&message).await?;
            return Err(message_into_error(message));
        }
        Ok(())
    }

    /// Dismiss a routing message box so no modal is left up behind the
    /// raised error. The scheduled-date message box has no OK button,
    /// only a dedicated close one.
    async fn acknowledge_message_box(&self, message: &str) -> Result<(), AutomationError> {
        let button_id = match classify_message(message) {
            Some(MessagePattern::ScheduledDateNotReached) => constants::SCHEDULED_DATE_CLOSE_ID,
            _ => constants::MSGBOX_OK_BUTTON_ID,
        };
        match self.driver.find_element(&By::id(button_id)) {
            Ok(button) => {
                button.click()?;
                self.wait_until_ready().await?;
                Ok(())
            }
            Err(AutomationError::ElementNotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// The visible message-box text, if a message box is present.
    pub(crate) fn message_box_text(&self) -> Result<Option<String>, AutomationError> {
        if self
            .driver
            .find_elements(&By::id(constants::MSGBOX_INNER_ID))?
            .is_empty()
        {
            return Ok(None);
        }
        let text = self
            .driver
            .find_element(&By::id(constants::MSGBOX_TEXT_ID))?
            .text()?
            .trim()
            .to_string();
        Ok(Some(text))
    }
}

impl RouteWorkflow<'_> {
    /// Open the "Change Status" dialog.
    pub async fn open_dialog(&self) -> Result<(), AutomationError> {
        if self
            .maximo
            .driver
            .find_elements(&By::link_text(constants::CHANGE_STATUS_LINK))?
            .is_empty()
        {
            error!("no '{}' button in the current view", constants::CHANGE_STATUS_LINK);
            return Err(AutomationError::ElementNotFound(format!(
                "no '{}' button in the current view",
                constants::CHANGE_STATUS_LINK
            )));
        }

        self.maximo
            .driver
            .find_element(&By::xpath(constants::CHANGE_STATUS_XPATH))?
            .click()?;
        self.maximo.wait_until_ready().await?;
        info!("change status dialog open");
        Ok(())
    }

    /// Close the dialog without routing.
    pub async fn close_dialog(&self) -> Result<(), AutomationError> {
        self.maximo
            .driver
            .find_element(&By::id(constants::STATUS_DIALOG_CLOSE_ID))?
            .click()?;
        self.maximo.wait_until_ready().await?;
        Ok(())
    }

    /// The record's current status, read through the named-field resolver.
    pub fn status(&self) -> Result<String, AutomationError> {
        self.maximo
            .get_named_input("Status:")?
            .attr_or_empty("value")
    }

    /// Type a new status into the dialog.
    pub async fn set_status(&self, new_status: &str) -> Result<(), AutomationError> {
        self.maximo
            .set_named_input("New Status:", new_status)
            .await?;
        self.maximo.wait_until_ready().await?;
        Ok(())
    }

    /// Click "Route Workflow" and classify the outcome.
    ///
    /// A resulting message box is acknowledged, the dialog is closed, and
    /// the message is surfaced as `ApplicationConflict` when it matches a
    /// known business-rule pattern, `UnclassifiedMessage` otherwise.
    /// Conflicts are never auto-resolved here; retrying is the caller's
    /// policy decision.
    #[instrument(skip(self))]
    pub async fn route(&self) -> Result<(), AutomationError> {
        self.maximo
            .driver
            .find_element(&By::id(constants::STATUS_DIALOG_ROUTE_ID))?
            .click()?;
        self.maximo.wait_until_ready().await?;

        if let Some(message) = self.maximo.message_box_text()? {
            error!(%message, "message box after routing");

            self.maximo.acknowledge_message_box(&message).await?;
            self.close_dialog().await?;

            return Err(message_into_error(message));
        }
        Ok(())
    }
}
