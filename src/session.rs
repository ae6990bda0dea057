//! Session bootstrap and teardown, plus thin navigation shortcuts.
//!
//! This is orchestration glue around the core engine: credential
//! submission, login-failure detection, logout, tab switching and the
//! quick-search box.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::constants;
use crate::driver::By;
use crate::errors::AutomationError;
use crate::Maximo;

impl Maximo {
    /// Navigate the browser session to the given URL.
    pub fn goto_url(&self, url: &str) -> Result<(), AutomationError> {
        self.driver.goto(url)
    }

    /// Log into Maximo with the provided credentials.
    ///
    /// A login failure is reported by the UI as a known dialog pattern;
    /// when detected, its title and description are surfaced in a
    /// [`AutomationError::LoginFailed`].
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AutomationError> {
        info!("logging in");
        self.wait_element_present(&By::id(constants::USERNAME_INPUT_ID), self.config.timeout)
            .await?;

        self.driver
            .find_element(&By::id(constants::USERNAME_INPUT_ID))?
            .type_text(username)?;
        self.driver
            .find_element(&By::id(constants::PASSWORD_INPUT_ID))?
            .type_text(password)?;
        debug!(%username, "credentials submitted to the login form");

        self.driver
            .find_element(&By::css(constants::LOGIN_BUTTON_CSS))?
            .click()?;

        let signed_in = self
            .wait_element_present(&By::id(constants::SIGNOUT_LINK_ID), self.config.timeout)
            .await;
        if let Err(AutomationError::Timeout(wait_message)) = signed_in {
            return Err(self.login_failure(wait_message)?);
        }
        signed_in?;

        self.wait_until_ready().await?;
        info!("logged in");
        Ok(())
    }

    fn login_failure(&self, wait_message: String) -> Result<AutomationError, AutomationError> {
        match self
            .driver
            .find_element(&By::css(constants::LOGIN_FAILURE_TITLE_CSS))
        {
            Ok(title_el) => {
                let title = title_el.text()?.trim().to_string();
                let description = match self
                    .driver
                    .find_element(&By::css(constants::LOGIN_FAILURE_BODY_CSS))
                {
                    Ok(body) => body.text()?.trim().to_string(),
                    Err(AutomationError::ElementNotFound(_)) => String::new(),
                    Err(e) => return Err(e),
                };
                error!(%title, %description, "login rejected");
                Ok(AutomationError::LoginFailed(format!("{title}: {description}")))
            }
            Err(AutomationError::ElementNotFound(_)) => Ok(AutomationError::LoginFailed(format!(
                "no failure dialog shown; {wait_message}"
            ))),
            Err(e) => Err(e),
        }
    }

    /// Log out through Maximo's own logout URL and confirm.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AutomationError> {
        self.driver.execute_script(constants::LOGOUT_SCRIPT)?;
        self.wait_element_present(&By::css(constants::LOGOUT_CONFIRM_CSS), self.config.timeout)
            .await?;
        self.driver
            .find_element(&By::css(constants::LOGOUT_CONFIRM_CSS))?
            .click()?;
        self.wait_element_present(&By::id(constants::USERNAME_INPUT_ID), self.config.timeout)
            .await?;
        info!("logged out");
        Ok(())
    }

    /// Tear down the browser session.
    pub fn close(&self) -> Result<(), AutomationError> {
        self.driver.quit()
    }

    /// Switch to a tab of the current record by its exact link text.
    pub async fn goto_tab(&self, tab_name: &str) -> Result<(), AutomationError> {
        self.driver
            .find_element(&By::link_text(tab_name))?
            .click()?;
        self.wait_until_ready().await?;
        info!(tab = %tab_name, "changed tab");
        Ok(())
    }

    /// Search a record id through the quick-search box.
    ///
    /// Returns `false` (instead of raising) when the UI reports that no
    /// records match.
    #[instrument(skip(self))]
    pub async fn quick_search(&self, resource_id: &str) -> Result<bool, AutomationError> {
        self.wait_until_ready().await?;
        let input = self
            .wait_for_input_editable(&By::id(constants::QUICKSEARCH_INPUT_ID), None)
            .await?;
        input.clear()?;
        input.type_text(resource_id.trim())?;

        self.driver
            .find_element(&By::id(constants::QUICKSEARCH_BUTTON_ID))?
            .click()?;
        info!(id = %resource_id, "quick search launched");
        self.wait_until_ready().await?;

        if !self
            .driver
            .find_elements(&By::id(constants::MSGBOX_OK_BUTTON_ID))?
            .is_empty()
        {
            let message = self
                .driver
                .find_element(&By::id(constants::MSGBOX_TEXT_ID))?
                .text()?;
            if crate::dialog::classify_message(&message)
                == Some(crate::dialog::MessagePattern::NoRecordsFound)
            {
                error!(id = %resource_id, "no records match the requested id");
                return Ok(false);
            }
        }

        self.wait_element_present(&By::id(constants::RECORD_TABS_ID), self.config.timeout)
            .await?;
        Ok(true)
    }

    /// Fill the "More Search Fields" form and run an advanced search.
    ///
    /// Opens the quick-search menu, picks its "More Search Fields" entry
    /// (the menu markup is generated on demand, so both steps are
    /// awaited), fills the form through the named-field resolver and
    /// clicks Find. With `submit` false the form is left open for the
    /// caller to inspect or amend.
    #[instrument(skip(self, params))]
    pub async fn advanced_search(
        &self,
        params: HashMap<String, String>,
        submit: bool,
    ) -> Result<(), AutomationError> {
        self.wait_until_ready().await?;

        self.wait_element_present(&By::id(constants::QUICKSEARCH_MENU_ID), self.config.timeout)
            .await?;
        self.driver
            .find_element(&By::id(constants::QUICKSEARCH_MENU_ID))?
            .click()?;
        self.wait_until_ready().await?;

        self.wait_element_present(&By::id(constants::SEARCH_MORE_OPTION_ID), self.config.timeout)
            .await?;
        self.driver
            .find_element(&By::id(constants::SEARCH_MORE_OPTION_ID))?
            .click()?;
        self.wait_until_ready().await?;

        self.wait_element_present(
            &By::id(constants::ADVANCED_SEARCH_SUBMIT_ID),
            self.config.timeout,
        )
        .await?;
        self.set_named_inputs(params).await?;

        if submit {
            self.driver
                .find_element(&By::id(constants::ADVANCED_SEARCH_SUBMIT_ID))?
                .click()?;
            self.wait_until_ready().await?;
            info!("advanced search launched");
        }
        Ok(())
    }

    /// Read a variable from Maximo's own page-global JavaScript state.
    pub fn internal_variable(&self, name: &str) -> Result<Value, AutomationError> {
        self.driver.execute_script(&format!("return {name};"))
    }

    /// The currently open application, from Maximo's page globals.
    pub fn current_application(&self) -> Result<CurrentApplication, AutomationError> {
        let target_id = self
            .internal_variable("APPTARGET")?
            .as_str()
            .unwrap_or_default()
            .to_lowercase();
        let label = self
            .internal_variable("APP_KEY_LABEL")?
            .as_str()
            .unwrap_or_default()
            .to_string();
        Ok(CurrentApplication { target_id, label })
    }
}

/// Identity of the application currently open in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentApplication {
    /// Internal application target, e.g. `mp2change`.
    pub target_id: String,
    /// Human-readable application label.
    pub label: String,
}
