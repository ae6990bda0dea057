//! Bounded waits and the readiness oracle.
//!
//! All suspension in the engine is synchronous polling with a deadline;
//! there are no background tasks. Every state-mutating action is followed
//! by a readiness wait before the next action is issued, which is the
//! engine's core defense against the host UI's asynchronous rendering.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::constants;
use crate::driver::By;
use crate::errors::AutomationError;
use crate::{Element, Maximo};

/// Wait tuning shared by every blocking operation of the engine.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Deadline for a single wait stage.
    pub timeout: Duration,
    /// Pause between two probes of the same condition.
    pub poll_interval: Duration,
    /// Settle pause after committing an input, so rapid sequential edits
    /// don't race the UI's change handlers.
    pub settle_delay: Duration,
    /// Backoff between stale-element retry attempts.
    pub retry_backoff: Duration,
    /// Stale-element retry budget of the named-field resolver.
    pub max_retries: u32,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(250),
            settle_delay: Duration::from_millis(500),
            retry_backoff: Duration::from_millis(500),
            max_retries: 5,
        }
    }
}

/// Upper bound on busy/long-operation rounds inside a single readiness
/// wait. Long operations can queue back-to-back without a gap; each round
/// re-verifies the busy indicator after the long-operation layer clears.
const MAX_WAIT_STAGES: u32 = 8;

/// Poll `probe` until it reports true or `timeout` elapses.
pub(crate) async fn poll_until<F>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<(), AutomationError>
where
    F: FnMut() -> Result<bool, AutomationError>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe()? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(AutomationError::Timeout(format!(
                "timed out after {timeout:?} waiting for {what}"
            )));
        }
        tokio::time::sleep(interval).await;
    }
}

impl Maximo {
    /// Non-blocking readiness probe: no busy indicator and no
    /// long-operation message, evaluated in a single script round-trip.
    /// Usable for polling without raising.
    pub fn is_ready(&self) -> Result<bool, AutomationError> {
        let value = self.driver.execute_script(constants::READY_PROBE_SCRIPT)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Block until the UI is safe to interact with.
    ///
    /// Waits out the global busy indicator; if a long-operation dialog is
    /// present once the indicator clears, waits that out too and then
    /// re-verifies the indicator. Bounded at [`MAX_WAIT_STAGES`] rounds.
    pub async fn wait_until_ready(&self) -> Result<(), AutomationError> {
        self.wait_until_ready_within(None).await
    }

    /// [`Maximo::wait_until_ready`] with a per-call stage timeout.
    pub async fn wait_until_ready_within(
        &self,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        let timeout = timeout.unwrap_or(self.config.timeout);
        for stage in 0..MAX_WAIT_STAGES {
            self.wait_element_gone(constants::BUSY_INDICATOR_ID, timeout)
                .await?;
            if !self.long_operation_present()? {
                return Ok(());
            }
            debug!(stage, "long operation dialog detected, waiting more");
            self.wait_element_gone(constants::LONGOP_DIALOG_ID, timeout)
                .await?;
            // Loop: the busy indicator may have come back while the long
            // operation was draining.
        }
        Err(AutomationError::Timeout(format!(
            "busy/long-operation indicators did not settle within {MAX_WAIT_STAGES} wait stages"
        )))
    }

    fn long_operation_present(&self) -> Result<bool, AutomationError> {
        Ok(!self
            .driver
            .find_elements(&By::id(constants::LONGOP_DIALOG_ID))?
            .is_empty())
    }

    /// Wait until the element with `id` is absent from the DOM or hidden.
    pub(crate) async fn wait_element_gone(
        &self,
        id: &str,
        timeout: Duration,
    ) -> Result<(), AutomationError> {
        let by = By::id(id);
        let what = format!("'{id}' to disappear");
        poll_until(&what, timeout, self.config.poll_interval, || {
            match self.driver.find_element(&by) {
                Ok(element) => Ok(!element.is_displayed()?),
                Err(AutomationError::ElementNotFound(_)) => Ok(true),
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Wait until an element matching `by` exists in the DOM.
    pub(crate) async fn wait_element_present(
        &self,
        by: &By,
        timeout: Duration,
    ) -> Result<(), AutomationError> {
        let what = format!("'{by}' to appear");
        poll_until(&what, timeout, self.config.poll_interval, || {
            Ok(!self.driver.find_elements(by)?.is_empty())
        })
        .await
    }

    /// Wait for an input to become editable and return it.
    ///
    /// Three independent blocking stages sharing `timeout`: global
    /// readiness, then visibility (non-zero rendered size), then loss of
    /// the read-only marker class. Visibility alone does not imply
    /// editability in this UI.
    pub async fn wait_for_input_editable(
        &self,
        by: &By,
        timeout: Option<Duration>,
    ) -> Result<Element, AutomationError> {
        let timeout = timeout.unwrap_or(self.config.timeout);
        self.wait_until_ready_within(Some(timeout)).await?;

        let what = format!("input '{by}' to become visible");
        poll_until(&what, timeout, self.config.poll_interval, || {
            match self.driver.find_element(by) {
                Ok(element) => element.is_visible(),
                Err(AutomationError::ElementNotFound(_)) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await?;

        let what = format!("input '{by}' to leave read-only mode");
        poll_until(&what, timeout, self.config.poll_interval, || {
            self.is_input_editable(by)
        })
        .await?;

        self.driver.find_element(by)
    }

    /// Whether the input currently lacks the read-only marker class.
    pub fn is_input_editable(&self, by: &By) -> Result<bool, AutomationError> {
        let element = self.driver.find_element(by)?;
        Ok(!element.has_class(constants::READONLY_CLASS)?)
    }
}
