//! Named-field resolution.
//!
//! Form fields are resolved by the visible text of their label rather than
//! by generated ids, which change between Maximo builds and sometimes
//! between renders. Labels carry exactly the two marker classes
//! `text label` and point at their input through the `for` attribute.

use std::collections::HashMap;

use tracing::{debug, error, info, instrument};

use crate::constants;
use crate::driver::{By, Key};
use crate::errors::AutomationError;
use crate::{Element, Maximo};

impl Maximo {
    /// Set several named inputs in one pass over the page's labels.
    ///
    /// Each matched label is validated, its input awaited until editable,
    /// cleared, typed into and committed with Tab; the label is consumed
    /// from `targets` once set. The scan is done when every target is
    /// consumed or every label has been seen once.
    ///
    /// An in-flight re-render can invalidate elements mid-scan, so the
    /// whole scan restarts on a staleness fault, up to the configured
    /// retry budget with a backoff in between. Exhausting the budget is a
    /// terminal error.
    #[instrument(skip(self, targets))]
    pub async fn set_named_inputs(
        &self,
        targets: HashMap<String, String>,
    ) -> Result<(), AutomationError> {
        let mut remaining = targets;
        let attempts = self.config.max_retries;

        for attempt in 1..=attempts {
            match self.scan_and_fill(&mut remaining).await {
                Ok(()) => {
                    self.wait_until_ready().await?;
                    return Ok(());
                }
                Err(AutomationError::StaleElement(message)) => {
                    debug!(
                        attempt,
                        max = attempts,
                        %message,
                        "page changed while accessing an input, restarting scan"
                    );
                    tokio::time::sleep(self.config.retry_backoff).await;
                }
                Err(e) => return Err(e),
            }
        }

        let message = format!(
            "page kept re-rendering while setting named inputs; unset labels: {:?}",
            remaining.keys().collect::<Vec<_>>()
        );
        error!(%message, "giving up on named input scan");
        Err(AutomationError::RetriesExhausted { attempts, message })
    }

    /// Convenience wrapper for a single label/value pair.
    pub async fn set_named_input(
        &self,
        label: &str,
        value: &str,
    ) -> Result<(), AutomationError> {
        let mut targets = HashMap::new();
        targets.insert(label.to_string(), value.to_string());
        self.set_named_inputs(targets).await
    }

    async fn scan_and_fill(
        &self,
        targets: &mut HashMap<String, String>,
    ) -> Result<(), AutomationError> {
        for label in self
            .driver
            .find_elements(&By::css(constants::LABEL_MARKER_CSS))?
        {
            if targets.is_empty() {
                debug!("no more targets, scan finished");
                break;
            }

            let text = label.text()?.trim().to_string();
            if text.is_empty() {
                continue;
            }
            // Anything beyond the bare two-class marker is a decorated
            // (e.g. required/linked) label with different semantics.
            if label.classes()?.len() != 2 {
                continue;
            }
            let input_id = label.attr_or_empty("for")?.trim().to_string();
            if input_id.is_empty() {
                continue;
            }

            let Some(value) = targets.get(&text).cloned() else {
                continue;
            };

            if self.driver.find_elements(&By::id(&input_id))?.is_empty() {
                error!(label = %text, "no input is bound to the label");
                continue;
            }

            let input = self
                .wait_for_input_editable(&By::id(&input_id), None)
                .await?;
            input.clear()?;
            input.type_text(&value)?;
            input.press_key(Key::Tab)?;

            self.wait_until_ready().await?;
            tokio::time::sleep(self.config.settle_delay).await;
            info!(label = %text, %value, "named input set");

            targets.remove(&text);
        }

        Ok(())
    }

    /// Resolve a named input for reading: first exact label match wins.
    ///
    /// No retry here; point reads are issued when the page is already
    /// settled and staleness is unlikely. An unmatched label raises
    /// `ElementNotFound`.
    pub fn get_named_input(&self, target: &str) -> Result<Element, AutomationError> {
        let wanted = target.trim();

        for label in self
            .driver
            .find_elements(&By::css(constants::LABEL_MARKER_CSS))?
        {
            if label.classes()?.len() != 2 {
                continue;
            }
            let input_id = label.attr_or_empty("for")?.trim().to_string();
            if input_id.is_empty() {
                continue;
            }
            if label.text()?.trim() != wanted {
                continue;
            }

            return match self.driver.find_element(&By::id(&input_id)) {
                Ok(input) => Ok(input),
                Err(AutomationError::ElementNotFound(_)) => {
                    Err(AutomationError::ElementNotFound(format!(
                        "label '{wanted}' points at missing input '{input_id}'"
                    )))
                }
                Err(e) => Err(e),
            };
        }

        Err(AutomationError::ElementNotFound(format!(
            "no input labeled '{wanted}' in the current view"
        )))
    }
}
