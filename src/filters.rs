//! The list view's filter directory.
//!
//! Filter metadata is re-derived from the table headers on every call:
//! list views change with each navigation, so unlike sections there is
//! nothing durable to cache.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::column::ColumnRef;
use crate::constants;
use crate::driver::{By, Key};
use crate::errors::AutomationError;
use crate::Maximo;

/// One filterable column of the active list view.
#[derive(Debug, Clone, Serialize)]
pub struct Filter {
    /// Normalized (trimmed, lower-cased) header label.
    pub label: String,
    /// Backing filter input, `None` for read-only columns.
    pub input_id: Option<String>,
    /// The sort indicator's accessible text (img `alt`).
    pub sort_state: String,
    /// Ordinal parsed from the header's generated id; `None` means the
    /// column cannot be correlated to data cells.
    pub column: Option<ColumnRef>,
}

impl Maximo {
    /// Derive the active list view's filterable columns from its header
    /// row.
    pub async fn available_filters(&self) -> Result<HashMap<String, Filter>, AutomationError> {
        self.wait_element_present(
            &By::id(constants::LIST_HEADER_ROW_ID),
            self.config.timeout,
        )
        .await?;

        let mut filters = HashMap::new();

        for label_el in self
            .driver
            .find_elements(&By::css(constants::HEADER_LABELS_CSS))?
        {
            let label = label_el.text()?.trim().to_lowercase();
            if label.is_empty() {
                continue;
            }

            let cell = label_el.find_element(&By::xpath(".."))?;
            let cell_id = cell.id_or_empty();
            let column = ColumnRef::parse(&cell_id);

            let sort_state = match cell.find_element(&By::css("img")) {
                Ok(icon) => icon.attr_or_empty("alt")?,
                Err(AutomationError::ElementNotFound(_)) => String::new(),
                Err(e) => return Err(e),
            };

            // The filter input references its header through the ARIA
            // `headers` relationship. Absence is normal: read-only columns
            // have no input.
            let input_selector = format!("[headers='{cell_id}'] > input");
            let input_id = match self.driver.find_element(&By::css(&input_selector)) {
                Ok(input) => input.id(),
                Err(AutomationError::ElementNotFound(_)) => {
                    debug!(%label, selector = %input_selector, "no filter input for column");
                    None
                }
                Err(e) => return Err(e),
            };

            filters.insert(
                label.clone(),
                Filter {
                    label,
                    input_id,
                    sort_state,
                    column,
                },
            );
        }

        Ok(filters)
    }

    /// Apply filter values to the active list view and run the search.
    ///
    /// Unknown labels and read-only columns are warned about and skipped,
    /// never raised: a partially applicable config still filters on what
    /// it can.
    #[instrument(skip(self, config))]
    pub async fn set_filters(
        &self,
        config: &HashMap<String, String>,
    ) -> Result<(), AutomationError> {
        self.wait_until_ready().await?;
        let available = self.available_filters().await?;

        let toggle = self
            .driver
            .find_element(&By::id(constants::FILTER_TOGGLE_IMG_ID))?;
        let filters_open = toggle.attr_or_empty("src")? != constants::FILTER_OFF_ASSET;
        if !filters_open {
            debug!("filter row collapsed, opening it");
            self.driver
                .find_element(&By::id(constants::FILTER_OPEN_LINK_ID))?
                .hover_click()?;
        }

        for (name, value) in config {
            let key = name.trim().to_lowercase();
            let Some(filter) = available.get(&key) else {
                warn!(
                    filter = %name,
                    known = ?sorted_keys(&available),
                    "unknown filter label, skipping"
                );
                continue;
            };
            let Some(input_id) = filter
                .input_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
            else {
                warn!(filter = %name, "filter has no backing input, skipping");
                continue;
            };

            let input = self.driver.find_element(&By::id(input_id))?;
            input.type_text(value)?;
            input.press_key(Key::Tab)?;
            debug!(filter = %name, %value, "filter set");
            // Rapid sequential edits race the UI's change handlers.
            tokio::time::sleep(self.config.settle_delay).await;
        }

        info!("filters applied, launching search");
        self.driver
            .find_element(&By::id(constants::SEARCH_BUTTON_ID))?
            .click()?;
        self.wait_until_ready().await?;

        // Long searches pop an extra progress dialog after readiness.
        if !self
            .driver
            .find_elements(&By::id(constants::LONG_SEARCH_BUTTON_ID))?
            .is_empty()
        {
            debug!("long search in progress, waiting it out");
            self.wait_element_gone(constants::LONG_SEARCH_BUTTON_ID, self.config.timeout)
                .await?;
            self.wait_until_ready().await?;
        }

        Ok(())
    }
}

fn sorted_keys(filters: &HashMap<String, Filter>) -> Vec<&str> {
    let mut keys: Vec<&str> = filters.keys().map(String::as_str).collect();
    keys.sort();
    keys
}
