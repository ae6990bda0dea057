//! Tabular record extraction and pagination.
//!
//! Two extraction strategies: a single in-page batch walk producing every
//! row at once (fast path, used by [`Maximo::all_records`]), and a per-row
//! external walk that correlates cells to the filter directory by column
//! ordinal (used when filter metadata must be cross-checked per row).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::column::ColumnRef;
use crate::constants;
use crate::driver::By;
use crate::errors::AutomationError;
use crate::filters::Filter;
use crate::{Element, Maximo};

/// One extracted table cell.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub element_id: String,
    pub value: String,
    pub column: Option<ColumnRef>,
    pub column_name: String,
}

/// One extracted table row: column name → field, plus the row element's
/// id for downstream re-location. The id is a render artifact, not a
/// durable key.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Row {
    pub element_id: String,
    pub fields: BTreeMap<String, Field>,
}

impl Row {
    pub fn value(&self, column_name: &str) -> Option<&str> {
        self.fields.get(column_name).map(|field| field.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Deserialize)]
struct BatchRow {
    element_id: String,
    cells: Vec<BatchCell>,
}

#[derive(Deserialize)]
struct BatchCell {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    text: String,
}

impl Maximo {
    /// The currently visible data rows as elements, for the per-row
    /// extraction strategy.
    pub fn visible_rows(&self) -> Result<Vec<Element>, AutomationError> {
        self.driver
            .find_elements(&By::css(constants::TABLE_ROWS_CSS))
    }

    /// Extract a single data row, correlating each cell to its column
    /// name through the filter directory's parsed ordinals.
    ///
    /// Cells lacking either a resolvable column name or a non-empty value
    /// are dropped from the row, not errored.
    pub fn record_details(
        &self,
        record: &Element,
        filters: &HashMap<String, Filter>,
    ) -> Result<Row, AutomationError> {
        let mut row = Row {
            element_id: record.id_or_empty(),
            fields: BTreeMap::new(),
        };

        for cell in record.find_elements(&By::css("td"))? {
            let element_id = cell.id_or_empty();
            let value = cell.text()?.replace('\n', "").trim().to_string();
            let column = ColumnRef::parse(&element_id);

            let column_name = column
                .and_then(|ordinal| {
                    filters
                        .values()
                        .find(|filter| filter.column == Some(ordinal))
                })
                .map(|filter| filter.label.trim().to_string())
                .unwrap_or_default();

            if column_name.is_empty() || value.is_empty() {
                continue;
            }

            row.fields.insert(
                column_name.clone(),
                Field {
                    element_id,
                    value,
                    column,
                    column_name,
                },
            );
        }

        Ok(row)
    }

    /// Extract every visible data row in one in-page walk.
    pub fn page_rows(&self) -> Result<Vec<Row>, AutomationError> {
        let value = self.driver.execute_script(constants::BATCH_ROWS_SCRIPT)?;
        let batch: Vec<BatchRow> = serde_json::from_value(value).map_err(|e| {
            AutomationError::DriverError(format!("malformed batch extraction payload: {e}"))
        })?;

        let rows = batch
            .into_iter()
            .map(|raw| {
                let mut row = Row {
                    element_id: raw.element_id,
                    fields: BTreeMap::new(),
                };
                for cell in raw.cells {
                    let column_name = cell.name.trim().to_lowercase();
                    let value = cell.text.trim().to_string();
                    if column_name.is_empty() || value.is_empty() {
                        continue;
                    }
                    row.fields.insert(
                        column_name.clone(),
                        Field {
                            element_id: cell.id.clone(),
                            value,
                            column: ColumnRef::parse(&cell.id),
                            column_name,
                        },
                    );
                }
                row
            })
            .collect();

        Ok(rows)
    }

    /// Walk the paged table and extract every record across all pages.
    ///
    /// The loop ends the first time the next-page control's image asset is
    /// not the known "enabled" one; that heuristic is the sole termination
    /// condition, with no page-count cap, mirroring the host UI's own
    /// paging model.
    #[instrument(skip(self))]
    pub async fn all_records(&self) -> Result<Vec<Row>, AutomationError> {
        let mut records = Vec::new();
        let mut page = 0u32;

        loop {
            page += 1;
            let counter = self.page_counter()?;
            info!(page, counter = %counter, "extracting records");

            let rows = self.page_rows()?;
            debug!(rows = rows.len(), "rows extracted");
            records.extend(rows);

            let next = self
                .driver
                .find_element(&By::id(constants::NEXT_PAGE_IMG_ID))?;
            let more_pages = next.attr_or_empty("source")? == constants::NEXT_PAGE_ON_ASSET;
            if !more_pages {
                break;
            }

            debug!("next page available, advancing");
            next.click()?;
            self.wait_until_ready().await?;
        }

        Ok(records)
    }

    /// The page indicator text ("1 - 20 of 134"), for diagnostics only;
    /// pagination never keys off it.
    fn page_counter(&self) -> Result<String, AutomationError> {
        match self.driver.find_element(&By::id(constants::PAGE_COUNTER_ID)) {
            Ok(counter) => Ok(counter.text()?.trim().to_string()),
            Err(AutomationError::ElementNotFound(_)) => {
                warn!("page counter not present in this view");
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }
}
