//! Automation engine for the IBM Maximo asset-management web UI.
//!
//! Maximo is a server-rendered, JavaScript-heavy application whose DOM
//! mutates asynchronously, with no automation API and no consistency
//! guarantees. This crate imposes order on that: a readiness oracle that
//! decides when the page is safe to touch, a dialog classifier for the
//! stacked modal overlays, a label-based resolver for form fields, cached
//! directories for sections and filters, and a paginating record
//! extractor.
//!
//! The engine is driver-agnostic. Anything implementing
//! [`driver::UiDriver`] can power it; the engine owns the session
//! exclusively and drives it as a single cooperative sequence of bounded
//! wait/act steps: one mutating action, then one readiness wait, never
//! two actions in flight.
//!
//! ```no_run
//! use std::sync::Arc;
//! use maximo::{Maximo, UiDriver};
//!
//! # async fn example(driver: Arc<dyn UiDriver>) -> Result<(), maximo::AutomationError> {
//! let maximo = Maximo::new(driver);
//! maximo.login("user", "secret").await?;
//! maximo.goto_section("changes").await?;
//! let records = maximo.all_records().await?;
//! println!("{} records", records.len());
//! maximo.logout().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

pub mod column;
pub mod constants;
pub mod dialog;
pub mod driver;
pub mod errors;
pub mod fields;
pub mod filters;
pub mod records;
pub mod sections;
pub mod session;
pub mod wait;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use column::ColumnRef;
pub use dialog::{classify_message, Dialog, DialogKind, MessagePattern};
pub use driver::{By, Element, ElementImpl, Key, UiDriver};
pub use errors::AutomationError;
pub use filters::Filter;
pub use records::{Field, Row};
pub use sections::{normalize_section_name, Section, SectionDirectory};
pub use session::CurrentApplication;
pub use wait::WaitConfig;
pub use workflow::RouteWorkflow;

/// The main entry point: an automation session over one Maximo UI.
///
/// Owns the driver handle exclusively; no two engine instances may drive
/// the same session. The section directory is the only session-scoped
/// cache; filters are re-derived per list view.
pub struct Maximo {
    driver: Arc<dyn UiDriver>,
    config: WaitConfig,
    sections: Mutex<SectionDirectory>,
}

impl Maximo {
    pub fn new(driver: Arc<dyn UiDriver>) -> Self {
        Self::with_config(driver, WaitConfig::default())
    }

    pub fn with_config(driver: Arc<dyn UiDriver>, config: WaitConfig) -> Self {
        Self {
            driver,
            config,
            sections: Mutex::new(SectionDirectory::default()),
        }
    }

    /// The underlying driver handle, for operations the engine does not
    /// cover.
    pub fn driver(&self) -> &Arc<dyn UiDriver> {
        &self.driver
    }

    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    pub(crate) fn sections_lock(&self) -> MutexGuard<'_, SectionDirectory> {
        // Single logical thread of control; a poisoned lock only means a
        // previous panic and the directory is safe to reuse or rebuild.
        self.sections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
