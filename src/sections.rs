//! The GoTo-menu section directory.
//!
//! Built lazily from the navigation flyout on first use and cached for the
//! rest of the session; a forced rescan is the only invalidation short of
//! calling [`SectionDirectory::invalidate`] through the facade.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::constants;
use crate::driver::By;
use crate::errors::AutomationError;
use crate::Maximo;

/// One entry of the GoTo menu.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Normalized lookup key (lower-case, whitespace-collapsed, noise
    /// marker stripped).
    pub key: String,
    /// The menu entry's text as rendered, casing and marker preserved.
    pub display_name: String,
    pub element_id: String,
    /// Executable navigation reference. The anchor's `javascript:` prefix
    /// is stripped because the reference is invoked as a script, not a
    /// browser navigation.
    pub navigation_action: String,
}

/// Session-scoped name→section cache.
#[derive(Debug, Default)]
pub struct SectionDirectory {
    entries: HashMap<String, Section>,
}

impl SectionDirectory {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&Section> {
        self.entries.get(key)
    }

    /// Known keys, sorted for stable diagnostics.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, section: Section) {
        self.entries.insert(section.key.clone(), section);
    }
}

static JAVASCRIPT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^javascript:\s*").expect("javascript prefix regex is valid"));

/// Normalize a section name into its lookup key: strip the `(MP)` noise
/// marker, collapse whitespace, lower-case. Idempotent.
pub fn normalize_section_name(name: &str) -> String {
    let stripped = name.replace(constants::SECTION_NOISE_MARKER, "");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Maximo {
    /// The cached section directory, rebuilding it from the flyout when
    /// empty or when `force_rescan` is set.
    pub async fn sections(&self, force_rescan: bool) -> Result<Vec<Section>, AutomationError> {
        self.ensure_sections(force_rescan).await?;
        let directory = self.sections_lock();
        let mut sections: Vec<Section> = directory.entries.values().cloned().collect();
        sections.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(sections)
    }

    /// Drop the cached directory; the next lookup rescans the flyout.
    pub fn invalidate_sections(&self) {
        self.sections_lock().invalidate();
    }

    async fn ensure_sections(&self, force_rescan: bool) -> Result<(), AutomationError> {
        if !self.sections_lock().is_empty() && !force_rescan {
            return Ok(());
        }

        debug!("section directory empty, scanning the GoTo menu");
        self.driver
            .find_element(&By::id(constants::GOTO_BUTTON_ID))?
            .click()?;
        self.wait_element_present(
            &By::css(constants::GOTO_MENU_READY_CSS),
            self.config.timeout,
        )
        .await?;

        let mut directory = SectionDirectory::default();
        for anchor in self
            .driver
            .find_elements(&By::css(constants::SECTION_ANCHORS_CSS))?
        {
            let display_name = anchor.text()?.trim().to_string();
            let key = normalize_section_name(&display_name);
            if key.is_empty() {
                continue;
            }

            let href = anchor.attr_or_empty("href")?;
            directory.insert(Section {
                key,
                display_name,
                element_id: anchor.id_or_empty(),
                navigation_action: JAVASCRIPT_PREFIX.replace(&href, "").into_owned(),
            });
        }

        debug!(sections = directory.len(), "section directory cached");
        *self.sections_lock() = directory;
        Ok(())
    }

    /// Navigate to a section of the GoTo menu by (case-insensitive) name.
    ///
    /// An unknown name raises [`AutomationError::SectionNotFound`] listing
    /// every known key.
    #[instrument(skip(self))]
    pub async fn goto_section(&self, name: &str) -> Result<(), AutomationError> {
        self.ensure_sections(false).await?;

        let key = normalize_section_name(name);
        let section = {
            let directory = self.sections_lock();
            match directory.get(&key) {
                Some(section) => section.clone(),
                None => {
                    return Err(AutomationError::SectionNotFound {
                        name: name.to_string(),
                        known: directory.keys(),
                    })
                }
            }
        };

        self.driver.execute_script(&section.navigation_action)?;
        info!(section = %section.display_name, "navigated to section");
        self.wait_until_ready().await?;
        Ok(())
    }
}
