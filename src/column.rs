//! Column ordinals parsed out of generated DOM ids.
//!
//! Maximo embeds a positional marker of the form `[C:n]` inside table
//! header and cell ids. That string contract is fragile, so it is isolated
//! behind this one conversion boundary.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static COLUMN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[C:([0-9]+)\]").expect("column marker regex is valid"));

/// The positional index of a table column, used to correlate
/// header-derived filter metadata with data-row cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnRef(u32);

impl ColumnRef {
    pub fn new(index: u32) -> Self {
        ColumnRef(index)
    }

    /// Extract the column ordinal from a generated DOM id. `None` means
    /// the element cannot be correlated to a column.
    pub fn parse(dom_id: &str) -> Option<ColumnRef> {
        COLUMN_MARKER
            .captures(dom_id)
            .and_then(|caps| caps[1].parse().ok())
            .map(ColumnRef)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[C:{}]", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_marker_out_of_generated_id() {
        let id = "m6a7dfd2f_tbod_tdrow-tr[R:2]_tdrow[C:3]-c";
        assert_eq!(ColumnRef::parse(id), Some(ColumnRef::new(3)));
    }

    #[test]
    fn ids_without_marker_yield_none() {
        assert_eq!(ColumnRef::parse("m6a7dfd2f-lb3"), None);
        assert_eq!(ColumnRef::parse(""), None);
    }

    #[test]
    fn display_round_trips() {
        let column = ColumnRef::new(7);
        assert_eq!(ColumnRef::parse(&column.to_string()), Some(column));
    }
}
