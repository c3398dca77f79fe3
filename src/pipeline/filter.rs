//! Filter engine - inclusion sets over item and supplier names

use std::collections::BTreeSet;

use crate::pipeline::QuoteRow;

/// User-selected inclusion sets for the joined view
///
/// `None` means "all distinct values present"; an explicitly empty set
/// selects nothing (and yields an empty view, not an error).
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Allowed supply item names
    pub items: Option<BTreeSet<String>>,

    /// Allowed supplier names
    pub suppliers: Option<BTreeSet<String>>,
}

impl Selection {
    /// The default selection: everything passes
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to the given item names
    pub fn with_items<I: IntoIterator<Item = String>>(mut self, items: I) -> Self {
        self.items = Some(items.into_iter().collect());
        self
    }

    /// Restrict to the given supplier names
    pub fn with_suppliers<I: IntoIterator<Item = String>>(mut self, suppliers: I) -> Self {
        self.suppliers = Some(suppliers.into_iter().collect());
        self
    }

    /// Build from CLI flag lists, where an empty list means "no restriction"
    pub fn from_flags(items: &[String], suppliers: &[String]) -> Self {
        let mut selection = Self::all();
        if !items.is_empty() {
            selection = selection.with_items(items.iter().cloned());
        }
        if !suppliers.is_empty() {
            selection = selection.with_suppliers(suppliers.iter().cloned());
        }
        selection
    }

    /// Does this row pass both inclusion sets?
    pub fn allows(&self, row: &QuoteRow) -> bool {
        let item_ok = self
            .items
            .as_ref()
            .is_none_or(|set| set.contains(&row.supply_name));
        let supplier_ok = self
            .suppliers
            .as_ref()
            .is_none_or(|set| set.contains(&row.supplier_name));
        item_ok && supplier_ok
    }
}

/// Apply a selection over the joined view, preserving row order
pub fn filter_rows(rows: &[QuoteRow], selection: &Selection) -> Vec<QuoteRow> {
    rows.iter()
        .filter(|row| selection.allows(row))
        .cloned()
        .collect()
}
