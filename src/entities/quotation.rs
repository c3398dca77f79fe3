//! Quotation record type - a supplier's offered price/terms for a supply

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A price quotation referencing one supply and one supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    /// Unique identifier
    pub id: String,

    /// Supply this quotation is for
    pub supply_id: String,

    /// Supplier offering the price
    pub supplier_id: String,

    /// Offered unit price (non-negative)
    pub unit_price: f64,

    /// Lead time in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,

    /// How many days the offer stays valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_days: Option<u32>,

    /// Quotation date (used for price history)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Quotation {
    /// Required column headers for the quotations table, in storage order.
    ///
    /// `date` is an optional extra column and not part of this list.
    pub const COLUMNS: [&'static str; 7] = [
        "id",
        "supply_id",
        "supplier_id",
        "unit_price",
        "lead_time_days",
        "validity_days",
        "notes",
    ];

    /// Column headers written by this toolkit (required columns plus `date`)
    pub const STORAGE_COLUMNS: [&'static str; 8] = [
        "id",
        "supply_id",
        "supplier_id",
        "unit_price",
        "lead_time_days",
        "validity_days",
        "notes",
        "date",
    ];

    /// Serialize into a storage row matching [`Quotation::STORAGE_COLUMNS`]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.supply_id.clone(),
            self.supplier_id.clone(),
            self.unit_price.to_string(),
            self.lead_time_days.map_or(String::new(), |d| d.to_string()),
            self.validity_days.map_or(String::new(), |d| d.to_string()),
            self.notes.clone().unwrap_or_default(),
            self.date.map_or(String::new(), |d| d.to_string()),
        ]
    }
}
