//! Supply record type - raw materials/items tracked for procurement

use serde::{Deserialize, Serialize};

/// A supply item (raw material) that quotations are collected for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    /// Unique identifier
    pub id: String,

    /// Item name
    pub name: String,

    /// Unit of measure (e.g. "kg", "bag", "m3")
    pub unit: String,

    /// Quantity on hand
    pub quantity: f64,
}

impl Supply {
    /// Column headers for the supplies table, in storage order
    pub const COLUMNS: [&'static str; 4] = ["id", "name", "unit", "quantity"];

    /// Serialize into a storage row matching [`Supply::COLUMNS`]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.unit.clone(),
            self.quantity.to_string(),
        ]
    }
}
