//! Supplier record type - vendors that provide quotations

use serde::{Deserialize, Serialize};

/// A supplier with tax and contact information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier
    pub id: String,

    /// Supplier name
    pub name: String,

    /// Tax identification number
    pub tax_id: String,

    /// Contact (e-mail address or phone)
    pub contact: String,
}

impl Supplier {
    /// Column headers for the suppliers table, in storage order
    pub const COLUMNS: [&'static str; 4] = ["id", "name", "tax_id", "contact"];

    /// Serialize into a storage row matching [`Supplier::COLUMNS`]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.tax_id.clone(),
            self.contact.clone(),
        ]
    }
}
