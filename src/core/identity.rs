//! Record identity - type-prefixed ULIDs for generated ids
//!
//! Uploaded tables bring their own ids (often plain numbers); records
//! registered through the CLI without an explicit `--id` get a prefixed
//! ULID so they never collide with uploaded rows.

use ulid::Ulid;

/// Table prefixes for generated record ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TablePrefix {
    /// Supply item
    Spl,
    /// Supplier
    Sup,
    /// Quotation
    Quo,
}

impl TablePrefix {
    /// Get the string representation of the prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            TablePrefix::Spl => "SPL",
            TablePrefix::Sup => "SUP",
            TablePrefix::Quo => "QUO",
        }
    }

    /// Generate a fresh record id, e.g. `QUO-01J8ZQ5T9V3N2X7C4B6M1K0RFD`
    pub fn generate(&self) -> String {
        format!("{}-{}", self.as_str(), Ulid::new())
    }
}

impl std::fmt::Display for TablePrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
