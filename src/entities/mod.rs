//! Record type definitions
//!
//! PQT tracks three base tables:
//!
//! - [`Supply`] - Raw materials/items tracked for procurement
//! - [`Supplier`] - Vendors with tax id and contact info
//! - [`Quotation`] - A supplier's offered price/terms for a supply item

pub mod quotation;
pub mod supplier;
pub mod supply;

pub use quotation::Quotation;
pub use supplier::Supplier;
pub use supply::Supply;
