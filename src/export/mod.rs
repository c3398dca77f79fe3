//! Export module - workbook serialization and mail dispatch
//!
//! Serialization failures ([`ExportError`]) and mail-transport failures
//! ([`MailError`]) are distinct types so callers can report which stage
//! failed; a transport failure never invalidates a written workbook.

pub mod mail;
pub mod workbook;

pub use mail::{MailError, Mailer};
pub use workbook::{Cell, ExportError, ResultTable};
