//! PQT: Procurement Quote Toolkit
//!
//! A small toolkit for maintaining procurement tables (supplies, suppliers,
//! price quotations) as plain text files, with best-price reporting, order
//! simulation, and workbook/email export.

pub mod cli;
pub mod core;
pub mod entities;
pub mod export;
pub mod pipeline;
