//! The quotation pipeline - pure transforms over the loaded tables
//!
//! Data flows one direction: join → filter → {best-price, aggregates,
//! order simulation}. Every step is a pure function; derived views are
//! recomputed on each command and never cached.

pub mod aggregate;
pub mod best;
pub mod filter;
pub mod join;
pub mod order;

pub use aggregate::{price_history, supplier_means, HistorySeries, PricePoint, SupplierMean};
pub use best::best_prices;
pub use filter::{filter_rows, Selection};
pub use join::{join_quotations, QuoteRow};
pub use order::{simulate_order, OrderError, OrderQuote};
