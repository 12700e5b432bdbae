//! # Services Module
//!
//! Remote ledger access for the Gullak client.
//!
//! ## Components
//!
//! - **View Query**: read-only contract queries and result-tuple parsing

pub mod view_query;

pub use view_query::{AccountInfo, ViewQueryService};
