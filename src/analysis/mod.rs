//! Aggregation and filter engines.
//!
//! Pure functions over fetched snapshots; nothing here touches the network.

pub mod aggregator;
pub mod filter;

pub use aggregator::{AnalyticsView, DashboardStats};
pub use filter::{CompanyFilter, FilterView};
