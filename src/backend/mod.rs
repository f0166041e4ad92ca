//! Remote data access.
//!
//! The backend owns every row; this module only reads snapshots.

pub mod cache;
pub mod client;
pub mod profile;
pub mod query;

pub use cache::QueryCache;
pub use client::{ClientConfig, RestClient};
pub use profile::{load_profile, ProfileTab, ProfileView, TabState};
pub use query::QueryKey;
