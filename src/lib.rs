//! Contract Search
//!
//! Tenant-scoped relevance search, faceting and autocomplete over an
//! enterprise's contracts, vendors and users. Records are read from an
//! [`state::EntityStore`], ranked in memory by [`search::SearchService`] and
//! served over HTTP by the [`api`] router.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod search;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use search::{SearchError, SearchService};
