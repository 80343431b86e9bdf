//! Tenant-scoped relevance search over contracts, vendors and users
//!
//! The document store offers no relevance index, so every query reads the
//! caller's collections and ranks them in memory:
//!
//! - **Scoring**: weighted substring matching over a fixed field list per entity type
//! - **Filtering**: status, type, vendor, creation date and value constraints
//! - **Sorting**: a closed set of sort keys with an ID tie-break
//! - **Faceting**: group-by counts over candidates or over the visible results
//! - **Fan-out**: contracts, vendors and users read and scored concurrently
//! - **Autocomplete**: label suggestions by substring match
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │           Search Service API                     │
//! ├─────────────────────────────────────────────────┤
//! │  - search_all()     - search_contracts_...()    │
//! │  - autocomplete()   - search_vendors_...()      │
//! │                     - search_users_...()        │
//! └─────────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────────┐
//! │   filter → score → sort → page → facets          │
//! └─────────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────────┐
//! │      EntityStore (tenant-scoped reads)           │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use contract_search::auth::Identity;
//! use contract_search::search::{SearchAllRequest, SearchConfig, SearchService};
//! use contract_search::state::create_in_memory_store;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = create_in_memory_store();
//!     let search = SearchService::with_store(store, SearchConfig::default())?;
//!
//!     let caller = Identity::new("user-1");
//!     let results = search
//!         .search_all(Some(&caller), SearchAllRequest::new("acme").with_limit(20))
//!         .await?;
//!     println!("Found {} results", results.total_results);
//!
//!     Ok(())
//! }
//! ```

mod autocomplete;
mod config;
mod enrichment;
mod error;
mod facets;
mod filter;
mod query;
mod scoring;
mod service;
mod sort;

pub use autocomplete::Suggestion;
pub use config::{FieldWeights, SearchConfig, SearchConfigBuilder};
pub use enrichment::{aggregate_vendor_stats, VendorStats, VendorWithStats};
pub use error::{SearchError, SearchResult};
pub use facets::{
    facet_total, facets_over_candidates, facets_over_visible_results, value_bucket,
    ContractFacets, FacetCounts, Faceted, UserFacets, VendorFacets, VisibleFacets, VALUE_BUCKETS,
};
pub use filter::{
    filter_contracts, filter_users, filter_vendors, ContractFilters, DateRange, UserFilters,
    ValueRange, VendorFilters,
};
pub use query::{
    AutocompleteRequest, AutocompleteScope, ContractSearchRequest, SearchAllRequest,
    UserSearchRequest, VendorSearchRequest,
};
pub use scoring::{normalize_query, score_record, score_records, ScoredHit, Searchable};
pub use service::{
    AutocompleteResponse, ByType, ContractSearchResponse, EntityHit, Ranked, RankedContract,
    SearchAllResponse, SearchService, UserSearchResponse, VendorSearchResponse,
};
pub use sort::{sort_hits, SortField, SortKey, SortOrder, SortRequest, SortSpec, Sortable};
