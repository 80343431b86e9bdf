//! Search service orchestrating the fan-out, per-entity and autocomplete operations

use crate::auth::{Identity, IdentityResolver, StoreIdentityResolver};
use crate::metrics::{measure_search, observe_store_read, ResultCount};
use crate::models::{Contract, EntityType, User, Vendor, VendorSummary};
use crate::search::autocomplete::{suggest, Suggestion};
use crate::search::config::SearchConfig;
use crate::search::enrichment::{
    aggregate_vendor_stats, referenced_vendor_ids, vendor_summary_for, VendorWithStats,
};
use crate::search::error::{SearchError, SearchResult};
use crate::search::facets::{
    facets_over_candidates, facets_over_visible_results, ContractFacets, UserFacets, VendorFacets,
    VisibleFacets,
};
use crate::search::filter::{filter_contracts, filter_users, filter_vendors};
use crate::search::query::{
    clamp_limit, AutocompleteRequest, ContractSearchRequest, SearchAllRequest, UserSearchRequest,
    VendorSearchRequest,
};
use crate::search::scoring::{normalize_query, score_records, ScoredHit, Searchable};
use crate::search::sort::{sort_hits, SortSpec};
use crate::state::EntityStore;
use futures::future::try_join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use validator::Validate;

/// A ranked hit of any entity type, tagged with `type`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityHit {
    Contract(ScoredHit<Contract>),
    Vendor(ScoredHit<Vendor>),
    User(ScoredHit<User>),
}

impl EntityHit {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityHit::Contract(_) => EntityType::Contract,
            EntityHit::Vendor(_) => EntityType::Vendor,
            EntityHit::User(_) => EntityType::User,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            EntityHit::Contract(hit) => hit.score,
            EntityHit::Vendor(hit) => hit.score,
            EntityHit::User(hit) => hit.score,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            EntityHit::Contract(hit) => &hit.item.id,
            EntityHit::Vendor(hit) => &hit.item.id,
            EntityHit::User(hit) => &hit.item.id,
        }
    }

    pub fn enterprise_id(&self) -> &str {
        match self {
            EntityHit::Contract(hit) => &hit.item.enterprise_id,
            EntityHit::Vendor(hit) => &hit.item.enterprise_id,
            EntityHit::User(hit) => &hit.item.enterprise_id,
        }
    }
}

/// Per-type slices of a fan-out search
#[derive(Debug, Clone, Default, Serialize)]
pub struct ByType {
    pub contracts: Vec<ScoredHit<Contract>>,
    pub vendors: Vec<ScoredHit<Vendor>>,
    pub users: Vec<ScoredHit<User>>,
}

/// Fan-out search response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAllResponse {
    /// Merged hits, best first, truncated to the limit
    pub results: Vec<EntityHit>,

    /// Each entity type truncated to a third of the limit
    pub by_type: ByType,

    /// Merged hit count before truncation
    pub total_results: usize,

    pub query: String,

    /// Counts over `results` only
    pub facets: VisibleFacets,
}

impl SearchAllResponse {
    fn empty(query: String) -> Self {
        Self {
            results: Vec::new(),
            by_type: ByType::default(),
            total_results: 0,
            query,
            facets: VisibleFacets::default(),
        }
    }
}

/// A record with its relevance and matched fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub item: T,
    pub relevance: f64,
    pub highlights: Vec<&'static str>,
}

impl<T> From<ScoredHit<T>> for Ranked<T> {
    fn from(hit: ScoredHit<T>) -> Self {
        Self {
            item: hit.item,
            relevance: hit.score,
            highlights: hit.highlights,
        }
    }
}

/// Contract result with its vendor summary, `None` when the vendor is unset or unresolvable
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedContract {
    #[serde(flatten)]
    pub ranked: Ranked<Contract>,
    pub vendor: Option<VendorSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSearchResponse {
    pub results: Vec<RankedContract>,
    /// Scored candidates across all pages
    pub total: usize,
    pub has_more: bool,
    /// Counts over the filtered candidate set, ignoring the text query and pagination
    pub facets: ContractFacets,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSearchResponse {
    pub results: Vec<Ranked<VendorWithStats>>,
    pub total: usize,
    pub facets: VendorFacets,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResponse {
    pub results: Vec<Ranked<User>>,
    pub total: usize,
    pub facets: UserFacets,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<Suggestion>,
}

impl ResultCount for SearchAllResponse {
    fn result_count(&self) -> usize {
        self.results.len()
    }
}

impl ResultCount for ContractSearchResponse {
    fn result_count(&self) -> usize {
        self.results.len()
    }
}

impl ResultCount for VendorSearchResponse {
    fn result_count(&self) -> usize {
        self.results.len()
    }
}

impl ResultCount for UserSearchResponse {
    fn result_count(&self) -> usize {
        self.results.len()
    }
}

impl ResultCount for AutocompleteResponse {
    fn result_count(&self) -> usize {
        self.suggestions.len()
    }
}

/// Relevance search over a tenant's contracts, vendors and users
///
/// Stateless: every call resolves the caller, re-reads the tenant's
/// collections and recomputes scores. Every store read is bounded by
/// `store_timeout_ms`, and any failed or expired read fails the whole call.
#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn EntityStore>,
    identity: Arc<dyn IdentityResolver>,
    config: Arc<SearchConfig>,
}

impl SearchService {
    /// Create a service after validating the configuration
    pub fn new(
        store: Arc<dyn EntityStore>,
        identity: Arc<dyn IdentityResolver>,
        config: SearchConfig,
    ) -> SearchResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            identity,
            config: Arc::new(config),
        })
    }

    /// Create a service that resolves callers from the store's user collection
    pub fn with_store(store: Arc<dyn EntityStore>, config: SearchConfig) -> SearchResult<Self> {
        let identity = Arc::new(StoreIdentityResolver::new(store.clone()));
        Self::new(store, identity, config)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolve the caller to a user, bounded by the store timeout
    async fn caller(&self, identity: Option<&Identity>) -> SearchResult<User> {
        let started = Instant::now();
        match tokio::time::timeout(self.config.store_timeout(), self.identity.resolve(identity))
            .await
        {
            Ok(result) => {
                let outcome = if result.is_ok() { "success" } else { "error" };
                observe_store_read("identity", outcome, started);
                result
            }
            Err(_) => {
                observe_store_read("identity", "timeout", started);
                warn!(timeout_ms = self.config.store_timeout_ms, "Identity resolution timed out");
                Err(self.timeout_error("resolve identity"))
            }
        }
    }

    /// Await one store read under the configured deadline
    async fn read<T, F>(&self, collection: &'static str, read: F) -> SearchResult<T>
    where
        F: Future<Output = crate::error::Result<T>>,
    {
        let started = Instant::now();
        match tokio::time::timeout(self.config.store_timeout(), read).await {
            Ok(Ok(records)) => {
                observe_store_read(collection, "success", started);
                Ok(records)
            }
            Ok(Err(e)) => {
                observe_store_read(collection, "error", started);
                warn!(collection, error = %e, "Store read failed");
                Err(SearchError::StoreFailed(e.to_string()))
            }
            Err(_) => {
                observe_store_read(collection, "timeout", started);
                warn!(
                    collection,
                    timeout_ms = self.config.store_timeout_ms,
                    "Store read timed out"
                );
                Err(self.timeout_error(&format!("read {}", collection)))
            }
        }
    }

    fn timeout_error(&self, operation: &str) -> SearchError {
        SearchError::Timeout {
            operation: operation.to_string(),
            timeout_ms: self.config.store_timeout_ms,
        }
    }

    /// Normalized query when it meets the minimum length for ranked search
    fn ranked_query(&self, raw: &str) -> Option<String> {
        let query = normalize_query(raw);
        (query.chars().count() >= self.config.min_query_length).then_some(query)
    }

    /// Score when the query is long enough, otherwise keep everything at relevance 1
    fn score_or_list<T: Searchable>(&self, records: Vec<T>, query: Option<&str>) -> Vec<ScoredHit<T>> {
        match query {
            Some(query) => score_records(records, query, &self.config.weights),
            None => records.into_iter().map(ScoredHit::unscored).collect(),
        }
    }

    /// Unified search across contracts, vendors and users
    pub async fn search_all(
        &self,
        identity: Option<&Identity>,
        request: SearchAllRequest,
    ) -> SearchResult<SearchAllResponse> {
        measure_search("search_all", self.run_search_all(identity, request)).await
    }

    async fn run_search_all(
        &self,
        identity: Option<&Identity>,
        request: SearchAllRequest,
    ) -> SearchResult<SearchAllResponse> {
        request.validate()?;
        let user = self.caller(identity).await?;
        let enterprise_id = user.enterprise_id.as_str();

        let Some(query) = self.ranked_query(&request.query) else {
            debug!(
                enterprise_id,
                query_len = request.query.trim().chars().count(),
                "Query below minimum length, returning empty results"
            );
            return Ok(SearchAllResponse::empty(request.query));
        };

        let limit = clamp_limit(request.limit, self.config.default_limit, self.config.max_limit);
        let started = Instant::now();

        let (contracts, vendors, users) = tokio::try_join!(
            self.read("contracts", self.store.list_contracts(enterprise_id)),
            self.read("vendors", self.store.list_vendors(enterprise_id)),
            self.read("users", self.store.list_users(enterprise_id)),
        )?;

        let contracts: Vec<Contract> = if request.include_archived {
            contracts
        } else {
            contracts.into_iter().filter(|c| !c.is_archived()).collect()
        };

        let weights = &self.config.weights;
        let mut contract_hits = score_records(contracts, &query, weights);
        let mut vendor_hits = score_records(vendors, &query, weights);
        let mut user_hits = score_records(users, &query, weights);
        contract_hits.truncate(limit);
        vendor_hits.truncate(limit);
        user_hits.truncate(limit);

        let mut merged: Vec<EntityHit> = contract_hits
            .iter()
            .cloned()
            .map(EntityHit::Contract)
            .chain(vendor_hits.iter().cloned().map(EntityHit::Vendor))
            .chain(user_hits.iter().cloned().map(EntityHit::User))
            .collect();
        let total_results = merged.len();

        // stable: equal scores keep contracts, vendors, users order
        merged.sort_by(|a, b| b.score().total_cmp(&a.score()));
        merged.truncate(limit);

        let per_type = limit / 3;
        contract_hits.truncate(per_type);
        vendor_hits.truncate(per_type);
        user_hits.truncate(per_type);

        let facets = facets_over_visible_results(&merged);

        info!(
            enterprise_id,
            operation = "search_all",
            query_len = query.chars().count(),
            results = merged.len(),
            total_results,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search completed"
        );

        Ok(SearchAllResponse {
            results: merged,
            by_type: ByType {
                contracts: contract_hits,
                vendors: vendor_hits,
                users: user_hits,
            },
            total_results,
            query: request.query,
            facets,
        })
    }

    /// Contract search with filters, sort, pagination and vendor enrichment
    pub async fn search_contracts_with_advanced_filters(
        &self,
        identity: Option<&Identity>,
        request: ContractSearchRequest,
    ) -> SearchResult<ContractSearchResponse> {
        measure_search("search_contracts", self.run_contract_search(identity, request)).await
    }

    async fn run_contract_search(
        &self,
        identity: Option<&Identity>,
        request: ContractSearchRequest,
    ) -> SearchResult<ContractSearchResponse> {
        request.validate()?;
        let sort = match &request.sort {
            Some(sort) => sort.resolve::<Contract>()?,
            None => SortSpec::default(),
        };
        // malformed date bounds fail before any store read
        if let Some(range) = &request.filters.date_range {
            range.resolve()?;
        }
        let user = self.caller(identity).await?;
        let enterprise_id = user.enterprise_id.as_str();

        let limit = clamp_limit(
            request.limit,
            self.config.advanced_default_limit,
            self.config.advanced_max_limit,
        );
        let offset = request.offset;
        let started = Instant::now();

        let contracts = self
            .read("contracts", self.store.list_contracts(enterprise_id))
            .await?;
        let candidates = filter_contracts(contracts, &request.filters)?;
        let facets = facets_over_candidates(&candidates);

        let query = self.ranked_query(&request.query);
        let hits = sort_hits(self.score_or_list(candidates, query.as_deref()), &sort);
        let total = hits.len();

        let page: Vec<ScoredHit<Contract>> = hits.into_iter().skip(offset).take(limit).collect();
        let vendors = self.resolve_vendors(enterprise_id, &page).await?;

        let results = page
            .into_iter()
            .map(|hit| {
                let vendor = vendor_summary_for(&hit.item, &vendors);
                RankedContract {
                    ranked: Ranked::from(hit),
                    vendor,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            enterprise_id,
            operation = "search_contracts",
            total,
            offset,
            limit,
            results = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Contract search completed"
        );

        Ok(ContractSearchResponse {
            results,
            total,
            has_more: offset.saturating_add(limit) < total,
            facets,
        })
    }

    /// Look up the vendors referenced by a page of contracts
    ///
    /// Vendors that are missing or belong to another tenant are left out.
    async fn resolve_vendors(
        &self,
        enterprise_id: &str,
        page: &[ScoredHit<Contract>],
    ) -> SearchResult<HashMap<String, VendorSummary>> {
        let ids = referenced_vendor_ids(page.iter().map(|hit| &hit.item));

        let lookups = ids
            .iter()
            .map(|id| self.read("vendor", self.store.get_vendor(id)));
        let found = try_join_all(lookups).await?;

        let mut resolved = HashMap::new();
        for (id, vendor) in ids.iter().zip(found) {
            match vendor {
                Some(vendor) if vendor.enterprise_id == enterprise_id => {
                    resolved.insert(id.clone(), VendorSummary::from(&vendor));
                }
                Some(_) => {
                    warn!(enterprise_id, vendor_id = %id, "Contract references a vendor of another enterprise");
                }
                None => {
                    warn!(enterprise_id, vendor_id = %id, "Contract references a missing vendor");
                }
            }
        }
        Ok(resolved)
    }

    /// Vendor search with category filters, contract aggregates and sort
    pub async fn search_vendors_with_filters(
        &self,
        identity: Option<&Identity>,
        request: VendorSearchRequest,
    ) -> SearchResult<VendorSearchResponse> {
        measure_search("search_vendors", self.run_vendor_search(identity, request)).await
    }

    async fn run_vendor_search(
        &self,
        identity: Option<&Identity>,
        request: VendorSearchRequest,
    ) -> SearchResult<VendorSearchResponse> {
        request.validate()?;
        let sort = match &request.sort {
            Some(sort) => sort.resolve::<VendorWithStats>()?,
            None => SortSpec::default(),
        };
        let user = self.caller(identity).await?;
        let enterprise_id = user.enterprise_id.as_str();

        let limit = clamp_limit(
            request.limit,
            self.config.advanced_default_limit,
            self.config.advanced_max_limit,
        );

        let (vendors, contracts) = tokio::try_join!(
            self.read("vendors", self.store.list_vendors(enterprise_id)),
            self.read("contracts", self.store.list_contracts(enterprise_id)),
        )?;

        let candidates = filter_vendors(vendors, &request.filters);
        let facets = facets_over_candidates(&candidates);
        let stats = aggregate_vendor_stats(&contracts);

        let query = self.ranked_query(&request.query);
        let hits: Vec<ScoredHit<VendorWithStats>> = self
            .score_or_list(candidates, query.as_deref())
            .into_iter()
            .map(|hit| hit.map(|vendor| VendorWithStats::from_stats(vendor, &stats)))
            .collect();
        let hits = sort_hits(hits, &sort);
        let total = hits.len();

        let results: Vec<Ranked<VendorWithStats>> =
            hits.into_iter().take(limit).map(Ranked::from).collect();

        debug!(
            enterprise_id,
            operation = "search_vendors",
            total,
            results = results.len(),
            "Vendor search completed"
        );

        Ok(VendorSearchResponse {
            results,
            total,
            facets,
        })
    }

    /// User directory search within the caller's enterprise
    pub async fn search_users_within_enterprise(
        &self,
        identity: Option<&Identity>,
        request: UserSearchRequest,
    ) -> SearchResult<UserSearchResponse> {
        measure_search("search_users", self.run_user_search(identity, request)).await
    }

    async fn run_user_search(
        &self,
        identity: Option<&Identity>,
        request: UserSearchRequest,
    ) -> SearchResult<UserSearchResponse> {
        request.validate()?;
        let user = self.caller(identity).await?;
        let enterprise_id = user.enterprise_id.as_str();

        let limit = clamp_limit(
            request.limit,
            self.config.advanced_default_limit,
            self.config.advanced_max_limit,
        );

        let users = self.read("users", self.store.list_users(enterprise_id)).await?;
        let candidates = filter_users(users, &request.filters);
        let facets = facets_over_candidates(&candidates);

        let query = self.ranked_query(&request.query);
        let hits = sort_hits(
            self.score_or_list(candidates, query.as_deref()),
            &SortSpec::default(),
        );
        let total = hits.len();
        let results: Vec<Ranked<User>> = hits.into_iter().take(limit).map(Ranked::from).collect();

        debug!(
            enterprise_id,
            operation = "search_users",
            total,
            results = results.len(),
            "User search completed"
        );

        Ok(UserSearchResponse {
            results,
            total,
            facets,
        })
    }

    /// Label suggestions for a partial query
    pub async fn autocomplete(
        &self,
        identity: Option<&Identity>,
        request: AutocompleteRequest,
    ) -> SearchResult<AutocompleteResponse> {
        measure_search("autocomplete", self.run_autocomplete(identity, request)).await
    }

    async fn run_autocomplete(
        &self,
        identity: Option<&Identity>,
        request: AutocompleteRequest,
    ) -> SearchResult<AutocompleteResponse> {
        request.validate()?;
        let user = self.caller(identity).await?;
        let enterprise_id = user.enterprise_id.as_str();

        let needle = normalize_query(&request.query);
        if needle.is_empty() {
            return Ok(AutocompleteResponse::default());
        }

        let limit = clamp_limit(
            request.limit,
            self.config.autocomplete_default_limit,
            self.config.autocomplete_max_limit,
        );
        let scope = request.scope;

        let (contracts, vendors, users) = tokio::try_join!(
            async {
                if scope.includes(EntityType::Contract) {
                    self.read("contracts", self.store.list_contracts(enterprise_id)).await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if scope.includes(EntityType::Vendor) {
                    self.read("vendors", self.store.list_vendors(enterprise_id)).await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if scope.includes(EntityType::User) {
                    self.read("users", self.store.list_users(enterprise_id)).await
                } else {
                    Ok(Vec::new())
                }
            },
        )?;

        let suggestions = suggest(&contracts, &vendors, &users, &needle, limit);
        debug!(
            enterprise_id,
            operation = "autocomplete",
            scope = %scope,
            results = suggestions.len(),
            "Autocomplete completed"
        );

        Ok(AutocompleteResponse { suggestions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContractStatus;
    use crate::state::InMemoryStore;

    fn service_with(store: InMemoryStore) -> SearchService {
        SearchService::with_store(Arc::new(store), SearchConfig::default()).unwrap()
    }

    fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.save_user(User::new("ent", "owner@example.com").with_id("u1"));
        store.save_contract(
            Contract::new("ent", "Acme MSA")
                .with_id("c1")
                .with_status(ContractStatus::Active),
        );
        store.save_contract(
            Contract::new("ent", "Acme NDA")
                .with_id("c2")
                .with_status(ContractStatus::Archived),
        );
        store
    }

    #[tokio::test]
    async fn test_archived_contracts_excluded_by_default() {
        let service = service_with(seeded());
        let caller = Identity::new("u1");

        let response = service
            .search_all(Some(&caller), SearchAllRequest::new("acme"))
            .await
            .unwrap();
        let ids: Vec<_> = response.results.iter().map(EntityHit::id).collect();
        assert_eq!(ids, vec!["c1"]);

        let response = service
            .search_all(Some(&caller), SearchAllRequest::new("acme").with_archived(true))
            .await
            .unwrap();
        assert_eq!(response.total_results, 2);
    }

    #[tokio::test]
    async fn test_short_query_is_not_an_error() {
        let service = service_with(seeded());
        let response = service
            .search_all(Some(&Identity::new("u1")), SearchAllRequest::new(" a "))
            .await
            .unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.total_results, 0);
    }

    #[tokio::test]
    async fn test_invalid_sort_fails_before_reading() {
        let service = service_with(seeded());
        let request = ContractSearchRequest::new("acme").with_sort(
            crate::search::sort::SortRequest::new("contractCount", Default::default()),
        );
        let err = service
            .search_contracts_with_advanced_filters(Some(&Identity::new("u1")), request)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidSort { entity: EntityType::Contract, .. }));
    }

    #[test]
    fn test_entity_hit_serializes_with_type_tag() {
        let hit = EntityHit::Vendor(ScoredHit::unscored(Vendor::new("ent", "Acme").with_id("v1")));
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["type"], "vendor");
        assert_eq!(json["item"]["id"], "v1");
        assert_eq!(json["score"], 1.0);
    }

    #[test]
    fn test_ranked_contract_flattens_record() {
        let ranked = RankedContract {
            ranked: Ranked::from(ScoredHit::unscored(Contract::new("ent", "Acme").with_id("c1"))),
            vendor: None,
        };
        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["relevance"], 1.0);
        assert!(json["vendor"].is_null());
    }
}
