//! Search request types

use crate::models::EntityType;
use crate::search::filter::{ContractFilters, UserFilters, VendorFilters};
use crate::search::sort::SortRequest;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Upper bound on raw query text accepted by any operation (mirrored by the `length` validators)
pub const MAX_QUERY_LENGTH: u64 = 500;

/// Fan-out search across contracts, vendors and users
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchAllRequest {
    #[validate(length(max = 500))]
    pub query: String,

    /// Defaults to `default_limit`, capped at `max_limit`
    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub include_archived: bool,
}

impl SearchAllRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_archived(mut self, include_archived: bool) -> Self {
        self.include_archived = include_archived;
        self
    }
}

/// Contract search with structured filters, sort and pagination
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContractSearchRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub query: String,

    #[serde(default)]
    pub filters: ContractFilters,

    #[serde(default)]
    pub sort: Option<SortRequest>,

    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub offset: usize,
}

impl ContractSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: ContractFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortRequest) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Vendor search with category filters and sort
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VendorSearchRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub query: String,

    #[serde(default)]
    pub filters: VendorFilters,

    #[serde(default)]
    pub sort: Option<SortRequest>,

    #[serde(default)]
    pub limit: Option<usize>,
}

impl VendorSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: VendorFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortRequest) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// User directory search within the caller's enterprise
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub query: String,

    #[serde(default)]
    pub filters: UserFilters,

    #[serde(default)]
    pub limit: Option<usize>,
}

impl UserSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: UserFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Entity types an autocomplete request covers
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AutocompleteScope {
    #[default]
    All,
    Contracts,
    Vendors,
    Users,
}

impl AutocompleteScope {
    pub fn includes(&self, entity: EntityType) -> bool {
        match self {
            AutocompleteScope::All => true,
            AutocompleteScope::Contracts => entity == EntityType::Contract,
            AutocompleteScope::Vendors => entity == EntityType::Vendor,
            AutocompleteScope::Users => entity == EntityType::User,
        }
    }
}

/// Label suggestions for a partial query
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    #[validate(length(max = 500))]
    pub query: String,

    #[serde(default, rename = "type")]
    pub scope: AutocompleteScope,

    #[serde(default)]
    pub limit: Option<usize>,
}

impl AutocompleteRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_scope(mut self, scope: AutocompleteScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Resolve a requested page size against a default and an upper bound
pub fn clamp_limit(requested: Option<usize>, default: usize, max: usize) -> usize {
    requested.unwrap_or(default).clamp(1, max.max(1))
}
