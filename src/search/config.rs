//! Search configuration

use crate::models::EntityType;
use crate::search::error::{SearchError, SearchResult};
use crate::search::scoring::searchable_fields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Relevance weight per searchable field, namespaced by entity collection.
///
/// Serialized as a nested table so that configuration reads as
/// `[search.weights.contracts] title = 3.0`, i.e. the key `contracts.title`.
/// Field names are matched case-insensitively because layered configuration
/// sources may fold key case. Fields without an entry weigh
/// [`FieldWeights::DEFAULT_WEIGHT`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldWeights(BTreeMap<String, BTreeMap<String, f64>>);

impl FieldWeights {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    /// A table with no entries; every field weighs the default
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the weight of `{entity}.{field}`
    pub fn with_weight(mut self, entity: EntityType, field: &str, weight: f64) -> Self {
        self.0
            .entry(entity.namespace().to_string())
            .or_default()
            .insert(field.to_string(), weight);
        self
    }

    /// Weight of `{entity}.{field}`, looked up only in that entity's namespace
    pub fn weight(&self, entity: EntityType, field: &str) -> f64 {
        self.0
            .get(entity.namespace())
            .and_then(|fields| {
                fields
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(field))
                    .map(|(_, weight)| *weight)
            })
            .unwrap_or(Self::DEFAULT_WEIGHT)
    }

    /// Weights for a list of fields, in the same order
    pub fn resolve(&self, entity: EntityType, fields: &[&str]) -> Vec<f64> {
        fields.iter().map(|field| self.weight(entity, field)).collect()
    }

    /// Reject unknown namespaces, unknown fields and non-positive weights
    pub fn validate(&self) -> SearchResult<()> {
        for (namespace, fields) in &self.0 {
            let entity = EntityType::from_namespace(namespace).ok_or_else(|| {
                SearchError::InvalidConfiguration(format!(
                    "Unknown weight namespace '{}'",
                    namespace
                ))
            })?;
            let known = searchable_fields(entity);

            for (field, weight) in fields {
                if !known.iter().any(|k| k.eq_ignore_ascii_case(field)) {
                    return Err(SearchError::InvalidConfiguration(format!(
                        "'{}.{}' is not a searchable field",
                        namespace, field
                    )));
                }
                if !weight.is_finite() || *weight <= 0.0 {
                    return Err(SearchError::InvalidConfiguration(format!(
                        "Weight for '{}.{}' must be a positive number, got {}",
                        namespace, field, weight
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self::empty()
            .with_weight(EntityType::Contract, "title", 3.0)
            .with_weight(EntityType::Contract, "extractedParties", 2.5)
            .with_weight(EntityType::Contract, "fileName", 2.0)
            .with_weight(EntityType::Contract, "extractedScope", 1.5)
            .with_weight(EntityType::Contract, "notes", 1.0)
            .with_weight(EntityType::Vendor, "name", 3.0)
            .with_weight(EntityType::Vendor, "contactEmail", 2.0)
            .with_weight(EntityType::Vendor, "website", 1.5)
            .with_weight(EntityType::Vendor, "address", 1.0)
            .with_weight(EntityType::Vendor, "notes", 1.0)
            .with_weight(EntityType::User, "firstName", 2.5)
            .with_weight(EntityType::User, "lastName", 2.5)
            .with_weight(EntityType::User, "email", 2.0)
            .with_weight(EntityType::User, "title", 1.0)
            .with_weight(EntityType::User, "department", 1.0)
    }
}

/// Search engine configuration
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum trimmed query length for ranked search
    pub min_query_length: usize,

    /// Default result count for the fan-out search
    pub default_limit: usize,

    /// Hard cap on the fan-out search result count
    pub max_limit: usize,

    /// Default page size for the per-entity endpoints
    pub advanced_default_limit: usize,

    /// Hard cap on the per-entity page size
    pub advanced_max_limit: usize,

    /// Default number of autocomplete suggestions
    pub autocomplete_default_limit: usize,

    /// Hard cap on autocomplete suggestions
    pub autocomplete_max_limit: usize,

    /// Timeout for each document store read, in milliseconds
    pub store_timeout_ms: u64,

    /// Field relevance weights
    pub weights: FieldWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_length: 2,
            default_limit: 20,
            max_limit: 50,
            advanced_default_limit: 20,
            advanced_max_limit: 100,
            autocomplete_default_limit: 10,
            autocomplete_max_limit: 20,
            store_timeout_ms: 5_000,
            weights: FieldWeights::default(),
        }
    }
}

impl SearchConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Check limits and the weight table
    pub fn validate(&self) -> SearchResult<()> {
        let limits = [
            ("max_limit", self.default_limit, self.max_limit),
            (
                "advanced_max_limit",
                self.advanced_default_limit,
                self.advanced_max_limit,
            ),
            (
                "autocomplete_max_limit",
                self.autocomplete_default_limit,
                self.autocomplete_max_limit,
            ),
        ];
        for (name, default, max) in limits {
            if default == 0 || max == 0 {
                return Err(SearchError::InvalidConfiguration(format!(
                    "{} and its default must be positive",
                    name
                )));
            }
            if default > max {
                return Err(SearchError::InvalidConfiguration(format!(
                    "default limit {} exceeds {} {}",
                    default, name, max
                )));
            }
        }
        if self.store_timeout_ms == 0 {
            return Err(SearchError::InvalidConfiguration(
                "store_timeout_ms must be positive".to_string(),
            ));
        }
        self.weights.validate()
    }
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn min_query_length(mut self, len: usize) -> Self {
        self.config.min_query_length = len;
        self
    }

    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.default_limit = limit;
        self
    }

    pub fn max_limit(mut self, limit: usize) -> Self {
        self.config.max_limit = limit;
        self
    }

    pub fn advanced_max_limit(mut self, limit: usize) -> Self {
        self.config.advanced_max_limit = limit;
        self
    }

    pub fn autocomplete_max_limit(mut self, limit: usize) -> Self {
        self.config.autocomplete_max_limit = limit;
        self
    }

    pub fn store_timeout_ms(mut self, ms: u64) -> Self {
        self.config.store_timeout_ms = ms;
        self
    }

    pub fn weights(mut self, weights: FieldWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
