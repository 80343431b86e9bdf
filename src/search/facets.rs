//! Facet aggregation
//!
//! Two semantics coexist and are kept apart on purpose:
//!
//! * [`facets_over_candidates`] counts the full filtered candidate set before
//!   pagination (advanced per-entity endpoints).
//! * [`facets_over_visible_results`] counts only the truncated, visible result
//!   list returned by the fan-out search.

use crate::models::{Contract, User, Vendor};
use crate::search::service::EntityHit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the bucket for records without a categorical value
pub const OTHER_BUCKET: &str = "other";

/// Fixed contract value buckets as `(label, lower bound inclusive, upper bound exclusive)`
pub const VALUE_BUCKETS: [(&str, f64, f64); 5] = [
    ("0-10k", 0.0, 10_000.0),
    ("10k-50k", 10_000.0, 50_000.0),
    ("50k-100k", 50_000.0, 100_000.0),
    ("100k-500k", 100_000.0, 500_000.0),
    ("500k+", 500_000.0, f64::INFINITY),
];

/// Counts of one facet dimension, keyed by bucket label
pub type FacetCounts = BTreeMap<String, u64>;

/// Sum of the counts of one dimension
pub fn facet_total(counts: &FacetCounts) -> u64 {
    counts.values().sum()
}

fn tally(values: impl IntoIterator<Item = String>) -> FacetCounts {
    let mut counts = FacetCounts::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Bucket label for a parsed contract value
pub fn value_bucket(value: f64) -> &'static str {
    VALUE_BUCKETS
        .iter()
        .find(|(_, low, high)| value >= *low && value < *high)
        .map(|(label, _, _)| *label)
        // negative amounts land in the lowest bucket
        .unwrap_or(VALUE_BUCKETS[0].0)
}

/// Histogram over [`VALUE_BUCKETS`], every bucket present even when empty
fn value_histogram(values: impl IntoIterator<Item = f64>) -> FacetCounts {
    let mut histogram: FacetCounts = VALUE_BUCKETS
        .iter()
        .map(|(label, _, _)| (label.to_string(), 0))
        .collect();

    for value in values {
        *histogram.entry(value_bucket(value).to_string()).or_insert(0) += 1;
    }
    histogram
}

/// Contract facets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFacets {
    pub status: FacetCounts,
    pub contract_type: FacetCounts,
    pub value_range: FacetCounts,
}

/// Vendor facets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorFacets {
    pub category: FacetCounts,
}

/// User facets; users without a department are not counted under `department`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFacets {
    pub role: FacetCounts,
    pub department: FacetCounts,
}

/// Facets over the visible fan-out results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleFacets {
    pub entity_type: FacetCounts,
    pub contract_status: FacetCounts,
    pub vendor_category: FacetCounts,
    pub user_role: FacetCounts,
}

/// A record type with a facet breakdown
pub trait Faceted: Sized {
    type Facets;

    fn facets(candidates: &[Self]) -> Self::Facets;
}

impl Faceted for Contract {
    type Facets = ContractFacets;

    fn facets(candidates: &[Self]) -> ContractFacets {
        ContractFacets {
            status: tally(candidates.iter().map(|c| c.status.to_string())),
            contract_type: tally(candidates.iter().map(|c| {
                c.contract_type
                    .map_or_else(|| OTHER_BUCKET.to_string(), |t| t.to_string())
            })),
            value_range: value_histogram(candidates.iter().map(Contract::value)),
        }
    }
}

impl Faceted for Vendor {
    type Facets = VendorFacets;

    fn facets(candidates: &[Self]) -> VendorFacets {
        VendorFacets {
            category: tally(candidates.iter().map(|v| {
                v.category
                    .map_or_else(|| OTHER_BUCKET.to_string(), |c| c.to_string())
            })),
        }
    }
}

impl Faceted for User {
    type Facets = UserFacets;

    fn facets(candidates: &[Self]) -> UserFacets {
        UserFacets {
            role: tally(candidates.iter().map(|u| u.role.to_string())),
            department: tally(
                candidates
                    .iter()
                    .filter_map(|u| u.department.as_deref())
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
            ),
        }
    }
}

/// Facets over the filtered candidate set, before pagination
pub fn facets_over_candidates<T: Faceted>(candidates: &[T]) -> T::Facets {
    T::facets(candidates)
}

/// Facets over the truncated list a fan-out search returns
pub fn facets_over_visible_results(results: &[EntityHit]) -> VisibleFacets {
    let mut contract_status: Vec<String> = Vec::new();
    let mut vendor_category: Vec<String> = Vec::new();
    let mut user_role: Vec<String> = Vec::new();

    for hit in results {
        match hit {
            EntityHit::Contract(h) => contract_status.push(h.item.status.to_string()),
            EntityHit::Vendor(h) => vendor_category.push(
                h.item
                    .category
                    .map_or_else(|| OTHER_BUCKET.to_string(), |c| c.to_string()),
            ),
            EntityHit::User(h) => user_role.push(h.item.role.to_string()),
        }
    }

    VisibleFacets {
        entity_type: tally(results.iter().map(|hit| hit.entity_type().to_string())),
        contract_status: tally(contract_status),
        vendor_category: tally(vendor_category),
        user_role: tally(user_role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractStatus, ContractType, UserRole, VendorCategory};
    use crate::search::scoring::ScoredHit;

    fn counts(facets: &FacetCounts) -> Vec<(&str, u64)> {
        facets.iter().map(|(name, count)| (name.as_str(), *count)).collect()
    }

    #[test]
    fn test_value_histogram_buckets() {
        let contracts = vec![
            Contract::new("ent", "a").with_pricing("$5,000"),
            Contract::new("ent", "b").with_pricing("15000"),
            Contract::new("ent", "c").with_pricing("USD 250,000"),
        ];
        let facets = facets_over_candidates(&contracts);
        let json = serde_json::to_value(&facets).unwrap();
        assert_eq!(
            json["valueRange"],
            serde_json::json!({
                "0-10k": 1,
                "10k-50k": 1,
                "50k-100k": 0,
                "100k-500k": 1,
                "500k+": 0,
            })
        );
    }

    #[test]
    fn test_empty_candidates_keep_every_value_bucket() {
        let facets = facets_over_candidates::<Contract>(&[]);
        assert_eq!(facets.value_range.len(), VALUE_BUCKETS.len());
        assert_eq!(facet_total(&facets.value_range), 0);
        assert!(facets.status.is_empty());
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(value_bucket(0.0), "0-10k");
        assert_eq!(value_bucket(9_999.99), "0-10k");
        assert_eq!(value_bucket(10_000.0), "10k-50k");
        assert_eq!(value_bucket(500_000.0), "500k+");
        assert_eq!(value_bucket(-20.0), "0-10k");
    }

    #[test]
    fn test_missing_type_counts_as_other() {
        let contracts = vec![
            Contract::new("ent", "a").with_type(ContractType::Nda),
            Contract::new("ent", "b"),
            Contract::new("ent", "c").with_status(ContractStatus::Active),
        ];
        let facets = facets_over_candidates(&contracts);
        assert_eq!(counts(&facets.contract_type), vec![("nda", 1), ("other", 2)]);
        assert_eq!(counts(&facets.status), vec![("active", 1), ("draft", 2)]);
        assert_eq!(facet_total(&facets.status), contracts.len() as u64);
        assert_eq!(facet_total(&facets.value_range), contracts.len() as u64);
    }

    #[test]
    fn test_vendor_and_user_facets() {
        let vendors = vec![
            Vendor::new("ent", "a").with_category(VendorCategory::Legal),
            Vendor::new("ent", "b"),
        ];
        let facets = facets_over_candidates(&vendors);
        assert_eq!(counts(&facets.category), vec![("legal", 1), ("other", 1)]);

        let users = vec![
            User::new("ent", "a@example.com")
                .with_role(UserRole::Admin)
                .with_department("Legal"),
            User::new("ent", "b@example.com").with_role(UserRole::Admin),
            User::new("ent", "c@example.com").with_department("Legal"),
        ];
        let facets = facets_over_candidates(&users);
        assert_eq!(counts(&facets.role), vec![("admin", 2), ("user", 1)]);
        assert_eq!(counts(&facets.department), vec![("Legal", 2)]);
    }

    #[test]
    fn test_visible_facets_count_only_given_hits() {
        let results = vec![
            EntityHit::Contract(ScoredHit::unscored(
                Contract::new("ent", "a").with_status(ContractStatus::Active),
            )),
            EntityHit::Vendor(ScoredHit::unscored(Vendor::new("ent", "v"))),
            EntityHit::Contract(ScoredHit::unscored(Contract::new("ent", "b"))),
        ];
        let facets = facets_over_visible_results(&results);
        assert_eq!(counts(&facets.entity_type), vec![("contract", 2), ("vendor", 1)]);
        assert_eq!(counts(&facets.contract_status), vec![("active", 1), ("draft", 1)]);
        assert_eq!(counts(&facets.vendor_category), vec![("other", 1)]);
        assert!(facets.user_role.is_empty());
    }
}
