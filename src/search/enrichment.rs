//! Cross-entity enrichment of search results
//!
//! Vendor aggregates are computed in a single pass over the tenant's
//! contracts, grouped by `vendorId`, instead of one contract scan per vendor.

use crate::models::{Contract, EntityType, Vendor, VendorSummary};
use crate::search::sort::{SortField, SortKey, Sortable};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;

/// Contract aggregates for one vendor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorStats {
    pub contract_count: u64,
    pub active_contract_count: u64,
    pub total_value: f64,
}

/// A vendor with its contract aggregates
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorWithStats {
    #[serde(flatten)]
    pub vendor: Vendor,
    #[serde(flatten)]
    pub stats: VendorStats,
}

/// Group contracts by vendor and accumulate counts and parsed value
pub fn aggregate_vendor_stats(contracts: &[Contract]) -> HashMap<String, VendorStats> {
    let mut stats: HashMap<String, VendorStats> = HashMap::new();

    for contract in contracts {
        let Some(vendor_id) = contract.vendor_id.as_ref() else {
            continue;
        };
        let entry = stats.entry(vendor_id.clone()).or_default();
        entry.contract_count += 1;
        if contract.is_active() {
            entry.active_contract_count += 1;
        }
        entry.total_value += contract.value();
    }

    stats
}

impl VendorWithStats {
    /// Pair a vendor with its aggregates; vendors without contracts get zeroes
    pub fn from_stats(vendor: Vendor, stats: &HashMap<String, VendorStats>) -> Self {
        let stats = stats.get(&vendor.id).copied().unwrap_or_default();
        Self { vendor, stats }
    }
}

/// Distinct vendor IDs referenced by a page of contracts, in first-seen order
pub fn referenced_vendor_ids<'a>(contracts: impl IntoIterator<Item = &'a Contract>) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for vendor_id in contracts.into_iter().filter_map(|c| c.vendor_id.as_ref()) {
        if !ids.contains(vendor_id) {
            ids.push(vendor_id.clone());
        }
    }
    ids
}

/// Summary for a contract's vendor, `None` when unset or not resolved
pub fn vendor_summary_for(
    contract: &Contract,
    resolved: &HashMap<String, VendorSummary>,
) -> Option<VendorSummary> {
    contract
        .vendor_id
        .as_ref()
        .and_then(|id| resolved.get(id))
        .cloned()
}

impl Sortable for VendorWithStats {
    const ENTITY: EntityType = EntityType::Vendor;
    const SORT_FIELDS: &'static [SortField] = &[
        SortField::Relevance,
        SortField::Name,
        SortField::CreatedAt,
        SortField::Value,
        SortField::TotalValue,
        SortField::ContractCount,
    ];

    fn sort_key(&self, field: SortField) -> SortKey<'_> {
        match field {
            SortField::Name => SortKey::Text(Cow::Borrowed(&self.vendor.name)),
            SortField::CreatedAt => {
                SortKey::Number(self.vendor.created_at.timestamp_millis() as f64)
            }
            SortField::Value | SortField::TotalValue => SortKey::Number(self.stats.total_value),
            SortField::ContractCount => SortKey::Number(self.stats.contract_count as f64),
            _ => SortKey::Missing,
        }
    }

    fn sort_id(&self) -> &str {
        &self.vendor.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContractStatus;
    use crate::search::scoring::ScoredHit;
    use crate::search::sort::{sort_hits, SortOrder, SortSpec};

    #[test]
    fn test_aggregate_groups_by_vendor() {
        let contracts = vec![
            Contract::new("ent", "a")
                .with_vendor("v1")
                .with_status(ContractStatus::Active)
                .with_pricing("$1,000"),
            Contract::new("ent", "b")
                .with_vendor("v1")
                .with_status(ContractStatus::Expired)
                .with_pricing("250.50"),
            Contract::new("ent", "c").with_vendor("v2"),
            Contract::new("ent", "d"),
        ];

        let stats = aggregate_vendor_stats(&contracts);
        assert_eq!(stats.len(), 2);

        let v1 = stats["v1"];
        assert_eq!(v1.contract_count, 2);
        assert_eq!(v1.active_contract_count, 1);
        assert!((v1.total_value - 1250.5).abs() < 1e-9);

        let v2 = stats["v2"];
        assert_eq!(v2.contract_count, 1);
        assert_eq!(v2.total_value, 0.0);
    }

    #[test]
    fn test_vendors_without_contracts_get_zero_stats() {
        let idle = VendorWithStats::from_stats(Vendor::new("ent", "Idle"), &HashMap::new());
        assert_eq!(idle.stats, VendorStats::default());
    }

    #[test]
    fn test_sort_by_total_value_and_name() {
        let rows = vec![
            VendorWithStats {
                vendor: Vendor::new("ent", "B").with_id("vb"),
                stats: VendorStats {
                    total_value: 100.0,
                    ..Default::default()
                },
            },
            VendorWithStats {
                vendor: Vendor::new("ent", "A").with_id("va"),
                stats: VendorStats {
                    total_value: 200.0,
                    ..Default::default()
                },
            },
        ];
        let hits: Vec<_> = rows.into_iter().map(ScoredHit::unscored).collect();

        let by_value = sort_hits(
            hits.clone(),
            &SortSpec::new(SortField::TotalValue, SortOrder::Desc),
        );
        let names: Vec<_> = by_value.iter().map(|h| h.item.vendor.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        let by_name = sort_hits(hits, &SortSpec::new(SortField::Name, SortOrder::Asc));
        let names: Vec<_> = by_name.iter().map(|h| h.item.vendor.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_referenced_vendor_ids_are_distinct() {
        let contracts = vec![
            Contract::new("ent", "a").with_vendor("v2"),
            Contract::new("ent", "b"),
            Contract::new("ent", "c").with_vendor("v1"),
            Contract::new("ent", "d").with_vendor("v2"),
        ];
        assert_eq!(referenced_vendor_ids(&contracts), vec!["v2", "v1"]);
    }
}
