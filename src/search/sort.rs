//! Result ordering over a closed set of sort keys

use crate::models::{Contract, EntityType, User};
use crate::search::error::{SearchError, SearchResult};
use crate::search::scoring::ScoredHit;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;
use strum::{Display, EnumString};

/// Sort order for search results
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "ascending")]
    Asc,
    #[default]
    #[serde(alias = "descending")]
    Desc,
}

/// Field to sort by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    Relevance,
    Title,
    Name,
    CreatedAt,
    Value,
    TotalValue,
    EndDate,
    ContractCount,
}

/// A validated sort specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Relevance,
            order: SortOrder::Desc,
        }
    }
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// Sort specification as received from callers, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortRequest {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortRequest {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Map the requested field onto a key the entity type supports
    pub fn resolve<T: Sortable>(&self) -> SearchResult<SortSpec> {
        let invalid = || SearchError::InvalidSort {
            field: self.field.clone(),
            entity: T::ENTITY,
        };
        let field = SortField::from_str(&self.field).map_err(|_| invalid())?;
        if !T::SORT_FIELDS.contains(&field) {
            return Err(invalid());
        }
        Ok(SortSpec::new(field, self.order))
    }
}

/// Value a record exposes for one sort field
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey<'a> {
    Number(f64),
    Text(Cow<'a, str>),
    Date(NaiveDate),
    Missing,
}

/// An entity type that can be ordered by the sort engine
pub trait Sortable {
    const ENTITY: EntityType;

    /// Fields accepted for this entity type (always includes relevance)
    const SORT_FIELDS: &'static [SortField];

    /// Key for a non-relevance field listed in `SORT_FIELDS`
    fn sort_key(&self, field: SortField) -> SortKey<'_>;

    /// Secondary key for deterministic ties
    fn sort_id(&self) -> &str;
}

fn compare_present(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
    match (a, b) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        (SortKey::Date(x), SortKey::Date(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Compare two keys; missing values order last in both directions
fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>, order: SortOrder) -> Ordering {
    match (a, b) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        (SortKey::Missing, _) => Ordering::Greater,
        (_, SortKey::Missing) => Ordering::Less,
        _ => {
            let ordering = compare_present(a, b);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        }
    }
}

/// Order hits by `spec`, breaking ties by ascending ID
pub fn sort_hits<T: Sortable>(mut hits: Vec<ScoredHit<T>>, spec: &SortSpec) -> Vec<ScoredHit<T>> {
    hits.sort_by(|a, b| {
        let primary = match spec.field {
            SortField::Relevance => compare_keys(
                &SortKey::Number(a.score),
                &SortKey::Number(b.score),
                spec.order,
            ),
            field => compare_keys(&a.item.sort_key(field), &b.item.sort_key(field), spec.order),
        };
        primary.then_with(|| a.item.sort_id().cmp(b.item.sort_id()))
    });
    hits
}

impl Sortable for Contract {
    const ENTITY: EntityType = EntityType::Contract;
    const SORT_FIELDS: &'static [SortField] = &[
        SortField::Relevance,
        SortField::Title,
        SortField::CreatedAt,
        SortField::Value,
        SortField::TotalValue,
        SortField::EndDate,
    ];

    fn sort_key(&self, field: SortField) -> SortKey<'_> {
        match field {
            SortField::Title => SortKey::Text(Cow::Borrowed(&self.title)),
            SortField::CreatedAt => SortKey::Number(self.created_at.timestamp_millis() as f64),
            SortField::Value | SortField::TotalValue => SortKey::Number(self.value()),
            SortField::EndDate => self.end_date().map_or(SortKey::Missing, SortKey::Date),
            _ => SortKey::Missing,
        }
    }

    fn sort_id(&self) -> &str {
        &self.id
    }
}

impl Sortable for User {
    const ENTITY: EntityType = EntityType::User;
    const SORT_FIELDS: &'static [SortField] =
        &[SortField::Relevance, SortField::Name, SortField::CreatedAt];

    fn sort_key(&self, field: SortField) -> SortKey<'_> {
        match field {
            SortField::Name => SortKey::Text(Cow::Owned(self.display_name())),
            SortField::CreatedAt => SortKey::Number(self.created_at.timestamp_millis() as f64),
            _ => SortKey::Missing,
        }
    }

    fn sort_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(contract: Contract, score: f64) -> ScoredHit<Contract> {
        ScoredHit {
            item: contract,
            score,
            highlights: Vec::new(),
        }
    }

    fn ids(hits: &[ScoredHit<Contract>]) -> Vec<&str> {
        hits.iter().map(|h| h.item.id.as_str()).collect()
    }

    #[test]
    fn test_relevance_desc_with_id_tiebreak() {
        let hits = vec![
            hit(Contract::new("ent", "x").with_id("b"), 2.0),
            hit(Contract::new("ent", "y").with_id("a"), 2.0),
            hit(Contract::new("ent", "z").with_id("c"), 5.0),
        ];
        let sorted = sort_hits(hits, &SortSpec::default());
        assert_eq!(ids(&sorted), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_value_sort_uses_parsed_price() {
        let hits = vec![
            hit(Contract::new("ent", "x").with_id("cheap").with_pricing("$900"), 1.0),
            hit(Contract::new("ent", "y").with_id("dear").with_pricing("$1,200"), 1.0),
            hit(Contract::new("ent", "z").with_id("free"), 1.0),
        ];
        let asc = sort_hits(hits.clone(), &SortSpec::new(SortField::Value, SortOrder::Asc));
        assert_eq!(ids(&asc), vec!["free", "cheap", "dear"]);

        let desc = sort_hits(hits, &SortSpec::new(SortField::TotalValue, SortOrder::Desc));
        assert_eq!(ids(&desc), vec!["dear", "cheap", "free"]);
    }

    #[test]
    fn test_missing_end_dates_sort_last_both_ways() {
        let hits = vec![
            hit(Contract::new("ent", "x").with_id("none"), 1.0),
            hit(Contract::new("ent", "y").with_id("late").with_end_date("2026-01-01"), 1.0),
            hit(Contract::new("ent", "z").with_id("early").with_end_date("2025-06-30"), 1.0),
        ];
        let asc = sort_hits(hits.clone(), &SortSpec::new(SortField::EndDate, SortOrder::Asc));
        assert_eq!(ids(&asc), vec!["early", "late", "none"]);

        let desc = sort_hits(hits, &SortSpec::new(SortField::EndDate, SortOrder::Desc));
        assert_eq!(ids(&desc), vec!["late", "early", "none"]);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let hits = vec![
            hit(Contract::new("ent", "beta").with_id("1"), 1.0),
            hit(Contract::new("ent", "Alpha").with_id("2"), 1.0),
        ];
        let sorted = sort_hits(hits, &SortSpec::new(SortField::Title, SortOrder::Asc));
        assert_eq!(ids(&sorted), vec!["2", "1"]);
    }

    #[test]
    fn test_resolve_rejects_unknown_and_unsupported_fields() {
        let ok = SortRequest::new("endDate", SortOrder::Asc).resolve::<Contract>().unwrap();
        assert_eq!(ok.field, SortField::EndDate);

        let unknown = SortRequest::new("__proto__", SortOrder::Asc).resolve::<Contract>();
        assert!(matches!(unknown, Err(SearchError::InvalidSort { .. })));

        let unsupported = SortRequest::new("contractCount", SortOrder::Desc).resolve::<User>();
        assert!(matches!(
            unsupported,
            Err(SearchError::InvalidSort {
                entity: EntityType::User,
                ..
            })
        ));
    }

    #[test]
    fn test_order_parsing() {
        let spec: SortRequest = serde_json::from_str(r#"{"field": "name"}"#).unwrap();
        assert_eq!(spec.order, SortOrder::Desc);
        let spec: SortRequest =
            serde_json::from_str(r#"{"field": "name", "order": "asc"}"#).unwrap();
        assert_eq!(spec.order, SortOrder::Asc);
    }
}
