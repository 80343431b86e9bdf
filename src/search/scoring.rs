//! Weighted multi-field relevance scoring
//!
//! Each entity type declares an ordered list of searchable fields. A record
//! scores the sum of the weights of every field whose lowercased text contains
//! the (already lowercased) query, and its highlights are the names of those
//! fields in scan order. Records that match nothing are dropped; survivors are
//! ordered by descending score with a stable sort, so ties keep the order the
//! store returned them in.

use crate::models::{Contract, EntityType, TenantRecord, User, Vendor};
use crate::search::config::FieldWeights;
use serde::Serialize;
use std::borrow::Cow;

/// An entity type that can be matched against a free-text query
pub trait Searchable: TenantRecord {
    const ENTITY: EntityType;

    /// Field names in scan order
    const SEARCHABLE_FIELDS: &'static [&'static str];

    /// Text of a searchable field, `None` when absent
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>>;
}

/// A record with its relevance score and matched field names
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredHit<T> {
    pub item: T,
    pub score: f64,
    pub highlights: Vec<&'static str>,
}

impl<T> ScoredHit<T> {
    /// A hit for listing paths that do not rank, scored as 1
    pub fn unscored(item: T) -> Self {
        Self {
            item,
            score: 1.0,
            highlights: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ScoredHit<U> {
        ScoredHit {
            item: f(self.item),
            score: self.score,
            highlights: self.highlights,
        }
    }
}

/// Trim and lowercase a raw query string
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Searchable field names of an entity type
pub fn searchable_fields(entity: EntityType) -> &'static [&'static str] {
    match entity {
        EntityType::Contract => Contract::SEARCHABLE_FIELDS,
        EntityType::Vendor => Vendor::SEARCHABLE_FIELDS,
        EntityType::User => User::SEARCHABLE_FIELDS,
    }
}

/// Score one record against pre-resolved field weights (parallel to `SEARCHABLE_FIELDS`)
fn score_fields<T: Searchable>(record: &T, query: &str, field_weights: &[f64]) -> (f64, Vec<&'static str>) {
    let mut score = 0.0;
    let mut highlights = Vec::new();

    for (field, weight) in T::SEARCHABLE_FIELDS.iter().zip(field_weights) {
        let Some(text) = record.field_text(field) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        if text.to_lowercase().contains(query) {
            score += weight;
            highlights.push(*field);
        }
    }

    (score, highlights)
}

/// Score a single record, `None` when no field matches
pub fn score_record<T: Searchable>(
    record: &T,
    query: &str,
    weights: &FieldWeights,
) -> Option<(f64, Vec<&'static str>)> {
    let field_weights = weights.resolve(T::ENTITY, T::SEARCHABLE_FIELDS);
    let (score, highlights) = score_fields(record, query, &field_weights);
    (score > 0.0).then_some((score, highlights))
}

/// Score and rank records against a normalized query, dropping non-matches
pub fn score_records<T: Searchable>(
    records: Vec<T>,
    query: &str,
    weights: &FieldWeights,
) -> Vec<ScoredHit<T>> {
    let field_weights = weights.resolve(T::ENTITY, T::SEARCHABLE_FIELDS);

    let mut hits: Vec<ScoredHit<T>> = records
        .into_iter()
        .filter_map(|record| {
            let (score, highlights) = score_fields(&record, query, &field_weights);
            (score > 0.0).then(|| ScoredHit {
                item: record,
                score,
                highlights,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits
}

fn borrowed(value: &Option<String>) -> Option<Cow<'_, str>> {
    value.as_deref().map(Cow::Borrowed)
}

impl Searchable for Contract {
    const ENTITY: EntityType = EntityType::Contract;
    const SEARCHABLE_FIELDS: &'static [&'static str] =
        &["title", "fileName", "notes", "extractedParties", "extractedScope"];

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "title" => Some(Cow::Borrowed(self.title.as_str())),
            "fileName" => borrowed(&self.file_name),
            "notes" => borrowed(&self.notes),
            "extractedParties" if !self.extracted_parties.is_empty() => {
                Some(Cow::Owned(self.extracted_parties.join(" ")))
            }
            "extractedScope" => borrowed(&self.extracted_scope),
            _ => None,
        }
    }
}

impl Searchable for Vendor {
    const ENTITY: EntityType = EntityType::Vendor;
    const SEARCHABLE_FIELDS: &'static [&'static str] =
        &["name", "contactEmail", "website", "notes", "address"];

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "name" => Some(Cow::Borrowed(self.name.as_str())),
            "contactEmail" => borrowed(&self.contact_email),
            "website" => borrowed(&self.website),
            "notes" => borrowed(&self.notes),
            "address" => borrowed(&self.address),
            _ => None,
        }
    }
}

impl Searchable for User {
    const ENTITY: EntityType = EntityType::User;
    const SEARCHABLE_FIELDS: &'static [&'static str] =
        &["firstName", "lastName", "email", "department", "title"];

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "firstName" => borrowed(&self.first_name),
            "lastName" => borrowed(&self.last_name),
            "email" => Some(Cow::Borrowed(self.email.as_str())),
            "department" => borrowed(&self.department),
            "title" => borrowed(&self.title),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(id: &str, title: &str) -> Contract {
        Contract::new("ent", title).with_id(id)
    }

    #[test]
    fn test_weighted_fields_sum() {
        let weights = FieldWeights::default();
        let record = contract("c1", "Acme MSA")
            .with_notes("renewal with acme pending")
            .with_parties(vec!["Acme Corp", "Globex"]);

        let (score, highlights) = score_record(&record, "acme", &weights).unwrap();
        assert!((score - (3.0 + 1.0 + 2.5)).abs() < 1e-9);
        assert_eq!(highlights, vec!["title", "notes", "extractedParties"]);
    }

    #[test]
    fn test_unweighted_field_defaults_to_one() {
        let weights = FieldWeights::empty();
        let record = contract("c1", "Hosting").with_file_name("hosting.pdf");
        let (score, _) = score_record(&record, "hosting", &weights).unwrap();
        assert_eq!(score, 2.0);
    }

    #[test]
    fn test_non_matches_dropped_and_empty_fields_skipped() {
        let weights = FieldWeights::default();
        let records = vec![
            contract("c1", "Acme MSA"),
            contract("c2", "Globex NDA").with_notes(""),
        ];
        let hits = score_records(records, "acme", &weights);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item.id, "c1");
        assert_eq!(hits[0].highlights, vec!["title"]);
    }

    #[test]
    fn test_matching_is_case_insensitive_on_fields() {
        let weights = FieldWeights::default();
        let vendor = Vendor::new("ent", "ACME Supplies").with_website("https://Acme.example");
        let (score, highlights) = score_record(&vendor, "acme", &weights).unwrap();
        assert_eq!(score, 3.0 + 1.5);
        assert_eq!(highlights, vec!["name", "website"]);
    }

    #[test]
    fn test_adding_a_matching_field_never_lowers_score() {
        let weights = FieldWeights::default();
        let base = User::new("ent", "jordan@example.com").with_name("Jordan", "Lee");
        let richer = base.clone().with_department("Jordan Ops");

        let (before, _) = score_record(&base, "jordan", &weights).unwrap();
        let (after, _) = score_record(&richer, "jordan", &weights).unwrap();
        assert!(after > before);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let weights = FieldWeights::default();
        let records = vec![
            contract("c1", "Acme one"),
            contract("c2", "Acme two").with_notes("acme"),
            contract("c3", "Acme three"),
        ];
        let ids: Vec<_> = score_records(records, "acme", &weights)
            .into_iter()
            .map(|hit| hit.item.id)
            .collect();
        assert_eq!(ids, vec!["c2", "c1", "c3"]);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Acme MSA \n"), "acme msa");
    }
}
