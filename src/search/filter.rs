//! Structured predicate filters applied before scoring
//!
//! All present constraints are combined with AND. Absent constraints, and
//! empty value sets, impose nothing.

use crate::models::{Contract, ContractStatus, ContractType, User, UserRole, Vendor, VendorCategory};
use crate::search::error::{SearchError, SearchResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive creation-date window.
///
/// Each bound is either a calendar date (`YYYY-MM-DD`, interpreted in UTC,
/// where an end date covers the whole day) or an RFC 3339 timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// A [`DateRange`] with parsed bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }

    pub fn resolve(&self) -> SearchResult<ResolvedDateRange> {
        Ok(ResolvedDateRange {
            start: self
                .start
                .as_deref()
                .map(|raw| parse_bound(raw, false))
                .transpose()?,
            end: self
                .end
                .as_deref()
                .map(|raw| parse_bound(raw, true))
                .transpose()?,
        })
    }
}

impl ResolvedDateRange {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| ts >= start) && self.end.map_or(true, |end| ts <= end)
    }
}

fn parse_bound(raw: &str, is_end: bool) -> SearchResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        let bound = if is_end {
            midnight.map(|dt| dt + Duration::days(1) - Duration::nanoseconds(1))
        } else {
            midnight
        };
        return bound.ok_or_else(|| SearchError::InvalidRequest(format!("Invalid date '{}'", raw)));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            SearchError::InvalidRequest(format!(
                "Invalid date '{}': expected YYYY-MM-DD or RFC 3339",
                raw
            ))
        })
}

/// Inclusive monetary window over the parsed contract value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl ValueRange {
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Contract filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFilters {
    #[serde(default)]
    pub status: Option<Vec<ContractStatus>>,
    #[serde(default)]
    pub contract_type: Option<Vec<ContractType>>,
    #[serde(default)]
    pub vendor_id: Option<Vec<String>>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub value_range: Option<ValueRange>,
}

/// Vendor filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorFilters {
    #[serde(default)]
    pub category: Option<Vec<VendorCategory>>,
}

/// User filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    #[serde(default)]
    pub role: Option<Vec<UserRole>>,
    #[serde(default)]
    pub department: Option<Vec<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

fn in_set<T: PartialEq>(set: &Option<Vec<T>>, value: &T) -> bool {
    match set {
        Some(values) if !values.is_empty() => values.contains(value),
        _ => true,
    }
}

fn optional_in_set<T: PartialEq>(set: &Option<Vec<T>>, value: Option<&T>) -> bool {
    match (set, value) {
        (Some(values), _) if values.is_empty() => true,
        (Some(values), Some(value)) => values.contains(value),
        (Some(_), None) => false,
        (None, _) => true,
    }
}

/// Keep contracts matching every present filter
pub fn filter_contracts(
    candidates: Vec<Contract>,
    filters: &ContractFilters,
) -> SearchResult<Vec<Contract>> {
    let date_range = filters
        .date_range
        .as_ref()
        .map(DateRange::resolve)
        .transpose()?;

    Ok(candidates
        .into_iter()
        .filter(|contract| {
            let status_match = in_set(&filters.status, &contract.status);
            let type_match = optional_in_set(&filters.contract_type, contract.contract_type.as_ref());
            let vendor_match = optional_in_set(&filters.vendor_id, contract.vendor_id.as_ref());
            let date_match = date_range.map_or(true, |range| range.contains(contract.created_at));
            let value_match = filters
                .value_range
                .map_or(true, |range| range.contains(contract.value()));

            status_match && type_match && vendor_match && date_match && value_match
        })
        .collect())
}

/// Keep vendors matching every present filter
pub fn filter_vendors(candidates: Vec<Vendor>, filters: &VendorFilters) -> Vec<Vendor> {
    candidates
        .into_iter()
        .filter(|vendor| optional_in_set(&filters.category, vendor.category.as_ref()))
        .collect()
}

/// Keep users matching every present filter
pub fn filter_users(candidates: Vec<User>, filters: &UserFilters) -> Vec<User> {
    candidates
        .into_iter()
        .filter(|user| {
            let role_match = in_set(&filters.role, &user.role);
            let department_match =
                optional_in_set(&filters.department, user.department.as_ref());
            let active_match = filters.is_active.map_or(true, |active| user.is_active == active);

            role_match && department_match && active_match
        })
        .collect()
}
