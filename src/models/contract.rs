use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

use super::money::parse_amount_opt;

/// Read-only projection of a contract owned by the contract management module
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Document identifier
    pub id: String,

    /// Owning tenant
    #[validate(length(min = 1))]
    pub enterprise_id: String,

    /// Human-readable title
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    /// Name of the uploaded source file
    #[serde(default)]
    pub file_name: Option<String>,

    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Parties extracted by document analysis
    #[serde(default)]
    pub extracted_parties: Vec<String>,

    /// Scope summary extracted by document analysis
    #[serde(default)]
    pub extracted_scope: Option<String>,

    /// Lifecycle status
    pub status: ContractStatus,

    /// Contract classification, if known
    #[serde(default)]
    pub contract_type: Option<ContractType>,

    /// Counterparty vendor
    #[serde(default)]
    pub vendor_id: Option<String>,

    /// Loosely formatted price text, e.g. `"$125,000.00 / year"`
    #[serde(default)]
    pub extracted_pricing: Option<String>,

    /// End date text as extracted from the document
    #[serde(default)]
    pub extracted_end_date: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Contract {
    /// Create a draft contract for a tenant
    pub fn new(enterprise_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            enterprise_id: enterprise_id.into(),
            title: title.into(),
            file_name: None,
            notes: None,
            extracted_parties: Vec::new(),
            extracted_scope: None,
            status: ContractStatus::Draft,
            contract_type: None,
            vendor_id: None,
            extracted_pricing: None,
            extracted_end_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_status(mut self, status: ContractStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_type(mut self, contract_type: ContractType) -> Self {
        self.contract_type = Some(contract_type);
        self
    }

    pub fn with_vendor(mut self, vendor_id: impl Into<String>) -> Self {
        self.vendor_id = Some(vendor_id.into());
        self
    }

    pub fn with_pricing(mut self, pricing: impl Into<String>) -> Self {
        self.extracted_pricing = Some(pricing.into());
        self
    }

    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.extracted_end_date = Some(end_date.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.extracted_scope = Some(scope.into());
        self
    }

    pub fn with_parties(mut self, parties: Vec<impl Into<String>>) -> Self {
        self.extracted_parties = parties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Monetary value parsed from the extracted price text (0 when absent)
    pub fn value(&self) -> f64 {
        parse_amount_opt(self.extracted_pricing.as_deref())
    }

    /// Extracted end date, if it parses as a calendar date or RFC 3339 timestamp
    pub fn end_date(&self) -> Option<NaiveDate> {
        let raw = self.extracted_end_date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc).date_naive())
            })
    }

    pub fn is_archived(&self) -> bool {
        self.status == ContractStatus::Archived
    }

    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    PendingAnalysis,
    Active,
    Expired,
    Terminated,
    Archived,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContractType {
    Nda,
    Msa,
    Sow,
    Saas,
    License,
    Lease,
    Employment,
    Partnership,
    Purchase,
    Service,
    Other,
}
