use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// Read-only projection of a vendor owned by the vendor management module
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,

    #[validate(length(min = 1))]
    pub enterprise_id: String,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    pub contact_email: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub category: Option<VendorCategory>,

    pub created_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(enterprise_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            enterprise_id: enterprise_id.into(),
            name: name.into(),
            contact_email: None,
            website: None,
            notes: None,
            address: None,
            category: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_category(mut self, category: VendorCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Compact vendor view attached to contract search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    pub id: String,
    pub name: String,
    pub category: Option<VendorCategory>,
}

impl From<&Vendor> for VendorSummary {
    fn from(vendor: &Vendor) -> Self {
        Self {
            id: vendor.id.clone(),
            name: vendor.name.clone(),
            category: vendor.category,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VendorCategory {
    Technology,
    Marketing,
    Legal,
    Finance,
    Hr,
    Facilities,
    Logistics,
    Manufacturing,
    Consulting,
    Other,
}
