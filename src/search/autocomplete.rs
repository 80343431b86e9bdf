//! Label suggestions by case-insensitive substring match
//!
//! No weighting or scoring. Suggestions are filled in the fixed order
//! contracts, vendors, users until the limit is reached.

use crate::models::{Contract, EntityType, User, Vendor};
use serde::{Deserialize, Serialize};

/// A single autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Text to place in the search box
    pub value: String,

    /// Text to display
    pub label: String,

    #[serde(rename = "type")]
    pub entity_type: EntityType,

    pub id: String,
}

fn matches(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

/// Suggestion for a contract whose title matches
pub fn contract_suggestion(contract: &Contract, needle: &str) -> Option<Suggestion> {
    matches(&contract.title, needle).then(|| Suggestion {
        value: contract.title.clone(),
        label: contract.title.clone(),
        entity_type: EntityType::Contract,
        id: contract.id.clone(),
    })
}

/// Suggestion for a vendor whose name matches
pub fn vendor_suggestion(vendor: &Vendor, needle: &str) -> Option<Suggestion> {
    matches(&vendor.name, needle).then(|| Suggestion {
        value: vendor.name.clone(),
        label: vendor.name.clone(),
        entity_type: EntityType::Vendor,
        id: vendor.id.clone(),
    })
}

/// Suggestion for a user whose full name or email matches
pub fn user_suggestion(user: &User, needle: &str) -> Option<Suggestion> {
    let full_name = user.full_name();
    if !matches(&full_name, needle) && !matches(&user.email, needle) {
        return None;
    }

    let label = if full_name.is_empty() {
        user.email.clone()
    } else {
        format!("{} <{}>", full_name, user.email)
    };

    Some(Suggestion {
        value: user.display_name(),
        label,
        entity_type: EntityType::User,
        id: user.id.clone(),
    })
}

/// Collect up to `limit` suggestions, contracts first, then vendors, then users
pub fn suggest(
    contracts: &[Contract],
    vendors: &[Vendor],
    users: &[User],
    needle: &str,
    limit: usize,
) -> Vec<Suggestion> {
    contracts
        .iter()
        .filter_map(|c| contract_suggestion(c, needle))
        .chain(vendors.iter().filter_map(|v| vendor_suggestion(v, needle)))
        .chain(users.iter().filter_map(|u| user_suggestion(u, needle)))
        .take(limit)
        .collect()
}
