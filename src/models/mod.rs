pub mod contract;
pub mod money;
pub mod user;
pub mod vendor;

pub use contract::*;
pub use money::{parse_amount, parse_amount_opt};
pub use user::*;
pub use vendor::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The searchable entity collections
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityType {
    Contract,
    Vendor,
    User,
}

impl EntityType {
    /// Collection name used to namespace per-field configuration, e.g. `contracts.title`
    pub fn namespace(&self) -> &'static str {
        match self {
            EntityType::Contract => "contracts",
            EntityType::Vendor => "vendors",
            EntityType::User => "users",
        }
    }

    pub fn from_namespace(namespace: &str) -> Option<Self> {
        match namespace {
            "contracts" => Some(EntityType::Contract),
            "vendors" => Some(EntityType::Vendor),
            "users" => Some(EntityType::User),
            _ => None,
        }
    }
}

/// Common accessors of every tenant-owned document
pub trait TenantRecord {
    fn id(&self) -> &str;
    fn enterprise_id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

macro_rules! impl_tenant_record {
    ($($ty:ty),+) => {
        $(
            impl TenantRecord for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn enterprise_id(&self) -> &str {
                    &self.enterprise_id
                }

                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }
            }
        )+
    };
}

impl_tenant_record!(Contract, Vendor, User);
