use crate::error::{AppError, Result};
use crate::models::{Contract, TenantRecord, User, Vendor};
use crate::state::EntityStore;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

/// Seed data for an [`InMemoryStore`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Fixture {
    /// Read a JSON fixture file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// In-memory entity store (for demos and testing)
#[derive(Clone, Default)]
pub struct InMemoryStore {
    contracts: Arc<DashMap<String, Contract>>,
    vendors: Arc<DashMap<String, Vendor>>,
    users: Arc<DashMap<String, User>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_contract(&self, contract: Contract) {
        tracing::trace!(contract_id = %contract.id, "Contract saved");
        self.contracts.insert(contract.id.clone(), contract);
    }

    pub fn save_vendor(&self, vendor: Vendor) {
        tracing::trace!(vendor_id = %vendor.id, "Vendor saved");
        self.vendors.insert(vendor.id.clone(), vendor);
    }

    pub fn save_user(&self, user: User) {
        tracing::trace!(user_id = %user.id, "User saved");
        self.users.insert(user.id.clone(), user);
    }

    /// Insert every record of a fixture, replacing records with the same ID
    ///
    /// Nothing is inserted unless every record passes validation.
    pub fn load_fixture(&self, fixture: Fixture) -> Result<()> {
        validate_records(&fixture.contracts)?;
        validate_records(&fixture.vendors)?;
        validate_records(&fixture.users)?;

        let (contracts, vendors, users) = (
            fixture.contracts.len(),
            fixture.vendors.len(),
            fixture.users.len(),
        );
        fixture.contracts.into_iter().for_each(|c| self.save_contract(c));
        fixture.vendors.into_iter().for_each(|v| self.save_vendor(v));
        fixture.users.into_iter().for_each(|u| self.save_user(u));

        tracing::info!(contracts, vendors, users, "Fixture loaded into in-memory store");
        Ok(())
    }

    fn scoped<T: TenantRecord + Clone>(map: &DashMap<String, T>, enterprise_id: &str) -> Vec<T> {
        let mut records: Vec<T> = map
            .iter()
            .filter(|entry| entry.value().enterprise_id() == enterprise_id)
            .map(|entry| entry.value().clone())
            .collect();

        records.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        records
    }
}

fn validate_records<T: Validate + TenantRecord>(records: &[T]) -> Result<()> {
    for record in records {
        record
            .validate()
            .map_err(|e| AppError::Validation(format!("Record {}: {}", record.id(), e)))?;
    }
    Ok(())
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn list_contracts(&self, enterprise_id: &str) -> Result<Vec<Contract>> {
        Ok(Self::scoped(&self.contracts, enterprise_id))
    }

    async fn list_vendors(&self, enterprise_id: &str) -> Result<Vec<Vendor>> {
        Ok(Self::scoped(&self.vendors, enterprise_id))
    }

    async fn list_users(&self, enterprise_id: &str) -> Result<Vec<User>> {
        Ok(Self::scoped(&self.users, enterprise_id))
    }

    async fn get_vendor(&self, id: &str) -> Result<Option<Vendor>> {
        Ok(self.vendors.get(id).map(|entry| entry.clone()))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.get(id).map(|entry| entry.clone()))
    }
}
