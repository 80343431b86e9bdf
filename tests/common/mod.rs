//! Shared fixtures for integration tests
//!
//! Two tenants with overlapping names, so any leak between them shows up
//! as a foreign ID in a response.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use contract_search::models::{
    Contract, ContractStatus, ContractType, User, UserRole, Vendor, VendorCategory,
};
use async_trait::async_trait;
use contract_search::error::{AppError, Result as StoreResult};
use contract_search::search::{SearchConfig, SearchService};
use contract_search::state::{EntityStore, InMemoryStore};
use std::sync::Arc;

pub const TENANT_A: &str = "ent-a";
pub const TENANT_B: &str = "ent-b";

/// Admin of tenant A
pub const CALLER_A: &str = "ua1";
/// Only user of tenant B
pub const CALLER_B: &str = "ub1";

pub fn at(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)
}

pub fn tenant_a_users() -> Vec<User> {
    vec![
        User::new(TENANT_A, "ada@acme-a.test")
            .with_id("ua1")
            .with_name("Ada", "Lovelace")
            .with_role(UserRole::Admin)
            .with_department("Legal")
            .with_created_at(at(0)),
        User::new(TENANT_A, "grace@acme-a.test")
            .with_id("ua2")
            .with_name("Grace", "Hopper")
            .with_department("Engineering")
            .with_created_at(at(1)),
        User::new(TENANT_A, "acme.liaison@acme-a.test")
            .with_id("ua3")
            .with_role(UserRole::Viewer)
            .with_active(false)
            .with_created_at(at(2)),
    ]
}

pub fn tenant_a_vendors() -> Vec<Vendor> {
    vec![
        Vendor::new(TENANT_A, "Acme Corp")
            .with_id("va1")
            .with_category(VendorCategory::Technology)
            .with_website("https://acme.example")
            .with_created_at(at(0)),
        Vendor::new(TENANT_A, "Globex")
            .with_id("va2")
            .with_category(VendorCategory::Legal)
            .with_created_at(at(1)),
        Vendor::new(TENANT_A, "Initech")
            .with_id("va3")
            .with_category(VendorCategory::Consulting)
            .with_created_at(at(2)),
    ]
}

pub fn tenant_a_contracts() -> Vec<Contract> {
    vec![
        Contract::new(TENANT_A, "Acme Master Services Agreement")
            .with_id("ca1")
            .with_status(ContractStatus::Active)
            .with_type(ContractType::Msa)
            .with_vendor("va1")
            .with_pricing("$120,000")
            .with_created_at(at(0)),
        Contract::new(TENANT_A, "Acme NDA")
            .with_id("ca2")
            .with_status(ContractStatus::Active)
            .with_type(ContractType::Nda)
            .with_vendor("va1")
            .with_pricing("$5,000")
            .with_created_at(at(1)),
        Contract::new(TENANT_A, "Globex Statement of Work")
            .with_id("ca3")
            .with_status(ContractStatus::Expired)
            .with_type(ContractType::Sow)
            .with_vendor("va2")
            .with_pricing("$45,000")
            .with_created_at(at(2)),
        Contract::new(TENANT_A, "Acme Archive 2019")
            .with_id("ca4")
            .with_status(ContractStatus::Archived)
            .with_vendor("va1")
            .with_pricing("$1,000")
            .with_created_at(at(3)),
        Contract::new(TENANT_A, "Warehouse Lease")
            .with_id("ca5")
            .with_type(ContractType::Lease)
            .with_vendor("v-missing")
            .with_pricing("$600,000")
            .with_created_at(at(4)),
        Contract::new(TENANT_A, "Cross Tenant Reference")
            .with_id("ca6")
            .with_status(ContractStatus::Active)
            .with_vendor("vb1")
            .with_created_at(at(5)),
    ]
}

pub fn tenant_b_records() -> (Vec<Contract>, Vec<Vendor>, Vec<User>) {
    (
        vec![Contract::new(TENANT_B, "Acme Master Services Agreement")
            .with_id("cb1")
            .with_status(ContractStatus::Active)
            .with_vendor("vb1")
            .with_pricing("$999,999")
            .with_created_at(at(0))],
        vec![Vendor::new(TENANT_B, "Acme Holdings")
            .with_id("vb1")
            .with_category(VendorCategory::Finance)
            .with_created_at(at(0))],
        vec![User::new(TENANT_B, "acme.buyer@acme-b.test")
            .with_id("ub1")
            .with_name("Acme", "Buyer")
            .with_created_at(at(0))],
    )
}

/// Both tenants, inserted in the given order of tenant-A contracts
pub fn store_with_contracts(contracts: Vec<Contract>) -> InMemoryStore {
    let store = InMemoryStore::new();
    contracts.into_iter().for_each(|c| store.save_contract(c));
    tenant_a_vendors().into_iter().for_each(|v| store.save_vendor(v));
    tenant_a_users().into_iter().for_each(|u| store.save_user(u));

    let (contracts, vendors, users) = tenant_b_records();
    contracts.into_iter().for_each(|c| store.save_contract(c));
    vendors.into_iter().for_each(|v| store.save_vendor(v));
    users.into_iter().for_each(|u| store.save_user(u));
    store
}

pub fn seeded_store() -> InMemoryStore {
    store_with_contracts(tenant_a_contracts())
}

pub fn seeded_service() -> SearchService {
    SearchService::with_store(Arc::new(seeded_store()), SearchConfig::default()).unwrap()
}

pub fn tenant_b_ids() -> Vec<&'static str> {
    vec!["cb1", "vb1", "ub1"]
}

/// Store whose vendor collection is unreachable; every other read succeeds
pub struct UnavailableVendorStore {
    pub inner: InMemoryStore,
}

#[async_trait]
impl EntityStore for UnavailableVendorStore {
    async fn list_contracts(&self, enterprise_id: &str) -> StoreResult<Vec<Contract>> {
        self.inner.list_contracts(enterprise_id).await
    }

    async fn list_vendors(&self, _enterprise_id: &str) -> StoreResult<Vec<Vendor>> {
        Err(AppError::Database("vendors collection unavailable".to_string()))
    }

    async fn list_users(&self, enterprise_id: &str) -> StoreResult<Vec<User>> {
        self.inner.list_users(enterprise_id).await
    }

    async fn get_vendor(&self, id: &str) -> StoreResult<Option<Vendor>> {
        self.inner.get_vendor(id).await
    }

    async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        self.inner.get_user(id).await
    }
}

pub fn unavailable_vendor_service() -> SearchService {
    let store = UnavailableVendorStore {
        inner: seeded_store(),
    };
    SearchService::with_store(Arc::new(store), SearchConfig::default()).unwrap()
}
