pub mod factory;
pub mod store;

pub use factory::{create_in_memory_store, create_store};
pub use store::{Fixture, InMemoryStore};

use crate::error::Result;
use crate::models::{Contract, User, Vendor};
use async_trait::async_trait;

/// Read access to the tenant-scoped document collections the search engine consumes.
///
/// List reads return only records belonging to `enterprise_id`, ordered by
/// `(created_at, id)`. Search ranking relies on that order for stable tie-breaks,
/// so implementations must not return records in hash or insertion order.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// All contracts of a tenant
    async fn list_contracts(&self, enterprise_id: &str) -> Result<Vec<Contract>>;

    /// All vendors of a tenant
    async fn list_vendors(&self, enterprise_id: &str) -> Result<Vec<Vendor>>;

    /// All users of a tenant
    async fn list_users(&self, enterprise_id: &str) -> Result<Vec<User>>;

    /// Point lookup of a vendor by ID
    async fn get_vendor(&self, id: &str) -> Result<Option<Vendor>>;

    /// Point lookup of a user by ID
    async fn get_user(&self, id: &str) -> Result<Option<User>>;
}
