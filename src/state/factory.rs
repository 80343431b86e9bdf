use crate::config::StateConfig;
use crate::error::Result;
use crate::state::{EntityStore, Fixture, InMemoryStore};
use std::sync::Arc;

/// Create the entity store described by configuration, seeding it when a fixture is configured
pub async fn create_store(config: &StateConfig) -> Result<Arc<dyn EntityStore>> {
    let store = InMemoryStore::new();

    match config.seed_path {
        Some(ref path) => {
            tracing::info!(path = ?path, "Seeding in-memory store from fixture");
            let fixture = Fixture::from_json_file(path)?;
            store.load_fixture(fixture)?;
        }
        None => {
            tracing::warn!("No seed fixture configured, starting with an empty store");
        }
    }

    Ok(Arc::new(store))
}

/// Create an empty in-memory store
pub fn create_in_memory_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}
