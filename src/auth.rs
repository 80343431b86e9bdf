//! Caller identity resolution
//!
//! Authentication itself happens upstream. The host forwards the
//! authenticated subject, which is resolved here to a user record whose
//! enterprise scopes every read.

use crate::models::User;
use crate::search::{SearchError, SearchResult};
use crate::state::EntityStore;
use async_trait::async_trait;
use axum::http::HeaderMap;
use std::sync::Arc;

/// Header carrying the authenticated subject
pub const USER_ID_HEADER: &str = "x-user-id";

const MAX_SUBJECT_LEN: usize = 256;

/// Authenticated subject as forwarded by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Read the subject header; blank or oversized values count as absent
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(USER_ID_HEADER)?.to_str().ok()?.trim();
        if raw.is_empty() || raw.len() > MAX_SUBJECT_LEN {
            return None;
        }
        Some(Self::new(raw))
    }
}

/// Resolves a caller identity to a tenant-scoped user
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Fails with `Unauthenticated` when no identity is given and
    /// `UserNotFound` when it does not name a user
    async fn resolve(&self, identity: Option<&Identity>) -> SearchResult<User>;
}

/// Resolver backed by the user collection of an [`EntityStore`]
pub struct StoreIdentityResolver {
    store: Arc<dyn EntityStore>,
}

impl StoreIdentityResolver {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IdentityResolver for StoreIdentityResolver {
    async fn resolve(&self, identity: Option<&Identity>) -> SearchResult<User> {
        let identity = identity.ok_or(SearchError::Unauthenticated)?;
        let user = self
            .store
            .get_user(&identity.subject)
            .await?
            .ok_or(SearchError::UserNotFound)?;

        if user.enterprise_id.is_empty() {
            return Err(SearchError::UserNotFound);
        }
        Ok(user)
    }
}
