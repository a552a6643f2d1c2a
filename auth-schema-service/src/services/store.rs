//! Collaborators at the commit boundary.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AuthSystemSpec, StoredSchema};

/// Error payload returned by a schema store. The message is passed through
/// to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{error}")]
pub struct StoreError {
    pub error: String,
}

impl StoreError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Persists committed auth systems.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    async fn store_schema(&self, spec: &AuthSystemSpec) -> Result<StoredSchema, StoreError>;
}

/// Whether a backing database connection is configured.
pub trait ConnectionCheck {
    fn has_connection(&self) -> bool;
}

impl ConnectionCheck for bool {
    fn has_connection(&self) -> bool {
        *self
    }
}

/// In-memory store for tests and previews.
pub struct InMemorySchemaStore {
    pub schemas: Mutex<Vec<(StoredSchema, AuthSystemSpec)>>,
    pub fail_with: Mutex<Option<String>>,
}

impl Default for InMemorySchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySchemaStore {
    pub fn new() -> Self {
        Self {
            schemas: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Make the next `store_schema` call fail with `error`.
    pub fn fail_next(&self, error: impl Into<String>) {
        if let Ok(mut slot) = self.fail_with.lock() {
            *slot = Some(error.into());
        }
    }

    pub fn stored(&self) -> Vec<AuthSystemSpec> {
        self.schemas
            .lock()
            .map(|schemas| schemas.iter().map(|(_, spec)| spec.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SchemaStore for InMemorySchemaStore {
    async fn store_schema(&self, spec: &AuthSystemSpec) -> Result<StoredSchema, StoreError> {
        let failure = self
            .fail_with
            .lock()
            .map_err(|e| StoreError::new(format!("Mock store mutex poisoned: {}", e)))?
            .take();
        if let Some(error) = failure {
            return Err(StoreError::new(error));
        }

        let stored = StoredSchema {
            schema_id: Uuid::new_v4().to_string(),
            stored_at: Utc::now(),
        };
        self.schemas
            .lock()
            .map_err(|e| StoreError::new(format!("Mock store mutex poisoned: {}", e)))?
            .push((stored.clone(), spec.clone()));

        Ok(stored)
    }
}
