//! Authoring session: one schema-in-progress and its auth configuration.
//!
//! All edits go through the session so the registry and the configuration
//! move together. The session cycles `Editing -> Validating -> Committed` or
//! back to `Editing` with the failure recorded.

use serde::Serialize;

use crate::config::AuthSchemaConfig;
use crate::models::{AuthConfiguration, Endpoint, FieldPatch, StoredSchema};
use crate::services::endpoints::derived_endpoints;
use crate::services::engine::AuthConfigEngine;
use crate::services::error::ServiceError;
use crate::services::registry::FieldRegistry;
use crate::services::store::{ConnectionCheck, SchemaStore};
use crate::services::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Editing,
    Validating,
    Committed,
}

#[derive(Debug, Clone)]
pub struct AuthoringSession {
    collection_name: String,
    registry: FieldRegistry,
    engine: AuthConfigEngine,
    default_token_expiration: u32,
    state: SessionState,
    last_error: Option<ValidationError>,
}

impl Default for AuthoringSession {
    fn default() -> Self {
        Self::new("")
    }
}

impl AuthoringSession {
    pub fn new(collection_name: impl Into<String>) -> Self {
        let config = AuthConfiguration::default();
        let default_token_expiration = config.token_expiration;
        Self {
            collection_name: collection_name.into(),
            registry: FieldRegistry::with_defaults(),
            engine: AuthConfigEngine::new(config),
            default_token_expiration,
            state: SessionState::Editing,
            last_error: None,
        }
    }

    pub fn from_config(
        config: &AuthSchemaConfig,
        collection_name: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        Self::new(collection_name).with_default_token_expiration(config.default_token_expiration_hours)
    }

    /// Fresh sessions start with `hours` as their token expiration.
    pub fn with_default_token_expiration(mut self, hours: u32) -> Result<Self, ServiceError> {
        self.engine.set_token_expiration(hours)?;
        self.default_token_expiration = hours;
        Ok(self)
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AuthConfiguration {
        self.engine.config()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }

    fn touch(&mut self) {
        self.state = SessionState::Editing;
        self.last_error = None;
    }

    pub fn set_collection_name(&mut self, collection_name: impl Into<String>) {
        self.collection_name = collection_name.into();
        self.touch();
    }

    pub fn add_field(&mut self) -> usize {
        self.touch();
        self.registry.add_field()
    }

    /// Returns `false` when the index is out of range.
    pub fn rename_field(&mut self, index: usize, new_name: impl Into<String>) -> bool {
        self.touch();
        let in_range = index < self.registry.len();
        if let Some(change) = self.registry.rename_field(index, new_name) {
            self.engine.apply(&change);
        }
        in_range
    }

    /// Returns `false` when the index is out of range.
    pub fn update_field(&mut self, index: usize, patch: FieldPatch) -> bool {
        self.touch();
        let in_range = index < self.registry.len();
        for change in self.registry.update_field(index, patch) {
            self.engine.apply(&change);
        }
        in_range
    }

    /// Returns `false` when the removal was refused.
    pub fn remove_field(&mut self, index: usize) -> bool {
        self.touch();
        match self.registry.remove_field(index) {
            Some(change) => {
                self.engine.apply(&change);
                true
            }
            None => false,
        }
    }

    /// Mutable access to the configuration setters.
    pub fn engine_mut(&mut self) -> &mut AuthConfigEngine {
        self.touch();
        &mut self.engine
    }

    pub fn toggle_response_field(&mut self, name: &str) -> bool {
        self.touch();
        self.engine.toggle_response_field(&self.registry, name)
    }

    pub fn add_response_field(&mut self, name: &str) -> bool {
        self.touch();
        self.engine.add_response_field(&self.registry, name)
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        derived_endpoints(&self.collection_name, self.engine.config())
    }

    /// Run validation and record the outcome on the session.
    pub fn validate(&mut self, connection: &dyn ConnectionCheck) -> Result<(), ValidationError> {
        self.state = SessionState::Validating;
        let outcome = validation::validate(
            connection.has_connection(),
            &self.collection_name,
            &self.registry,
            self.engine.config(),
        )
        .map(|_| ());

        match outcome {
            Ok(()) => {
                // Passing validation alone commits nothing.
                self.state = SessionState::Editing;
                Ok(())
            }
            Err(err) => {
                self.reject(err.clone());
                Err(err)
            }
        }
    }

    fn reject(&mut self, err: ValidationError) {
        tracing::warn!(
            collection = %self.collection_name,
            code = err.as_code(),
            "Auth system validation failed"
        );
        self.state = SessionState::Editing;
        self.last_error = Some(err);
    }

    /// Validate, snapshot and hand the auth system to `store`.
    ///
    /// On success the session starts over from the default seed. Validation and
    /// store failures leave the session editable with its contents intact.
    pub async fn commit(
        &mut self,
        connection: &dyn ConnectionCheck,
        store: &dyn SchemaStore,
    ) -> Result<StoredSchema, ServiceError> {
        self.state = SessionState::Validating;
        let outcome = validation::validate(
            connection.has_connection(),
            &self.collection_name,
            &self.registry,
            self.engine.config(),
        )
        .map(|draft| draft.commit());

        let spec = match outcome {
            Ok(spec) => spec,
            Err(err) => {
                self.reject(err.clone());
                return Err(ServiceError::Validation(err));
            }
        };

        match store.store_schema(&spec).await {
            Ok(stored) => {
                tracing::info!(
                    collection = %spec.collection_name,
                    user_collection = %spec.auth_config.user_collection,
                    schema_id = %stored.schema_id,
                    "Auth system committed"
                );
                self.reset();
                self.state = SessionState::Committed;
                Ok(stored)
            }
            Err(e) => {
                tracing::error!(
                    collection = %spec.collection_name,
                    error = %e,
                    "Schema store rejected auth system"
                );
                self.state = SessionState::Editing;
                Err(ServiceError::Persistence(e.error))
            }
        }
    }

    /// Start a new session from the default seed.
    pub fn reset(&mut self) {
        let mut config = AuthConfiguration::default();
        config.token_expiration = self.default_token_expiration;

        self.collection_name.clear();
        self.registry = FieldRegistry::with_defaults();
        self.engine = AuthConfigEngine::new(config);
        self.touch();
        tracing::info!("Authoring session reset");
    }
}
