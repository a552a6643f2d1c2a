//! Shared helpers for auth-schema-service integration tests.

#![allow(dead_code)]

use auth_schema_service::config::{AuthSchemaConfig, MongoConfig};
use auth_schema_service::services::AuthoringSession;
use service_core::observability::init_tracing;

pub fn init_test_tracing() {
    init_tracing("auth-schema-service-test", "warn");
}

/// Config with a backing MongoDB connection configured.
pub fn connected_config() -> AuthSchemaConfig {
    AuthSchemaConfig {
        mongodb: Some(MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "auth_schemas_test".to_string(),
        }),
        ..AuthSchemaConfig::default()
    }
}

pub fn session(collection_name: &str) -> AuthoringSession {
    init_test_tracing();
    AuthoringSession::from_config(&connected_config(), collection_name)
        .expect("default config should be valid")
}

/// Index of the first field named `name` in the session's registry.
pub fn index_of(session: &AuthoringSession, name: &str) -> usize {
    session
        .registry()
        .fields()
        .iter()
        .position(|f| f.name == name)
        .unwrap_or_else(|| panic!("field {} not found", name))
}
