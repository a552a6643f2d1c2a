//! Services layer for auth-schema-service.
//!
//! Field registry, reference repair, validation, endpoint derivation and the
//! authoring session that ties them together.

pub mod endpoints;
pub mod engine;
pub mod error;
pub mod registry;
pub mod repair;
pub mod session;
pub mod store;
pub mod validation;

pub use endpoints::derived_endpoints;
pub use engine::AuthConfigEngine;
pub use error::ServiceError;
pub use registry::{FieldRegistry, MIN_FIELDS};
pub use repair::{apply_change, repair, FieldChange};
pub use session::{AuthoringSession, SessionState};
pub use store::{ConnectionCheck, InMemorySchemaStore, SchemaStore, StoreError};
pub use validation::{validate, validate_all, ValidatedDraft, ValidationError};
