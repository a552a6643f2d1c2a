pub mod auth_config;
pub mod auth_system;
pub mod field;

pub use auth_config::{
    AuthConfiguration, LoginFields, DEFAULT_TOKEN_EXPIRATION_HOURS, MAX_TOKEN_EXPIRATION_HOURS,
    MIN_TOKEN_EXPIRATION_HOURS,
};
pub use auth_system::{AuthSystemSpec, Endpoint, EndpointKind, HttpMethod, StoredSchema};
pub use field::{Field, FieldPatch, FieldType, Visibility};
