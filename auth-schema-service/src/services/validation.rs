//! Commit gate for an auth configuration.
//!
//! Rules are checked in a fixed order and each one blocks a commit on its own.
//! [`validate`] stops at the first failure; [`validate_all`] collects every
//! failure in the same order for display.

use serde::Serialize;
use thiserror::Error;
use validator::Validate;

use crate::models::{AuthConfiguration, AuthSystemSpec};
use crate::services::registry::FieldRegistry;

/// Reasons a configuration cannot be committed, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", content = "field", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("A MongoDB connection must be configured before creating an auth system")]
    MissingMongoConnection,

    #[error("Collection name is required")]
    MissingTableName,

    #[error("Every field needs a name")]
    IncompleteFields,

    #[error("An email field must be selected")]
    MissingEmailField,

    #[error("A password field must be selected")]
    MissingPasswordField,

    #[error("Email field '{0}' does not exist")]
    DanglingEmailField(String),

    #[error("Password field '{0}' does not exist")]
    DanglingPasswordField(String),

    #[error("Field name '{0}' is used more than once")]
    DuplicateFieldName(String),

    #[error("Username field '{0}' does not exist")]
    DanglingUsernameField(String),

    #[error("Token expiration must be between 1 and 8760 hours (got {0})")]
    InvalidTokenExpiration(u32),
}

impl ValidationError {
    /// Stable machine-readable code.
    pub fn as_code(&self) -> &'static str {
        match self {
            ValidationError::MissingMongoConnection => "missing_mongo_connection",
            ValidationError::MissingTableName => "missing_table_name",
            ValidationError::IncompleteFields => "incomplete_fields",
            ValidationError::MissingEmailField => "missing_email_field",
            ValidationError::MissingPasswordField => "missing_password_field",
            ValidationError::DanglingEmailField(_) => "dangling_email_field",
            ValidationError::DanglingPasswordField(_) => "dangling_password_field",
            ValidationError::DuplicateFieldName(_) => "duplicate_field_name",
            ValidationError::DanglingUsernameField(_) => "dangling_username_field",
            ValidationError::InvalidTokenExpiration(_) => "invalid_token_expiration",
        }
    }
}

/// Proof that a registry/configuration pair passed validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedDraft<'a> {
    collection_name: &'a str,
    registry: &'a FieldRegistry,
    config: &'a AuthConfiguration,
}

impl ValidatedDraft<'_> {
    /// Snapshot for the schema store, with `user_collection` defaulted.
    pub fn commit(self) -> AuthSystemSpec {
        let mut auth_config = self.config.clone();
        auth_config.user_collection = self.config.effective_user_collection(self.collection_name);

        AuthSystemSpec {
            collection_name: self.collection_name.to_string(),
            fields: self.registry.fields().to_vec(),
            auth_config,
        }
    }
}

/// Fail-fast validation. Returns the first violated rule.
pub fn validate<'a>(
    has_connection: bool,
    collection_name: &'a str,
    registry: &'a FieldRegistry,
    config: &'a AuthConfiguration,
) -> Result<ValidatedDraft<'a>, ValidationError> {
    match check(has_connection, collection_name, registry, config, true)
        .into_iter()
        .next()
    {
        Some(err) => Err(err),
        None => Ok(ValidatedDraft {
            collection_name,
            registry,
            config,
        }),
    }
}

/// Every violated rule, in rule order.
pub fn validate_all(
    has_connection: bool,
    collection_name: &str,
    registry: &FieldRegistry,
    config: &AuthConfiguration,
) -> Vec<ValidationError> {
    check(has_connection, collection_name, registry, config, false)
}

fn check(
    has_connection: bool,
    collection_name: &str,
    registry: &FieldRegistry,
    config: &AuthConfiguration,
    fail_fast: bool,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    macro_rules! fail {
        ($err:expr) => {{
            errors.push($err);
            if fail_fast {
                return errors;
            }
        }};
    }

    if !has_connection {
        fail!(ValidationError::MissingMongoConnection);
    }

    if collection_name.trim().is_empty() {
        fail!(ValidationError::MissingTableName);
    }

    if registry.fields().iter().any(|f| !f.is_named()) {
        fail!(ValidationError::IncompleteFields);
    }

    let email_field = &config.login_fields.email_field;
    if email_field.is_empty() {
        fail!(ValidationError::MissingEmailField);
    }

    if config.password_field.is_empty() {
        fail!(ValidationError::MissingPasswordField);
    }

    if !email_field.is_empty() && !registry.contains(email_field) {
        fail!(ValidationError::DanglingEmailField(email_field.clone()));
    }

    if !config.password_field.is_empty() && !registry.contains(&config.password_field) {
        fail!(ValidationError::DanglingPasswordField(
            config.password_field.clone()
        ));
    }

    if let Some(name) = registry.duplicate_names().into_iter().next() {
        fail!(ValidationError::DuplicateFieldName(name));
    }

    let username_field = &config.login_fields.username_field;
    if !username_field.is_empty() && !registry.contains(username_field) {
        fail!(ValidationError::DanglingUsernameField(username_field.clone()));
    }

    if Validate::validate(config).is_err() {
        fail!(ValidationError::InvalidTokenExpiration(config.token_expiration));
    }

    errors
}
