//! Auth configuration engine.
//!
//! Owns the [`AuthConfiguration`] of one authoring session and keeps it
//! consistent with the session's [`FieldRegistry`]: registry changes are
//! applied through the repair protocol, and every setter preserves the
//! password/response exclusion.

use crate::models::{
    AuthConfiguration, Field, MAX_TOKEN_EXPIRATION_HOURS, MIN_TOKEN_EXPIRATION_HOURS,
};
use crate::services::error::ServiceError;
use crate::services::registry::FieldRegistry;
use crate::services::repair::{apply_change, FieldChange};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfigEngine {
    config: AuthConfiguration,
}

impl AuthConfigEngine {
    pub fn new(mut config: AuthConfiguration) -> Self {
        config.dedup_response_fields();
        config.exclude_password_from_responses();
        config.normalize_login_fields();
        Self { config }
    }

    pub fn config(&self) -> &AuthConfiguration {
        &self.config
    }

    pub fn into_config(self) -> AuthConfiguration {
        self.config
    }

    pub fn apply(&mut self, change: &FieldChange) {
        apply_change(&mut self.config, change);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn set_user_collection(&mut self, user_collection: impl Into<String>) {
        self.config.user_collection = user_collection.into();
    }

    pub fn set_email_field(&mut self, name: impl Into<String>) {
        self.config.login_fields.email_field = name.into();
    }

    /// An empty name removes the secondary identifier and with it `allow_both`.
    pub fn set_username_field(&mut self, name: impl Into<String>) {
        self.config.login_fields.username_field = name.into();
        self.config.normalize_login_fields();
    }

    pub fn set_allow_both(&mut self, allow_both: bool) {
        self.config.login_fields.allow_both = allow_both;
        self.config.normalize_login_fields();
    }

    pub fn set_password_field(&mut self, name: impl Into<String>) {
        self.config.password_field = name.into();
        self.config.exclude_password_from_responses();
    }

    pub fn set_token_expiration(&mut self, hours: u32) -> Result<(), ServiceError> {
        if !(MIN_TOKEN_EXPIRATION_HOURS..=MAX_TOKEN_EXPIRATION_HOURS).contains(&hours) {
            tracing::warn!(hours, "Rejecting token expiration outside allowed range");
            return Err(ServiceError::InvalidTokenExpiration(hours));
        }
        self.config.token_expiration = hours;
        Ok(())
    }

    pub fn set_require_email_verification(&mut self, required: bool) {
        self.config.require_email_verification = required;
    }

    pub fn set_allow_signup(&mut self, allow_signup: bool) {
        self.config.allow_signup = allow_signup;
    }

    /// Fields a response picker may offer: named, public, not the password.
    pub fn response_field_options<'r>(&self, registry: &'r FieldRegistry) -> Vec<&'r Field> {
        registry
            .fields()
            .iter()
            .filter(|f| f.is_named() && !f.is_private() && f.name != self.config.password_field)
            .collect()
    }

    /// Append `name` to the response fields if it is an offered option and not
    /// already present. Returns whether it was added.
    pub fn add_response_field(&mut self, registry: &FieldRegistry, name: &str) -> bool {
        if self.config.is_response_field(name) {
            return false;
        }
        let offered = self
            .response_field_options(registry)
            .iter()
            .any(|f| f.name == name);
        if !offered {
            tracing::warn!(name = %name, "Refusing response field that is not a public field");
            return false;
        }
        self.config.response_fields.push(name.to_string());
        true
    }

    pub fn remove_response_field(&mut self, name: &str) -> bool {
        let before = self.config.response_fields.len();
        self.config.response_fields.retain(|f| f != name);
        self.config.response_fields.len() != before
    }

    /// Returns whether `name` is a response field afterwards.
    pub fn toggle_response_field(&mut self, registry: &FieldRegistry, name: &str) -> bool {
        if self.remove_response_field(name) {
            return false;
        }
        self.add_response_field(registry, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_enforces_invariants() {
        let config = AuthConfiguration {
            response_fields: vec!["email".into(), "password".into(), "email".into()],
            ..AuthConfiguration::default()
        };
        let engine = AuthConfigEngine::new(config);
        assert_eq!(engine.config().response_fields, vec!["email"]);
    }

    #[test]
    fn test_setting_password_strips_response_entry() {
        let mut engine = AuthConfigEngine::default();
        engine.set_password_field("name");
        assert_eq!(engine.config().password_field, "name");
        assert!(!engine.config().is_response_field("name"));
    }

    #[test]
    fn test_response_options_exclude_private_and_password() {
        let registry = FieldRegistry::with_defaults();
        let mut engine = AuthConfigEngine::default();
        engine.set_password_field("name");

        let options: Vec<&str> = engine
            .response_field_options(&registry)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(options, vec!["id", "email", "created_at"]);
    }

    #[test]
    fn test_add_response_field_refuses_private_unknown_and_duplicate() {
        let registry = FieldRegistry::with_defaults();
        let mut engine = AuthConfigEngine::default();

        assert!(!engine.add_response_field(&registry, "password"));
        assert!(!engine.add_response_field(&registry, "nickname"));
        assert!(!engine.add_response_field(&registry, "email"));
        assert_eq!(engine.config().response_fields.len(), 4);
    }

    #[test]
    fn test_toggle_response_field() {
        let registry = FieldRegistry::with_defaults();
        let mut engine = AuthConfigEngine::default();

        assert!(!engine.toggle_response_field(&registry, "name"));
        assert!(!engine.config().is_response_field("name"));
        assert!(engine.toggle_response_field(&registry, "name"));
        assert_eq!(engine.config().response_fields.last().unwrap(), "name");
    }

    #[test]
    fn test_token_expiration_bounds() {
        let mut engine = AuthConfigEngine::default();
        assert!(engine.set_token_expiration(0).is_err());
        assert!(engine.set_token_expiration(8761).is_err());
        assert!(engine.set_token_expiration(8760).is_ok());
        assert_eq!(engine.config().token_expiration, 8760);
    }

    #[test]
    fn test_allow_both_needs_username() {
        let mut engine = AuthConfigEngine::default();
        engine.set_allow_both(true);
        assert!(!engine.config().login_fields.allow_both);

        engine.set_username_field("name");
        engine.set_allow_both(true);
        assert!(engine.config().login_fields.allow_both);

        engine.set_username_field("");
        assert!(!engine.config().login_fields.allow_both);
    }

    #[test]
    fn test_apply_removal() {
        let mut engine = AuthConfigEngine::default();
        engine.apply(&FieldChange::Removed {
            name: "email".to_string(),
        });
        assert_eq!(engine.config().login_fields.email_field, "");
        assert_eq!(engine.config().response_fields, vec!["id", "name", "created_at"]);
    }
}
