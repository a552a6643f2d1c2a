//! Authentication policy bound to the fields of one schema.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MIN_TOKEN_EXPIRATION_HOURS: u32 = 1;
/// One year.
pub const MAX_TOKEN_EXPIRATION_HOURS: u32 = 8760;
pub const DEFAULT_TOKEN_EXPIRATION_HOURS: u32 = 24;

/// Which fields identify a user at login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFields {
    /// Empty while unset.
    pub email_field: String,
    /// Empty means no secondary identifier.
    #[serde(default)]
    pub username_field: String,
    #[serde(default)]
    pub allow_both: bool,
}

impl LoginFields {
    pub fn has_username_field(&self) -> bool {
        !self.username_field.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AuthConfiguration {
    pub enabled: bool,
    /// Defaults to `<collection>_users` at commit when left empty.
    #[serde(default)]
    pub user_collection: String,
    pub login_fields: LoginFields,
    pub password_field: String,
    #[serde(default)]
    pub response_fields: Vec<String>,
    #[validate(range(min = 1, max = 8760))]
    pub token_expiration: u32,
    #[serde(default)]
    pub require_email_verification: bool,
    #[serde(default)]
    pub allow_signup: bool,
}

impl Default for AuthConfiguration {
    /// Matches the seed fields of a fresh registry.
    fn default() -> Self {
        Self {
            enabled: true,
            user_collection: String::new(),
            login_fields: LoginFields {
                email_field: "email".to_string(),
                username_field: String::new(),
                allow_both: false,
            },
            password_field: "password".to_string(),
            response_fields: vec![
                "id".to_string(),
                "email".to_string(),
                "name".to_string(),
                "created_at".to_string(),
            ],
            token_expiration: DEFAULT_TOKEN_EXPIRATION_HOURS,
            require_email_verification: false,
            allow_signup: true,
        }
    }
}

impl AuthConfiguration {
    pub fn is_response_field(&self, name: &str) -> bool {
        self.response_fields.iter().any(|f| f == name)
    }

    /// Drop the password field from `response_fields`, wherever it came from.
    pub fn exclude_password_from_responses(&mut self) {
        if self.password_field.is_empty() {
            return;
        }
        let password = self.password_field.clone();
        self.response_fields.retain(|f| *f != password);
    }

    /// Keep the first occurrence of each response field.
    pub fn dedup_response_fields(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.response_fields.retain(|f| seen.insert(f.clone()));
    }

    /// `allow_both` only means something with a username field configured.
    pub fn normalize_login_fields(&mut self) {
        if !self.login_fields.has_username_field() {
            self.login_fields.allow_both = false;
        }
    }

    /// Collection name handed to the auth runtime.
    pub fn effective_user_collection(&self, collection_name: &str) -> String {
        if self.user_collection.trim().is_empty() {
            format!("{}_users", collection_name)
        } else {
            self.user_collection.clone()
        }
    }
}
