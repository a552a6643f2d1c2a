//! Reference repair.
//!
//! Every registry mutation that can invalidate a field-name reference yields a
//! [`FieldChange`]. Applying it to an [`AuthConfiguration`] rewrites or clears
//! the affected references so the configuration never names a field that is no
//! longer in the registry.

use serde::{Deserialize, Serialize};

use crate::models::AuthConfiguration;

/// A registry mutation the auth configuration has to follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum FieldChange {
    Renamed { old: String, new: String },
    Removed { name: String },
    /// The field stays but may no longer be disclosed.
    MadePrivate { name: String },
}

/// Pure form of [`apply_change`].
pub fn repair(mut config: AuthConfiguration, change: &FieldChange) -> AuthConfiguration {
    apply_change(&mut config, change);
    config
}

pub fn apply_change(config: &mut AuthConfiguration, change: &FieldChange) {
    match change {
        FieldChange::Renamed { old, new } => rename_references(config, old, new),
        FieldChange::Removed { name } => clear_references(config, name),
        FieldChange::MadePrivate { name } => {
            if !is_blank(name) {
                config.response_fields.retain(|f| f != name);
            }
        }
    }

    config.exclude_password_from_responses();
    config.normalize_login_fields();
}

/// Same rule as [`Field::is_named`](crate::models::Field::is_named).
fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

fn rename_references(config: &mut AuthConfiguration, old: &str, new: &str) {
    // An unnamed field cannot be referenced; empty references mean "unset".
    if is_blank(old) || old == new {
        return;
    }

    // Renaming to blank unsets every reference, like a removal.
    if is_blank(new) {
        clear_references(config, old);
        return;
    }

    tracing::debug!(old = %old, new = %new, "Repairing renamed field references");

    if config.login_fields.email_field == old {
        config.login_fields.email_field = new.to_string();
    }
    if config.password_field == old {
        config.password_field = new.to_string();
    }
    if config.login_fields.username_field == old {
        config.login_fields.username_field = new.to_string();
    }

    for entry in config.response_fields.iter_mut() {
        if entry.as_str() == old {
            *entry = new.to_string();
        }
    }
    config.dedup_response_fields();
}

fn clear_references(config: &mut AuthConfiguration, name: &str) {
    if is_blank(name) {
        return;
    }

    tracing::debug!(name = %name, "Clearing removed field references");

    if config.login_fields.email_field == name {
        config.login_fields.email_field.clear();
    }
    if config.password_field == name {
        config.password_field.clear();
    }
    if config.login_fields.username_field == name {
        config.login_fields.username_field.clear();
    }
    config.response_fields.retain(|f| f != name);
}
