//! Field registry - the ordered, editable field list of one schema.
//!
//! Names are not required to be unique or non-empty while editing; both are
//! checked at validation time. Mutations that could leave a dangling reference
//! report a [`FieldChange`] for the auth configuration to apply.

use std::collections::HashSet;

use crate::models::{Field, FieldPatch, FieldType, Visibility};
use crate::services::repair::FieldChange;

/// A registry never drops below this many fields.
pub const MIN_FIELDS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: Vec<Field>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FieldRegistry {
    /// Seed fields of a "users" record.
    pub fn with_defaults() -> Self {
        Self {
            fields: vec![
                Field::new("id", FieldType::String).required(),
                Field::new("email", FieldType::String).required(),
                Field::new("password", FieldType::String).private().required(),
                Field::new("name", FieldType::String),
                Field::new("created_at", FieldType::Date),
            ],
        }
    }

    /// Returns `None` for an empty list, which would break the minimum.
    pub fn from_fields(fields: Vec<Field>) -> Option<Self> {
        if fields.len() < MIN_FIELDS {
            return None;
        }
        Some(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// First field carrying `name`.
    pub fn find(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Non-empty names used by more than one field, in order of first repeat.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for field in self.fields.iter().filter(|f| f.is_named()) {
            if !seen.insert(field.name.as_str()) && !duplicates.contains(&field.name) {
                duplicates.push(field.name.clone());
            }
        }
        duplicates
    }

    /// Append an unnamed public string field and return its index.
    pub fn add_field(&mut self) -> usize {
        self.fields.push(Field::default());
        self.fields.len() - 1
    }

    /// Out-of-range indices are refused.
    pub fn rename_field(&mut self, index: usize, new_name: impl Into<String>) -> Option<FieldChange> {
        let new_name = new_name.into();
        let len = self.fields.len();
        let Some(field) = self.fields.get_mut(index) else {
            tracing::warn!(index, len, "Refusing rename of out-of-range field");
            return None;
        };

        if field.name == new_name {
            return None;
        }

        let old = std::mem::replace(&mut field.name, new_name.clone());
        Some(FieldChange::Renamed { old, new: new_name })
    }

    /// Merge `patch` into the field at `index`. A name change propagates like
    /// [`rename_field`](Self::rename_field).
    pub fn update_field(&mut self, index: usize, patch: FieldPatch) -> Vec<FieldChange> {
        let mut changes = Vec::new();

        let len = self.fields.len();
        let Some(field) = self.fields.get_mut(index) else {
            tracing::warn!(index, len, "Refusing update of out-of-range field");
            return changes;
        };

        if let Some(field_type) = patch.field_type {
            field.field_type = field_type;
        }
        if let Some(required) = patch.required {
            field.required = required;
        }
        if let Some(name) = patch.name {
            if field.name != name {
                let old = std::mem::replace(&mut field.name, name.clone());
                changes.push(FieldChange::Renamed { old, new: name });
            }
        }
        if let Some(visibility) = patch.visibility {
            let became_private =
                visibility == Visibility::Private && field.visibility != Visibility::Private;
            field.visibility = visibility;
            if became_private {
                changes.push(FieldChange::MadePrivate {
                    name: field.name.clone(),
                });
            }
        }

        changes
    }

    /// Removing the last remaining field or an out-of-range index is refused.
    pub fn remove_field(&mut self, index: usize) -> Option<FieldChange> {
        if index >= self.fields.len() {
            tracing::warn!(index, len = self.fields.len(), "Refusing removal of out-of-range field");
            return None;
        }
        if self.fields.len() <= MIN_FIELDS {
            tracing::warn!(index, "Refusing removal of the last remaining field");
            return None;
        }

        let field = self.fields.remove(index);
        Some(FieldChange::Removed { name: field.name })
    }
}
