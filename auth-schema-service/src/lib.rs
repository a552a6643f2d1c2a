//! Auth Schema Service - derives an authentication subsystem from a record schema.
//!
//! A [`services::FieldRegistry`] holds the editable field list, and an
//! [`services::AuthConfigEngine`] binds login, password and response settings to
//! those fields. [`services::AuthoringSession`] drives both through validation
//! and commit to a [`services::SchemaStore`].

pub mod config;
pub mod models;
pub mod services;
