mod common;

use auth_schema_service::config::AuthSchemaConfig;
use auth_schema_service::models::{FieldPatch, FieldType, HttpMethod};
use auth_schema_service::services::{
    AuthoringSession, InMemorySchemaStore, ServiceError, SessionState, ValidationError,
};
use common::{connected_config, index_of, session};

#[tokio::test]
async fn test_commit_defaults_user_collection_and_resets_session() {
    let mut session = session("billing");
    let store = InMemorySchemaStore::new();

    let stored = session
        .commit(&connected_config(), &store)
        .await
        .expect("commit should succeed");
    assert!(!stored.schema_id.is_empty());

    let specs = store.stored();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].collection_name, "billing");
    assert_eq!(specs[0].auth_config.user_collection, "billing_users");
    assert_eq!(specs[0].fields.len(), 5);

    assert_eq!(session.state(), SessionState::Committed);
    assert_eq!(session.collection_name(), "");
    assert_eq!(session.config().user_collection, "");

    session.set_collection_name("next");
    assert_eq!(session.state(), SessionState::Editing);
}

#[tokio::test]
async fn test_commit_without_connection_is_refused() {
    let mut session = session("billing");
    let store = InMemorySchemaStore::new();

    let err = session
        .commit(&AuthSchemaConfig::default(), &store)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::MissingMongoConnection)
    ));
    assert!(store.stored().is_empty());
    assert_eq!(session.state(), SessionState::Editing);
    assert_eq!(session.collection_name(), "billing");
}

#[tokio::test]
async fn test_removing_password_field_blocks_commit() {
    let mut session = session("users");
    let password = index_of(&session, "password");
    assert!(session.remove_field(password));
    assert_eq!(session.config().password_field, "");

    let err = session
        .commit(&connected_config(), &InMemorySchemaStore::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::MissingPasswordField)
    ));
    assert_eq!(
        session.last_error(),
        Some(&ValidationError::MissingPasswordField)
    );
}

#[tokio::test]
async fn test_store_failure_keeps_session_intact() {
    let mut session = session("orders");
    let email = index_of(&session, "email");
    session.rename_field(email, "primary_email");
    let before = session.config().clone();

    let store = InMemorySchemaStore::new();
    store.fail_next("collection orders already exists");

    let err = session
        .commit(&connected_config(), &store)
        .await
        .unwrap_err();
    match err {
        ServiceError::Persistence(message) => {
            assert_eq!(message, "collection orders already exists")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Editing);
    assert_eq!(session.config(), &before);
    assert_eq!(session.collection_name(), "orders");

    // The failure is one-shot; retrying by hand succeeds.
    assert!(session.commit(&connected_config(), &store).await.is_ok());
    assert_eq!(
        store.stored()[0].auth_config.login_fields.email_field,
        "primary_email"
    );
}

#[tokio::test]
async fn test_custom_schema_round_trip() {
    let mut session = session("members");

    let handle = session.add_field();
    assert!(session.update_field(
        handle,
        FieldPatch {
            name: Some("handle".to_string()),
            field_type: Some(FieldType::String),
            visibility: None,
            required: Some(true),
        }
    ));
    session.engine_mut().set_username_field("handle");
    session.engine_mut().set_allow_both(true);
    session.engine_mut().set_user_collection("member_accounts");
    session.engine_mut().set_require_email_verification(true);
    session.engine_mut().set_token_expiration(168).unwrap();
    assert!(session.toggle_response_field("handle"));

    let store = InMemorySchemaStore::new();
    session.commit(&connected_config(), &store).await.unwrap();

    let stored = store.stored();
    let spec = &stored[0];
    assert_eq!(spec.auth_config.user_collection, "member_accounts");
    assert_eq!(spec.auth_config.login_fields.username_field, "handle");
    assert!(spec.auth_config.login_fields.allow_both);
    assert!(spec.auth_config.require_email_verification);
    assert_eq!(spec.auth_config.token_expiration, 168);
    assert_eq!(spec.auth_config.response_fields.last().unwrap(), "handle");

    let json = serde_json::to_value(spec).unwrap();
    assert_eq!(json["fields"][5]["name"], "handle");
    assert_eq!(json["fields"][5]["type"], "string");
    assert_eq!(json["auth_config"]["login_fields"]["email_field"], "email");
}

#[test]
fn test_rename_propagates_to_login_and_response_fields() {
    let mut session = session("users");
    let position = session
        .config()
        .response_fields
        .iter()
        .position(|f| f == "email")
        .unwrap();

    assert!(session.rename_field(index_of(&session, "email"), "primary_email"));
    assert_eq!(session.config().login_fields.email_field, "primary_email");
    assert_eq!(session.config().response_fields[position], "primary_email");
}

#[test]
fn test_incomplete_fields_reported_before_missing_password() {
    let mut session = session("users");
    session.add_field();
    session.engine_mut().set_password_field("");

    let err = session.validate(&connected_config()).unwrap_err();
    assert_eq!(err, ValidationError::IncompleteFields);
}

#[test]
fn test_last_field_cannot_be_removed() {
    let mut session = AuthoringSession::new("users");
    while session.registry().len() > 1 {
        assert!(session.remove_field(0));
    }
    assert!(!session.remove_field(0));
    assert_eq!(session.registry().len(), 1);
}

#[test]
fn test_endpoints_for_orders() {
    let mut session = session("orders");
    session.engine_mut().set_allow_signup(true);
    let endpoints = session.endpoints();
    let pairs: Vec<(HttpMethod, &str)> = endpoints
        .iter()
        .map(|e| (e.method, e.path.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (HttpMethod::Post, "/api/orders/auth/signup"),
            (HttpMethod::Post, "/api/orders/auth/login"),
            (HttpMethod::Get, "/api/orders/auth/validate"),
        ]
    );
}

#[test]
fn test_update_field_rename_repairs_email_references() {
    let mut session = session("users");
    let email = index_of(&session, "email");

    assert!(session.update_field(email, FieldPatch::name("primary_email")));
    assert_eq!(session.config().login_fields.email_field, "primary_email");
    assert_eq!(session.config().response_fields[1], "primary_email");
    assert!(session.validate(&connected_config()).is_ok());
}

#[test]
fn test_update_field_rename_repairs_password_reference() {
    let mut session = session("users");
    let password = index_of(&session, "password");

    assert!(session.update_field(
        password,
        FieldPatch {
            name: Some("password_hash".to_string()),
            field_type: None,
            visibility: None,
            required: Some(true),
        }
    ));
    assert_eq!(session.config().password_field, "password_hash");
    assert!(!session.config().is_response_field("password_hash"));
    assert!(session.validate(&connected_config()).is_ok());
}

#[test]
fn test_whitespace_rename_unsets_references() {
    let mut session = session("users");
    assert!(session.rename_field(index_of(&session, "email"), "   "));

    assert_eq!(session.config().login_fields.email_field, "");
    assert_eq!(
        session.config().response_fields,
        vec!["id", "name", "created_at"]
    );
    assert_eq!(
        session.validate(&connected_config()).unwrap_err(),
        ValidationError::IncompleteFields
    );
}
