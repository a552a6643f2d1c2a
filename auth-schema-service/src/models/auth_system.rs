//! Commit artifact and derived API surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuthConfiguration, Field};

/// Immutable snapshot handed to the schema store on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSystemSpec {
    pub collection_name: String,
    pub fields: Vec<Field>,
    pub auth_config: AuthConfiguration,
}

/// Acknowledgement returned by the schema store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSchema {
    pub schema_id: String,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Signup,
    Login,
    Validate,
}

impl EndpointKind {
    pub fn method(&self) -> HttpMethod {
        match self {
            EndpointKind::Signup | EndpointKind::Login => HttpMethod::Post,
            EndpointKind::Validate => HttpMethod::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Signup => "signup",
            EndpointKind::Login => "login",
            EndpointKind::Validate => "validate",
        }
    }

    /// `/api/{collection_name}/auth/{kind}`
    pub fn path(&self, collection_name: &str) -> String {
        format!("/api/{}/auth/{}", collection_name, self.as_str())
    }
}

/// One route the auth runtime must serve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub kind: EndpointKind,
    pub method: HttpMethod,
    pub path: String,
}

impl Endpoint {
    pub fn new(kind: EndpointKind, collection_name: &str) -> Self {
        Self {
            kind,
            method: kind.method(),
            path: kind.path(collection_name),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display() {
        let endpoint = Endpoint::new(EndpointKind::Validate, "orders");
        assert_eq!(endpoint.to_string(), "GET /api/orders/auth/validate");
    }

    #[test]
    fn test_endpoint_serializes_uppercase_method() {
        let endpoint = Endpoint::new(EndpointKind::Signup, "orders");
        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["kind"], "signup");
        assert_eq!(json["path"], "/api/orders/auth/signup");
    }
}
