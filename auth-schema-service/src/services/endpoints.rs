//! Endpoint derivation.

use crate::models::{AuthConfiguration, Endpoint, EndpointKind};

/// Routes an auth runtime must expose for `collection_name`.
///
/// Signup comes first when enabled, followed by login and validate. The result
/// depends only on the inputs, so consumers can render it in the given order.
pub fn derived_endpoints(collection_name: &str, config: &AuthConfiguration) -> Vec<Endpoint> {
    let mut kinds = Vec::with_capacity(3);
    if config.allow_signup {
        kinds.push(EndpointKind::Signup);
    }
    kinds.push(EndpointKind::Login);
    kinds.push(EndpointKind::Validate);

    kinds
        .into_iter()
        .map(|kind| Endpoint::new(kind, collection_name))
        .collect()
}
