use ecodes_store::StoreConnection;

use crate::infra::idp::HttpIdentityProvider;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: StoreConnection,
    pub provider: HttpIdentityProvider,
}
