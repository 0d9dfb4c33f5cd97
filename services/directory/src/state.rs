use ecodes_store::StoreConnection;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: StoreConnection,
}
