use ringshelf::{AsyncRingshelf, SessionSigner};

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The async shelf instance. Dispatches blocking store and card-API
    /// operations to a thread pool internally.
    pub shelf: AsyncRingshelf,

    /// Mints and verifies the shared-household session cookie.
    pub signer: SessionSigner,
}
