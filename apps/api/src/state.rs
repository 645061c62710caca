use crate::chat::service::ChatService;
use crate::vm::VmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
    pub vm: VmClient,
    /// Body limit for `/vm/analyze` uploads.
    pub max_upload_bytes: usize,
}
