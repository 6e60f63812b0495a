use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionGateway;
use crate::store::{AttachmentStore, DocumentStore};

/// Shared application state injected into all route handlers via Axum
/// extractors. The gateway and stores sit behind trait objects so tests and
/// alternative backends can swap them out.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn CompletionGateway>,
    pub documents: Arc<dyn DocumentStore>,
    pub attachments: Arc<dyn AttachmentStore>,
}
