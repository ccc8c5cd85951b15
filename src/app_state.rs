use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use crate::{cache::PathwayCache, config::AppConfig, llm::LlmManager};

/// Estado compartido entre las peticiones. La caché es el único estado
/// mutable que cruza peticiones; se construye explícitamente aquí (no es un
/// global ambiental) para poder inyectarla en los tests.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub llm_manager: LlmManager,
    pub cache: Arc<PathwayCache>,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}
