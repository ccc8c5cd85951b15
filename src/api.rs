use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    files::{self, UploadedFile},
    models::{FileRef, PathwayConfig, PathwayGraph},
    pathway,
};

// --- Payloads y Respuestas de la API ---

/// Petición de generación tal y como la envía el formulario del frontend.
/// Los campos omitidos se sustituyen en silencio por los valores por
/// defecto; el core no valida la entrada.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratePayload {
    name: String,
    voice: String,
    interruption_threshold: f64,
    robustness_level: String,
    files: Vec<UploadedFile>,
}

impl Default for GeneratePayload {
    fn default() -> Self {
        Self {
            name: String::new(),
            voice: "Default".to_string(),
            interruption_threshold: 0.5,
            robustness_level: "Medium".to_string(),
            files: Vec::new(),
        }
    }
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/llm-info", get(llm_info_handler))
        .route("/api/cache-stats", get(cache_stats_handler))
        .route("/api/cache-clear", post(cache_clear_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn generate_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<PathwayGraph>, (StatusCode, Json<serde_json::Value>)> {
    let payload: GeneratePayload = serde_json::from_value(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("Petición de generación inválida: {e}")})),
        )
    })?;

    let request_id = Uuid::new_v4();

    // Procesar los ficheros subidos y montar el bloque de contexto que se
    // incrustará en el prompt.
    let processed = files::process_uploaded_files(&payload.files);
    let file_context = files::extract_context_from_files(&processed);

    let config = PathwayConfig {
        files: payload
            .files
            .iter()
            .map(|f| FileRef {
                name: f.name.clone(),
                mime_type: f.mime_type.clone(),
                size: f.size,
            })
            .collect(),
        file_context: if file_context.is_empty() {
            None
        } else {
            Some(file_context)
        },
        name: payload.name,
        voice: payload.voice,
        interruption_threshold: payload.interruption_threshold,
        robustness_level: payload.robustness_level,
    };

    info!(
        "[{request_id}] Generando pathway '{}' (nivel {}, {} ficheros).",
        config.name,
        config.robustness_level,
        config.files.len()
    );

    let graph = pathway::generate_pathway(&state.cache, &state.llm_manager, &config).await;

    info!(
        "[{request_id}] Pathway listo: {} nodos, {} aristas, modelo '{}'.",
        graph.nodes.len(),
        graph.edges.len(),
        graph.meta.model
    );

    Ok(Json(graph))
}

#[axum::debug_handler]
async fn llm_info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "provider": format!("{:?}", state.llm_manager.provider),
        "chat_model": state.llm_manager.chat_model,
        "credentials_configured": state.llm_manager.has_credentials(),
    }))
}

#[axum::debug_handler]
async fn cache_stats_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "entries": state.cache.size() }))
}

#[axum::debug_handler]
async fn cache_clear_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.cache.clear();
    info!("Caché de pathways vaciada a petición del cliente.");
    (
        StatusCode::OK,
        Json(json!({ "message": "Caché de pathways vaciada." })),
    )
}

// --- Handler de Apagado ---

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    if let Some(sender) = state.shutdown_sender.lock().unwrap().take() {
        let _ = sender.send(());
    }
    StatusCode::OK
}
