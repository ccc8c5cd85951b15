//! Abstracción sobre Rig para generar pathways con distintos proveedores de LLM.
//! De momento se implementa OpenAI; Gemini/Ollama quedan preparados para el futuro.
//!
//! Cualquier fallo de esta vía (sin credenciales, proveedor no implementado,
//! error de red o de autenticación, respuesta vacía o malformada, tiempo
//! agotado) se absorbe aquí: se registra el motivo y se degrada al generador
//! local, de modo que la generación nunca falla hacia el llamante.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use rig::completion::Prompt;
use tracing::{info, warn};

use crate::config::{AppConfig, LlmProvider};
use crate::mock;
use crate::models::{PathwayConfig, PathwayGraph, PathwayMeta};
use crate::{prompt, scoring};

/// Instrucción fija de sistema para la petición de completion.
const SYSTEM_PROMPT: &str = r#"
Eres un diseñador experto de pathways conversacionales de atención al cliente.
Respondes únicamente con JSON válido, sin explicaciones ni texto adicional.
"#;

const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u64 = 2048;

/// Gestor de LLMs para la generación de pathways.
#[derive(Debug, Clone)]
pub struct LlmManager {
    pub provider: LlmProvider,
    pub chat_model: String,
    pub request_timeout: Duration,
}

impl LlmManager {
    /// Construye el manager a partir de la configuración.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        Ok(Self {
            provider: cfg.llm_provider.clone(),
            chat_model: cfg.llm_chat_model.clone(),
            request_timeout: Duration::from_secs(cfg.llm_timeout_secs),
        })
    }

    /// Indica si hay credenciales configuradas para el proveedor actual.
    pub fn has_credentials(&self) -> bool {
        match self.provider {
            LlmProvider::OpenAI => env::var("OPENAI_API_KEY").is_ok(),
            _ => false,
        }
    }

    // ---------------------------------------------------------------------
    // GENERACIÓN DE PATHWAYS
    // ---------------------------------------------------------------------

    /// Genera un pathway para la configuración dada. Nunca falla: toda
    /// incidencia del proveedor se registra y se resuelve con el generador
    /// local.
    pub async fn generate_pathway(&self, config: &PathwayConfig) -> PathwayGraph {
        match self.provider {
            LlmProvider::OpenAI => {
                if !self.has_credentials() {
                    info!("Sin OPENAI_API_KEY en el entorno, usando el generador local.");
                    return mock::mock_generate(config);
                }
                match self.generate_with_openai(config).await {
                    Ok(graph) => graph,
                    Err(e) => {
                        warn!("Fallo generando el pathway con OpenAI: {e}. Usando el generador local.");
                        mock::mock_generate(config)
                    }
                }
            }
            ref other => {
                warn!(
                    "Proveedor LLM {:?} aún no implementado para generación, usando el generador local.",
                    other
                );
                mock::mock_generate(config)
            }
        }
    }

    async fn generate_with_openai(&self, config: &PathwayConfig) -> Result<PathwayGraph> {
        use rig::providers::openai;
        // Trait para client.agent(...)
        use rig::client::CompletionClient as _;

        let client = openai::Client::from_env();

        // Modelo de chat por defecto si no se ha configurado otro
        let model_name = if self.chat_model.is_empty() {
            "gpt-4o-mini"
        } else {
            self.chat_model.as_str()
        };

        let user_prompt = prompt::build_prompt(config);

        let agent = client
            .agent(model_name)
            .preamble(SYSTEM_PROMPT)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_OUTPUT_TOKENS)
            .build();

        // Una única petición, acotada en el tiempo. Sin reintentos: si algo
        // falla se degrada inmediatamente al generador local.
        let response = tokio::time::timeout(self.request_timeout, agent.prompt(user_prompt))
            .await
            .map_err(|_| {
                anyhow!(
                    "la petición al LLM superó el tiempo máximo de {:?}",
                    self.request_timeout
                )
            })??;

        if response.trim().is_empty() {
            return Err(anyhow!("el LLM devolvió una respuesta vacía"));
        }

        let mut graph = parse_model_response(&response)?;

        if graph.pathway_name.trim().is_empty() {
            graph.pathway_name = if config.name.trim().is_empty() {
                "Untitled Pathway".to_string()
            } else {
                config.name.clone()
            };
        }

        graph.meta = PathwayMeta {
            confidence: scoring::confidence_score(graph.nodes.len(), graph.edges.len()),
            generated_at: Utc::now().to_rfc3339(),
            model: model_name.to_string(),
            robustness_level: None,
        };

        Ok(graph)
    }
}

/// Interpreta la respuesta del modelo como un grafo de pathway.
/// Se limpian los posibles cercos de código que algunos modelos añaden y se
/// comprueban los invariantes estructurales: un grafo malformado cuenta como
/// fallo de parseo y provoca la degradación al generador local.
pub fn parse_model_response(response: &str) -> Result<PathwayGraph> {
    let json_response = response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let graph: PathwayGraph = serde_json::from_str(json_response)
        .map_err(|e| anyhow!("la respuesta del LLM no es un pathway JSON válido: {e}"))?;

    if !graph.is_structurally_valid() {
        return Err(anyhow!(
            "el pathway devuelto por el LLM viola los invariantes estructurales (nodos vacíos, ids duplicados o aristas colgantes)"
        ));
    }

    Ok(graph)
}
