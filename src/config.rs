//! Carga y gestión de configuración de la aplicación (servidor + LLM).

use std::env;
use anyhow::{anyhow, Result};

#[derive(Clone, Debug)]
pub enum LlmProvider {
    OpenAI,
    Gemini,
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(anyhow!("Proveedor LLM no soportado: {other}")),
        }
    }
}

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_addr: String,

    pub llm_provider: LlmProvider,
    pub llm_chat_model: String,
    /// Tiempo máximo de espera de la petición al LLM, en segundos. Una
    /// llamada sin cota sería un defecto: al agotarse se degrada al
    /// generador local.
    pub llm_timeout_secs: u64,
    /// TTL por defecto de la caché de pathways, en segundos.
    pub cache_ttl_secs: u64,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si
    /// existe). Ninguna variable es obligatoria: sin OPENAI_API_KEY en el
    /// entorno la generación usa el generador local en lugar de fallar.
    pub fn from_env() -> Result<Self> {
        let server_addr =
            env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:3322".to_string());

        let llm_provider_str =
            env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let llm_provider = LlmProvider::from_str(&llm_provider_str)?;

        let llm_chat_model =
            env::var("LLM_CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let llm_timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let cache_ttl_secs = env::var("PATHWAY_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5 * 60);

        Ok(Self {
            server_addr,
            llm_provider,
            llm_chat_model,
            llm_timeout_secs,
            cache_ttl_secs,
        })
    }
}
