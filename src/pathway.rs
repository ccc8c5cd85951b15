//! Orquestación de la generación de pathways.
//!
//! Flujo:
//!   1. Huella determinista de la configuración (cache).
//!   2. Acierto de caché → se devuelve el grafo almacenado tal cual, con su
//!      `generated_at` original (los aciertos no refrescan marcas de tiempo
//!      ni TTL).
//!   3. Fallo → generación vía LLM, que internamente puede degradar al
//!      generador local.
//!   4. El resultado se guarda bajo la huella con el TTL por defecto y se
//!      devuelve.

use tracing::info;

use crate::cache::PathwayCache;
use crate::llm::LlmManager;
use crate::models::{PathwayConfig, PathwayGraph};

/// Punto de entrada único de la generación para los llamantes externos.
/// No falla nunca: la vía del LLM absorbe sus propios errores y el
/// generador local es total.
pub async fn generate_pathway(
    cache: &PathwayCache,
    llm: &LlmManager,
    config: &PathwayConfig,
) -> PathwayGraph {
    let key = cache.fingerprint(config);

    if let Some(cached) = cache.get(&key) {
        info!("Acierto de caché para la huella {key}, se devuelve el pathway almacenado.");
        return cached;
    }

    let graph = llm.generate_pathway(config).await;
    cache.put(&key, graph.clone());

    info!(
        "Pathway '{}' generado y almacenado bajo la huella {key} ({} nodos, {} aristas).",
        graph.pathway_name,
        graph.nodes.len(),
        graph.edges.len()
    );

    graph
}
