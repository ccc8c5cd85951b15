//! Modelos de dominio (configuración de generación y grafo de pathway).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Configuración inmutable de una petición de generación.
/// Los campos ausentes se sustituyen en silencio por valores por defecto
/// (ver `Default`); el core no valida la entrada.
#[derive(Debug, Clone)]
pub struct PathwayConfig {
    pub name: String,
    pub voice: String,
    pub interruption_threshold: f64,
    pub robustness_level: String,
    pub files: Vec<FileRef>,
    /// Bloque de contexto ya formateado a partir de los ficheros subidos.
    /// Derivado por el ensamblador de contexto; no participa en la huella.
    pub file_context: Option<String>,
}

impl Default for PathwayConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            voice: "Default".to_string(),
            interruption_threshold: 0.5,
            robustness_level: "Medium".to_string(),
            files: Vec::new(),
            file_context: None,
        }
    }
}

/// Referencia a un fichero subido: sólo metadatos.
/// Se usa para la huella de caché (nombre + tamaño) y para mencionar los
/// ficheros en el prompt; nunca se muta.
#[derive(Debug, Clone)]
pub struct FileRef {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

/// Grafo de pathway generado. Los nombres de campo serializados
/// (`pathway_name`, `nodes`, `edges`, `meta`) son el contrato con el visor
/// del frontend y no deben cambiar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayGraph {
    #[serde(default)]
    pub pathway_name: String,
    pub nodes: Vec<PathwayNode>,
    pub edges: Vec<PathwayEdge>,
    #[serde(default)]
    pub meta: PathwayMeta,
}

impl PathwayGraph {
    /// Comprueba los invariantes estructurales: nodos no vacíos, ids únicos
    /// y aristas cuyos extremos referencian nodos existentes. Los bucles
    /// (`from == to`) son válidos: representan ciclos de reintento o
    /// aclaración.
    pub fn is_structurally_valid(&self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let mut ids = HashSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return false;
            }
        }
        self.edges
            .iter()
            .all(|edge| ids.contains(edge.from.as_str()) && ids.contains(edge.to.as_str()))
    }
}

/// Un paso del pathway. Inmutable una vez forma parte de un grafo devuelto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub title: String,
    pub prompt: String,
}

/// Tipo de nodo: un turno conversacional o una acción del sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Prompt,
    Action,
}

/// Transición dirigida entre dos nodos, guardada por una condición con
/// nombre simbólico (p. ej. "insufficient_info").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayEdge {
    pub from: String,
    pub to: String,
    pub condition: String,
}

/// Metadatos de un grafo generado.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathwayMeta {
    pub confidence: f64,
    pub generated_at: String,
    pub model: String,
    /// Sólo presente en la vía del generador local; reproduce el nivel de
    /// robustez recibido tal cual (incluidos valores no reconocidos) con
    /// fines de diagnóstico.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robustness_level: Option<String>,
}
