//! Generador local y determinista de pathways.
//!
//! Es la vía de degradación del gestor de LLMs: se usa cuando no hay
//! credenciales configuradas, cuando el proveedor no está implementado o
//! cuando la llamada o el parseo fallan. Es total (nunca falla) y, para una
//! misma configuración, produce siempre los mismos nodos y aristas.

use chrono::Utc;

use crate::models::{NodeType, PathwayConfig, PathwayEdge, PathwayGraph, PathwayMeta, PathwayNode};
use crate::scoring;
use crate::tiers::RobustnessLevel;

/// Genera un pathway con la plantilla del nivel de robustez solicitado.
///
/// Las tres plantillas parten de una cadena base de 3 nodos
/// (Greeting → Gather Information → Verify & Process):
///   - Quick: la cadena base sin modificar (3 nodos, 2 aristas).
///   - Medium: añade gestión de incidencias y cierre, con bucles de
///     reintento sobre la recogida de información y la verificación
///     (5 nodos, 7 aristas).
///   - Production: añade incidencias complejas, evaluación de escalado,
///     resolución y documentación, con cinco bucles de reintento
///     (7 nodos, 13 aristas).
pub fn mock_generate(config: &PathwayConfig) -> PathwayGraph {
    let tier = RobustnessLevel::from_str(&config.robustness_level);

    let mut nodes = base_nodes();
    let mut edges = base_edges();

    match tier {
        RobustnessLevel::Quick => {}
        RobustnessLevel::Medium => extend_medium(&mut nodes, &mut edges),
        RobustnessLevel::Production => extend_production(&mut nodes, &mut edges),
    }

    let pathway_name = if config.name.trim().is_empty() {
        "Untitled Pathway".to_string()
    } else {
        config.name.clone()
    };

    let confidence = scoring::confidence_score(nodes.len(), edges.len());

    PathwayGraph {
        pathway_name,
        nodes,
        edges,
        meta: PathwayMeta {
            confidence,
            generated_at: Utc::now().to_rfc3339(),
            model: "mock".to_string(),
            robustness_level: Some(config.robustness_level.clone()),
        },
    }
}

fn node(id: &str, node_type: NodeType, title: &str, prompt: &str) -> PathwayNode {
    PathwayNode {
        id: id.to_string(),
        node_type,
        title: title.to_string(),
        prompt: prompt.to_string(),
    }
}

fn edge(from: &str, to: &str, condition: &str) -> PathwayEdge {
    PathwayEdge {
        from: from.to_string(),
        to: to.to_string(),
        condition: condition.to_string(),
    }
}

/// Cadena base común a los tres niveles.
fn base_nodes() -> Vec<PathwayNode> {
    vec![
        node(
            "1",
            NodeType::Prompt,
            "Greeting & Initial Contact",
            "Welcome the customer, introduce the service and ask how you can help.",
        ),
        node(
            "2",
            NodeType::Prompt,
            "Gather Information",
            "Collect the details of the customer's request and the data needed to proceed.",
        ),
        node(
            "3",
            NodeType::Action,
            "Verify & Process",
            "Verify the information provided and process the customer's request.",
        ),
    ]
}

fn base_edges() -> Vec<PathwayEdge> {
    vec![
        edge("1", "2", "user_engaged"),
        edge("2", "3", "info_provided"),
    ]
}

/// Extensión del nivel Medium: gestión de incidencias, cierre con
/// seguimiento y bucles de reintento sobre los nodos 2 y 3.
fn extend_medium(nodes: &mut Vec<PathwayNode>, edges: &mut Vec<PathwayEdge>) {
    nodes.push(node(
        "4",
        NodeType::Action,
        "Handle Issues",
        "Resolve the issues detected while processing the request.",
    ));
    nodes.push(node(
        "5",
        NodeType::Prompt,
        "Complete & Follow-up",
        "Confirm the resolution with the customer and agree on follow-up steps.",
    ));

    edges.push(edge("3", "4", "issue_detected"));
    edges.push(edge("3", "5", "processed_ok"));
    edges.push(edge("4", "5", "issue_resolved"));
    // Bucles de reintento: más información y nueva verificación.
    edges.push(edge("2", "2", "insufficient_info"));
    edges.push(edge("3", "3", "verification_failed"));
}

/// Extensión del nivel Production: rama de complejidad, sub-rama de
/// escalado, cola lineal de documentación y cinco bucles de reintento.
fn extend_production(nodes: &mut Vec<PathwayNode>, edges: &mut Vec<PathwayEdge>) {
    nodes.push(node(
        "4",
        NodeType::Action,
        "Handle Complex Issues",
        "Work through the complex issue with the customer step by step.",
    ));
    nodes.push(node(
        "5",
        NodeType::Prompt,
        "Escalation Check",
        "Evaluate whether the case must be escalated to a human agent.",
    ));
    nodes.push(node(
        "6",
        NodeType::Prompt,
        "Resolution & Confirmation",
        "Present the resolution and confirm that the customer is satisfied.",
    ));
    nodes.push(node(
        "7",
        NodeType::Action,
        "Document & Close",
        "Document the interaction and close the case.",
    ));

    // Rama de complejidad: el caso se resuelve por la vía estándar o pasa
    // por la gestión de incidencias complejas.
    edges.push(edge("3", "4", "complex_issue"));
    edges.push(edge("3", "6", "standard_resolution"));
    // Sub-rama de escalado y reincorporación al flujo.
    edges.push(edge("4", "5", "needs_escalation_review"));
    edges.push(edge("4", "6", "issue_resolved"));
    edges.push(edge("5", "6", "handled_internally"));
    // Cola lineal de cierre.
    edges.push(edge("6", "7", "resolution_confirmed"));
    // Bucles de reintento y aclaración.
    edges.push(edge("2", "2", "insufficient_info"));
    edges.push(edge("3", "3", "verification_failed"));
    edges.push(edge("4", "4", "user_confused"));
    edges.push(edge("5", "5", "escalation_delayed"));
    edges.push(edge("6", "6", "user_dissatisfied"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str) -> PathwayConfig {
        PathwayConfig {
            name: "Soporte Facturación".to_string(),
            robustness_level: level.to_string(),
            ..PathwayConfig::default()
        }
    }

    #[test]
    fn la_generacion_es_determinista() {
        let cfg = config("Production");
        let first = mock_generate(&cfg);
        let second = mock_generate(&cfg);
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.edges, second.edges);
        assert_eq!(first.pathway_name, second.pathway_name);
    }

    #[test]
    fn quick_devuelve_la_cadena_base() {
        let graph = mock_generate(&config("Quick"));
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);
        let titles: Vec<&str> = graph.nodes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Greeting & Initial Contact", "Gather Information", "Verify & Process"]
        );
    }

    #[test]
    fn medium_extiende_con_incidencias_y_dos_bucles() {
        let graph = mock_generate(&config("Medium"));
        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(graph.edges.len(), 7);
        let loops: Vec<&PathwayEdge> =
            graph.edges.iter().filter(|e| e.from == e.to).collect();
        assert_eq!(loops.len(), 2);
        assert!(loops.iter().any(|e| e.condition == "insufficient_info"));
        assert!(loops.iter().any(|e| e.condition == "verification_failed"));
    }

    #[test]
    fn production_extiende_con_escalado_y_cinco_bucles() {
        let graph = mock_generate(&config("Production"));
        assert_eq!(graph.nodes.len(), 7);
        assert_eq!(graph.edges.len(), 13);
        assert_eq!(graph.edges.iter().filter(|e| e.from == e.to).count(), 5);
        assert!(graph.nodes.iter().any(|n| n.title == "Escalation Check"));
        assert!(graph.nodes.iter().any(|n| n.title == "Document & Close"));
    }

    #[test]
    fn los_tres_niveles_producen_grafos_estructuralmente_validos() {
        for level in ["Quick", "Medium", "Production"] {
            let graph = mock_generate(&config(level));
            assert!(
                graph.is_structurally_valid(),
                "grafo inválido para el nivel {level}"
            );
        }
    }

    #[test]
    fn los_ids_son_enteros_secuenciales_como_cadenas() {
        let graph = mock_generate(&config("Production"));
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7"]);
    }

    #[test]
    fn un_nombre_vacio_se_sustituye_por_el_titulo_por_defecto() {
        let mut cfg = config("Quick");
        cfg.name = String::new();
        assert_eq!(mock_generate(&cfg).pathway_name, "Untitled Pathway");

        cfg.name = "   ".to_string();
        assert_eq!(mock_generate(&cfg).pathway_name, "Untitled Pathway");
    }

    #[test]
    fn un_nivel_no_reconocido_usa_la_plantilla_medium_pero_se_ecoa_tal_cual() {
        let graph = mock_generate(&config("Extreme"));
        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(graph.edges.len(), 7);
        assert_eq!(graph.meta.robustness_level.as_deref(), Some("Extreme"));
    }

    #[test]
    fn los_metadatos_marcan_el_modelo_local() {
        let graph = mock_generate(&config("Medium"));
        assert_eq!(graph.meta.model, "mock");
        assert_eq!(graph.meta.robustness_level.as_deref(), Some("Medium"));
        assert!(!graph.meta.generated_at.is_empty());
    }

    #[test]
    fn la_confianza_refleja_la_riqueza_estructural() {
        // Todos los niveles superan el umbral de 3 nodos y 2 aristas.
        for level in ["Quick", "Medium", "Production"] {
            assert_eq!(mock_generate(&config(level)).meta.confidence, 0.9);
        }
    }
}
