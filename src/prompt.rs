//! Construcción del prompt de generación de pathways para el LLM.

use crate::models::PathwayConfig;
use crate::tiers::RobustnessLevel;

/// Especificación literal del formato de salida. Es el contrato con el
/// modelo: los nombres de campo coinciden con los que consume el visor de
/// pathways del frontend.
const OUTPUT_SCHEMA: &str = r#"La salida DEBE ser un único objeto JSON válido con las claves "pathway_name", "nodes" y "edges".
- "pathway_name": el nombre del pathway.
- "nodes": una lista de objetos, cada uno con "id" (cadena), "type" ("prompt" o "action"), "title" y "prompt" (el texto instructivo del paso).
- "edges": una lista de objetos, cada uno con "from" y "to" (ids de nodos existentes) y "condition" (nombre simbólico del disparador, p. ej. "insufficient_info").
Una arista de un nodo a sí mismo representa un ciclo de reintento o aclaración y está permitida.
No incluyas explicaciones ni texto adicional, solo el JSON."#;

/// Compone el prompt completo de forma determinista: configuración, nivel de
/// robustez con sus instrucciones, contexto de los ficheros subidos (tal
/// cual, sin recortes adicionales: el recorte es responsabilidad del
/// ensamblador de contexto) y el esquema de salida.
pub fn build_prompt(config: &PathwayConfig) -> String {
    let tier = RobustnessLevel::from_str(&config.robustness_level);

    let name = if config.name.trim().is_empty() {
        "Untitled Pathway"
    } else {
        config.name.as_str()
    };
    let voice = if config.voice.trim().is_empty() {
        "Default"
    } else {
        config.voice.as_str()
    };

    let mut prompt = format!(
        "Diseña un pathway conversacional de atención al cliente con esta configuración:\n\
         - Nombre del pathway: {name}\n\
         - Voz del agente: {voice}\n\
         - Umbral de interrupción: {threshold}\n\
         - Nivel de robustez: {level}\n\n\
         {instructions}\n",
        threshold = config.interruption_threshold,
        level = config.robustness_level,
        instructions = tier.instructions(),
    );

    if !config.files.is_empty() {
        let names: Vec<&str> = config.files.iter().map(|f| f.name.as_str()).collect();
        prompt.push_str(&format!(
            "\nFicheros de contexto adjuntos: {}.\n",
            names.join(", ")
        ));
    }

    if let Some(context) = config.file_context.as_deref() {
        if !context.is_empty() {
            prompt.push_str(context);
            prompt.push('\n');
        }
    }

    prompt.push('\n');
    prompt.push_str(OUTPUT_SCHEMA);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileRef;

    fn config() -> PathwayConfig {
        PathwayConfig {
            name: "Soporte Facturación".to_string(),
            voice: "Calm".to_string(),
            interruption_threshold: 0.4,
            robustness_level: "Production".to_string(),
            ..PathwayConfig::default()
        }
    }

    #[test]
    fn el_prompt_reproduce_la_configuracion() {
        let prompt = build_prompt(&config());
        assert!(prompt.contains("Soporte Facturación"));
        assert!(prompt.contains("Calm"));
        assert!(prompt.contains("0.4"));
        assert!(prompt.contains("Production"));
    }

    #[test]
    fn el_prompt_incluye_las_instrucciones_del_nivel() {
        let prompt = build_prompt(&config());
        assert!(prompt.contains(RobustnessLevel::Production.instructions()));
    }

    #[test]
    fn el_prompt_enumera_el_esquema_de_salida_y_exige_solo_json() {
        let prompt = build_prompt(&config());
        for key in ["\"pathway_name\"", "\"nodes\"", "\"edges\"", "\"condition\""] {
            assert!(prompt.contains(key), "falta {key} en el esquema");
        }
        assert!(prompt.contains("solo el JSON"));
    }

    #[test]
    fn el_contexto_de_ficheros_se_incrusta_tal_cual() {
        let mut cfg = config();
        cfg.files = vec![FileRef {
            name: "guion.txt".to_string(),
            mime_type: "text/plain".to_string(),
            size: 64,
        }];
        cfg.file_context = Some("\n\nUPLOADED CONTEXT FILES:\ncontenido íntegro".to_string());

        let prompt = build_prompt(&cfg);
        assert!(prompt.contains("Ficheros de contexto adjuntos: guion.txt."));
        assert!(prompt.contains("\n\nUPLOADED CONTEXT FILES:\ncontenido íntegro"));
    }

    #[test]
    fn los_campos_vacios_usan_los_valores_por_defecto() {
        let cfg = PathwayConfig {
            name: String::new(),
            voice: String::new(),
            ..PathwayConfig::default()
        };
        let prompt = build_prompt(&cfg);
        assert!(prompt.contains("Untitled Pathway"));
        assert!(prompt.contains("Default"));
    }

    #[test]
    fn la_composicion_es_determinista() {
        let cfg = config();
        assert_eq!(build_prompt(&cfg), build_prompt(&cfg.clone()));
    }
}
