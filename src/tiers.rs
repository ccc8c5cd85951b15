//! Niveles de robustez del pathway y sus instrucciones de generación.

/// Nivel de robustez solicitado por el formulario. Controla la complejidad
/// del grafo generado, tanto en las instrucciones que se envían al LLM como
/// en la plantilla del generador local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobustnessLevel {
    Quick,
    Medium,
    Production,
}

impl RobustnessLevel {
    /// Interpreta el valor recibido del formulario. Cualquier valor no
    /// reconocido se resuelve como `Medium`, y esa resolución aplica por
    /// igual a las instrucciones del prompt y a la plantilla local.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "quick" => Self::Quick,
            "production" => Self::Production,
            _ => Self::Medium,
        }
    }

    /// Instrucciones de generación del nivel, en lenguaje natural, para
    /// incrustar en el prompt del LLM.
    pub fn instructions(&self) -> &'static str {
        match self {
            Self::Quick => {
                "Genera un pathway mínimo de 3 a 4 nodos: flujo directo con una \
                 gestión básica de la petición del cliente, sin bucles de reintento."
            }
            Self::Medium => {
                "Genera un pathway de 4 a 5 nodos que cubra los casos límite \
                 habituales: un bucle de reintento cuando la información recogida es \
                 insuficiente, otro cuando la verificación falla y una vía de \
                 escalado para los problemas no resueltos."
            }
            Self::Production => {
                "Genera un pathway de 5 a 6 nodos con cobertura completa de casos \
                 límite: varias estrategias de reintento, un nodo explícito de \
                 evaluación de escalado, una etapa final de resolución y \
                 documentación, y bucles para información insuficiente, fallo de \
                 verificación, confusión del usuario, insatisfacción y retraso en \
                 el escalado."
            }
        }
    }
}
