//! Puntuación heurística de confianza sobre la estructura de un grafo.

/// Devuelve una puntuación en [0, 1] en función del número de nodos y
/// aristas del grafo. Las reglas se evalúan en orden y gana la primera que
/// aplica; los rangos se solapan a propósito (3 nodos con 1 arista cae en
/// la rama de 0.7, no en la de 0.9), así que no reordenar.
pub fn confidence_score(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        0.3
    } else if node_count >= 3 && edge_count >= 2 {
        0.9
    } else if edge_count >= 1 {
        0.7
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn un_grafo_degenerado_puntua_bajo() {
        assert_eq!(confidence_score(0, 0), 0.3);
        assert_eq!(confidence_score(1, 0), 0.3);
        assert_eq!(confidence_score(1, 5), 0.3);
    }

    #[test]
    fn un_grafo_rico_puntua_alto() {
        assert_eq!(confidence_score(3, 2), 0.9);
        assert_eq!(confidence_score(7, 13), 0.9);
    }

    #[test]
    fn un_grafo_conectado_minimo_puntua_medio() {
        assert_eq!(confidence_score(2, 1), 0.7);
    }

    #[test]
    fn dos_nodos_sueltos_puntuan_neutro() {
        assert_eq!(confidence_score(2, 0), 0.5);
        assert_eq!(confidence_score(3, 0), 0.5);
    }

    #[test]
    fn el_orden_de_las_reglas_decide_los_solapes() {
        // 3 nodos y 1 arista cumple la condición de nodos de la regla alta
        // pero no la de aristas: cae en la rama intermedia.
        assert_eq!(confidence_score(3, 1), 0.7);
    }
}
