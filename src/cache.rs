//! Caché en memoria para los resultados de generación de pathways.
//!
//! La clave es una huella determinista de la configuración y las entradas
//! caducan de forma perezosa: la expiración sólo se comprueba al leer, no
//! hay barrido en segundo plano. Un único `Mutex` alrededor del mapa basta
//! para que `get`/`put`/`clear` sean linealizables con la contención baja
//! que se espera de este servicio.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::models::{PathwayConfig, PathwayGraph};

/// TTL por defecto de las entradas: 5 minutos.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry {
    data: PathwayGraph,
    timestamp: Instant,
    ttl: Duration,
}

/// Caché de pathways compartida entre peticiones concurrentes.
pub struct PathwayCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

/// Subconjunto canónico de la configuración que participa en la huella.
/// Serde serializa los structs en orden de declaración, así que la
/// representación es estable: exactamente estos campos, en este orden, con
/// el orden de los ficheros preservado.
#[derive(Serialize)]
struct FingerprintKey<'a> {
    name: &'a str,
    voice: &'a str,
    #[serde(rename = "interruptionThreshold")]
    interruption_threshold: f64,
    #[serde(rename = "robustnessLevel")]
    robustness_level: &'a str,
    files: Vec<FingerprintFile<'a>>,
}

#[derive(Serialize)]
struct FingerprintFile<'a> {
    name: &'a str,
    size: u64,
}

impl PathwayCache {
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Huella determinista de la configuración. Sólo participan los campos
    /// semánticamente relevantes: nombre, voz, umbral de interrupción, nivel
    /// de robustez y nombre + tamaño de cada fichero. El contenido de los
    /// ficheros y el contexto derivado no alteran la clave.
    ///
    /// Limitación conocida: la representación canónica se reduce con un hash
    /// rodante de 32 bits, que puede colisionar. Se acepta como clave barata
    /// de mejor esfuerzo; una colisión devolvería el pathway de otra
    /// configuración hasta que su entrada caduque.
    pub fn fingerprint(&self, config: &PathwayConfig) -> String {
        let key = FingerprintKey {
            name: &config.name,
            voice: &config.voice,
            interruption_threshold: config.interruption_threshold,
            robustness_level: &config.robustness_level,
            files: config
                .files
                .iter()
                .map(|f| FingerprintFile {
                    name: &f.name,
                    size: f.size,
                })
                .collect(),
        };
        let canonical = serde_json::to_string(&key).unwrap_or_default();

        let mut hash: i32 = 0;
        for ch in canonical.chars() {
            hash = hash
                .wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(ch as i32);
        }
        hash.to_string()
    }

    /// Devuelve el pathway almacenado bajo la clave, o `None` si no existe o
    /// si ha caducado. La entrada caducada se desaloja como efecto del
    /// propio fallo de lectura.
    pub fn get(&self, key: &str) -> Option<PathwayGraph> {
        let mut entries = self.entries.lock().unwrap();

        let expired = match entries.get(key) {
            Some(entry) => entry.timestamp.elapsed() > entry.ttl,
            None => return None,
        };

        if expired {
            entries.remove(key);
            return None;
        }

        entries.get(key).map(|entry| entry.data.clone())
    }

    /// Almacena (o sobreescribe) con el TTL por defecto de la caché.
    pub fn put(&self, key: &str, data: PathwayGraph) {
        self.put_with_ttl(key, data, self.default_ttl);
    }

    pub fn put_with_ttl(&self, key: &str, data: PathwayGraph, ttl: Duration) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            CacheEntry {
                data,
                timestamp: Instant::now(),
                ttl,
            },
        );
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn size(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl Default for PathwayCache {
    fn default() -> Self {
        Self::new()
    }
}
