//! Procesado de los ficheros subidos por el cliente y construcción del
//! bloque de contexto que se incrusta en el prompt del LLM.
//!
//! El navegador ya extrae el texto de cada fichero antes de enviarlo; aquí
//! sólo se normaliza el resultado: los ficheros de audio se sustituyen por
//! un marcador (no hay transcripción real) y los ilegibles se conservan con
//! una marca de error para que el contexto refleje qué se pudo usar.

use chrono::Utc;
use mime_guess::MimeGuess;
use serde::Deserialize;
use tracing::warn;

/// Longitud máxima del contenido de cada fichero dentro del prompt.
const MAX_CONTENT_CHARS: usize = 2000;

/// Fichero tal y como lo envía el frontend: metadatos más el texto extraído
/// en el navegador (ausente para audio y para ficheros que no se pudieron
/// leer).
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content: Option<String>,
}

/// Resultado de procesar un fichero subido.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub content: String,
    pub processed_at: String,
    pub error: bool,
}

/// Procesa los ficheros en el orden recibido. Total: un fichero problemático
/// se incluye marcado como error en lugar de interrumpir el procesado.
pub fn process_uploaded_files(files: &[UploadedFile]) -> Vec<ProcessedFile> {
    files.iter().map(process_file).collect()
}

fn process_file(file: &UploadedFile) -> ProcessedFile {
    // Si el cliente no indica el tipo, se deduce del nombre del fichero.
    let mime_type = if file.mime_type.is_empty() {
        MimeGuess::from_path(&file.name)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_default()
    } else {
        file.mime_type.clone()
    };

    let (content, error) = if is_audio(&mime_type, &file.name) {
        // El audio no se transcribe: se deja un marcador en el contexto.
        (
            format!(
                "[AUDIO FILE: {} - Transcription needed for full content analysis]",
                file.name
            ),
            false,
        )
    } else {
        match &file.content {
            Some(text) => (text.clone(), false),
            None => {
                warn!(
                    "Fichero '{}' sin contenido legible, se incluye marcado como error.",
                    file.name
                );
                (
                    "Error reading file: file content was not provided".to_string(),
                    true,
                )
            }
        }
    };

    ProcessedFile {
        name: file.name.clone(),
        mime_type,
        size: file.size,
        content,
        processed_at: Utc::now().to_rfc3339(),
        error,
    }
}

fn is_audio(mime_type: &str, name: &str) -> bool {
    mime_type.contains("audio") || name.to_lowercase().ends_with(".mp3")
}

/// Construye el bloque de contexto que se añade tal cual al prompt.
/// Devuelve la cadena vacía si no hay ficheros. El recorte a
/// `MAX_CONTENT_CHARS` por fichero ocurre aquí; el constructor del prompt no
/// recorta nada más.
pub fn extract_context_from_files(processed: &[ProcessedFile]) -> String {
    if processed.is_empty() {
        return String::new();
    }

    let mut context = String::from("\n\nUPLOADED CONTEXT FILES:\n");
    context.push_str(&"=".repeat(50));
    context.push('\n');

    for (index, file) in processed.iter().enumerate() {
        context.push_str(&format!("\nFile {}: {}\n", index + 1, file.name));
        context.push_str(&format!("Type: {}\n", file.mime_type));
        context.push_str(&format!("Size: {:.1} KB\n", file.size as f64 / 1024.0));
        context.push_str(&format!("Processed: {}\n", file.processed_at));

        if file.error {
            context.push_str(&format!("Status: ERROR - {}\n", file.content));
        } else {
            context.push_str(&format!("Content:\n{}\n", truncated(&file.content)));
        }

        context.push('\n');
        context.push_str(&"-".repeat(40));
        context.push('\n');
    }

    context
}

/// Recorta el contenido largo por caracteres (no por bytes, para no partir
/// secuencias UTF-8) y lo marca como truncado.
fn truncated(content: &str) -> String {
    if content.chars().count() > MAX_CONTENT_CHARS {
        let cut: String = content.chars().take(MAX_CONTENT_CHARS).collect();
        format!("{cut}... [truncated]")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded(name: &str, mime_type: &str, content: Option<&str>) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size: 1024,
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn el_texto_se_conserva_tal_cual() {
        let files = [uploaded("guion.txt", "text/plain", Some("Hola, gracias por llamar."))];
        let processed = process_uploaded_files(&files);
        assert_eq!(processed.len(), 1);
        assert!(!processed[0].error);
        assert_eq!(processed[0].content, "Hola, gracias por llamar.");
    }

    #[test]
    fn el_audio_se_sustituye_por_un_marcador() {
        let files = [
            uploaded("llamada.mp3", "", None),
            uploaded("grabacion.wav", "audio/wav", None),
        ];
        let processed = process_uploaded_files(&files);
        for file in &processed {
            assert!(!file.error);
            assert!(file.content.starts_with("[AUDIO FILE: "));
            assert!(file.content.contains("Transcription needed"));
        }
    }

    #[test]
    fn un_fichero_sin_contenido_se_marca_como_error() {
        let files = [uploaded("datos.json", "application/json", None)];
        let processed = process_uploaded_files(&files);
        assert!(processed[0].error);
        assert!(processed[0].content.starts_with("Error reading file"));
    }

    #[test]
    fn el_tipo_se_deduce_del_nombre_si_falta() {
        let files = [uploaded("config.json", "", Some("{}"))];
        let processed = process_uploaded_files(&files);
        assert_eq!(processed[0].mime_type, "application/json");
    }

    #[test]
    fn sin_ficheros_el_contexto_es_vacio() {
        assert_eq!(extract_context_from_files(&[]), "");
    }

    #[test]
    fn el_contexto_enumera_los_ficheros_con_sus_metadatos() {
        let processed = process_uploaded_files(&[
            uploaded("guion.txt", "text/plain", Some("Saludo inicial.")),
            uploaded("datos.json", "application/json", None),
        ]);
        let context = extract_context_from_files(&processed);

        assert!(context.contains("UPLOADED CONTEXT FILES:"));
        assert!(context.contains("File 1: guion.txt"));
        assert!(context.contains("Type: text/plain"));
        assert!(context.contains("Size: 1.0 KB"));
        assert!(context.contains("Content:\nSaludo inicial."));
        assert!(context.contains("File 2: datos.json"));
        assert!(context.contains("Status: ERROR - Error reading file"));
    }

    #[test]
    fn el_contenido_largo_se_recorta_a_dos_mil_caracteres() {
        let long_content = "a".repeat(2500);
        let processed =
            process_uploaded_files(&[uploaded(
                "transcripcion.txt",
                "text/plain",
                Some(long_content.as_str()),
            )]);
        let context = extract_context_from_files(&processed);

        assert!(context.contains("... [truncated]"));
        assert!(context.contains(&"a".repeat(2000)));
        assert!(!context.contains(&"a".repeat(2001)));
    }
}
