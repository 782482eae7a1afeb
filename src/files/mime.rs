//! # Resolución de Tipos MIME
//! src/files/mime.rs
//!
//! Mapea extensiones de archivo a valores de `Content-Type`. Es una
//! función pura sobre tablas estáticas: sin estado compartido.
//!
//! La política se evalúa en orden:
//!
//! 1. Lista de overrides (`.css`, `.js`, `.json`, `.svg`)
//! 2. Tabla general de extensiones conocidas
//! 3. Default: `text/plain`
//!
//! Los overrides existen porque las tablas de tipos de cada plataforma
//! difieren para esas cuatro extensiones (sobre todo `.js` y `.svg`);
//! fijarlos acá garantiza el mismo tipo en cualquier host.

use std::path::Path;

/// Tipo de contenido usado cuando la extensión no se conoce
const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Overrides evaluados antes que la tabla general
const OVERRIDES: &[(&str, &str)] = &[
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("svg", "image/svg+xml"),
];

/// Retorna el `Content-Type` para un path según su extensión
///
/// # Ejemplo
/// ```
/// use std::path::Path;
/// use static_server::files::content_type_for;
///
/// assert_eq!(content_type_for(Path::new("style.css")), "text/css");
/// assert_eq!(content_type_for(Path::new("index.html")), "text/html");
/// assert_eq!(content_type_for(Path::new("README")), "text/plain");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_ascii_lowercase(),
        None => return DEFAULT_CONTENT_TYPE,
    };

    for &(known, content_type) in OVERRIDES {
        if known == ext.as_str() {
            return content_type;
        }
    }

    extension_table(&ext).unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Tabla general de extensiones conocidas
///
/// La extensión llega ya en minúsculas.
fn extension_table(ext: &str) -> Option<&'static str> {
    let content_type = match ext {
        // Texto
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",

        // Imágenes
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",

        // Fuentes
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Aplicación
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" => "application/gzip",
        "wasm" => "application/wasm",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" => "video/ogg",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",

        _ => return None,
    };

    Some(content_type)
}
