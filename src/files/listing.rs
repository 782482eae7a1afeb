//! # Listado de Directorios
//! src/files/listing.rs
//!
//! Genera la página HTML que se sirve cuando un request apunta a un
//! directorio sin archivo index: un 200 con los nombres de las entradas
//! inmediatas del directorio, nunca un 404.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;

/// Genera el HTML de listado para un directorio
///
/// `url_path` es el path de URL con el que se pidió el directorio; se usa
/// como título y como prefijo de los links, de modo que los hrefs sean
/// absolutos y funcionen aunque el request no termine en `/`.
///
/// Las entradas se ordenan por nombre sin distinguir mayúsculas y los
/// directorios se muestran con `/` final.
pub fn render_listing(dir: &Path, url_path: &str) -> io::Result<String> {
    let mut entries: Vec<(String, bool)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push((name, is_dir));
    }

    entries.sort_by(|a, b| {
        match a.0.to_lowercase().cmp(&b.0.to_lowercase()) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        }
    });

    // Prefijo común de los hrefs: el path pedido, con / final garantizado
    let base = if url_path.ends_with('/') {
        url_path.to_string()
    } else {
        format!("{}/", url_path)
    };

    let title = format!("Directory listing for {}", base);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(&title)));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&title)));
    html.push_str("<hr>\n<ul>\n");

    for (name, is_dir) in &entries {
        let display = if *is_dir {
            format!("{}/", name)
        } else {
            name.clone()
        };
        let href = if *is_dir {
            format!("{}{}/", base, url_encode(name))
        } else {
            format!("{}{}", base, url_encode(name))
        };
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            href,
            html_escape(&display)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Ok(html)
}

/// Escapa los caracteres especiales de HTML en un texto
fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Percent-encodea un nombre de archivo para usarlo en un href
///
/// Conserva los caracteres no reservados de URL (letras, dígitos,
/// `-`, `.`, `_`, `~`) y codifica el resto byte a byte.
fn url_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
