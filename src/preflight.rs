//! # Chequeos Previos
//! src/preflight.rs
//!
//! Heurísticas que usa la capa CLI antes de construir el servidor:
//! si el directorio parece un sitio estático y si el puerto está libre.
//!
//! Son chequeos de conveniencia para dar errores amigables. El core
//! del servidor no depende de ellos: si la carrera del puerto se
//! pierde, el bind igual falla de forma segura.

use std::fs;
use std::io;
use std::net::TcpListener;
use std::path::Path;

/// Resumen del contenido servible de un directorio
#[derive(Debug)]
pub struct SiteSummary {
    /// Archivos `.html`/`.htm` en el primer nivel
    pub html_files: usize,

    /// Archivos `.css` en todo el árbol
    pub css_files: usize,

    /// Archivos `.js` en todo el árbol
    pub js_files: usize,

    /// Nombre del archivo index del primer nivel, si existe
    pub index_file: Option<String>,
}

/// Indica si el directorio parece contener un sitio estático
///
/// El criterio mínimo es tener al menos un archivo HTML en el primer
/// nivel, igual que el chequeo que corre antes de servir.
pub fn looks_like_static_site(dir: &Path) -> bool {
    match site_summary(dir) {
        Ok(summary) => summary.html_files > 0,
        Err(_) => false,
    }
}

/// Calcula el resumen de contenido servible de un directorio
pub fn site_summary(dir: &Path) -> io::Result<SiteSummary> {
    let mut html_files = 0;
    let mut index_file = None;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy().into_owned();

        if has_extension(&name, "html") || has_extension(&name, "htm") {
            html_files += 1;
            if name.eq_ignore_ascii_case("index.html")
                || name.eq_ignore_ascii_case("index.htm")
            {
                index_file = Some(name);
            }
        }
    }

    Ok(SiteSummary {
        html_files,
        css_files: count_files_recursive(dir, "css")?,
        js_files: count_files_recursive(dir, "js")?,
        index_file,
    })
}

/// Indica si el puerto está libre haciendo un bind de prueba
///
/// El socket de prueba se cierra de inmediato; entre este chequeo y el
/// bind real puede haber una carrera, que el servidor resuelve fallando
/// con un error de bind.
pub fn port_available(host: &str, port: u16) -> bool {
    TcpListener::bind((host, port)).is_ok()
}

/// Cuenta recursivamente los archivos con la extensión dada
fn count_files_recursive(dir: &Path, extension: &str) -> io::Result<usize> {
    let mut count = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            count += count_files_recursive(&entry.path(), extension)?;
        } else if file_type.is_file() {
            let name = entry.file_name();
            if has_extension(&name.to_string_lossy(), extension) {
                count += 1;
            }
        }
    }

    Ok(count)
}

/// Compara la extensión de un nombre de archivo sin distinguir mayúsculas
fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
