//! # Request Handler de Archivos Estáticos
//! src/files/handler.rs
//!
//! Mapea cada request HTTP a una respuesta de filesystem:
//!
//! - Path que resuelve a un archivo → 200 con su contenido y tipo MIME
//! - Path que resuelve a un directorio → su index (`index.html` /
//!   `index.htm`, sin distinguir mayúsculas) o, si no hay, un listado
//!   generado con 200
//! - Path inexistente o que escapa de la raíz → 404
//! - Métodos que no sean GET/HEAD → 501
//!
//! Toda respuesta, sin importar el status, lleva los headers CORS
//! permisivos. El handler no loggea nada por request: la terminal queda
//! para los mensajes de la capa CLI.

use crate::files::listing::render_listing;
use crate::files::mime::content_type_for;
use crate::files::path::resolve_under_root;
use crate::http::request::Method;
use crate::http::{Request, Response, StatusCode};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Handler stateless de archivos estáticos
///
/// Se construye con el directorio raíz como campo inmutable; no hay
/// estado global ni closures sobre la configuración.
pub struct StaticHandler {
    /// Directorio raíz servido. Solo lectura: el servidor nunca escribe
    /// ni crea nada bajo él.
    root: PathBuf,
}

impl StaticHandler {
    /// Crea un handler para el directorio raíz dado
    ///
    /// La raíz debe existir y ser un directorio; eso lo valida la capa
    /// que construye el servidor, no el handler.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directorio raíz servido
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Atiende un request y produce la respuesta correspondiente
    ///
    /// Nunca paniquea ni propaga errores: cualquier problema de
    /// filesystem termina en una respuesta HTTP válida.
    pub fn handle(&self, request: &Request) -> Response {
        let mut response = self.respond(request);
        add_common_headers(&mut response);
        response
    }

    /// Lógica central, sin los headers comunes
    fn respond(&self, request: &Request) -> Response {
        match request.method() {
            Method::GET | Method::HEAD => {}
            other => {
                return Response::error(
                    StatusCode::NotImplemented,
                    &format!("Unsupported method ('{}')", other.as_str()),
                );
            }
        }

        let fs_path = match resolve_under_root(&self.root, request.path()) {
            Ok(path) => path,
            // Traversal y NUL se responden igual que un archivo
            // inexistente, para no revelar estructura del filesystem
            Err(_) => return not_found(),
        };

        match fs::metadata(&fs_path) {
            Ok(meta) if meta.is_dir() => self.serve_dir(&fs_path, request.path()),
            Ok(_) => self.serve_file(&fs_path),
            Err(e) => error_response(&e),
        }
    }

    /// Sirve un directorio: su index si existe, un listado si no
    fn serve_dir(&self, dir: &Path, url_path: &str) -> Response {
        if let Some(index) = find_index(dir) {
            return self.serve_file(&index);
        }

        match render_listing(dir, url_path) {
            Ok(html) => Response::html(&html),
            Err(e) => error_response(&e),
        }
    }

    /// Sirve un archivo regular con su tipo MIME y Content-Length
    fn serve_file(&self, path: &Path) -> Response {
        match fs::read(path) {
            Ok(content) => Response::new(StatusCode::Ok)
                .with_header("Content-Type", content_type_for(path))
                .with_body_bytes(content),
            Err(e) => error_response(&e),
        }
    }
}

/// Busca `index.html` o `index.htm` en un directorio, sin distinguir
/// mayúsculas. Si están ambos, gana `index.html`.
fn find_index(dir: &Path) -> Option<PathBuf> {
    let mut html: Option<PathBuf> = None;
    let mut htm: Option<PathBuf> = None;

    for entry in fs::read_dir(dir).ok()? {
        let entry = entry.ok()?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.eq_ignore_ascii_case("index.html") {
            html = Some(entry.path());
        } else if name.eq_ignore_ascii_case("index.htm") {
            htm = Some(entry.path());
        }
    }

    html.or(htm)
}

/// Respuesta 404 estándar
fn not_found() -> Response {
    Response::error(StatusCode::NotFound, "File not found")
}

/// Mapea un error de I/O a la respuesta HTTP correspondiente
fn error_response(e: &io::Error) -> Response {
    match e.kind() {
        io::ErrorKind::NotFound => not_found(),
        io::ErrorKind::PermissionDenied => {
            Response::error(StatusCode::Forbidden, "Permission denied")
        }
        _ => Response::error(StatusCode::InternalServerError, "Internal error"),
    }
}

/// Agrega los headers comunes a toda respuesta del servidor
///
/// CORS permisivo incondicional (conveniencia para desarrollo local:
/// un sitio en file:// o en otro puerto puede pedir recursos de acá)
/// más los headers de identificación y cierre de conexión.
pub fn add_common_headers(response: &mut Response) {
    response.add_header("Access-Control-Allow-Origin", "*");
    response.add_header("Access-Control-Allow-Methods", "GET, POST, OPTIONS");
    response.add_header("Access-Control-Allow-Headers", "*");
    response.add_header("Server", "StaticServer/0.1");
    response.add_header("Connection", "close");
}
