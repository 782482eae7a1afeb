//! # Static Server
//! src/lib.rs
//!
//! Servidor de archivos estáticos para desarrollo local, implementado
//! desde cero sobre `std::net`. Sirve el contenido de un directorio por
//! HTTP para previsualizar sitios web (HTML/CSS/JS) mientras se desarrollan.
//!
//! No es un servidor de producción: no hay TLS, ni control de acceso,
//! ni caching. Solo mapeo de paths a archivos con fallback a index y
//! listado de directorios.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing y construcción del protocolo HTTP/1.0
//! - `files`: Resolución de paths, tipos MIME y generación de respuestas
//! - `server`: Ciclo de vida del servidor TCP (start/stop/is_running)
//! - `config`: Configuración vía CLI y variables de entorno
//! - `preflight`: Chequeos previos que hace la capa CLI (puerto libre,
//!   directorio con contenido servible)
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! use static_server::config::Config;
//! use static_server::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.serve_forever().expect("Error al iniciar servidor");
//! ```

pub mod http;
pub mod config;
pub mod files;
pub mod server;
pub mod preflight;
