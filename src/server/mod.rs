//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa el ciclo de vida del servidor TCP:
//! 1. Bindea el socket de escucha (con reuso de dirección)
//! 2. Acepta conexiones y las atiende con el request handler
//! 3. Expone start/stop deterministas y el estado is_running
//!
//! El accept loop puede correr bloqueando al caller (`serve_forever`)
//! o en un thread de fondo (`start`); ambos modos comparten la misma
//! señal de stop.

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{Server, ServerError, ShutdownHandle};
