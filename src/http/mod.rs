//! # Módulo HTTP
//!
//! Este módulo implementa lo justo del protocolo HTTP para un servidor
//! de archivos estáticos, sin usar librerías de alto nivel. Incluye:
//!
//! - Parsing de requests (request line, headers, percent-decoding del path)
//! - Construcción de responses
//! - Manejo de status codes
//!
//! Las respuestas se emiten como HTTP/1.0 con `Connection: close`: una
//! conexión por request, sin keep-alive ni chunked encoding. Para un
//! navegador local previsualizando un sitio es más que suficiente.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query HTTP/1.0\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 12\r\n
//! \r\n
//! <h1>Hi</h1>
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use request::Request;
pub use response::Response;
pub use status::StatusCode;
