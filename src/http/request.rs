//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Este módulo implementa un parser HTTP desde cero, limitado a lo que
//! un servidor de archivos estáticos necesita entender.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /css/style.css?v=2 HTTP/1.1\r\n
//! Host: localhost:8000\r\n
//! User-Agent: Mozilla/5.0\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.x`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//!
//! El path se entrega ya decodificado (percent-encoding resuelto) y con
//! la query string separada: para servir archivos, `/page%201.html?v=2`
//! es el archivo `page 1.html`.

use std::collections::HashMap;

/// Métodos HTTP que el servidor reconoce
///
/// Solo GET y HEAD tienen semántica completa de archivos; POST y OPTIONS
/// se reconocen para poder responder 501 con headers CORS en vez de
/// cortar la conexión.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// HEAD - Como GET pero solo retorna headers
    HEAD,

    /// POST - Reconocido, respondido con 501
    POST,

    /// OPTIONS - Reconocido, respondido con 501
    OPTIONS,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna error si el método no es reconocido
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "OPTIONS" => Ok(Method::OPTIONS),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::OPTIONS => "OPTIONS",
        }
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (GET, HEAD, POST, OPTIONS)
    method: Method,

    /// Path de la petición, ya decodificado (ej: "/css/style.css")
    path: String,

    /// Query string cruda, si la hay (ej: "v=2"). Un file server la
    /// ignora, pero no debe confundirla con parte del path.
    query: Option<String>,

    /// Headers HTTP (ej: {"Host": "localhost:8000"})
    headers: HashMap<String, String>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request incompleto o truncado
    IncompleteRequest,

    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Método HTTP no reconocido
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta (debe ser HTTP/1.0 o HTTP/1.1)
    InvalidHttpVersion(String),

    /// Header malformado
    InvalidHeader(String),

    /// Request vacío
    EmptyRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncompleteRequest => write!(f, "Incomplete HTTP request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
            ParseError::InvalidHeader(h) => write!(f, "Invalid header: {}", h),
            ParseError::EmptyRequest => write!(f, "Empty request"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Parsea un request HTTP desde bytes
    ///
    /// # Argumentos
    ///
    /// * `buffer` - Buffer conteniendo el head del request HTTP
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - Request parseado exitosamente
    /// * `Err(ParseError)` - Error durante el parsing
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_server::http::Request;
    ///
    /// let raw = b"GET /style.css?v=2 HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/style.css");
    /// assert_eq!(request.query(), Some("v=2"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Convertir a string (validando que sea UTF-8 válido)
        let request_str = std::str::from_utf8(buffer)
            .map_err(|_| ParseError::InvalidRequestLine)?;

        if request_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        // Separar por \r\n para obtener líneas
        let lines: Vec<&str> = request_str.split("\r\n").collect();

        if lines.is_empty() {
            return Err(ParseError::IncompleteRequest);
        }

        // 1. Parsear la request line (primera línea)
        let (method, path, query, version) = Self::parse_request_line(lines[0])?;

        // 2. Parsear headers (resto de líneas hasta encontrar línea vacía)
        let headers = Self::parse_headers(&lines[1..])?;

        Ok(Request {
            method,
            path,
            query,
            headers,
            version,
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path?query HTTP/1.0`
    fn parse_request_line(
        line: &str,
    ) -> Result<(Method, String, Option<String>, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        // Parsear método
        let method = Method::from_str(parts[0])?;

        // Separar path de query y decodificar el path
        let (path, query) = Self::split_path_and_query(parts[1]);

        // Validar versión HTTP
        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok((method, path, query, version))
    }

    /// Separa el path de la query string y decodifica el path
    ///
    /// Ejemplo: "/my%20page.html?v=2"
    /// Retorna: ("/my page.html", Some("v=2"))
    fn split_path_and_query(path_with_query: &str) -> (String, Option<String>) {
        if let Some(query_start) = path_with_query.find('?') {
            let path = url_decode(&path_with_query[..query_start]);
            let query = path_with_query[query_start + 1..].to_string();
            (path, Some(query))
        } else {
            (url_decode(path_with_query), None)
        }
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato: "Name: Value"
    fn parse_headers(lines: &[&str]) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            // La línea vacía marca el fin de los headers
            if line.trim().is_empty() {
                break;
            }

            // Buscar el separador ':'
            if let Some(colon_pos) = line.find(':') {
                let name = line[..colon_pos].trim().to_string();
                let value = line[colon_pos + 1..].trim().to_string();
                headers.insert(name, value);
            } else {
                // Header sin ':' es inválido
                return Err(ParseError::InvalidHeader(line.to_string()));
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request, ya decodificado
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la query string cruda, si la hay
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Decodifica percent-encoding en un path URL (%20 → espacio, etc.)
///
/// Decodifica byte a byte para soportar secuencias UTF-8 multibyte
/// (%C3%B1 → "ñ"). Las secuencias `%` malformadas se dejan tal cual.
/// No convierte `+` en espacio: en la parte de path de una URL el `+`
/// es un carácter literal.
pub fn url_decode(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if hex.len() == 2 {
                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                    bytes.push(byte);
                    continue;
                }
            }
            bytes.push(b'%');
            bytes.extend_from_slice(hex.as_bytes());
        } else {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.query(), None);
    }

    #[test]
    fn test_parse_with_path() {
        let raw = b"GET /css/style.css HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/css/style.css");
        assert_eq!(request.version(), "HTTP/1.1");
    }

    #[test]
    fn test_parse_head() {
        let raw = b"HEAD /index.html HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::HEAD);
        assert_eq!(request.path(), "/index.html");
    }

    #[test]
    fn test_parse_strips_query() {
        let raw = b"GET /style.css?v=2&cache=no HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/style.css");
        assert_eq!(request.query(), Some("v=2&cache=no"));
    }

    #[test]
    fn test_parse_with_headers() {
        let raw = b"GET / HTTP/1.0\r\nHost: localhost:8000\r\nUser-Agent: test\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("Host"), Some("localhost:8000"));
        assert_eq!(request.header("User-Agent"), Some("test"));
    }

    #[test]
    fn test_path_is_decoded() {
        let raw = b"GET /my%20page.html HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/my page.html");
    }

    #[test]
    fn test_unknown_method() {
        let raw = b"DELETE / HTTP/1.0\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::UnsupportedMethod(_))));
    }

    #[test]
    fn test_options_is_recognized() {
        let raw = b"OPTIONS / HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::OPTIONS);
    }

    #[test]
    fn test_invalid_version() {
        let raw = b"GET / HTTP/2.0\r\n\r\n"; // HTTP/2.0 no está soportado
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHttpVersion(_))));
    }

    #[test]
    fn test_empty_request() {
        let raw = b"";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_invalid_request_line() {
        let raw = b"GET\r\n\r\n"; // Falta path y version
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    // ==================== url_decode ====================

    #[test]
    fn test_url_decode_space() {
        assert_eq!(url_decode("hello%20world"), "hello world");
    }

    #[test]
    fn test_url_decode_plain() {
        assert_eq!(url_decode("/css/style.css"), "/css/style.css");
    }

    #[test]
    fn test_url_decode_multibyte() {
        // %C3%B1 es "ñ" en UTF-8
        assert_eq!(url_decode("/espa%C3%B1ol.html"), "/español.html");
    }

    #[test]
    fn test_url_decode_keeps_plus() {
        assert_eq!(url_decode("/a+b.txt"), "/a+b.txt");
    }

    #[test]
    fn test_url_decode_malformed_percent() {
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%zz"), "%zz");
    }

    #[test]
    fn test_url_decode_traversal_sequences() {
        // Un ".." codificado debe quedar visible tras decodificar,
        // para que la resolución de paths lo rechace
        assert_eq!(url_decode("/%2e%2e/secret"), "/../secret");
    }
}
