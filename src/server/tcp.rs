//! # Ciclo de Vida del Servidor TCP
//! src/server/tcp.rs
//!
//! Implementación del servidor que posee el socket de escucha y el
//! accept loop. Expone dos modos de operación:
//!
//! - `serve_forever()`: corre el accept loop en el thread que llama,
//!   bloqueándolo hasta que alguien invoque stop
//! - `start()`: corre el accept loop en un thread de fondo y retorna
//!   de inmediato
//!
//! Cada conexión aceptada se atiende de forma síncrona dentro del loop:
//! la carga esperada es un único navegador local, no hace falta un pool.
//!
//! El único estado compartido entre el caller y el worker son dos flags
//! atómicos: `running` (señal de stop) y `active` (socket abierto). El
//! listener corre en modo non-blocking con un poll corto para observar
//! la señal de stop sin quedar clavado en accept.

use crate::config::Config;
use crate::files::handler::{add_common_headers, StaticHandler};
use crate::http::request::{Method, ParseError};
use crate::http::{Request, Response, StatusCode};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Tiempo máximo que stop() espera a que el loop de fondo termine
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Intervalo del poll de accept y de las esperas de stop()
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Errores del ciclo de vida del servidor
///
/// Solo los errores de bind llegan al caller; todo error por request se
/// resuelve en una respuesta HTTP y nunca escapa del loop.
#[derive(Debug)]
pub enum ServerError {
    /// No se pudo bindear el socket: puerto ocupado o host no resoluble
    Bind {
        /// Dirección que se intentó bindear (host:port)
        address: String,
        /// Error de I/O subyacente
        source: io::Error,
    },

    /// El servidor ya fue iniciado (o detenido) una vez
    ///
    /// Una instancia no soporta reinicio: para volver a servir hay que
    /// construir una nueva.
    AlreadyUsed,
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Bind { address, source } => {
                write!(f, "Failed to bind to {}: {}", address, source)
            }
            ServerError::AlreadyUsed => {
                write!(f, "Server already used; create a new instance to serve again")
            }
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind { source, .. } => Some(source),
            ServerError::AlreadyUsed => None,
        }
    }
}

/// Servidor de archivos estáticos
///
/// Ciclo de vida: se construye sin socket, pasa a Running cuando el
/// bind tiene éxito y el accept loop arranca (inline o en un thread de
/// fondo), y queda detenido tras stop(). No hay reinicio: igual que en
/// el diseño original, una instancia detenida no puede volver a servir.
pub struct Server {
    config: Config,
    handler: Arc<StaticHandler>,

    /// Señal de stop: el accept loop corre mientras sea true
    running: Arc<AtomicBool>,

    /// Estado real del loop: true mientras el socket esté abierto
    active: Arc<AtomicBool>,

    /// Thread de fondo cuando se arrancó con start()
    worker: Option<thread::JoinHandle<()>>,

    /// Dirección efectivamente bindeada (útil con puerto 0)
    local_addr: Arc<Mutex<Option<SocketAddr>>>,

    /// Una instancia sirve a lo sumo una vez
    used: bool,
}

impl Server {
    /// Crea un servidor a partir de la configuración
    ///
    /// No abre ningún socket todavía. El directorio de la configuración
    /// debe existir; eso ya lo validó la capa CLI.
    pub fn new(config: Config) -> Self {
        let root = PathBuf::from(&config.directory);
        Self {
            config,
            handler: Arc::new(StaticHandler::new(root)),
            running: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicBool::new(false)),
            worker: None,
            local_addr: Arc::new(Mutex::new(None)),
            used: false,
        }
    }

    /// Bindea el socket de escucha y lo deja listo para el accept loop
    ///
    /// `TcpListener::bind` ya habilita SO_REUSEADDR en Unix: un
    /// reinicio rápido tras un crash no falla con "address in use".
    fn bind(&mut self) -> Result<TcpListener, ServerError> {
        if self.used {
            return Err(ServerError::AlreadyUsed);
        }

        let address = self.config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        // Non-blocking para que el loop pueda observar la señal de stop
        listener
            .set_nonblocking(true)
            .map_err(|source| ServerError::Bind { address, source })?;

        *self.local_addr.lock().unwrap() = listener.local_addr().ok();

        self.used = true;
        self.running.store(true, Ordering::Relaxed);
        self.active.store(true, Ordering::Relaxed);

        Ok(listener)
    }

    /// Bindea y corre el accept loop en el thread que llama
    ///
    /// Bloquea hasta que el servidor sea detenido vía un
    /// `ShutdownHandle` (por ejemplo desde un handler de señales).
    ///
    /// # Errores
    ///
    /// `ServerError::Bind` si el puerto está ocupado o el host no
    /// resuelve. Fatal: no hay reintentos.
    pub fn serve_forever(&mut self) -> Result<(), ServerError> {
        let listener = self.bind()?;
        accept_loop(
            listener,
            Arc::clone(&self.handler),
            Arc::clone(&self.running),
            Arc::clone(&self.active),
        );
        Ok(())
    }

    /// Bindea y corre el accept loop en un thread de fondo
    ///
    /// Retorna en cuanto el socket queda bindeado; el servidor se
    /// considera Running desde ese momento, aunque el thread todavía no
    /// haya ejecutado su primer accept (carrera menor, aceptable para
    /// una herramienta de desarrollo local).
    pub fn start(&mut self) -> Result<(), ServerError> {
        let listener = self.bind()?;

        let handler = Arc::clone(&self.handler);
        let running = Arc::clone(&self.running);
        let active = Arc::clone(&self.active);

        self.worker = Some(thread::spawn(move || {
            accept_loop(listener, handler, running, active);
        }));

        Ok(())
    }

    /// Detiene el servidor
    ///
    /// Idempotente y seguro de llamar aunque nunca se haya iniciado.
    /// Señala el stop y espera de forma acotada (hasta 5 segundos) a
    /// que el loop cierre el socket. Si el worker de fondo no termina
    /// dentro del límite, se abandona el handle en vez de matarlo:
    /// el socket igual queda cerrado cuando el loop muera, pero el
    /// thread puede sobrevivir al stop. Limitación conocida.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);

        let deadline = Instant::now() + STOP_TIMEOUT;

        if let Some(worker) = self.worker.take() {
            while !worker.is_finished() && Instant::now() < deadline {
                thread::sleep(POLL_INTERVAL);
            }
            if worker.is_finished() {
                let _ = worker.join();
            }
            // Si no terminó, el handle se dropea acá: thread abandonado
        } else {
            // Modo bloqueante o nunca iniciado: esperar a que el loop
            // (si existe) suelte el socket
            while self.active.load(Ordering::Relaxed) && Instant::now() < deadline {
                thread::sleep(POLL_INTERVAL);
            }
        }
    }

    /// Indica si el servidor está sirviendo
    ///
    /// True solo si el socket sigue abierto y, en modo background, el
    /// worker sigue vivo. Sin efectos secundarios.
    pub fn is_running(&self) -> bool {
        if !self.active.load(Ordering::Relaxed) {
            return false;
        }
        match &self.worker {
            Some(worker) => !worker.is_finished(),
            None => true,
        }
    }

    /// Dirección efectivamente bindeada
    ///
    /// `None` hasta que el bind tenga éxito. Con puerto 0 en la
    /// configuración, acá aparece el puerto efímero asignado.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().unwrap()
    }

    /// Handle clonable para detener el servidor desde otro contexto
    ///
    /// Pensado para handlers de señales: permite parar un servidor que
    /// está bloqueado en serve_forever() sin tomar prestado el Server.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            running: Arc::clone(&self.running),
            active: Arc::clone(&self.active),
        }
    }

    /// Configuración del servidor
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Handle clonable para señalar el stop desde otro thread
#[derive(Clone)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Señala el stop y espera (acotado) a que el socket se cierre
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);

        let deadline = Instant::now() + STOP_TIMEOUT;
        while self.active.load(Ordering::Relaxed) && Instant::now() < deadline {
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Indica si el accept loop sigue vivo
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// Accept loop: atiende conexiones hasta que llegue la señal de stop
///
/// Es el único dueño del listener; al salir lo cierra antes de limpiar
/// el flag `active`, así quien espera en stop() ve el socket ya cerrado.
fn accept_loop(
    listener: TcpListener,
    handler: Arc<StaticHandler>,
    running: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
) {
    while running.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, _addr)) => {
                // Conexión atendida acá mismo, sin threads por conexión:
                // el cliente esperado es un único navegador local
                let _ = handle_connection(stream, &handler);
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(POLL_INTERVAL);
            }
            Err(_) => {
                // Error transitorio de accept; el loop sigue
            }
        }
    }

    drop(listener);
    active.store(false, Ordering::Relaxed);
}

/// Atiende una conexión: lee el request, responde, cierra
///
/// Sin logging por request: la terminal queda limpia para los mensajes
/// de la capa CLI.
fn handle_connection(mut stream: TcpStream, handler: &StaticHandler) -> io::Result<()> {
    // El listener es non-blocking; la conexión aceptada vuelve a modo
    // bloqueante para leer y escribir normalmente
    stream.set_nonblocking(false)?;

    let mut buffer = [0u8; 8192];
    let bytes_read = stream.read(&mut buffer)?;

    if bytes_read == 0 {
        // El cliente cerró sin mandar nada
        return Ok(());
    }

    let (response, head_only) = match Request::parse(&buffer[..bytes_read]) {
        Ok(request) => {
            let head_only = request.method() == Method::HEAD;
            (handler.handle(&request), head_only)
        }
        Err(e) => (parse_error_response(&e), false),
    };

    let bytes = if head_only {
        response.head_bytes()
    } else {
        response.to_bytes()
    };

    stream.write_all(&bytes)?;
    stream.flush()?;

    Ok(())
}

/// Convierte un error de parsing en una respuesta HTTP con los headers
/// comunes (un request malformado también recibe CORS, nunca un reset)
fn parse_error_response(error: &ParseError) -> Response {
    let mut response = match error {
        ParseError::UnsupportedMethod(m) => Response::error(
            StatusCode::NotImplemented,
            &format!("Unsupported method ('{}')", m),
        ),
        _ => Response::error(StatusCode::BadRequest, &error.to_string()),
    };
    add_common_headers(&mut response);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::net::TcpStream;
    use tempfile::TempDir;

    /// Config de test: puerto efímero sobre un directorio temporal
    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 0;
        config.directory = dir.path().to_string_lossy().to_string();
        config
    }

    fn site() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), "<h1>Hi</h1>").unwrap();
        temp
    }

    fn send_raw(addr: SocketAddr, raw: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        stream.write_all(raw).unwrap();
        stream.shutdown(std::net::Shutdown::Write).unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_start_serves_and_stop_refuses_connections() {
        let temp = site();
        let mut server = Server::new(test_config(&temp));

        server.start().unwrap();
        assert!(server.is_running());

        let addr = server.local_addr().unwrap();
        let response = send_raw(addr, b"GET / HTTP/1.0\r\n\r\n");
        assert!(response.contains("200 OK"));
        assert!(response.contains("<h1>Hi</h1>"));

        server.stop();
        assert!(!server.is_running());

        // El socket quedó cerrado: conectar de nuevo falla
        assert!(TcpStream::connect(addr).is_err());
    }

    #[test]
    fn test_start_then_immediate_stop_is_fast() {
        let temp = site();
        let mut server = Server::new(test_config(&temp));

        server.start().unwrap();
        let started = Instant::now();
        server.stop();

        // Sin requests de por medio, el stop cierra mucho antes del
        // timeout acotado
        assert!(started.elapsed() < STOP_TIMEOUT);
        assert!(!server.is_running());
    }

    #[test]
    fn test_stop_never_started_is_noop() {
        let temp = site();
        let mut server = Server::new(test_config(&temp));

        server.stop();
        assert!(!server.is_running());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let temp = site();
        let mut server = Server::new(test_config(&temp));

        server.start().unwrap();
        server.stop();
        server.stop();
        assert!(!server.is_running());
    }

    #[test]
    fn test_restart_is_rejected() {
        let temp = site();
        let mut server = Server::new(test_config(&temp));

        server.start().unwrap();
        server.stop();

        assert!(matches!(server.start(), Err(ServerError::AlreadyUsed)));
        assert!(matches!(
            server.serve_forever(),
            Err(ServerError::AlreadyUsed)
        ));
    }

    #[test]
    fn test_bind_error_when_port_taken() {
        let temp = site();
        let mut first = Server::new(test_config(&temp));
        first.start().unwrap();

        // Segundo servidor apuntando al mismo puerto ya ocupado
        let mut config = test_config(&temp);
        config.port = first.local_addr().unwrap().port();
        let mut second = Server::new(config);

        match second.start() {
            Err(ServerError::Bind { address, .. }) => {
                assert!(address.contains("127.0.0.1"));
            }
            other => panic!("Expected Bind error, got {:?}", other),
        }

        first.stop();
    }

    #[test]
    fn test_serve_forever_with_shutdown_handle() {
        let temp = site();
        let mut server = Server::new(test_config(&temp));
        let handle = server.shutdown_handle();

        let t = thread::spawn(move || {
            server.serve_forever().unwrap();
            server
        });

        // Esperar a que el loop esté activo
        while !handle.is_running() {
            thread::sleep(Duration::from_millis(5));
        }

        handle.stop();
        let server = t.join().unwrap();
        assert!(!server.is_running());
    }

    #[test]
    fn test_head_returns_headers_without_body() {
        let temp = site();
        let mut server = Server::new(test_config(&temp));
        server.start().unwrap();
        let addr = server.local_addr().unwrap();

        let response = send_raw(addr, b"HEAD / HTTP/1.0\r\n\r\n");

        assert!(response.contains("200 OK"));
        assert!(response.contains("Content-Length: 11"));
        assert!(!response.contains("<h1>Hi</h1>"));

        server.stop();
    }

    #[test]
    fn test_garbage_request_gets_http_error_with_cors() {
        let temp = site();
        let mut server = Server::new(test_config(&temp));
        server.start().unwrap();
        let addr = server.local_addr().unwrap();

        let response = send_raw(addr, b"\x01\x02\x03garbage\r\n\r\n");

        assert!(response.contains("400 Bad Request"));
        assert!(response.contains("Access-Control-Allow-Origin: *"));

        server.stop();
    }

    #[test]
    fn test_unknown_method_gets_501() {
        let temp = site();
        let mut server = Server::new(test_config(&temp));
        server.start().unwrap();
        let addr = server.local_addr().unwrap();

        let response = send_raw(addr, b"DELETE / HTTP/1.0\r\n\r\n");

        assert!(response.contains("501 Not Implemented"));
        assert!(response.contains("Access-Control-Allow-Origin: *"));

        server.stop();
    }
}
