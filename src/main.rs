//! # Static Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de archivos estáticos.
//!
//! Esta capa es la responsable de los chequeos previos, los mensajes
//! en terminal y el apagado por señal; el servidor en sí vive en la
//! librería.

use static_server::config::Config;
use static_server::preflight;
use static_server::server::Server;
use std::path::Path;
use std::thread;

fn main() {
    let mut config = Config::new();

    if config.check {
        run_check(&config);
        return;
    }

    if let Err(e) = config.validate() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    // Trabajar siempre con la raíz como path absoluto
    let root = match config.root_dir() {
        Ok(root) => root,
        Err(e) => {
            eprintln!("❌ Error resolving directory {}: {}", config.directory, e);
            std::process::exit(1);
        }
    };
    config.directory = root.to_string_lossy().into_owned();

    if !preflight::looks_like_static_site(&root) {
        eprintln!("❌ Error: No HTML files found in {}", root.display());
        eprintln!(
            "Run static_server in a directory containing your static website files (HTML, CSS, JS)."
        );
        std::process::exit(1);
    }

    if !preflight::port_available(&config.host, config.port) {
        eprintln!(
            "❌ Error: Port {} is already in use. Try a different port with --port.",
            config.port
        );
        std::process::exit(1);
    }

    println!("🚀 Static server starting...");
    println!("📁 Serving files from: {}", root.display());
    println!("🌐 Server running at: {}", config.url());
    println!("⏹️  Press Ctrl+C to stop the server");

    let url = config.url();
    let open_browser = config.open;

    let mut server = Server::new(config);
    let handle = server.shutdown_handle();

    // Apagado ordenado con Ctrl+C / SIGTERM
    ctrlc_handler(move || {
        println!("\n🛑 Shutting down server...");
        handle.stop();
    });

    if open_browser {
        let _ = open::that(&url);
    }

    // Servir hasta que llegue la señal de stop (bloqueante)
    if let Err(e) = server.serve_forever() {
        eprintln!("💥 Error starting server: {}", e);
        std::process::exit(1);
    }

    println!("✅ Server stopped successfully!");
}

/// Diagnóstico del directorio (--check): reporta qué hay para servir
fn run_check(config: &Config) {
    let root = Path::new(&config.directory);
    println!("📁 Checking directory: {}", root.display());

    let summary = match preflight::site_summary(root) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("❌ Error reading directory: {}", e);
            std::process::exit(1);
        }
    };

    println!("📄 HTML files found: {}", summary.html_files);
    println!("🎨 CSS files found: {}", summary.css_files);
    println!("⚡ JavaScript files found: {}", summary.js_files);

    if summary.html_files == 0 {
        println!("❌ No HTML files found in this directory.");
        println!("Make sure you're in a directory with your static website files.");
        std::process::exit(1);
    }

    println!("✅ This directory looks good for serving!");
    match &summary.index_file {
        Some(name) => println!("🏠 Index file found: {}", name),
        None => println!("ℹ️  No index file found. Server will show a directory listing."),
    }
}

/// Handler simple de Ctrl+C / SIGTERM sobre sigwait
///
/// Bloquea las señales en el thread actual (los threads creados después
/// heredan la máscara) y las espera en un thread dedicado, así el stop
/// corre fuera del thread que está bloqueado en serve_forever().
fn ctrlc_handler<F>(handler: F)
where
    F: Fn() + Send + 'static,
{
    let mask = unsafe {
        let mut mask: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut mask);
        libc::sigaddset(&mut mask, libc::SIGINT);
        libc::sigaddset(&mut mask, libc::SIGTERM);
        libc::pthread_sigmask(libc::SIG_BLOCK, &mask, std::ptr::null_mut());
        mask
    };

    thread::spawn(move || {
        let mut sig: libc::c_int = 0;
        loop {
            if unsafe { libc::sigwait(&mask, &mut sig) } == 0 {
                handler();
                break;
            }
        }
    });
}
