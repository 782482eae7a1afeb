//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor de archivos estáticos
//! con soporte para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_server --port 8080 --host 0.0.0.0 --directory ./public --open
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! STATIC_PORT=8080 STATIC_HOST=0.0.0.0 ./static_server
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};

/// Configuración del servidor de archivos estáticos
#[derive(Debug, Clone, Parser)]
#[command(name = "static_server")]
#[command(about = "Sirve los archivos de un directorio por HTTP para previsualizar sitios estáticos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8000", env = "STATIC_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "localhost", env = "STATIC_HOST")]
    pub host: String,

    /// Directorio a servir
    #[arg(short, long, default_value = ".", env = "STATIC_DIR")]
    pub directory: String,

    /// Abre el navegador automáticamente al iniciar
    #[arg(short, long)]
    pub open: bool,

    /// Solo diagnostica si el directorio es servible, sin iniciar el servidor
    #[arg(long)]
    pub check: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "localhost:8000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL base del servidor, para mensajes y para abrir el navegador
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Obtiene el directorio raíz como path absoluto
    ///
    /// Canonicaliza el directorio configurado; falla si no existe.
    pub fn root_dir(&self) -> std::io::Result<PathBuf> {
        Path::new(&self.directory).canonicalize()
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos. El core del servidor
    /// asume que el directorio raíz ya fue validado por esta capa.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be between 1 and 65535".to_string());
        }

        let root = Path::new(&self.directory);
        if !root.exists() {
            return Err(format!("Directory does not exist: {}", self.directory));
        }
        if !root.is_dir() {
            return Err(format!("Not a directory: {}", self.directory));
        }

        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8000,
            host: "localhost".to_string(),
            directory: ".".to_string(),
            open: false,
            check: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.directory, ".");
        assert!(!config.open);
        assert!(!config.check);
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "localhost:8000");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_url() {
        let config = Config::default();
        assert_eq!(config.url(), "http://localhost:8000");
    }

    #[test]
    fn test_validate_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        let mut config = Config::default();
        config.port = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Port"));
    }

    #[test]
    fn test_validate_missing_directory() {
        let mut config = Config::default();
        config.directory = "/no/such/directory/anywhere".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("does not exist"));
    }

    #[test]
    fn test_validate_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        let mut config = Config::default();
        config.directory = file.to_string_lossy().to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Not a directory"));
    }

    #[test]
    fn test_root_dir_is_absolute() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.directory = temp.path().to_string_lossy().to_string();

        let root = config.root_dir().unwrap();
        assert!(root.is_absolute());
    }

    #[test]
    fn test_root_dir_missing() {
        let mut config = Config::default();
        config.directory = "/no/such/directory/anywhere".to_string();
        assert!(config.root_dir().is_err());
    }
}
