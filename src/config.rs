//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor con soporte para
//! argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./wserver --port 8080 --workers 10 --document-root website
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 WORKERS=4 ./wserver
//! ```

use clap::Parser;

/// Configuración del servidor de archivos
#[derive(Debug, Clone, Parser)]
#[command(name = "wserver")]
#[command(about = "Servidor web de archivos concurrente para Principios de Sistemas Operativos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio bajo el cual se resuelven todos los paths
    #[arg(long = "document-root", default_value = "website", env = "DOCUMENT_ROOT")]
    pub document_root: String,

    /// Número de worker threads del pool
    #[arg(long, default_value = "10", env = "WORKERS")]
    pub workers: usize,

    /// Hostname contra el que se valida el header Host
    /// (por defecto, el hostname de la máquina)
    #[arg(long, env = "SERVER_HOSTNAME")]
    pub hostname: Option<String>,

    /// Nombre de dominio usado para tolerar diferencias entre
    /// nombre corto y nombre completamente calificado (FQDN)
    #[arg(long, default_value = "", env = "SERVER_DOMAIN")]
    pub domain: String,
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
    /// use wserver::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Hostname efectivo para la validación del header Host
    ///
    /// Si no se especificó `--hostname`, consulta el hostname de la
    /// máquina (equivalente a `gethostname(2)`).
    pub fn effective_hostname(&self) -> String {
        match &self.hostname {
            Some(name) => name.clone(),
            None => hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "localhost".to_string()),
        }
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }

        if self.document_root.is_empty() {
            return Err("Document root must not be empty".to_string());
        }

        if let Some(name) = &self.hostname {
            if name.is_empty() {
                return Err("Hostname must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════╗");
        println!("║        wserver - File Server Configuration   ║");
        println!("╚══════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:        {}", self.address());
        println!("   Document root:  {}", self.document_root);
        println!();
        println!("👷 Workers:");
        println!("   Pool size:      {}", self.workers);
        println!();
        println!("🔎 Host validation:");
        println!("   Hostname:       {}", self.effective_hostname());
        if self.domain.is_empty() {
            println!("   Domain:         (none)");
        } else {
            println!("   Domain:         {}", self.domain);
        }
        println!();
        println!("════════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            document_root: "website".to_string(),
            workers: 10,
            hostname: None,
            domain: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.document_root, "website");
        assert_eq!(config.workers, 10);
        assert!(config.hostname.is_none());
        assert!(config.domain.is_empty());
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_workers() {
        let mut config = Config::default();
        config.workers = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Workers"));
    }

    #[test]
    fn test_validate_empty_document_root() {
        let mut config = Config::default();
        config.document_root = String::new();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Document root"));
    }

    #[test]
    fn test_validate_empty_hostname_override() {
        let mut config = Config::default();
        config.hostname = Some(String::new());
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Hostname"));
    }

    #[test]
    fn test_effective_hostname_override() {
        let mut config = Config::default();
        config.hostname = Some("miservidor".to_string());
        assert_eq!(config.effective_hostname(), "miservidor");
    }

    #[test]
    fn test_effective_hostname_from_system() {
        // Sin override debe retornar algo no vacío (el hostname local)
        let config = Config::default();
        assert!(!config.effective_hostname().is_empty());
    }

    #[test]
    fn test_config_custom_values() {
        let mut config = Config::default();
        config.port = 9000;
        config.workers = 4;
        config.document_root = "/srv/www".to_string();
        config.domain = "example.org".to_string();

        assert_eq!(config.port, 9000);
        assert_eq!(config.workers, 4);
        assert_eq!(config.document_root, "/srv/www");
        assert_eq!(config.domain, "example.org");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_print_summary() {
        let config = Config::default();
        // Should not panic
        config.print_summary();
    }
}
