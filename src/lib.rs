//! # wserver
//! src/lib.rs
//!
//! Servidor web de archivos concurrente implementado desde cero para
//! demostrar conceptos de sistemas operativos: pool fijo de threads,
//! sincronización con mutex + condition variable, ciclo de vida de
//! recursos (sockets) y manejo de fallos a nivel de protocolo.
//!
//! ## Arquitectura
//!
//! ```text
//! Listener → WorkQueue → (N worker threads) → Reader → Parser → Resolver → Writer
//! ```
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing del request, validación del Host y escritura de responses
//! - `server`: Listener TCP, cola de trabajo compartida y pool de workers
//! - `resolver`: Mapeo de paths a recursos bajo el document root
//! - `config`: Configuración vía CLI y variables de entorno
//! - `metrics`: Recolección de métricas y observabilidad
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! use wserver::config::Config;
//! use wserver::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod http;
pub mod metrics;
pub mod resolver;
pub mod server;
