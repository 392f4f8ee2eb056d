//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Este módulo implementa el subconjunto mínimo de HTTP/1.1 que usa el
//! servidor, sin librerías de alto nivel. Incluye:
//!
//! - Parsing del request (solo `GET <path> HTTP/1.1`)
//! - Validación del header `Host` contra el hostname local
//! - Escritura de responses con `Content-Length` exacto
//! - Manejo de status codes
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Host: hostname[:port]\r\n
//! Otro-Header: Valor\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 10\r\n
//! \r\n
//! <contenido>
//! ```

pub mod request;   // Parsing y validación de HTTP requests
pub mod response;  // Escritura de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{HostPolicy, ParseError, Request};
pub use status::StatusCode;
