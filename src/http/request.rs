//! # Parsing y Validación de Requests
//! src/http/request.rs
//!
//! Este módulo implementa el parser del request y la política de
//! validación del header `Host`.
//!
//! ## Formato esperado
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Host: hostname[:port]\r\n
//! \r\n
//! ```
//!
//! El servidor solo soporta `GET` sobre `HTTP/1.1`. Cualquier otra
//! request line produce un error de parsing, que el worker traduce en
//! una response 500. El path está acotado a [`MAX_PATH_LEN`] bytes para
//! rechazar inputs desproporcionados.

/// Longitud máxima aceptada para el path del request
pub const MAX_PATH_LEN: usize = 1023;

/// Representa un request parseado
///
/// Se conserva el bloque crudo de headers: la extracción del `Host` se
/// hace línea por línea sobre ese bloque, lo que evita confundir headers
/// que terminan en "Host" (ej: `X-Host:`) con el header real.
#[derive(Debug, Clone)]
pub struct Request {
    /// Path de la petición (ej: "/index.html")
    path: String,

    /// Bloque de headers tal como llegó por el socket
    raw: String,
}

/// Errores que pueden ocurrir durante el parsing
///
/// Todos se traducen en una response 500: el cliente envió algo que no
/// es un `GET <path> HTTP/1.1` bien formado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request vacío
    EmptyRequest,

    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Método HTTP no soportado (solo se acepta GET)
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta (debe ser HTTP/1.1)
    InvalidHttpVersion(String),

    /// Path más largo que MAX_PATH_LEN bytes
    PathTooLong(usize),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyRequest => write!(f, "Empty request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
            ParseError::PathTooLong(n) => {
                write!(f, "Request path too long: {} bytes (max {})", n, MAX_PATH_LEN)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Parsea un request desde el bloque de headers leído del socket
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use wserver::http::Request;
    ///
    /// let raw = b"GET /index.html HTTP/1.1\r\nHost: myhost\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/index.html");
    /// assert_eq!(request.host(), Some("myhost"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Validar que sea UTF-8: un request line binario no es parseable
        let raw = std::str::from_utf8(buffer).map_err(|_| ParseError::InvalidRequestLine)?;

        if raw.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let request_line = raw.split("\r\n").next().unwrap_or("");
        let path = Self::parse_request_line(request_line)?;

        Ok(Request {
            path,
            raw: raw.to_string(),
        })
    }

    /// Parsea la request line, esperando exactamente `GET <path> HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<String, ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        if parts[0] != "GET" {
            return Err(ParseError::UnsupportedMethod(parts[0].to_string()));
        }

        if parts[1].len() > MAX_PATH_LEN {
            return Err(ParseError::PathTooLong(parts[1].len()));
        }

        if parts[2] != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(parts[2].to_string()));
        }

        Ok(parts[1].to_string())
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Extrae el hostname del header `Host`
    ///
    /// Busca una línea de header que comience con `Host:` (la request
    /// line no cuenta). Los navegadores agregan `:puerto` cuando el
    /// servidor corre en un puerto no estándar; ese sufijo se descarta.
    ///
    /// Retorna `None` si el header no existe o no tiene valor: el
    /// caller debe rechazar el request con 404.
    pub fn host(&self) -> Option<&str> {
        for line in self.raw.split("\r\n").skip(1) {
            // La línea vacía marca el fin de los headers
            if line.is_empty() {
                break;
            }

            if let Some(value) = line.strip_prefix("Host:") {
                let value = value.trim();
                if value.is_empty() {
                    return None;
                }

                // Descartar ":puerto" si está presente
                let host = match value.find(':') {
                    Some(pos) => &value[..pos],
                    None => value,
                };

                if host.is_empty() {
                    return None;
                }
                return Some(host);
            }
        }

        None
    }
}

/// Política de validación del header `Host`
///
/// El hostname del request se compara (sensible a mayúsculas) contra el
/// hostname del servidor. Si no coinciden hay dos casos que igual se
/// aceptan, porque `gethostname` se comporta distinto entre sistemas:
///
/// 1. El servidor conoce su nombre corto pero el request trae el FQDN
///    (`host.dominio`), típico en Linux.
/// 2. El servidor conoce su FQDN pero el request trae el nombre corto,
///    típico en macOS.
///
/// Cualquier otra discrepancia se rechaza.
#[derive(Debug, Clone)]
pub struct HostPolicy {
    hostname: String,
    domain: String,
}

impl HostPolicy {
    /// Crea una política con el hostname del servidor y su dominio
    /// (el dominio puede ser vacío si no se conoce)
    pub fn new(hostname: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            domain: domain.into(),
        }
    }

    /// Hostname del servidor
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Decide si el hostname de un request es aceptable
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use wserver::http::HostPolicy;
    ///
    /// let policy = HostPolicy::new("myhost", "example.org");
    /// assert!(policy.matches("myhost"));
    /// assert!(policy.matches("myhost.example.org"));
    /// assert!(!policy.matches("otherhost"));
    /// ```
    pub fn matches(&self, request_host: &str) -> bool {
        if request_host == self.hostname {
            return true;
        }

        if self.domain.is_empty() {
            return false;
        }

        // Caso 1: el request trae el FQDN del servidor
        if format!("{}.{}", self.hostname, self.domain) == request_host {
            return true;
        }

        // Caso 2: el FQDN del request es el hostname del servidor
        if format!("{}.{}", request_host, self.domain) == self.hostname {
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/");
    }

    #[test]
    fn test_parse_with_path() {
        let raw = b"GET /website/index.html HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/website/index.html");
    }

    #[test]
    fn test_parse_unsupported_method() {
        let raw = b"POST /form HTTP/1.1\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::UnsupportedMethod(_))));
    }

    #[test]
    fn test_parse_invalid_version() {
        let raw = b"GET / HTTP/1.0\r\n\r\n"; // solo se acepta HTTP/1.1
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHttpVersion(_))));
    }

    #[test]
    fn test_parse_empty_request() {
        let raw = b"";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_parse_invalid_request_line() {
        let raw = b"GET\r\n\r\n"; // falta path y versión
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_parse_binary_garbage() {
        let raw = [0x00u8, 0xFF, 0xFE, 0x01];
        let result = Request::parse(&raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_parse_path_too_long() {
        // Un path de 1024 bytes supera la cota de 1023
        let long_path = format!("/{}", "a".repeat(MAX_PATH_LEN));
        let raw = format!("GET {} HTTP/1.1\r\n\r\n", long_path);
        let result = Request::parse(raw.as_bytes());

        assert!(matches!(result, Err(ParseError::PathTooLong(_))));
    }

    #[test]
    fn test_parse_path_at_limit() {
        // Exactamente 1023 bytes todavía se acepta
        let path = format!("/{}", "a".repeat(MAX_PATH_LEN - 1));
        let raw = format!("GET {} HTTP/1.1\r\n\r\n", path);
        let request = Request::parse(raw.as_bytes()).unwrap();

        assert_eq!(request.path().len(), MAX_PATH_LEN);
    }

    // ==================== Extracción del Host ====================

    #[test]
    fn test_host_simple() {
        let raw = b"GET / HTTP/1.1\r\nHost: myhost\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.host(), Some("myhost"));
    }

    #[test]
    fn test_host_strips_port() {
        let raw = b"GET / HTTP/1.1\r\nHost: myhost:8080\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.host(), Some("myhost"));
    }

    #[test]
    fn test_host_missing() {
        let raw = b"GET / HTTP/1.1\r\nUser-Agent: curl\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.host(), None);
    }

    #[test]
    fn test_host_empty_value() {
        let raw = b"GET / HTTP/1.1\r\nHost:\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.host(), None);
    }

    #[test]
    fn test_host_ignores_headers_with_host_suffix() {
        // "X-Host:" no debe confundirse con el header Host real
        let raw = b"GET / HTTP/1.1\r\nX-Host: impostor\r\nHost: myhost\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.host(), Some("myhost"));
    }

    #[test]
    fn test_host_only_suffix_header_present() {
        let raw = b"GET / HTTP/1.1\r\nX-Host: impostor\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.host(), None);
    }

    // ==================== HostPolicy ====================

    #[test]
    fn test_policy_exact_match() {
        let policy = HostPolicy::new("myhost", "");
        assert!(policy.matches("myhost"));
    }

    #[test]
    fn test_policy_mismatch() {
        let policy = HostPolicy::new("myhost", "");
        assert!(!policy.matches("otherhost"));
    }

    #[test]
    fn test_policy_case_sensitive() {
        let policy = HostPolicy::new("myhost", "");
        assert!(!policy.matches("MyHost"));
    }

    #[test]
    fn test_policy_request_has_fqdn() {
        // Servidor con nombre corto, request con FQDN (caso Linux)
        let policy = HostPolicy::new("myhost", "example.org");
        assert!(policy.matches("myhost.example.org"));
    }

    #[test]
    fn test_policy_server_has_fqdn() {
        // Servidor con FQDN, request con nombre corto (caso macOS)
        let policy = HostPolicy::new("myhost.example.org", "example.org");
        assert!(policy.matches("myhost"));
    }

    #[test]
    fn test_policy_fqdn_mismatch() {
        let policy = HostPolicy::new("myhost", "example.org");
        assert!(!policy.matches("otherhost.example.org"));
        assert!(!policy.matches("myhost.otherdomain.net"));
    }

    #[test]
    fn test_policy_no_domain_rejects_fqdn() {
        // Sin dominio configurado no hay forma de tolerar el FQDN
        let policy = HostPolicy::new("myhost", "");
        assert!(!policy.matches("myhost.example.org"));
    }
}
