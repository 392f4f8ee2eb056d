//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! El servidor solo produce cuatro responses distintas, así que el enum
//! se limita a esos códigos. Los reason phrases son los del protocolo
//! de salida del servidor: `404 File Not Found` en lugar del estándar
//! `Not Found`.

/// Códigos de estado que el servidor puede producir
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - Archivo o listado de directorio enviado
    Ok = 200,

    /// 307 Temporary Redirect - Directorio con index.html
    TemporaryRedirect = 307,

    /// 404 File Not Found - Recurso inexistente o Host rechazado
    NotFound = 404,

    /// 500 Internal Server Error - Request line imposible de parsear
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use wserver::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::TemporaryRedirect => "Temporary Redirect",
            StatusCode::NotFound => "File Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::TemporaryRedirect.as_u16(), 307);
        assert_eq!(StatusCode::NotFound.as_u16(), 404);
        assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
        assert_eq!(StatusCode::NotFound.reason_phrase(), "File Not Found");
        assert_eq!(
            StatusCode::InternalServerError.reason_phrase(),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_is_success() {
        assert!(StatusCode::Ok.is_success());
        assert!(!StatusCode::NotFound.is_success());
        assert!(!StatusCode::TemporaryRedirect.is_success());
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(StatusCode::NotFound.to_string(), "404 File Not Found");
        assert_eq!(
            StatusCode::TemporaryRedirect.to_string(),
            "307 Temporary Redirect"
        );
    }
}
