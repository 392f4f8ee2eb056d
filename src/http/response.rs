//! # Escritura de Responses
//! src/http/response.rs
//!
//! Este módulo construye y transmite las cuatro responses que el
//! servidor puede producir (200, 307, 404, 500). Las formas en el wire
//! son exactas: el `Content-Length` anunciado siempre coincide con los
//! bytes del body realmente enviados.
//!
//! Todas las funciones escriben sobre cualquier `W: Write`, lo que
//! permite testearlas contra un `Vec<u8>` sin abrir sockets.

use crate::http::StatusCode;
use std::fs::File;
use std::io::{self, Read, Write};

/// Tamaño del chunk usado para streamear archivos
const CHUNK_LEN: usize = 1500;

/// Body fijo de la response 404 (113 bytes)
pub const NOT_FOUND_BODY: &str = "<html>\r\n\
    <head>\r\n\
    <title> 404 File Not Found </title>\r\n\
    </head>\r\n\
    <body>\r\n\
    <p> File not found </p>\r\n\
    </body>\r\n\
    </html>\r\n";

/// Body fijo de la response 500 (120 bytes)
pub const SERVER_ERROR_BODY: &str = "<html>\r\n\
    <head>\r\n\
    <title> 500 Internal Server Error </title>\r\n\
    </head>\r\n\
    <body>\r\n\
    <p> Internal Error </p>\r\n\
    </body>\r\n\
    </html>\r\n";

/// Body fijo de la response 307 (143 bytes)
pub const REDIRECT_BODY: &str = "<html>\r\n\
    <head>\r\n\
    <title>307 Temporary Redirect</title>\r\n\
    </head>\r\n\
    <body>\r\n\
    <p>Redirecting to the requested directory index</p>\r\n\
    </body>\r\n\
    </html>\r\n";

/// Deriva el `Content-Type` desde la extensión del archivo
///
/// Tabla fija; cualquier extensión desconocida (o la ausencia de
/// extensión) cae en `application/octet-stream`.
///
/// # Ejemplo
/// ```
/// use wserver::http::response::mime_type;
///
/// assert_eq!(mime_type(Some("html")), "text/html");
/// assert_eq!(mime_type(Some("zip")), "application/octet-stream");
/// assert_eq!(mime_type(None), "application/octet-stream");
/// ```
pub fn mime_type(extension: Option<&str>) -> &'static str {
    match extension {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("txt") => "text/plain",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Escribe todos los bytes, reintentando sobre escrituras parciales
///
/// Un `write` que retorna 0 se reporta como error: el peer dejó de
/// aceptar datos y la response quedaría truncada.
pub fn send_all<W: Write>(writer: &mut W, data: &[u8]) -> io::Result<()> {
    let mut offset = 0;
    while offset < data.len() {
        let wrote = writer.write(&data[offset..])?;
        if wrote == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "peer stopped accepting data",
            ));
        }
        offset += wrote;
    }
    Ok(())
}

/// Envía una response 200 streameando un archivo
///
/// Headers en el wire:
/// `HTTP/1.1 200 OK\r\nContent-Type: <mime>\r\nContent-Length: <n>\r\n\r\n`
///
/// El body se lee y escribe en chunks de tamaño fijo, así un archivo
/// grande nunca se carga entero en memoria. Retorna los bytes de body
/// enviados.
pub fn send_file<W: Write>(
    writer: &mut W,
    file: &mut File,
    size: u64,
    mime: &str,
) -> io::Result<u64> {
    let headers = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
        StatusCode::Ok,
        mime,
        size
    );
    send_all(writer, headers.as_bytes())?;

    let mut chunk = [0u8; CHUNK_LEN];
    let mut sent: u64 = 0;
    loop {
        let rlen = file.read(&mut chunk)?;
        if rlen == 0 {
            break;
        }
        send_all(writer, &chunk[..rlen])?;
        sent += rlen as u64;
    }

    Ok(sent)
}

/// Genera el body HTML de un listado de directorio
///
/// Un `<li>` por entrada, cada uno enlazando a `<base>/<entrada>`.
/// `base` debe venir sin `/` final (el caller lo recorta).
pub fn listing_body(base: &str, entries: &[String]) -> String {
    let mut items = String::new();
    for entry in entries {
        items.push_str(&format!(
            "<li><a href=\"{}/{}\">{}</a></li>\r\n",
            base, entry, entry
        ));
    }

    format!(
        "<html>\r\n\
         <head>\r\n\
         <title>Directory Listings</title>\r\n\
         </head>\r\n\
         <body>\r\n\
         <ul>{}</ul>\r\n\
         </body>\r\n\
         </html>\r\n",
        items
    )
}

/// Envía una response 200 con el listado de un directorio
///
/// El `Content-Length` se calcula sobre el body ya serializado, nunca
/// sobre una estimación. Retorna los bytes de body enviados.
pub fn send_listing<W: Write>(
    writer: &mut W,
    base: &str,
    entries: &[String],
) -> io::Result<u64> {
    let body = listing_body(base, entries);
    let headers = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n",
        StatusCode::Ok,
        body.len()
    );

    send_all(writer, headers.as_bytes())?;
    send_all(writer, body.as_bytes())?;
    Ok(body.len() as u64)
}

/// Envía una response 307 redirigiendo a `location`
///
/// Headers en el wire:
/// `HTTP/1.1 307 Temporary Redirect\r\nLocation: <path>\r\nContent-Length: 143\r\nContent-Type: text/html\r\n\r\n`
pub fn send_redirect<W: Write>(writer: &mut W, location: &str) -> io::Result<u64> {
    let response = format!(
        "HTTP/1.1 {}\r\nLocation: {}\r\nContent-Length: {}\r\nContent-Type: text/html\r\n\r\n{}",
        StatusCode::TemporaryRedirect,
        location,
        REDIRECT_BODY.len(),
        REDIRECT_BODY
    );

    send_all(writer, response.as_bytes())?;
    Ok(REDIRECT_BODY.len() as u64)
}

/// Envía la response 404 fija
pub fn send_not_found<W: Write>(writer: &mut W) -> io::Result<u64> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        StatusCode::NotFound,
        NOT_FOUND_BODY.len(),
        NOT_FOUND_BODY
    );

    send_all(writer, response.as_bytes())?;
    Ok(NOT_FOUND_BODY.len() as u64)
}

/// Envía la response 500 fija
///
/// Incluye `Connection: close`: después de un request imposible de
/// parsear el worker corta la conexión.
pub fn send_server_error<W: Write>(writer: &mut W) -> io::Result<u64> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        StatusCode::InternalServerError,
        SERVER_ERROR_BODY.len(),
        SERVER_ERROR_BODY
    );

    send_all(writer, response.as_bytes())?;
    Ok(SERVER_ERROR_BODY.len() as u64)
}
