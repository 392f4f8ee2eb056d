//! # Resolución de Recursos
//! src/resolver/mod.rs
//!
//! Este módulo mapea el path de un request a un recurso concreto bajo
//! el document root. El resultado es exactamente uno de cuatro casos:
//!
//! ```text
//! Request path → RegularFile | DirectoryWithIndex | DirectoryListing | NotFound
//! ```
//!
//! Cada request produce exactamente una response: si el path es un
//! directorio se responde con el redirect o el listado y nunca se
//! intenta además abrirlo como archivo plano.
//!
//! Los paths no pueden escapar del document root: cualquier componente
//! `..` se rechaza con `NotFound` antes de tocar el filesystem.

use crate::http::response::mime_type;
use std::fs::File;
use std::io;
use std::path::Path;

/// Resultado de resolver un path contra el document root
///
/// Se calcula fresco por request; no hay caché.
pub enum Resource {
    /// Archivo plano, ya abierto para lectura
    RegularFile {
        file: File,
        size: u64,
        mime: &'static str,
    },

    /// Directorio que contiene un `index.html`: redirigir ahí
    DirectoryWithIndex {
        /// Path del request con `index.html` agregado
        /// (con exactamente un `/` de separación)
        location: String,
    },

    /// Directorio sin `index.html`: listar sus entradas
    DirectoryListing {
        /// Path del request sin el `/` final
        base: String,
        /// Entradas del directorio, ordenadas para que la response
        /// sea determinista
        entries: Vec<String>,
    },

    /// El recurso no existe o no es accesible
    NotFound,
}

impl Resource {
    /// Nombre corto del caso, para logging
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::RegularFile { .. } => "file",
            Resource::DirectoryWithIndex { .. } => "redirect",
            Resource::DirectoryListing { .. } => "listing",
            Resource::NotFound => "not found",
        }
    }
}

/// Verifica que el path no intente escapar del document root
fn is_contained(request_path: &str) -> bool {
    request_path.starts_with('/') && request_path.split('/').all(|component| component != "..")
}

/// Construye el target del redirect: `<path>/index.html` con
/// exactamente un `/` de separación
fn index_location(request_path: &str) -> String {
    if request_path.ends_with('/') {
        format!("{}index.html", request_path)
    } else {
        format!("{}/index.html", request_path)
    }
}

/// Lee las entradas de un directorio, ordenadas por nombre
fn directory_entries(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort_unstable();
    Ok(entries)
}

/// Resuelve un path de request contra el document root
///
/// # Ejemplo
///
/// ```no_run
/// use std::path::Path;
/// use wserver::resolver::{resolve, Resource};
///
/// match resolve(Path::new("website"), "/index.html") {
///     Resource::RegularFile { size, mime, .. } => {
///         println!("archivo de {} bytes ({})", size, mime);
///     }
///     _ => println!("otra cosa"),
/// }
/// ```
pub fn resolve(root: &Path, request_path: &str) -> Resource {
    if !is_contained(request_path) {
        return Resource::NotFound;
    }

    let full = root.join(request_path.trim_start_matches('/'));

    if full.is_dir() {
        if full.join("index.html").is_file() {
            return Resource::DirectoryWithIndex {
                location: index_location(request_path),
            };
        }

        // Sin index.html: listar el directorio
        return match directory_entries(&full) {
            Ok(entries) => Resource::DirectoryListing {
                base: request_path
                    .strip_suffix('/')
                    .unwrap_or(request_path)
                    .to_string(),
                entries,
            },
            Err(_) => Resource::NotFound,
        };
    }

    // Archivo plano: abrirlo; si no se puede, 404
    let mut opened = match File::open(&full) {
        Ok(file) => file,
        Err(_) => return Resource::NotFound,
    };

    let size = match file_size(&mut opened) {
        Ok(size) => size,
        Err(_) => return Resource::NotFound,
    };

    let mime = mime_type(full.extension().and_then(|e| e.to_str()));

    Resource::RegularFile {
        file: opened,
        size,
        mime,
    }
}

/// Tamaño del archivo vía fstat sobre el handle ya abierto
fn file_size(file: &mut File) -> io::Result<u64> {
    Ok(file.metadata()?.len())
}
