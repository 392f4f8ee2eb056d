//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa el lado TCP del servidor:
//! 1. El listener acepta conexiones y las encola
//! 2. Un pool fijo de workers las desencola y las atiende
//! 3. Cada worker lee, parsea, resuelve y responde en loop sobre
//!    la misma conexión hasta que el peer cierra
//!
//! La única coordinación entre threads es la [`WorkQueue`] y el flag
//! compartido de apagado.

pub mod queue;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use queue::WorkQueue;
pub use tcp::{Server, ShutdownHandle};
