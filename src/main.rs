//! # wserver - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de archivos. Parsea la configuración,
//! engancha SIGINT al apagado ordenado y corre el servidor hasta que
//! ese apagado se solicite.

use wserver::config::Config;
use wserver::server::Server;

fn main() {
    println!("=================================");
    println!("  wserver - Servidor de Archivos");
    println!("  Principios de Sistemas Operativos");
    println!("=================================\n");

    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    let mut server = Server::new(config);
    let metrics = server.metrics();

    // SIGINT (ctrl-c) dispara el apagado ordenado: el listener deja de
    // aceptar, los workers drenan y el proceso termina solo
    let handle = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("\n[*] SIGINT recibido: iniciando apagado ordenado");
        handle.request_shutdown();
    }) {
        eprintln!("💥 No se pudo instalar el handler de SIGINT: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }

    println!("\n📊 Métricas finales:");
    println!("{}", metrics.to_json());
}
