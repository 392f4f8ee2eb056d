//! # Listener TCP y Pool de Workers
//! src/server/tcp.rs
//!
//! El listener acepta conexiones en loop y las empuja a la cola
//! compartida; N worker threads las desencolan y las atienden. Una
//! conexión pertenece a exactamente un worker desde que sale de la cola
//! hasta que se cierra: dos threads nunca operan sobre el mismo socket.
//!
//! El apagado es cooperativo: un flag compartido (enganchado a SIGINT
//! en `main`) se consulta en los bordes de cada loop, nunca de forma
//! preemptiva. El listener lo observa y deja de aceptar; los workers lo
//! observan al terminar un ciclo request/response (o al abandonar una
//! lectura) y propagan el broadcast de apagado de la cola para que los
//! workers ociosos despierten y salgan.

use crate::config::Config;
use crate::http::{response, HostPolicy, Request, StatusCode};
use crate::metrics::MetricsCollector;
use crate::resolver::{self, Resource};
use crate::server::WorkQueue;
use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Tamaño del chunk de lectura (un MTU típico)
const READ_CHUNK: usize = 1500;

/// Intervalo con el que el listener re-verifica el flag de apagado
/// cuando no hay conexiones entrantes
const ACCEPT_POLL: Duration = Duration::from_millis(50);

/// Handle para solicitar el apagado ordenado desde otro thread
/// (el handler de SIGINT, o un test)
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Marca el apagado; el listener y los workers lo observarán en
    /// su próximo borde de loop
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Snapshot del flag
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Servidor de archivos concurrente
pub struct Server {
    config: Config,
    queue: Arc<WorkQueue<TcpStream>>,
    shutdown: Arc<AtomicBool>,
    metrics: MetricsCollector,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            queue: Arc::new(WorkQueue::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
            metrics: MetricsCollector::new(),
            listener: None,
        }
    }

    /// Handle de apagado, compartible entre threads
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Collector de métricas del servidor
    pub fn metrics(&self) -> MetricsCollector {
        self.metrics.clone()
    }

    /// Hace bind del socket de escucha y retorna la dirección local
    ///
    /// Separado de `run` para que los tests puedan usar el puerto 0
    /// (efímero) y conocer el puerto real asignado.
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.config.address())?;
        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Corre el servidor hasta que se solicite el apagado
    ///
    /// Crea el pool de workers, acepta conexiones en loop y, al salir,
    /// cierra el socket de escucha, difunde el apagado por la cola y
    /// espera a que todos los workers terminen. Las conexiones ya
    /// aceptadas se drenan con normalidad.
    pub fn run(&mut self) -> io::Result<()> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => TcpListener::bind(self.config.address())?,
        };
        let addr = listener.local_addr()?;

        println!("[+] Servidor escuchando en {}", addr);
        println!("[*] Pool de {} workers sobre una cola compartida\n", self.config.workers);

        let policy = HostPolicy::new(
            self.config.effective_hostname(),
            self.config.domain.clone(),
        );
        let root = PathBuf::from(&self.config.document_root);

        let workers: Vec<_> = (0..self.config.workers)
            .map(|id| {
                let queue = Arc::clone(&self.queue);
                let shutdown = Arc::clone(&self.shutdown);
                let policy = policy.clone();
                let root = root.clone();
                let metrics = self.metrics.clone();

                thread::spawn(move || {
                    worker_loop(id, queue, shutdown, policy, root, metrics);
                })
            })
            .collect();

        self.accept_loop(&listener);

        // Cerrar el socket de escucha antes de esperar a los workers
        drop(listener);

        // Despertar a los workers ociosos aunque no haya habido tráfico
        self.queue.request_shutdown();

        for (id, worker) in workers.into_iter().enumerate() {
            println!("[*] listener: esperando al responder {}...", id);
            if worker.join().is_err() {
                eprintln!("[!] listener: el responder {} terminó con panic", id);
            }
        }

        println!("[*] listener: exit");
        Ok(())
    }

    /// Loop de accept del listener
    ///
    /// El flag de apagado se consulta una vez por iteración; el accept
    /// es no bloqueante para que el flag se observe también sin tráfico
    /// entrante. Un fallo de accept es fatal para el listener pero no
    /// para los workers en vuelo.
    fn accept_loop(&self, listener: &TcpListener) {
        if let Err(e) = listener.set_nonblocking(true) {
            eprintln!("[!] listener: no se pudo configurar el socket: {}", e);
            return;
        }

        while !self.shutdown.load(Ordering::SeqCst) && !self.queue.is_shutting_down() {
            match listener.accept() {
                Ok((stream, peer)) => {
                    println!("[*] listener: conexión desde {}", peer);
                    // El socket aceptado vuelve a modo bloqueante:
                    // los workers leen y escriben bloqueando
                    if let Err(e) = stream.set_nonblocking(false) {
                        eprintln!("[!] listener: conexión descartada: {}", e);
                        continue;
                    }
                    self.metrics.record_connection_opened();
                    self.queue.enqueue(stream);
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL);
                }
                Err(e) => {
                    eprintln!("[!] listener: error en accept: {}", e);
                    break;
                }
            }
        }

        println!("[*] listener: fin del loop de accept");
    }
}

/// Loop principal de un worker
///
/// Desencola conexiones hasta que la cola reporte el apagado. Cada
/// conexión se atiende completa (varios requests si el peer reutiliza
/// la conexión) y se cierra al salir, en todos los caminos: el drop del
/// `TcpStream` cierra el socket.
fn worker_loop(
    id: usize,
    queue: Arc<WorkQueue<TcpStream>>,
    shutdown: Arc<AtomicBool>,
    policy: HostPolicy,
    root: PathBuf,
    metrics: MetricsCollector,
) {
    println!("[*] responder {}: created", id);

    while let Some(mut stream) = queue.dequeue() {
        println!("[*] responder {}: connection opened", id);
        metrics.increment_active_workers();

        handle_connection(id, &mut stream, &shutdown, &policy, &root, &metrics);

        metrics.decrement_active_workers();
        metrics.record_connection_closed();
        drop(stream);
        println!("[*] responder {}: connection closed", id);

        // Propagar el apagado: despierta a los workers bloqueados
        // en dequeue
        if shutdown.load(Ordering::SeqCst) {
            queue.request_shutdown();
        }
    }

    println!("[*] responder {}: exit", id);
}

/// Atiende una conexión: un request por iteración hasta que el peer
/// cierre o un error la corte
///
/// Los errores de protocolo (request line imposible, Host rechazado)
/// reciben una response bien formada (500/404) y terminan la conexión.
/// Los errores de transporte la terminan sin más: el cliente ve un
/// cierre abrupto, nunca una response a medias contabilizada como buena.
fn handle_connection(
    id: usize,
    stream: &mut TcpStream,
    shutdown: &AtomicBool,
    policy: &HostPolicy,
    root: &Path,
    metrics: &MetricsCollector,
) {
    loop {
        let raw = match read_headers(stream, shutdown) {
            Ok(Some(raw)) => raw,
            // Peer cerró (fin normal del loop) o apagado en curso
            Ok(None) => break,
            Err(e) => {
                eprintln!("[!] responder {}: error de lectura: {}", id, e);
                break;
            }
        };

        let request = match Request::parse(&raw) {
            Ok(request) => request,
            Err(e) => {
                println!("[!] responder {}: 500 ({})", id, e);
                if let Ok(sent) = response::send_server_error(stream) {
                    metrics.record_response(StatusCode::InternalServerError, sent);
                }
                break;
            }
        };

        let host_accepted = request.host().map(|h| policy.matches(h)).unwrap_or(false);
        if !host_accepted {
            println!(
                "[!] responder {}: 404 {} (header Host rechazado)",
                id,
                request.path()
            );
            if let Ok(sent) = response::send_not_found(stream) {
                metrics.record_response(StatusCode::NotFound, sent);
            }
            break;
        }

        if respond(id, stream, root, request.path(), metrics).is_err() {
            // Error de transporte al enviar: cortar esta conexión
            break;
        }
    }
}

/// Resuelve el path y envía exactamente una response
fn respond(
    id: usize,
    stream: &mut TcpStream,
    root: &Path,
    path: &str,
    metrics: &MetricsCollector,
) -> io::Result<()> {
    match resolver::resolve(root, path) {
        Resource::RegularFile {
            mut file,
            size,
            mime,
        } => {
            let sent = response::send_file(stream, &mut file, size, mime)?;
            metrics.record_response(StatusCode::Ok, sent);
            println!("[+] responder {}: 200 {} ({} bytes)", id, path, sent);
        }
        Resource::DirectoryWithIndex { location } => {
            let sent = response::send_redirect(stream, &location)?;
            metrics.record_response(StatusCode::TemporaryRedirect, sent);
            println!("[+] responder {}: 307 {} -> {}", id, path, location);
        }
        Resource::DirectoryListing { base, entries } => {
            let sent = response::send_listing(stream, &base, &entries)?;
            metrics.record_response(StatusCode::Ok, sent);
            println!(
                "[+] responder {}: 200 {} (listado, {} entradas)",
                id,
                path,
                entries.len()
            );
        }
        Resource::NotFound => {
            let sent = response::send_not_found(stream)?;
            metrics.record_response(StatusCode::NotFound, sent);
            println!("[+] responder {}: 404 {}", id, path);
        }
    }

    Ok(())
}

/// Lee del socket hasta acumular un bloque de headers completo
///
/// Acumula chunks en un buffer creciente hasta observar `\r\n\r\n`.
/// Retorna `Ok(None)` si el peer cerró (lectura de cero bytes) o si el
/// apagado se observó a mitad de la lectura; los errores de lectura se
/// propagan. Los bytes de body leídos de más no se tratan especialmente:
/// los GET se asumen sin body.
fn read_headers(stream: &mut TcpStream, shutdown: &AtomicBool) -> io::Result<Option<Vec<u8>>> {
    let mut headers: Vec<u8> = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    while !has_header_terminator(&headers) {
        let rlen = stream.read(&mut chunk)?;
        if rlen == 0 {
            // Conexión cerrada por el cliente
            return Ok(None);
        }
        headers.extend_from_slice(&chunk[..rlen]);

        if shutdown.load(Ordering::SeqCst) {
            // Apagado en curso: abandonar la lectura
            return Ok(None);
        }
    }

    Ok(Some(headers))
}

/// Busca el separador headers/body
fn has_header_terminator(buffer: &[u8]) -> bool {
    buffer.windows(4).any(|window| window == b"\r\n\r\n")
}
