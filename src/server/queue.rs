//! # Cola de Trabajo Compartida
//! src/server/queue.rs
//!
//! Implementa la cola thread-safe de la que los workers sacan
//! conexiones aceptadas. Toda la coordinación pasa por un único mutex
//! asociado a una única condition variable: los workers esperan dentro
//! de `dequeue` y el listener los despierta al encolar.
//!
//! El orden de extracción es LIFO (se saca la última conexión
//! encolada); el orden de inserción no es un requisito de correctitud.

use std::sync::{Condvar, Mutex};

/// Estado interno protegido por el mutex
struct QueueState<T> {
    items: Vec<T>,
    shutting_down: bool,
}

/// Cola de trabajo bloqueante con señal de apagado
///
/// # Ejemplo
///
/// ```
/// use wserver::server::WorkQueue;
///
/// let queue: WorkQueue<u32> = WorkQueue::new();
/// queue.enqueue(7);
/// assert_eq!(queue.dequeue(), Some(7));
///
/// queue.request_shutdown();
/// assert_eq!(queue.dequeue(), None);
/// ```
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    condvar: Condvar,
}

impl<T> WorkQueue<T> {
    /// Crea una cola vacía
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: Vec::new(),
                shutting_down: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Encola un elemento y despierta a un worker
    ///
    /// Si el apagado ya fue solicitado el elemento se descarta en
    /// silencio: para una conexión, el drop la cierra.
    pub fn enqueue(&self, item: T) {
        let mut state = self.state.lock().unwrap();
        if state.shutting_down {
            return;
        }
        state.items.push(item);
        self.condvar.notify_one();
    }

    /// Desencola bloqueando hasta que haya trabajo o llegue el apagado
    ///
    /// Retorna `None` solo cuando la cola está vacía y el apagado fue
    /// solicitado: el worker debe terminar. La espera re-verifica el
    /// predicado en un loop, así que los despertares espurios son
    /// inofensivos.
    pub fn dequeue(&self) -> Option<T> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(item) = state.items.pop() {
                return Some(item);
            }
            if state.shutting_down {
                return None;
            }
            state = self.condvar.wait(state).unwrap();
        }
    }

    /// Solicita el apagado y despierta a todos los workers bloqueados
    pub fn request_shutdown(&self) {
        let mut state = self.state.lock().unwrap();
        state.shutting_down = true;
        self.condvar.notify_all();
    }

    /// Snapshot no bloqueante del flag de apagado
    pub fn is_shutting_down(&self) -> bool {
        self.state.lock().unwrap().shutting_down
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
