//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta y agrega métricas del servidor en tiempo real. Todos los
//! threads comparten el mismo collector a través de un `Arc<Mutex<_>>`.

use crate::http::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
struct MetricsData {
    /// Contador total de responses enviadas
    total_requests: u64,

    /// Responses por código de estado
    status_codes: BTreeMap<u16, u64>,

    /// Bytes de body transmitidos
    body_bytes_sent: u64,

    /// Conexiones aceptadas por el listener
    connections_opened: u64,

    /// Conexiones cerradas por los workers
    connections_closed: u64,

    /// Workers atendiendo una conexión en este momento
    active_workers: u64,
}

/// Snapshot serializable del estado de las métricas
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub total_requests: u64,
    pub responses_by_status: BTreeMap<u16, u64>,
    pub body_bytes_sent: u64,
    pub connections_opened: u64,
    pub connections_closed: u64,
    pub active_workers: u64,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                total_requests: 0,
                status_codes: BTreeMap::new(),
                body_bytes_sent: 0,
                connections_opened: 0,
                connections_closed: 0,
                active_workers: 0,
            })),
            start_time: Instant::now(),
        }
    }

    /// Registra una response enviada
    pub fn record_response(&self, status: StatusCode, body_bytes: u64) {
        let mut data = self.inner.lock().unwrap();
        data.total_requests += 1;
        *data.status_codes.entry(status.as_u16()).or_insert(0) += 1;
        data.body_bytes_sent += body_bytes;
    }

    /// Registra una conexión aceptada por el listener
    pub fn record_connection_opened(&self) {
        self.inner.lock().unwrap().connections_opened += 1;
    }

    /// Registra una conexión cerrada por un worker
    pub fn record_connection_closed(&self) {
        self.inner.lock().unwrap().connections_closed += 1;
    }

    /// Incrementa el contador de workers activos
    pub fn increment_active_workers(&self) {
        self.inner.lock().unwrap().active_workers += 1;
    }

    /// Decrementa el contador de workers activos
    pub fn decrement_active_workers(&self) {
        let mut data = self.inner.lock().unwrap();
        data.active_workers = data.active_workers.saturating_sub(1);
    }

    /// Toma un snapshot consistente de todas las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.inner.lock().unwrap();
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            total_requests: data.total_requests,
            responses_by_status: data.status_codes.clone(),
            body_bytes_sent: data.body_bytes_sent,
            connections_opened: data.connections_opened,
            connections_closed: data.connections_closed,
            active_workers: data.active_workers,
        }
    }

    /// Serializa el snapshot actual a JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.snapshot())
            .unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collector_is_empty() {
        let metrics = MetricsCollector::new();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.body_bytes_sent, 0);
        assert_eq!(snapshot.connections_opened, 0);
        assert!(snapshot.responses_by_status.is_empty());
    }

    #[test]
    fn test_record_response() {
        let metrics = MetricsCollector::new();
        metrics.record_response(StatusCode::Ok, 10);
        metrics.record_response(StatusCode::Ok, 20);
        metrics.record_response(StatusCode::NotFound, 113);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.body_bytes_sent, 143);
        assert_eq!(snapshot.responses_by_status.get(&200), Some(&2));
        assert_eq!(snapshot.responses_by_status.get(&404), Some(&1));
    }

    #[test]
    fn test_connection_counters() {
        let metrics = MetricsCollector::new();
        metrics.record_connection_opened();
        metrics.record_connection_opened();
        metrics.record_connection_closed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.connections_opened, 2);
        assert_eq!(snapshot.connections_closed, 1);
    }

    #[test]
    fn test_active_workers() {
        let metrics = MetricsCollector::new();
        metrics.increment_active_workers();
        metrics.increment_active_workers();
        metrics.decrement_active_workers();

        assert_eq!(metrics.snapshot().active_workers, 1);

        // Nunca baja de cero
        metrics.decrement_active_workers();
        metrics.decrement_active_workers();
        assert_eq!(metrics.snapshot().active_workers, 0);
    }

    #[test]
    fn test_to_json() {
        let metrics = MetricsCollector::new();
        metrics.record_response(StatusCode::Ok, 10);

        let json = metrics.to_json();
        assert!(json.contains("\"total_requests\": 1"));
        assert!(json.contains("\"200\": 1"));
    }

    #[test]
    fn test_shared_between_clones() {
        let metrics = MetricsCollector::new();
        let clone = metrics.clone();

        clone.record_response(StatusCode::Ok, 5);
        assert_eq!(metrics.snapshot().total_requests, 1);
    }
}
