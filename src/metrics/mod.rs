//! # Módulo de Métricas
//! src/metrics/mod.rs
//!
//! Recolección de métricas del servidor: requests atendidos, responses
//! por status code, bytes de body enviados y workers activos. El
//! snapshot se serializa a JSON y se imprime cuando el servidor termina.

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
