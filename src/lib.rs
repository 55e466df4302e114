//! sports-lines: sports line ingestion and delta streaming
//!
//! This library provides the core components for:
//! - Polling per-sport line feeds on independent cadences
//! - Caching the latest raw line per sport
//! - Serving subscription streams that push per-subscription deltas
//! - WebSocket transport for subscription streams
//! - Health and Prometheus metrics endpoint
//! - Structured logging and configuration

pub mod cache;
pub mod cli;
pub mod config;
pub mod feed;
pub mod health;
pub mod ingest;
pub mod sport;
pub mod subscription;
pub mod telemetry;
pub mod ws;
