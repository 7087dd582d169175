//! # Tower Jumps client
//!
//! Client-facing half of the tower-jump analysis tool. An upload form collects
//! a CSV file, channel weights, a time gap and an optional date range; the
//! assembled request is relayed to the external analysis backend and the
//! returned per-state confidence timeline is turned into a scatter chart.
//!
//! ## Architecture
//!
//! - [`models`]: weights and their redistribution, form state, request and
//!   record types
//! - [`services`]: request assembly, backend relay, result presentation and
//!   the page-level submission flow
//! - [`config`]: relay configuration (defaults, `relay.toml`, environment)
//! - [`http`]: axum server exposing `POST /api/process-csv`
//! - [`api`]: public re-exports of the wire types
//!
//! The analysis itself (tower-jump detection, confidence, recovery) is done
//! by the backend; this crate never inspects the CSV.

pub mod api;
pub mod config;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
