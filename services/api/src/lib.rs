//! services/api/src/lib.rs
//!
//! The HTTP service for the class tracker: configuration, store adapters
//! and the axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
