//! # Kanflow API Server Library
//!
//! HTTP surface for the kanflow board manager, built on the domain core in
//! `kanflow-shared`.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `config`: environment-based configuration
//! - `error`: domain → HTTP error mapping
//! - `middleware`: security headers
//! - `routes`: handlers per resource

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
