//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`clip`] - Subset a stored layer to a boundary polygon
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`download`] - Download layers to shapefile bundles
//! - [`layers`] - List a service's layers

pub mod clip;
pub mod common;
pub mod config;
pub mod download;
pub mod layers;
