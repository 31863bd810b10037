//! LinkStash — bookmark collection manager with search, tags, and
//! drag-reorder, backed by a hosted REST store.
//!
//! This library crate exposes all modules for use by the binary and
//! integration tests.

pub mod app;
pub mod config;
pub mod managers;
pub mod rpc_handler;
pub mod services;
pub mod store;
pub mod types;
