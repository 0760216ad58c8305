//! Abya daemon library - exposes modules for testing

pub mod config;
pub mod extract;
pub mod routes;
pub mod runner;
pub mod server;
pub mod sessions;
pub mod workflow;
