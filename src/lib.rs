// ABOUTME: Library root for hephaestus - exposes the pipeline for the binary and tests.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod exec;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod types;
