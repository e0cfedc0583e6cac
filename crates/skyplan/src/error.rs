//! Error types for Skyplan operations.
//!
//! The computations themselves (layout, snapping, routing, pricing, linting)
//! are total and never fail. [`SkyplanError`] covers the edges of the engine:
//! graph edits, documents, configuration and I/O.

use std::io;

use thiserror::Error;

use skyplan_core::error::GraphError;

/// The main error type for Skyplan operations.
#[derive(Debug, Error)]
pub enum SkyplanError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(String),
}
