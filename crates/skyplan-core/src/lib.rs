//! Skyplan Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Skyplan engine and
//! its collaborators:
//!
//! - **Identifiers**: String-interned node and edge identifiers ([`identifier::Id`])
//! - **Geometry**: Points, sizes and rectangles ([`geometry`] module)
//! - **Diagram**: The node/edge/group model and its document form ([`diagram`] module)
//! - **Errors**: Model mutation errors ([`error::GraphError`])

pub mod diagram;
pub mod error;
pub mod geometry;
pub mod identifier;
