//! Projection of detail documents into export rows
//!
//! Each resource kind has a fixed column schema ([`schema`]). The projector
//! ([`project`]) walks that schema against one detail document and produces
//! an [`ExportRow`] with exactly those columns, in schema order.

pub mod project;
pub mod schema;

pub use project::{project, ExportRow, ExportValue, Projection};
pub use schema::{columns, header, Column, Extraction};
