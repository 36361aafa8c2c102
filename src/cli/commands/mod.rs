//! CLI command implementations

pub mod backup;
pub mod common;
pub mod delete;
pub mod export;
pub mod flush;
pub mod validate;
pub mod verify;
