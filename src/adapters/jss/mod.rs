//! Jamf Pro Classic API adapter
//!
//! [`JssTransport`] is the seam the pipeline depends on; [`JssClient`] is the
//! production implementation built on reqwest.

pub mod client;
pub mod transport;

pub use client::JssClient;
pub use transport::{HttpReply, JssTransport};
