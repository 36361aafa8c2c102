//! External system integrations for jamf-batch.
//!
//! - [`jss`] - Jamf Pro Classic API over HTTP with basic authentication
//!
//! The pipeline depends on the [`jss::JssTransport`] trait so tests can
//! substitute a scripted transport.

pub mod jss;
