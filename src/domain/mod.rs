//! Domain models and types for jamf-batch.
//!
//! The domain layer provides:
//! - **Typed identifiers** ([`ResourceId`], [`ResourceKind`], [`ResourceRef`])
//! - **Detail documents** ([`ResourceDetail`])
//! - **Error types** ([`BatchError`], [`JssError`])
//! - **Result type alias** ([`Result`])
//!
//! ```rust
//! use jamf_batch::domain::{ResourceId, ResourceKind, ResourceRef};
//!
//! let app = ResourceRef::new(ResourceId::new(101).unwrap(), ResourceKind::App);
//! assert_eq!(app.path(), "/JSSResource/mobiledeviceapplications/id/101");
//! ```

pub mod detail;
pub mod errors;
pub mod ids;
pub mod result;

pub use detail::ResourceDetail;
pub use errors::{BatchError, JssError};
pub use ids::{ResourceId, ResourceKind, ResourceRef};
pub use result::Result;
