//! Error types for Warden
//!
//! Every fallible operation in the workspace returns [`WardenResult`]. Errors
//! implement [`UnifiedError`], which exposes a stable error code alongside the
//! human-readable message and optional context.
//!
//! Note that a permission denial is *not* an error: the permission gate reports
//! it as data in an `ApprovalResult`.

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{ResultExt, UnifiedError, WardenError, WardenResult};
