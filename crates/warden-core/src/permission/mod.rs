//! Tool permission gate
//!
//! Decides whether a tool invocation may run. Policy comes from a
//! [`PermissionMode`]; the interactive path delegates to a
//! [`QuestionAnswerer`] supplied by the surrounding UI.

pub mod gate;
pub mod handler;
pub mod types;

pub use gate::PermissionGate;
pub use handler::{QuestionAnswerer, SharedQuestionAnswerer};
pub use types::{ApprovalResult, PermissionMode, Question};
