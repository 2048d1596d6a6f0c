//! Interactive answerer capability

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::types::Question;
use crate::error::WardenResult;

/// Puts a [`Question`] to the user and returns the raw answer.
///
/// Implemented by whatever front end hosts the agent (terminal prompt, IDE
/// dialog, remote approval queue). The gate interprets the returned JSON; an
/// `Err` is treated as a failure of the front end, not as a "no".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    async fn ask(&self, question: Question) -> WardenResult<Value>;
}

/// Shared answerer type
pub type SharedQuestionAnswerer = Arc<dyn QuestionAnswerer>;
