//! Boundary to the external text-generation provider.
//!
//! The chat service only sees [`TextGenerator`]; [`gemini::GeminiClient`] is
//! the implementation the server binary wires in.

pub mod gemini;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

/// Every way a provider call can fail. The message is shown to API callers
/// as `AI API error: <message>`.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("quota exceeded: {0}")]
    Quota(String),

    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("content rejected: {0}")]
    Content(String),

    #[error("unreadable response: {0}")]
    Decode(String),
}

/// Turns a prompt into a reply. One call, no retries.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, UpstreamError>> + Send;
}

impl<T: TextGenerator> TextGenerator for Arc<T> {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, UpstreamError>> + Send {
        (**self).generate(prompt)
    }
}
