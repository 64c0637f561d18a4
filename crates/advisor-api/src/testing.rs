use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use advisor_ai::{TextGenerator, UpstreamError};

/// Scripted stand-in for the provider.
pub enum Reply {
    Fixed(&'static str),
    /// Answers `re: <prompt>` after a short pause, to let other requests interleave.
    EchoSlow,
    Fail(&'static str),
}

pub struct StubGenerator {
    reply: Reply,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Fixed(text) => Ok(text.to_string()),
            Reply::EchoSlow => {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(format!("re: {prompt}"))
            }
            Reply::Fail(detail) => Err(UpstreamError::Status {
                status: 503,
                detail: detail.to_string(),
            }),
        }
    }
}
