use super::markdown::strip_markdown;
use super::transport::GenerateTransport;
use super::types::GenerateRequest;
use crate::error::EngineError;
use crate::prompt::ComposedPrompt;
use crate::usage::UsageTracker;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Backoff delay source, swappable so tests can record delays instead of
/// waiting on them.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Attempt budget and exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff: Duration::from_millis(base_backoff_ms),
        }
    }

    /// `base * 2^attempt`, saturating.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_backoff.saturating_mul(factor)
    }
}

/// Sends composed prompts upstream with bounded retries and records usage
/// for every usable completion.
pub struct RequestEngine {
    transport: Arc<dyn GenerateTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    model: Option<String>,
    usage: Option<Arc<UsageTracker>>,
}

impl RequestEngine {
    pub fn new(transport: Arc<dyn GenerateTransport>) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
            policy: RetryPolicy::default(),
            model: None,
            usage: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_usage(mut self, usage: Arc<UsageTracker>) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn usage(&self) -> Option<&Arc<UsageTracker>> {
        self.usage.as_ref()
    }

    /// Send `prompt` and replace `target` with the cleaned completion.
    ///
    /// `target` is left untouched on any failure.
    pub async fn send(&self, prompt: &ComposedPrompt, target: &mut String) -> Result<(), EngineError> {
        let text = self.complete(prompt).await?;
        *target = text;
        Ok(())
    }

    /// Run the retry loop and return the stripped completion text.
    pub async fn complete(&self, prompt: &ComposedPrompt) -> Result<String, EngineError> {
        let request = GenerateRequest::single_turn(
            &prompt.system_prompt,
            &prompt.user_content,
            self.model.as_deref(),
        );
        let max_attempts = self.policy.max_attempts;

        for attempt in 0..max_attempts {
            let err = match self.transport.generate(&request).await {
                Ok(response) => {
                    let Some(text) = response.first_text().filter(|t| !t.is_empty()) else {
                        tracing::warn!(attempt, "Upstream returned no usable completion");
                        return Err(EngineError::Blocked {
                            detail: response.blocked_detail(),
                        });
                    };
                    if attempt > 0 {
                        tracing::info!(attempt, "Upstream recovered after retries");
                    }
                    let cleaned = strip_markdown(text);
                    self.record_success();
                    return Ok(cleaned);
                }
                Err(err) => err,
            };

            if !err.is_transient() {
                return Err(err);
            }

            let delay = self.policy.delay_for(attempt);
            let last_attempt = attempt + 1 == max_attempts;
            if matches!(err, EngineError::RateLimited) {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Upstream rate limited, retrying"
                );
                self.sleeper.sleep(delay).await;
            } else if !last_attempt {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Upstream call failed, retrying"
                );
                self.sleeper.sleep(delay).await;
            }

            if last_attempt {
                return Err(EngineError::RetriesExhausted {
                    attempts: max_attempts,
                    last: Box::new(err),
                });
            }
        }

        Err(EngineError::RetriesExhausted {
            attempts: max_attempts,
            last: Box::new(EngineError::Transport("no attempts were made".into())),
        })
    }

    fn record_success(&self) {
        if let Some(usage) = &self.usage {
            // Remote sync runs in the background; callers flush before exit.
            usage.record_success();
        }
    }
}
