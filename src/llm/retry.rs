use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::llm::provider::LLMProvider;
use crate::models::ClassificationRecord;

pub const SUMMARY_FALLBACK: &str = "Erro ao gerar resumo executivo.";

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Outward-facing classifier: retries the provider and never fails.
pub struct RetryingClassifier {
    provider: Arc<dyn LLMProvider>,
    policy: RetryPolicy,
}

impl RetryingClassifier {
    pub fn new(provider: Arc<dyn LLMProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    pub async fn classify(&self, comment: &str) -> ClassificationRecord {
        let attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.provider.classify_comment(comment).await {
                Ok(record) => return record,
                Err(e) if attempt < attempts && e.is_retryable() => {
                    tracing::debug!(
                        "Classification attempt {}/{} failed: {}",
                        attempt,
                        attempts,
                        e
                    );
                    sleep(self.policy.backoff).await;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to classify '{}...' after {} attempt(s): {}",
                        preview(comment),
                        attempt,
                        e
                    );
                    break;
                }
            }
        }

        ClassificationRecord::error()
    }

    /// Executive summary from the aggregated statistics, single attempt.
    pub async fn summarize(&self, statistics: &str) -> String {
        match self.provider.generate_summary(statistics).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Executive summary generation failed: {}", e);
                SUMMARY_FALLBACK.to_string()
            }
        }
    }
}

fn preview(comment: &str) -> String {
    comment.chars().take(30).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::stub::{StubProvider, StubReply};
    use crate::models::{Category, Sentiment};
    use std::sync::atomic::Ordering;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_always_failing_provider_called_three_times() {
        let stub = Arc::new(StubProvider::new(|_| StubReply::Fail));
        let classifier = RetryingClassifier::new(stub.clone(), fast_policy());

        let record = classifier.classify("qualquer coisa").await;

        assert_eq!(record, ClassificationRecord::error());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_recovers_on_second_attempt() {
        let stub = Arc::new(StubProvider::failing_first(1));
        let classifier = RetryingClassifier::new(stub.clone(), fast_policy());

        let record = classifier.classify("Ótimo app").await;

        assert_eq!(record.sentiment, Sentiment::Positive);
        assert_eq!(record.category, Category::Suggestion);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_backoff_only_between_attempts() {
        let stub = Arc::new(StubProvider::new(|_| StubReply::Fail));
        let classifier = RetryingClassifier::new(
            stub.clone(),
            RetryPolicy {
                max_attempts: 2,
                backoff: Duration::from_millis(50),
            },
        );

        let started = std::time::Instant::now();
        classifier.classify("x").await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(500));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_summary_fallback() {
        let stub = Arc::new(StubProvider::new(|_| StubReply::Fail));
        let classifier = RetryingClassifier::new(stub, fast_policy());

        assert_eq!(classifier.summarize("Total: 1").await, SUMMARY_FALLBACK);
    }
}
