use std::sync::Arc;
use chrono::Utc;

use crate::analysis::aggregator::Aggregator;
use crate::analysis::dispatcher::ConcurrentDispatcher;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::llm::{LLMProvider, RetryingClassifier};
use crate::models::{ClassifiedComment, FeedbackReport};
use crate::storage::Storage;

pub struct FeedbackPipeline {
    classifier: Arc<RetryingClassifier>,
    dispatcher: ConcurrentDispatcher,
    aggregator: Aggregator,
    storage: Option<Storage>,
    config: PipelineConfig,
}

impl FeedbackPipeline {
    pub fn new(
        llm: impl LLMProvider + 'static,
        storage: Option<Storage>,
        config: PipelineConfig,
    ) -> Self {
        let classifier = Arc::new(RetryingClassifier::new(Arc::new(llm), config.retry.clone()));
        let dispatcher = ConcurrentDispatcher::new(classifier.clone(), config.task_timeout)
            .with_progress(config.show_progress);

        Self {
            classifier,
            dispatcher,
            aggregator: Aggregator::new(),
            storage,
            config,
        }
    }

    pub async fn analyze(&self, product_name: &str, comments: Vec<String>) -> Result<FeedbackReport> {
        if comments.is_empty() {
            return Err(Error::NoComments);
        }

        // Step 1: Classify every comment
        tracing::info!(
            "Classifying {} comments with {} (concurrency {})",
            comments.len(),
            self.classifier.provider().name(),
            self.config.concurrency_limit
        );
        let records = self
            .dispatcher
            .classify_batch(&comments, self.config.concurrency_limit)
            .await;

        // Step 2: Aggregate
        let statistics = self.aggregator.statistics(&records);
        tracing::info!(
            "Classified {} of {} comments ({} failed)",
            statistics.classified,
            statistics.total,
            statistics.failed
        );

        if statistics.classified == 0 {
            return Err(Error::AllClassificationsFailed(statistics.total));
        }

        // Step 3: Executive summary
        let statistics_text = self.aggregator.statistics_text(&statistics);
        let executive_summary = self.classifier.summarize(&statistics_text).await;

        let entries = comments
            .into_iter()
            .zip(records)
            .map(|(comment, classification)| ClassifiedComment {
                comment,
                classification,
            })
            .collect();

        let report = FeedbackReport {
            product_name: product_name.to_string(),
            generated_at: Utc::now(),
            model: self.classifier.provider().model().to_string(),
            entries,
            statistics,
            executive_summary,
        };

        // Step 4: Save to storage
        if let Some(storage) = &self.storage {
            let id = storage.save_report(&report)?;
            tracing::info!("Report saved to database (run #{})", id);
        }

        Ok(report)
    }

    pub fn storage(&self) -> Option<&Storage> {
        self.storage.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::stub::{record_for, StubProvider, StubReply};
    use crate::llm::{RetryPolicy, SUMMARY_FALLBACK};
    use crate::models::{Category, ClassificationRecord, Sentiment};
    use std::time::Duration;

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            concurrency_limit: 2,
            task_timeout: Duration::from_secs(5),
            retry: RetryPolicy {
                max_attempts: 3,
                backoff: Duration::from_millis(1),
            },
            show_progress: false,
        }
    }

    fn input() -> Vec<String> {
        vec![
            "Great app!".to_string(),
            "Crashes on launch".to_string(),
            "Needs dark mode".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_full_run_persists_report() {
        let stub = StubProvider::deterministic().with_summary("Tendência positiva.");
        let storage = Storage::in_memory().unwrap();
        let pipeline = FeedbackPipeline::new(stub, Some(storage), test_config());

        let report = pipeline.analyze("Meu App", input()).await.unwrap();

        assert_eq!(report.product_name, "Meu App");
        assert_eq!(report.model, "stub-model");
        assert_eq!(report.executive_summary, "Tendência positiva.");
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.entries[1].comment, "Crashes on launch");
        assert_eq!(report.entries[1].classification.category, Category::Bug);
        assert_eq!(report.statistics.classified, 3);

        let stored = pipeline.storage().unwrap().list_reports().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].total, 3);
    }

    #[tokio::test]
    async fn test_partial_failure_and_summary_fallback() {
        let stub = StubProvider::new(|comment| {
            if comment.starts_with("Crashes") {
                StubReply::Fail
            } else {
                StubReply::Record(record_for(comment))
            }
        });
        let pipeline = FeedbackPipeline::new(stub, None, test_config());

        let report = pipeline.analyze("App", input()).await.unwrap();

        assert_eq!(report.entries[1].classification, ClassificationRecord::error());
        assert_eq!(report.entries[0].classification.sentiment, Sentiment::Positive);
        assert_eq!(report.statistics.failed, 1);
        assert_eq!(report.executive_summary, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_all_failed_is_an_error() {
        let pipeline = FeedbackPipeline::new(StubProvider::new(|_| StubReply::Fail), None, test_config());

        let err = pipeline.analyze("App", input()).await.unwrap_err();
        assert!(matches!(err, Error::AllClassificationsFailed(3)));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let pipeline = FeedbackPipeline::new(StubProvider::deterministic(), None, test_config());

        let err = pipeline.analyze("App", Vec::new()).await.unwrap_err();
        assert!(matches!(err, Error::NoComments));
    }
}
