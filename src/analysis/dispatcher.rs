use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::llm::RetryingClassifier;
use crate::models::ClassificationRecord;

/// Fans a batch of comments out to at most `concurrency_limit` running tasks.
///
/// Output position `i` always holds the record for input position `i`. Slots
/// start out as the error sentinel and are overwritten as tasks complete, so
/// a timed-out or panicked task simply leaves the sentinel behind.
pub struct ConcurrentDispatcher {
    classifier: Arc<RetryingClassifier>,
    task_timeout: Duration,
    show_progress: bool,
}

impl ConcurrentDispatcher {
    pub fn new(classifier: Arc<RetryingClassifier>, task_timeout: Duration) -> Self {
        Self {
            classifier,
            task_timeout,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn classify_batch(
        &self,
        comments: &[String],
        concurrency_limit: usize,
    ) -> Vec<ClassificationRecord> {
        let mut results = vec![ClassificationRecord::error(); comments.len()];
        if comments.is_empty() {
            return results;
        }

        // More permits than comments would never be used
        let permits = concurrency_limit.clamp(1, comments.len());
        let semaphore = Arc::new(Semaphore::new(permits));
        let pb = self.progress_bar(comments.len());

        let mut pending = FuturesUnordered::new();

        for (index, comment) in comments.iter().enumerate() {
            let classifier = self.classifier.clone();
            let sem = semaphore.clone();
            let comment = comment.clone();
            let task_timeout = self.task_timeout;

            let handle = tokio::spawn(async move {
                let Ok(_permit) = sem.acquire_owned().await else {
                    return ClassificationRecord::error();
                };

                match timeout(task_timeout, classifier.classify(&comment)).await {
                    Ok(record) => record,
                    Err(_) => {
                        tracing::warn!(
                            "Classification of comment #{} timed out after {:?}",
                            index,
                            task_timeout
                        );
                        ClassificationRecord::error()
                    }
                }
            });

            pending.push(async move { (index, handle.await) });
        }

        let total = comments.len();
        let mut completed = 0;

        while let Some((index, outcome)) = pending.next().await {
            match outcome {
                Ok(record) => results[index] = record,
                Err(e) => {
                    tracing::error!("Classification task #{} failed: {}", index, e);
                }
            }

            completed += 1;
            pb.inc(1);
            tracing::debug!("Classified {}/{} comments", completed, total);
        }

        pb.finish_with_message("Classification complete");
        results
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} comments")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
