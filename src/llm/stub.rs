//! Counting test double for [`LLMProvider`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::error::{Error, Result};
use crate::llm::provider::LLMProvider;
use crate::models::{Category, ClassificationRecord, Sentiment};

pub enum StubReply {
    Record(ClassificationRecord),
    Fail,
    Panic,
    Delayed(Duration, Box<StubReply>),
}

impl StubReply {
    pub fn delayed(delay: Duration, reply: StubReply) -> Self {
        StubReply::Delayed(delay, Box::new(reply))
    }
}

type ReplyFn = Box<dyn Fn(&str, usize) -> StubReply + Send + Sync>;

pub struct StubProvider {
    reply: ReplyFn,
    summary: Option<String>,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl StubProvider {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&str) -> StubReply + Send + Sync + 'static,
    {
        Self::with_calls(move |comment, _| reply(comment))
    }

    /// Reply function also receives the zero-based call number.
    pub fn with_calls<F>(reply: F) -> Self
    where
        F: Fn(&str, usize) -> StubReply + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            summary: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn deterministic() -> Self {
        Self::new(|comment| StubReply::Record(record_for(comment)))
    }

    pub fn failing_first(failures: usize) -> Self {
        Self::with_calls(move |comment, call| {
            if call < failures {
                StubReply::Fail
            } else {
                StubReply::Record(record_for(comment))
            }
        })
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }
}

/// Fixed classification derived from the comment text.
pub fn record_for(comment: &str) -> ClassificationRecord {
    let lower = comment.to_lowercase();
    let (sentiment, category) = if lower.contains("crash") || lower.contains("trava") {
        (Sentiment::Negative, Category::Bug)
    } else if lower.contains("dark mode") {
        (Sentiment::Neutral, Category::Suggestion)
    } else if lower.contains("button") || lower.contains("botão") {
        (Sentiment::Negative, Category::UiUx)
    } else {
        (Sentiment::Positive, Category::Suggestion)
    };
    ClassificationRecord::new(sentiment, category, format!("Resumo: {}", comment))
}

struct InFlightGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> InFlightGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize, max_in_flight: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LLMProvider for StubProvider {
    async fn classify_comment(&self, comment: &str) -> Result<ClassificationRecord> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard::enter(&self.in_flight, &self.max_in_flight);

        let mut reply = (self.reply)(comment, call);
        let reply = loop {
            match reply {
                StubReply::Delayed(delay, inner) => {
                    sleep(delay).await;
                    reply = *inner;
                }
                other => break other,
            }
        };

        match reply {
            StubReply::Record(record) => Ok(record),
            StubReply::Fail => Err(Error::ParseError("stub failure".to_string())),
            StubReply::Panic => panic!("stub provider panicked"),
            StubReply::Delayed(..) => unreachable!(),
        }
    }

    async fn generate_summary(&self, _statistics: &str) -> Result<String> {
        self.summary
            .clone()
            .ok_or_else(|| Error::LLMApi("no summary configured".to_string()))
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    fn name(&self) -> &str {
        "Stub"
    }
}
