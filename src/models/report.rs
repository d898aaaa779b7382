use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::{Category, ClassifiedComment, Sentiment};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeedbackStatistics {
    pub total: usize,
    pub classified: usize,
    pub failed: usize,
    pub sentiments: BTreeMap<Sentiment, usize>,
    pub categories: BTreeMap<Category, usize>,
}

impl FeedbackStatistics {
    pub fn sentiment_count(&self, sentiment: Sentiment) -> usize {
        self.sentiments.get(&sentiment).copied().unwrap_or(0)
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    /// Share of classified comments, 0.0 when nothing was classified.
    pub fn percentage(&self, count: usize) -> f64 {
        if self.classified == 0 {
            return 0.0;
        }
        count as f64 / self.classified as f64 * 100.0
    }

    pub fn top_category(&self) -> Option<Category> {
        // Ties resolve to the first category in enum order
        self.categories
            .iter()
            .filter(|(_, count)| **count > 0)
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(category, _)| *category)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub product_name: String,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub entries: Vec<ClassifiedComment>,
    pub statistics: FeedbackStatistics,
    pub executive_summary: String,
}

/// Row returned when listing stored analysis runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRunSummary {
    pub id: i64,
    pub product_name: String,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub failed: usize,
}
