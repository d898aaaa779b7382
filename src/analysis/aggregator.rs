use std::fmt::Write;

use crate::models::{Category, ClassificationRecord, FeedbackStatistics, Sentiment};

pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn statistics(&self, records: &[ClassificationRecord]) -> FeedbackStatistics {
        let mut stats = FeedbackStatistics {
            total: records.len(),
            ..Default::default()
        };

        for sentiment in Sentiment::CLASSIFIED {
            stats.sentiments.insert(sentiment, 0);
        }
        for category in Category::CLASSIFIED {
            stats.categories.insert(category, 0);
        }

        for record in records {
            if record.is_error() {
                stats.failed += 1;
                continue;
            }

            stats.classified += 1;
            *stats.sentiments.entry(record.sentiment).or_insert(0) += 1;
            *stats.categories.entry(record.category).or_insert(0) += 1;
        }

        stats
    }

    /// Plain-text digest fed to the executive summary prompt.
    pub fn statistics_text(&self, stats: &FeedbackStatistics) -> String {
        let mut text = String::new();

        let _ = writeln!(text, "Total de comentários: {}", stats.total);
        let _ = writeln!(text, "Comentários classificados: {}", stats.classified);
        if stats.failed > 0 {
            let _ = writeln!(text, "Falhas de processamento: {}", stats.failed);
        }

        text.push_str("\nSentimentos:\n");
        for (sentiment, count) in &stats.sentiments {
            let _ = writeln!(
                text,
                "- {}: {} ({:.1}%)",
                sentiment,
                count,
                stats.percentage(*count)
            );
        }

        text.push_str("\nCategorias:\n");
        for (category, count) in &stats.categories {
            let _ = writeln!(
                text,
                "- {}: {} ({:.1}%)",
                category,
                count,
                stats.percentage(*count)
            );
        }

        if let Some(top) = stats.top_category() {
            let _ = writeln!(text, "\nCategoria mais frequente: {}", top);
        }

        text
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
