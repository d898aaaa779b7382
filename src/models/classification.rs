use serde::{Deserialize, Serialize};

pub const ERROR_SUMMARY: &str = "Erro no processamento.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sentiment {
    #[serde(rename = "Positivo", alias = "Positive")]
    Positive,
    #[serde(rename = "Negativo", alias = "Negative")]
    Negative,
    #[serde(rename = "Neutro", alias = "Neutral")]
    Neutral,
    #[serde(rename = "Erro", alias = "Error")]
    Error,
}

impl Sentiment {
    pub const CLASSIFIED: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Case-insensitive match against the Portuguese labels and their English aliases.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positivo" | "positive" => Some(Sentiment::Positive),
            "negativo" | "negative" => Some(Sentiment::Negative),
            "neutro" | "neutral" => Some(Sentiment::Neutral),
            "erro" | "error" => Some(Sentiment::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positivo"),
            Sentiment::Negative => write!(f, "Negativo"),
            Sentiment::Neutral => write!(f, "Neutro"),
            Sentiment::Error => write!(f, "Erro"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Bug")]
    Bug,
    #[serde(rename = "Sugestão", alias = "Sugestao", alias = "Suggestion")]
    Suggestion,
    #[serde(rename = "UI/UX", alias = "UX", alias = "UI")]
    UiUx,
    #[serde(rename = "Suporte", alias = "Support")]
    Support,
    #[serde(rename = "Erro", alias = "Error")]
    Error,
}

impl Category {
    pub const CLASSIFIED: [Category; 4] = [
        Category::Bug,
        Category::Suggestion,
        Category::UiUx,
        Category::Support,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "bug" => Some(Category::Bug),
            "sugestão" | "sugestao" | "suggestion" => Some(Category::Suggestion),
            "ui/ux" | "ux/ui" | "ui" | "ux" => Some(Category::UiUx),
            "suporte" | "support" => Some(Category::Support),
            "erro" | "error" => Some(Category::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Bug => write!(f, "Bug"),
            Category::Suggestion => write!(f, "Sugestão"),
            Category::UiUx => write!(f, "UI/UX"),
            Category::Support => write!(f, "Suporte"),
            Category::Error => write!(f, "Erro"),
        }
    }
}

/// Result of classifying a single comment. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationRecord {
    pub sentiment: Sentiment,
    pub category: Category,
    pub short_summary: String,
}

impl ClassificationRecord {
    pub fn new(sentiment: Sentiment, category: Category, short_summary: impl Into<String>) -> Self {
        Self {
            sentiment,
            category,
            short_summary: short_summary.into(),
        }
    }

    /// Sentinel substituted for any comment that could not be classified.
    pub fn error() -> Self {
        Self::new(Sentiment::Error, Category::Error, ERROR_SUMMARY)
    }

    pub fn is_error(&self) -> bool {
        self.sentiment == Sentiment::Error || self.category == Category::Error
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedComment {
    pub comment: String,
    pub classification: ClassificationRecord,
}
