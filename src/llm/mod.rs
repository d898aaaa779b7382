pub mod provider;
pub mod gemini;
pub mod prompts;
pub mod parser;
pub mod retry;

#[cfg(test)]
pub(crate) mod stub;

pub use provider::LLMProvider;
pub use gemini::GeminiProvider;
pub use prompts::ClassificationRequest;
pub use parser::parse_classification;
pub use retry::{RetryPolicy, RetryingClassifier, SUMMARY_FALLBACK};
