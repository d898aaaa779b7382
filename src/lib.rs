pub mod config;
pub mod error;
pub mod models;
pub mod llm;
pub mod analysis;
pub mod storage;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use llm::{GeminiProvider, LLMProvider, RetryPolicy, RetryingClassifier};
pub use analysis::{ConcurrentDispatcher, FeedbackPipeline};
pub use storage::Storage;
