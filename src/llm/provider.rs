use async_trait::async_trait;
use crate::error::Result;
use crate::models::ClassificationRecord;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Single classification attempt. Failures are returned, never masked.
    async fn classify_comment(&self, comment: &str) -> Result<ClassificationRecord>;
    async fn generate_summary(&self, statistics: &str) -> Result<String>;
    fn model(&self) -> &str;
    fn name(&self) -> &str;
}
