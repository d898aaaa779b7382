pub mod aggregator;
pub mod dispatcher;
pub mod pipeline;

pub use aggregator::Aggregator;
pub use dispatcher::ConcurrentDispatcher;
pub use pipeline::FeedbackPipeline;
