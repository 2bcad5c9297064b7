pub mod catalog;
pub mod json_renderer;
pub mod metrics_processor;
pub mod submission_parser;
pub mod support_message;

pub use catalog::{CustomMetricProvider, InMemoryCatalog};
pub use metrics_processor::MetricsProcessor;
pub use submission_parser::SubmissionParser;
pub use support_message::SupportMessage;
