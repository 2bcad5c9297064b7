pub mod category;
pub mod custom_metric;
pub mod loaders;
pub mod metric;
pub mod part;
pub mod snapshot;

pub use category::Category;
pub use custom_metric::CustomMetricDefinition;
pub use loaders::{load_custom_metrics, parse_custom_metrics};
pub use metric::{Attachment, FormField, MetricEntry, MetricRecord, MetricShape, MetricValue};
pub use part::{Disposition, SubmissionPart};
pub use snapshot::{DuplicatePolicy, MetricBucket, MetricsSnapshot, SnapshotBuilder};
