pub mod aggregator;
pub mod classifier;
pub mod column_resolver;
pub mod page_aligner;
pub mod report_composer;

pub use aggregator::Aggregator;
pub use classifier::{ClassificationRules, Classifier};
pub use column_resolver::ColumnResolver;
pub use page_aligner::PageAligner;
pub use report_composer::ReportComposer;
