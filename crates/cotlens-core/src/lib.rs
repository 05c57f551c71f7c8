// cotlens Core - metrics, aggregation and comparison for CoT compression runs
//
// Everything here is synchronous and batch-oriented: load a file, compute,
// hand the result back to the caller for printing or serialization.

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod csv_io;
pub mod error;
pub mod metrics;
pub mod predictions;
pub mod side_by_side;
pub mod types;

// Re-export core types
pub use aggregate::{LabeledRecord, RunTable};
pub use compare::{compare, percent_change, ComparisonResult, RunSnapshot, RunStats};
pub use config::{CotConfig, SideBySideConfig};
pub use csv_io::{read_instrumentation, write_instrumentation, write_summary};
pub use error::{CotError, CotResult};
pub use metrics::{find_metrics, load_metrics, DEFAULT_METRICS_PATTERN};
pub use predictions::{detect_truncation, load_predictions, locate_predictions, word_count};
pub use side_by_side::{load_run_outputs, sample_common};
pub use types::{ExampleId, PredictionRecord, RunMetrics, RunSummary};
