pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod requirements;
pub mod results;

// Re-export commonly used types
pub use config::{user_config_path, VcdConfig, CONFIG_ENV_VAR, LOCAL_CONFIG_FILE};
pub use error::{ErrorKind, Result, VcdError};
pub use logging::{LogFacadeSink, LogSink, MemorySink, NullSink};
pub use matcher::{orphans, MatchMaker};
pub use models::{Requirement, TestCase};
pub use pipeline::{Pipeline, PipelineOptions, RunSummary};
pub use report::{ReportGenerator, ReportKind};
pub use requirements::RequirementsReader;
pub use results::{ScanOutcome, SkippedFile, TestResultReader};
