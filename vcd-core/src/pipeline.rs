//! Runs the four VCD stages in sequence

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::logging::{null_sink, LogSink, Logger};
use crate::matcher::{self, MatchMaker};
use crate::report::{ReportGenerator, ReportKind};
use crate::requirements::RequirementsReader;
use crate::results::{SkippedFile, TestResultReader};

/// Everything a single VCD run needs
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub requirements_file: PathBuf,
    pub sheet: Option<String>,
    pub identifier_column: Option<String>,
    pub text_column: Option<String>,
    pub source_directory: PathBuf,
    pub output_report: PathBuf,
    pub report_kind: ReportKind,
    /// Skip malformed result files instead of failing the run
    pub skip_malformed: bool,
}

/// What a run produced, for display by the caller
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub requirements: usize,
    pub test_cases: usize,
    pub links: usize,
    /// Requirements without any linked test case
    pub unverified: Vec<String>,
    /// Full names of test cases linked to no requirement
    pub orphans: Vec<String>,
    pub skipped: Vec<SkippedFile>,
    pub output_report: PathBuf,
}

pub struct Pipeline {
    options: PipelineOptions,
    sink: Arc<dyn LogSink>,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            sink: null_sink(),
        }
    }

    /// Sink handed to every stage
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn run(&self) -> Result<RunSummary> {
        let opts = &self.options;
        let log = Logger::new("vcd::pipeline").with_sink(self.sink.clone());

        let mut requirements = RequirementsReader::new()
            .with_sink(self.sink.clone())
            .read(
                &opts.requirements_file,
                opts.sheet.as_deref(),
                opts.identifier_column.as_deref(),
                opts.text_column.as_deref(),
            )?;
        log.info(format!("A total of {} requirements were read", requirements.len()));

        let reader = TestResultReader::new().with_sink(self.sink.clone());
        let (test_cases, skipped) = if opts.skip_malformed {
            let outcome = reader.read_lenient(&opts.source_directory)?;
            (outcome.test_cases, outcome.skipped)
        } else {
            (reader.read(&opts.source_directory)?, Vec::new())
        };
        let test_cases: Vec<_> = test_cases.into_iter().map(Arc::new).collect();
        log.info(format!("A total of {} test cases were read", test_cases.len()));

        let links = MatchMaker::new()
            .with_sink(self.sink.clone())
            .match_requirements(&mut requirements, &test_cases);
        log.info(format!(
            "Matched {} requirements to {} test cases ({} links)",
            requirements.len(),
            test_cases.len(),
            links
        ));

        ReportGenerator::new()
            .with_sink(self.sink.clone())
            .generate(&requirements, &opts.output_report, opts.report_kind)?;

        let orphans = matcher::orphans(&requirements, &test_cases)
            .into_iter()
            .map(|tc| tc.full_name.clone().unwrap_or_default())
            .collect();
        let unverified = requirements
            .iter()
            .filter(|r| !r.is_verified())
            .map(|r| r.identifier.clone())
            .collect();

        Ok(RunSummary {
            requirements: requirements.len(),
            test_cases: test_cases.len(),
            links,
            unverified,
            orphans,
            skipped,
            output_report: opts.output_report.clone(),
        })
    }
}
