mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use vcd_core::{LogFacadeSink, Pipeline, PipelineOptions, RunSummary, VcdConfig};

use crate::cli::Cli;

const DEFAULT_OUTPUT_REPORT: &str = "VCD-report.xlsx";

const LOGO: &str = r"
 __     __ ____  ____     ____                           _
 \ \   / // ___||  _ \   / ___|  ___  _ __    ___  _ __ | |_  ___   _ __
  \ \ / /| |    | | | | | |  _  / _ \| '_ \  / _ \| '__|| __|/ _ \ | '__|
   \ V / | |___ | |_| | | |_| ||  __/| | | ||  __/| |   | |_| (_) || |
    \_/   \____||____/   \____| \___||_| |_| \___||_|    \__|\___/ |_|
";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.no_logo {
        println!("{}", LOGO.blue());
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            log::error!("VCD Generator failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> Result<()> {
    let (config, config_path) = VcdConfig::discover(cli.config.as_deref())?;
    if let Some(path) = &config_path {
        log::info!("using config file {}", path.display());
    }

    let options = resolve_options(cli, config)?;

    if !options.requirements_file.is_file() {
        anyhow::bail!(
            "The specified requirements file does not exist: {}",
            options.requirements_file.display()
        );
    }

    if !options.source_directory.is_dir() {
        anyhow::bail!(
            "The specified test case source directory does not exist: {}",
            options.source_directory.display()
        );
    }

    println!("Reading requirements from {}", options.requirements_file.display());
    println!("Reading test results from {}", options.source_directory.display());

    let summary = Pipeline::new(options)
        .with_sink(Arc::new(LogFacadeSink))
        .run()
        .context("Failed to generate the VCD report")?;

    print_summary(&summary, cli.verbose > 0);

    Ok(())
}

/// Merges command-line values over config values; the command line wins
fn resolve_options(cli: &Cli, config: VcdConfig) -> Result<PipelineOptions> {
    let requirements_file = cli
        .requirements_file
        .clone()
        .or(config.requirements_file)
        .ok_or_else(|| anyhow::anyhow!("--requirements-file is required"))?;

    let source_directory = cli
        .source_directory
        .clone()
        .or(config.source_directory)
        .ok_or_else(|| anyhow::anyhow!("--source-directory is required"))?;

    let output_report = cli
        .output_report
        .clone()
        .or(config.output_report)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_REPORT));

    Ok(PipelineOptions {
        requirements_file,
        sheet: cli.sheet.clone().or(config.sheet),
        identifier_column: cli.id_column.clone().or(config.identifier_column),
        text_column: cli.text_column.clone().or(config.text_column),
        source_directory,
        output_report,
        report_kind: cli.report_kind.or(config.report_kind).unwrap_or_default(),
        skip_malformed: cli.skip_malformed || config.skip_malformed.unwrap_or(false),
    })
}

fn print_summary(summary: &RunSummary, verbose: bool) {
    println!(
        "{} A total of {} requirements were read",
        "LOG:".dimmed(),
        summary.requirements.to_string().bold()
    );
    println!(
        "{} A total of {} test cases were read",
        "LOG:".dimmed(),
        summary.test_cases.to_string().bold()
    );
    println!(
        "{} {} links between requirements and test cases",
        "LOG:".dimmed(),
        summary.links.to_string().bold()
    );

    for skipped in &summary.skipped {
        println!(
            "{} skipped {}: {}",
            "WARN:".yellow(),
            skipped.path.display(),
            skipped.reason
        );
    }

    if !summary.unverified.is_empty() {
        println!(
            "{} {} requirements are not verified by any test case",
            "WARN:".yellow(),
            summary.unverified.len().to_string().bold()
        );
        if verbose {
            for id in &summary.unverified {
                println!("  {}", id);
            }
        }
    }

    if !summary.orphans.is_empty() {
        println!(
            "{} {} test cases do not verify any known requirement",
            "WARN:".yellow(),
            summary.orphans.len().to_string().bold()
        );
        if verbose {
            for name in &summary.orphans {
                println!("  {}", name);
            }
        }
    }

    println!(
        "{} VCD report generated at {}",
        "LOG:".dimmed(),
        summary.output_report.display().to_string().bold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcd_core::ReportKind;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["vcd"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = parse(&["-r", "cli.xlsx", "-s", "cli-results", "--sheet", "CliSheet"]);
        let config = VcdConfig {
            requirements_file: Some(PathBuf::from("config.xlsx")),
            sheet: Some("ConfigSheet".to_string()),
            text_column: Some("Text".to_string()),
            report_kind: Some(ReportKind::Html),
            ..Default::default()
        };

        let options = resolve_options(&cli, config).unwrap();

        assert_eq!(options.requirements_file, PathBuf::from("cli.xlsx"));
        assert_eq!(options.source_directory, PathBuf::from("cli-results"));
        assert_eq!(options.sheet.as_deref(), Some("CliSheet"));
        assert_eq!(options.text_column.as_deref(), Some("Text"));
        assert_eq!(options.report_kind, ReportKind::Html);
    }

    #[test]
    fn test_defaults_without_config() {
        let cli = parse(&["-r", "reqs.xlsx", "-s", "results"]);

        let options = resolve_options(&cli, VcdConfig::default()).unwrap();

        assert_eq!(options.output_report, PathBuf::from(DEFAULT_OUTPUT_REPORT));
        assert_eq!(options.report_kind, ReportKind::Spreadsheet);
        assert!(options.identifier_column.is_none());
        assert!(!options.skip_malformed);
    }

    #[test]
    fn test_missing_required_values() {
        let cli = parse(&["-s", "results"]);
        let err = resolve_options(&cli, VcdConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--requirements-file"));

        let cli = parse(&["-r", "reqs.xlsx"]);
        let err = resolve_options(&cli, VcdConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--source-directory"));
    }

    #[test]
    fn test_skip_malformed_from_config() {
        let cli = parse(&["-r", "reqs.xlsx", "-s", "results"]);
        let config = VcdConfig {
            skip_malformed: Some(true),
            ..Default::default()
        };
        assert!(resolve_options(&cli, config).unwrap().skip_malformed);
    }
}
