use clap::{ArgAction, Parser};
use std::path::PathBuf;

use vcd_core::ReportKind;

#[derive(Parser, Debug)]
#[clap(author, version, about = "VCD Generator - links test results to requirements")]
pub struct Cli {
    /// Suppress the logo
    #[clap(long)]
    pub no_logo: bool,

    /// Path to a YAML config file with defaults for the options below
    #[clap(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// The spreadsheet file that contains the requirements that need to be verified
    #[clap(long, short = 'r', alias = "rf")]
    pub requirements_file: Option<PathBuf>,

    /// Name of the sheet that contains the requirements (defaults to the first sheet)
    #[clap(long)]
    pub sheet: Option<String>,

    /// Header of the requirement identifier column (defaults to the first used column)
    #[clap(long)]
    pub id_column: Option<String>,

    /// Header of the requirement text column (text is left empty when omitted)
    #[clap(long)]
    pub text_column: Option<String>,

    /// The directory that contains the test result files, this directory is processed recursively
    #[clap(long, short = 's', alias = "sd")]
    pub source_directory: Option<PathBuf>,

    /// The path to the report file
    #[clap(long, short = 'o')]
    pub output_report: Option<PathBuf>,

    /// Report kind (spreadsheet, html)
    #[clap(long, value_parser = parse_report_kind)]
    pub report_kind: Option<ReportKind>,

    /// Skip result files that cannot be parsed instead of failing
    #[clap(long)]
    pub skip_malformed: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_report_kind(s: &str) -> Result<ReportKind, String> {
    s.parse()
}
