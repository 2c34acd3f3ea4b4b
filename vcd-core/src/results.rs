//! Reads NUnit 3 style test result files
//!
//! Every `*.Result.xml` file below the source directory is parsed, and each
//! `test-case` element becomes a [`TestCase`]. Requirement links are declared
//! by the tests themselves through `REQUIREMENT-ID` properties.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::error::{Result, VcdError};
use crate::logging::{LogSink, Logger};
use crate::models::TestCase;

/// Suffix of the files produced by the NUnit XML test logger
pub const RESULT_FILE_SUFFIX: &str = ".Result.xml";

const TEST_CASE_TAG: &str = "test-case";
const PROPERTIES_TAG: &str = "properties";
const PROPERTY_TAG: &str = "property";
const DESCRIPTION_PROPERTY: &str = "Description";
const REQUIREMENT_ID_PROPERTY: &str = "REQUIREMENT-ID";

/// A result file that was left out of a lenient scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of [`TestResultReader::read_lenient`]
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub test_cases: Vec<TestCase>,
    pub skipped: Vec<SkippedFile>,
}

pub struct TestResultReader {
    log: Logger,
}

impl Default for TestResultReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TestResultReader {
    pub fn new() -> Self {
        Self {
            log: Logger::new("vcd::results"),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = self.log.with_sink(sink);
        self
    }

    /// Reads all test cases below `dir`
    ///
    /// A single unreadable or malformed result file fails the whole read.
    pub fn read<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<TestCase>> {
        let files = self.result_files(dir.as_ref())?;

        let mut test_cases = Vec::new();
        for file in &files {
            test_cases.extend(self.read_file(file)?);
        }

        Ok(test_cases)
    }

    /// Reads all test cases below `dir`, skipping result files that cannot be
    /// read or parsed
    ///
    /// Only a missing or unwalkable directory is an error.
    pub fn read_lenient<P: AsRef<Path>>(&self, dir: P) -> Result<ScanOutcome> {
        let files = self.result_files(dir.as_ref())?;

        let mut outcome = ScanOutcome::default();
        for file in files {
            match self.read_file(&file) {
                Ok(test_cases) => outcome.test_cases.extend(test_cases),
                Err(e) => {
                    self.log.warn(format!("skipping {}: {}", file.display(), e));
                    outcome.skipped.push(SkippedFile {
                        path: file,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// Lists the result files below `dir` in lexicographic path order
    pub fn result_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(VcdError::NotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| VcdError::Io {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                source: e.into(),
            })?;

            if entry.file_type().is_file() && is_result_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        self.log.debug(format!("{} Result files found", files.len()));
        Ok(files)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<TestCase>> {
        self.log.debug(format!("processing: {}", path.display()));

        let content = fs::read_to_string(path).map_err(|source| VcdError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let test_cases = parse_test_cases(&content).map_err(|e| VcdError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        self.log.debug(format!(
            "created a total of {} TestCase objects from {}",
            test_cases.len(),
            path.display()
        ));

        Ok(test_cases)
    }
}

fn is_result_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(RESULT_FILE_SUFFIX))
        .unwrap_or(false)
}

/// Extracts every `test-case` element of a result document, in document order
pub fn parse_test_cases(xml: &str) -> std::result::Result<Vec<TestCase>, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;

    let test_cases = doc
        .descendants()
        .filter(|node| node.has_tag_name(TEST_CASE_TAG))
        .map(|node| {
            let mut test_case = TestCase {
                name: node.attribute("name").map(str::to_string),
                full_name: node.attribute("fullname").map(str::to_string),
                result: node.attribute("result").map(str::to_string),
                ..Default::default()
            };

            let properties = node
                .children()
                .filter(|child| child.has_tag_name(PROPERTIES_TAG))
                .flat_map(|props| props.descendants())
                .filter(|prop| prop.has_tag_name(PROPERTY_TAG));

            for property in properties {
                let value = property.attribute("value");
                match property.attribute("name") {
                    Some(DESCRIPTION_PROPERTY) => {
                        test_case.description = value.map(str::to_string);
                    }
                    Some(REQUIREMENT_ID_PROPERTY) => {
                        if let Some(id) = value.filter(|v| !v.is_empty()) {
                            test_case.requirement_ids.push(id.to_string());
                        }
                    }
                    _ => {}
                }
            }

            test_case
        })
        .collect();

    Ok(test_cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::logging::MemorySink;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<test-run id="2" testcasecount="2" result="Passed">
  <test-suite type="Assembly" name="VCD.Generator.Tests.dll">
    <test-suite type="TestFixture" name="TestResultReaderTestFixture">
      <test-case id="1001" name="Verify_that_Read_throws_exception" fullname="Tests.TestResultReaderTestFixture.Verify_that_Read_throws_exception" result="Passed">
        <properties>
          <property name="Description" value="Verifies that Read throws" />
          <property name="REQUIREMENT-ID" value="REQ-01" />
          <property name="REQUIREMENT-ID" value="" />
          <property name="REQUIREMENT-ID" value="REQ-03" />
          <property name="Category" value="Unit" />
        </properties>
      </test-case>
      <test-case id="1002" name="Verify_without_requirements" fullname="Tests.TestResultReaderTestFixture.Verify_without_requirements" result="Failed" />
    </test-suite>
  </test-suite>
</test-run>"#;

    #[test]
    fn test_parse_test_cases() {
        let tcs = parse_test_cases(SAMPLE).unwrap();
        assert_eq!(tcs.len(), 2);

        let first = &tcs[0];
        assert_eq!(first.name.as_deref(), Some("Verify_that_Read_throws_exception"));
        assert_eq!(
            first.full_name.as_deref(),
            Some("Tests.TestResultReaderTestFixture.Verify_that_Read_throws_exception")
        );
        assert_eq!(first.result.as_deref(), Some("Passed"));
        assert_eq!(first.description.as_deref(), Some("Verifies that Read throws"));
        assert_eq!(first.requirement_ids, vec!["REQ-01", "REQ-03"]);

        let second = &tcs[1];
        assert_eq!(second.result.as_deref(), Some("Failed"));
        assert!(second.description.is_none());
        assert!(second.requirement_ids.is_empty());
    }

    #[test]
    fn test_missing_attributes_are_none() {
        let tcs = parse_test_cases(r#"<test-run><test-case /></test-run>"#).unwrap();
        assert_eq!(tcs.len(), 1);
        assert!(tcs[0].name.is_none());
        assert!(tcs[0].full_name.is_none());
        assert!(tcs[0].result.is_none());
    }

    #[test]
    fn test_duplicate_requirement_ids_are_kept() {
        let xml = r#"<test-run><test-case fullname="A"><properties>
            <property name="REQUIREMENT-ID" value="REQ-01" />
            <property name="REQUIREMENT-ID" value="REQ-01" />
        </properties></test-case></test-run>"#;
        let tcs = parse_test_cases(xml).unwrap();
        assert_eq!(tcs[0].requirement_ids, vec!["REQ-01", "REQ-01"]);
    }

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn single_case(full_name: &str) -> String {
        format!(
            r#"<test-run><test-case name="t" fullname="{}" result="Passed" /></test-run>"#,
            full_name
        )
    }

    #[test]
    fn test_read_recurses_in_path_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b/deep/nested/c.Result.xml", &single_case("C"));
        write(dir.path(), "a.Result.xml", &single_case("A"));
        write(dir.path(), "b/b.Result.xml", &single_case("B"));
        write(dir.path(), "b/ignored.xml", &single_case("X"));
        write(dir.path(), "b/notes.txt", "not xml");

        let tcs = TestResultReader::new().read(dir.path()).unwrap();
        let names: Vec<_> = tcs.iter().map(|t| t.full_name.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_read_empty_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sub/other.xml", &single_case("X"));

        let tcs = TestResultReader::new().read(dir.path()).unwrap();
        assert!(tcs.is_empty());
    }

    #[test]
    fn test_read_missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = TestResultReader::new()
            .read(dir.path().join("missing"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_malformed_file_fails_whole_read() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.Result.xml", &single_case("A"));
        write(dir.path(), "b.Result.xml", "<test-run><test-case>");

        let err = TestResultReader::new().read(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("b.Result.xml"));
    }

    #[test]
    fn test_lenient_read_skips_malformed_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.Result.xml", &single_case("A"));
        write(dir.path(), "b.Result.xml", "<test-run><test-case>");
        write(dir.path(), "c.Result.xml", &single_case("C"));

        let sink = Arc::new(MemorySink::new());
        let outcome = TestResultReader::new()
            .with_sink(sink.clone())
            .read_lenient(dir.path())
            .unwrap();

        assert_eq!(outcome.test_cases.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].path.ends_with("b.Result.xml"));
        assert!(sink.contains(log::Level::Warn, "b.Result.xml"));
    }
}
