use std::fmt;
use std::sync::Arc;

/// A single executed test, as read from a result file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    /// Short name of the test method (not unique)
    pub name: Option<String>,
    /// Fully qualified name, used as the display key in the report
    pub full_name: Option<String>,
    /// Human readable description
    pub description: Option<String>,
    /// Outcome as reported by the test runner, e.g. "Passed" or "Failed"
    pub result: Option<String>,
    /// Identifiers of the requirements this test claims to verify
    pub requirement_ids: Vec<String>,
}

impl TestCase {
    /// Returns true if this test declares the given requirement identifier
    pub fn verifies(&self, identifier: &str) -> bool {
        self.requirement_ids.iter().any(|id| id == identifier)
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.full_name.as_deref().unwrap_or_default(),
            self.result.as_deref().unwrap_or_default()
        )
    }
}

/// A requirement that needs to be verified by one or more test cases
#[derive(Debug, Clone, Default)]
pub struct Requirement {
    /// Human identifier, e.g. "REQ-01"; always trimmed
    pub identifier: String,
    /// Requirement text; empty when no text column is configured
    pub text: String,
    /// Test cases linked by the match maker, in matching order
    pub test_cases: Vec<Arc<TestCase>>,
}

impl Requirement {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            text: text.into(),
            test_cases: Vec::new(),
        }
    }

    /// Returns true if at least one test case has been linked
    pub fn is_verified(&self) -> bool {
        !self.test_cases.is_empty()
    }
}
