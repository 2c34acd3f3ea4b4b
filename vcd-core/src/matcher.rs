//! Links test cases to the requirements they declare
//!
//! Matching is requirement driven: a test case is linked to every requirement
//! whose identifier appears in its `requirement_ids`. Identifiers that match
//! no requirement are dropped without notice.

use std::sync::Arc;

use crate::logging::{LogSink, Logger};
use crate::models::{Requirement, TestCase};

pub struct MatchMaker {
    log: Logger,
}

impl Default for MatchMaker {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchMaker {
    pub fn new() -> Self {
        Self {
            log: Logger::new("vcd::matcher"),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log = self.log.with_sink(sink);
        self
    }

    /// Appends each matching test case to `Requirement::test_cases`
    ///
    /// Links are only ever appended, so matching the same sets twice links
    /// every pair twice. Returns the number of links added by this call.
    pub fn match_requirements(
        &self,
        requirements: &mut [Requirement],
        test_cases: &[Arc<TestCase>],
    ) -> usize {
        let mut links = 0;

        for requirement in requirements.iter_mut() {
            for test_case in test_cases {
                if test_case.verifies(&requirement.identifier) {
                    self.log.debug(format!(
                        "TestCase {} matched to requirement {}",
                        test_case.full_name.as_deref().unwrap_or_default(),
                        requirement.identifier
                    ));

                    requirement.test_cases.push(Arc::clone(test_case));
                    links += 1;
                }
            }
        }

        links
    }
}

/// Test cases that are not linked to any of the requirements
pub fn orphans<'a>(
    requirements: &[Requirement],
    test_cases: &'a [Arc<TestCase>],
) -> Vec<&'a Arc<TestCase>> {
    test_cases
        .iter()
        .filter(|&tc| {
            !requirements
                .iter()
                .any(|req| req.test_cases.iter().any(|linked| Arc::ptr_eq(linked, tc)))
        })
        .collect()
}
