//! Conformance report types: results, severity levels, and report aggregation.

/// Severity level of a conformance check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The check identified a warning (non-blocking).
    Warning,
    /// The check failed (blocks conformance).
    Failure,
}

impl Severity {
    /// Tag printed in front of each report line.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// A single conformance check result.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Check identifier, e.g. `"order/antisymmetry"`.
    pub validator: String,
    /// Catalog name of the lattice the check ran on.
    pub lattice: String,
    /// Human-readable message describing the outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Optional additional detail lines.
    pub details: Vec<String>,
}

impl TestResult {
    fn new(
        validator: impl Into<String>,
        lattice: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            validator: validator.into(),
            lattice: lattice.into(),
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// Creates a passing result.
    pub fn pass(
        validator: impl Into<String>,
        lattice: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(validator, lattice, message, Severity::Pass)
    }

    /// Creates a failure result.
    pub fn fail(
        validator: impl Into<String>,
        lattice: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(validator, lattice, message, Severity::Failure)
    }

    /// Creates a failure result with additional detail lines.
    pub fn fail_with_details(
        validator: impl Into<String>,
        lattice: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            details,
            ..Self::new(validator, lattice, message, Severity::Failure)
        }
    }

    /// Creates a warning result.
    pub fn warn(
        validator: impl Into<String>,
        lattice: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(validator, lattice, message, Severity::Warning)
    }

    /// Returns true if this result represents a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Aggregated conformance report from all validators.
#[derive(Debug, Default)]
pub struct ConformanceReport {
    /// All individual results across all lattices and validators.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Extends this report with results from another report.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Returns the number of results with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// Returns the count of failed checks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    /// Returns true if all checks passed (no failures).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_fail_the_report() {
        let mut report = ConformanceReport::new();
        report.push(TestResult::pass("order/antisymmetry", "2-2", "ok"));
        report.push(TestResult::warn("layout/extents", "2-2", "flat"));
        assert!(report.all_passed());

        let mut other = ConformanceReport::new();
        other.push(TestResult::fail_with_details(
            "bounds/primary",
            "2-2",
            "drift",
            vec!["3: a*b".to_string()],
        ));
        report.extend(other);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.results[2].details, ["3: a*b"]);
        assert!(!report.all_passed());
    }
}
