//! Small path helpers shared across the scanner.

/// Path fragments that mark a file as test or fixture code.
const TEST_INDICATORS: &[&str] = &[
    "test",
    "_test",
    "test_",
    ".test.",
    "_spec",
    ".spec.",
    "mock",
    "fake",
    "dummy",
    "example",
    "sample",
    "demo",
    "fixture",
    "__tests__",
    "tests/",
    "spec/",
];

/// Whether a path looks like test or fixture code. Secrets found in test
/// paths get reduced confidence and exposure scores.
#[must_use]
pub fn is_test_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    TEST_INDICATORS.iter().any(|ind| lower.contains(ind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_detected() {
        assert!(is_test_path("tests/integration.py"));
        assert!(is_test_path("src/__tests__/auth.js"));
        assert!(is_test_path("src/auth.test.ts"));
        assert!(is_test_path("fixtures/config.yaml"));
        assert!(is_test_path("MockService.java"));
    }

    #[test]
    fn production_paths_not_detected() {
        assert!(!is_test_path("src/auth.py"));
        assert!(!is_test_path("config/production.yaml"));
        assert!(!is_test_path("deploy/main.tf"));
    }
}
