//! Three-state compliance classification.

use crate::models::ComplianceStatus;

/// Map a (current value, ceiling) pair to a compliance status.
///
/// `current >= limit` is a violation; `current >= warning_ratio * limit`
/// a warning; anything below is compliant.
pub fn classify(current: f64, limit: f64, warning_ratio: f64) -> ComplianceStatus {
    if current >= limit {
        ComplianceStatus::Violation
    } else if current >= warning_ratio * limit {
        ComplianceStatus::Warning
    } else {
        ComplianceStatus::Compliant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DEFAULT_WARNING_RATIO;

    #[test]
    fn test_zero_against_positive_limit_is_compliant() {
        assert_eq!(
            classify(0.0, 100.0, DEFAULT_WARNING_RATIO),
            ComplianceStatus::Compliant
        );
    }

    #[test]
    fn test_at_limit_is_violation() {
        assert_eq!(
            classify(100.0, 100.0, DEFAULT_WARNING_RATIO),
            ComplianceStatus::Violation
        );
        assert_eq!(
            classify(130.0, 100.0, DEFAULT_WARNING_RATIO),
            ComplianceStatus::Violation
        );
    }

    #[test]
    fn test_warning_band() {
        assert_eq!(
            classify(90.0, 100.0, DEFAULT_WARNING_RATIO),
            ComplianceStatus::Warning
        );
        assert_eq!(
            classify(99.9, 100.0, DEFAULT_WARNING_RATIO),
            ComplianceStatus::Warning
        );
        assert_eq!(
            classify(89.9, 100.0, DEFAULT_WARNING_RATIO),
            ComplianceStatus::Compliant
        );
    }
}
