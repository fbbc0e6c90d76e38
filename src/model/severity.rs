//! Ranked vulnerability severity classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vulnerability severity, ordered from worst to harmless.
///
/// `Clean` is a component-level sentinel meaning "no direct vulnerabilities";
/// it ranks below every real severity and is never produced by the
/// normalizer for an actual vulnerability record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Information,
    Unknown,
    Clean,
}

impl Severity {
    /// Comparison rank; higher is worse.
    #[must_use]
    pub const fn rank(&self) -> i8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Information => 0,
            Self::Unknown => -1,
            Self::Clean => -2,
        }
    }

    /// Lowercase display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Information => "information",
            Self::Unknown => "unknown",
            Self::Clean => "clean",
        }
    }

    /// Parse a rating severity label, case-insensitively.
    ///
    /// `"info"` is folded into `Information`. Returns `None` for labels
    /// outside the recognized set so callers can fall back to the score.
    #[must_use]
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "info" | "information" => Some(Self::Information),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Map a CVSS-style score to a severity by fixed thresholds.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Self::Critical
        } else if score >= 7.0 {
            Self::High
        } else if score >= 4.0 {
            Self::Medium
        } else if score > 0.0 {
            Self::Low
        } else {
            Self::Information
        }
    }

    /// True when this severity outranks `other`
    #[must_use]
    pub const fn outranks(&self, other: &Self) -> bool {
        self.rank() > other.rank()
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Information);
        assert!(Severity::Information > Severity::Unknown);
        assert!(Severity::Unknown > Severity::Clean);
    }

    #[test]
    fn test_parse_label_case_and_aliases() {
        assert_eq!(Severity::parse_label("CRITICAL"), Some(Severity::Critical));
        assert_eq!(Severity::parse_label("Info"), Some(Severity::Information));
        assert_eq!(
            Severity::parse_label("information"),
            Some(Severity::Information)
        );
        assert_eq!(Severity::parse_label("negligible"), None);
    }

    #[test]
    fn test_from_score_thresholds() {
        assert_eq!(Severity::from_score(9.8), Severity::Critical);
        assert_eq!(Severity::from_score(9.0), Severity::Critical);
        assert_eq!(Severity::from_score(8.9), Severity::High);
        assert_eq!(Severity::from_score(7.0), Severity::High);
        assert_eq!(Severity::from_score(4.0), Severity::Medium);
        assert_eq!(Severity::from_score(3.9), Severity::Low);
        assert_eq!(Severity::from_score(0.1), Severity::Low);
        assert_eq!(Severity::from_score(0.0), Severity::Information);
    }
}
