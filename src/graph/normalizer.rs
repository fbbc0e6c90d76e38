//! Rating normalization: one canonical severity per vulnerability.
//!
//! A single vulnerability entry routinely carries several conflicting
//! ratings from different scanners and scoring methodologies. Exactly one
//! severity/score/vector triple survives, chosen by a fixed methodology
//! priority, with a two-tier source ranking breaking ties inside one
//! methodology.

use crate::model::{Severity, Vulnerability};
use crate::parsers::{RawRating, RawVulnerability};
use tracing::warn;

/// Methodology priority, most precise/recent standard first
const METHOD_PRIORITY: [&str; 7] = [
    "CVSSv4", "CVSSv31", "CVSSv3", "CVSSv2", "OWASP", "SSVC", "other",
];

/// Two-tier source ranking: NVD is canonical, unset or probability-only
/// sources rank last, everything else sits in between. Lower is better.
fn source_rank(source: &str) -> u8 {
    let upper = source.to_uppercase();
    if upper == "NVD" {
        0
    } else if upper == "-" || upper == "EPSS" {
        2
    } else {
        1
    }
}

/// Severity/score/vector/source extracted from one rating, if usable
struct RatingCandidate {
    severity: Severity,
    score: f64,
    vector: String,
    source: String,
}

/// A rating is usable if it carries a recognized severity label or a score.
fn extract_candidate(rating: &RawRating) -> Option<RatingCandidate> {
    let vector = rating.vector.clone().unwrap_or_else(|| "-".to_string());
    let source = rating
        .source
        .as_ref()
        .and_then(|s| s.name.clone())
        .unwrap_or_else(|| "-".to_string());

    if let Some(severity) = rating.severity.as_deref().and_then(Severity::parse_label) {
        return Some(RatingCandidate {
            severity,
            score: rating.score.unwrap_or(0.0),
            vector,
            source,
        });
    }
    rating.score.map(|score| RatingCandidate {
        severity: Severity::from_score(score),
        score,
        vector,
        source,
    })
}

/// Pick the most authoritative rating and produce the canonical record.
///
/// The highest-priority methodology with at least one usable rating wins;
/// within it, the best-ranked source wins, a later equal-ranked source
/// displacing an earlier one. Ratings without a recognized methodology are
/// only consulted as a fallback, in document order. No usable rating at all
/// defaults to an informational record, with a diagnostic.
pub fn normalize(raw: &RawVulnerability) -> Vulnerability {
    let ratings = raw.ratings.as_deref().unwrap_or_default();

    for method in METHOD_PRIORITY {
        let mut winner: Option<RatingCandidate> = None;
        let mut method_seen = false;
        for rating in ratings {
            if rating.method.as_deref() != Some(method) {
                continue;
            }
            method_seen = true;
            let Some(candidate) = extract_candidate(rating) else {
                continue;
            };
            let displaces = match &winner {
                Some(best) => source_rank(&candidate.source) <= source_rank(&best.source),
                None => true,
            };
            if displaces {
                winner = Some(candidate);
            }
        }
        if let Some(best) = winner {
            return Vulnerability::new(&raw.id, best.severity, best.score, best.vector);
        }
        if method_seen {
            break;
        }
    }

    // No recognized methodology: first rating with a usable label, then
    // first with a score
    if let Some(candidate) = ratings
        .iter()
        .filter(|r| r.severity.as_deref().and_then(Severity::parse_label).is_some())
        .find_map(extract_candidate)
        .or_else(|| {
            ratings
                .iter()
                .filter(|r| r.score.is_some())
                .find_map(extract_candidate)
        })
    {
        return Vulnerability::new(&raw.id, candidate.severity, candidate.score, candidate.vector);
    }

    warn!(
        id = %raw.id,
        "no usable rating, defaulting to informational severity"
    );
    Vulnerability::new(&raw.id, Severity::Information, 0.0, "-")
}
