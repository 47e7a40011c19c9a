use sift_domain::{ScoredCandidate, duration};

/// Drops candidates whose known duration exceeds the ceiling.
///
/// Candidates without a parseable duration always pass. With no ceiling this is the identity.
pub fn apply_duration_ceiling(
	candidates: Vec<ScoredCandidate>,
	ceiling: Option<u32>,
) -> Vec<ScoredCandidate> {
	if ceiling.is_none() {
		return candidates;
	}

	let before = candidates.len();
	let kept: Vec<ScoredCandidate> = candidates
		.into_iter()
		.filter(|candidate| duration::within_ceiling(candidate.assessment.duration_minutes, ceiling))
		.collect();

	if kept.len() < before {
		tracing::debug!(
			ceiling = ceiling.unwrap_or_default(),
			removed = before - kept.len(),
			"Duration ceiling removed candidates."
		);
	}

	kept
}
