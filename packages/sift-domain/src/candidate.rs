use serde::Serialize;

use crate::{assessment::Assessment, category::Category};

/// A retrieval hit with its similarity fixed at retrieval time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredCandidate {
	#[serde(flatten)]
	pub assessment: Assessment,
	pub similarity_score: f32,
	/// 1-based position in the pool's retrieval order.
	pub rank: u32,
}
impl ScoredCandidate {
	pub fn name(&self) -> &str {
		&self.assessment.name
	}

	pub fn category(&self) -> Category {
		self.assessment.category
	}
}

/// Maps a vector distance in `[0, 2]` to a similarity in `[0, 1]`.
///
/// The result is clamped, so indexes reporting out-of-range distances still produce scores the
/// threshold scan can compare, and rounded to four decimals so that scores sitting on a
/// threshold compare equal to it.
pub fn similarity_from_distance(distance: f32) -> f32 {
	if !distance.is_finite() {
		return 0.0;
	}

	let similarity = (1.0 - distance / 2.0).clamp(0.0, 1.0);

	(similarity * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_distance_range_onto_unit_interval() {
		assert_eq!(similarity_from_distance(0.0), 1.0);
		assert_eq!(similarity_from_distance(1.0), 0.5);
		assert_eq!(similarity_from_distance(2.0), 0.0);
	}

	#[test]
	fn clamps_out_of_range_distances() {
		assert_eq!(similarity_from_distance(-0.4), 1.0);
		assert_eq!(similarity_from_distance(3.5), 0.0);
		assert_eq!(similarity_from_distance(f32::NAN), 0.0);
	}

	#[test]
	fn rounds_to_four_decimals() {
		assert_eq!(similarity_from_distance(0.300_02), 0.85);
	}
}
