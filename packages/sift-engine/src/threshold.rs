use sift_domain::{CountBand, ScoredCandidate};

// Thresholds are stepped in basis points so repeated subtraction cannot drift past a score that
// sits exactly on a cutoff.
const BASIS_POINTS: f32 = 10_000.0;

/// Descending similarity cutoffs, `start` first, ending at the last step still `>= floor`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ThresholdScan {
	start_bp: u32,
	floor_bp: u32,
	step_bp: u32,
}
impl ThresholdScan {
	pub fn new(start: f32, floor: f32, step: f32) -> Self {
		Self {
			start_bp: to_basis_points(start),
			floor_bp: to_basis_points(floor),
			step_bp: to_basis_points(step).max(1),
		}
	}

	pub fn thresholds(self) -> impl Iterator<Item = f32> {
		std::iter::successors(Some(self.start_bp), move |bp| bp.checked_sub(self.step_bp))
			.take_while(move |bp| *bp >= self.floor_bp)
			.map(|bp| bp as f32 / BASIS_POINTS)
	}
}
impl Default for ThresholdScan {
	fn default() -> Self {
		Self::from(sift_config::RecommendThreshold::default())
	}
}
impl From<sift_config::RecommendThreshold> for ThresholdScan {
	fn from(cfg: sift_config::RecommendThreshold) -> Self {
		Self::new(cfg.start, cfg.floor, cfg.step)
	}
}

/// How a selection was cut.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cutoff {
	/// The scan stopped here: at least `min` candidates scored at or above it.
	Threshold(f32),
	/// No scanned threshold reached `min`; the top candidates were taken regardless of score.
	BestEffort,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategorySelection {
	pub items: Vec<ScoredCandidate>,
	pub cutoff: Cutoff,
}

/// Picks the strictest threshold that still yields `band.min` candidates, capped at `band.max`.
///
/// `candidates` must already be sorted by descending score. When the pool is too sparse for any
/// scanned threshold, the top `band.min` candidates are returned whatever their score, so a
/// non-empty pool never under-fills.
pub fn select_adaptive(
	candidates: &[ScoredCandidate],
	band: CountBand,
	scan: ThresholdScan,
) -> CategorySelection {
	if candidates.is_empty() {
		return CategorySelection { items: Vec::new(), cutoff: Cutoff::BestEffort };
	}

	for threshold in scan.thresholds() {
		let qualifying =
			candidates.iter().take_while(|candidate| candidate.similarity_score >= threshold).count();

		if qualifying >= band.min {
			let take = qualifying.min(band.max);

			return CategorySelection {
				items: candidates[..take].to_vec(),
				cutoff: Cutoff::Threshold(threshold),
			};
		}
	}

	let take = band.min.min(candidates.len());

	CategorySelection { items: candidates[..take].to_vec(), cutoff: Cutoff::BestEffort }
}

fn to_basis_points(value: f32) -> u32 {
	if !value.is_finite() || value <= 0.0 {
		return 0;
	}

	(value * BASIS_POINTS).round() as u32
}
