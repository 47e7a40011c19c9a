use std::collections::HashSet;

use serde::Serialize;

use sift_domain::{Category, PrimaryFocus, ScoredCandidate};

use crate::{
	Error, Result,
	retrieval::{self, Pools},
};

/// Overall result-count bounds for one request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Limits {
	pub min_total: usize,
	pub max_total: usize,
}
impl Limits {
	/// `max_total` must leave room for one item of each category.
	pub fn new(min_total: usize, max_total: usize) -> Result<Self> {
		if max_total < Category::ALL.len() {
			return Err(Error::InvalidRequest {
				message: format!("max_total must be at least {}.", Category::ALL.len()),
			});
		}
		if min_total > max_total {
			return Err(Error::InvalidRequest {
				message: "min_total must not exceed max_total.".to_string(),
			});
		}

		Ok(Self { min_total, max_total })
	}
}
impl TryFrom<&sift_config::Recommend> for Limits {
	type Error = Error;

	fn try_from(cfg: &sift_config::Recommend) -> Result<Self> {
		Self::new(cfg.min_total as usize, cfg.max_total as usize)
	}
}

/// Achieved counts. Reports what was returned, which may fall short of the target bands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Distribution {
	pub total: usize,
	pub k_count: usize,
	pub p_count: usize,
	pub primary_focus: PrimaryFocus,
}
impl Distribution {
	pub fn tally(items: &[ScoredCandidate], primary_focus: PrimaryFocus) -> Self {
		Self {
			total: items.len(),
			k_count: count(items, Category::Knowledge),
			p_count: count(items, Category::Personality),
			primary_focus,
		}
	}
}

/// Combines the per-category selections into one bounded, deduplicated list.
///
/// `pools` are the full post-filter candidate lists, sorted by descending score. They feed the
/// per-category floor, the backfill, and the category-presence correction.
pub fn merge_and_guarantee(
	mut selected: Pools,
	pools: &Pools,
	focus: PrimaryFocus,
	limits: Limits,
) -> Vec<ScoredCandidate> {
	for category in Category::ALL {
		let selection = selected.get_mut(category);

		if selection.is_empty()
			&& let Some(top) = pools.get(category).first()
		{
			tracing::debug!(
				category = %category,
				name = %top.name(),
				"Forcing pool top into an empty selection."
			);

			selection.push(top.clone());
		}
	}

	let mut merged = selected.knowledge;

	merged.append(&mut selected.personality);
	retrieval::sort_by_score(&mut merged);

	let mut seen = HashSet::new();

	merged.retain(|candidate| seen.insert(candidate.name().to_string()));

	if merged.len() < limits.min_total {
		backfill(&mut merged, &mut seen, pools, focus, limits.min_total);
	}

	merged.truncate(limits.max_total);
	ensure_category_presence(&mut merged, pools, limits.max_total);
	retrieval::sort_by_score(&mut merged);

	merged
}

fn backfill(
	merged: &mut Vec<ScoredCandidate>,
	seen: &mut HashSet<String>,
	pools: &Pools,
	focus: PrimaryFocus,
	min_total: usize,
) {
	let mut reserve: Vec<ScoredCandidate> = focus
		.pool_order()
		.into_iter()
		.flat_map(|category| pools.get(category))
		.filter(|candidate| !seen.contains(candidate.name()))
		.cloned()
		.collect();

	retrieval::sort_by_score(&mut reserve);

	let before = merged.len();

	for candidate in reserve {
		if merged.len() >= min_total {
			break;
		}
		if seen.insert(candidate.name().to_string()) {
			merged.push(candidate);
		}
	}

	tracing::debug!(
		added = merged.len() - before,
		total = merged.len(),
		min_total,
		"Backfilled toward the minimum total."
	);
}

// Each category is corrected at most once. An eviction only ever removes the other category
// while it keeps at least `max_total - 1` members, so a correction cannot empty the category
// that was already present and the loop settles after at most two passes.
fn ensure_category_presence(
	merged: &mut Vec<ScoredCandidate>,
	pools: &Pools,
	max_total: usize,
) {
	let mut corrected = HashSet::new();

	loop {
		let mut changed = false;

		for category in Category::ALL {
			if corrected.contains(&category) || count(merged, category) > 0 {
				continue;
			}

			let Some(top) = pools
				.get(category)
				.iter()
				.find(|candidate| merged.iter().all(|present| present.name() != candidate.name()))
			else {
				continue;
			};
			let top = top.clone();

			while merged.len() > max_total.saturating_sub(1) {
				let Some(idx) = lowest_scored(merged, category.other()) else { break };
				let evicted = merged.remove(idx);

				tracing::debug!(name = %evicted.name(), "Evicted to make room for a missing category.");
			}

			tracing::info!(category = %category, name = %top.name(), "Restored missing category.");

			merged.push(top);
			corrected.insert(category);

			changed = true;
		}

		if !changed {
			break;
		}
	}
}

// Last position wins ties so the earlier-retrieved of two equal scores is kept.
fn lowest_scored(items: &[ScoredCandidate], category: Category) -> Option<usize> {
	items
		.iter()
		.enumerate()
		.rev()
		.filter(|(_, candidate)| candidate.category() == category)
		.min_by(|(_, lhs), (_, rhs)| lhs.similarity_score.total_cmp(&rhs.similarity_score))
		.map(|(idx, _)| idx)
}

fn count(items: &[ScoredCandidate], category: Category) -> usize {
	items.iter().filter(|candidate| candidate.category() == category).count()
}

#[cfg(test)]
mod tests {
	use sift_domain::{Assessment, RemoteTesting};

	use super::*;

	fn candidate(name: &str, category: Category, score: f32) -> ScoredCandidate {
		ScoredCandidate {
			assessment: Assessment {
				name: name.to_string(),
				url: String::new(),
				category,
				description: String::new(),
				job_levels: String::new(),
				duration_minutes: None,
				remote_testing: RemoteTesting::Unknown,
				adaptive_support: false,
			},
			similarity_score: score,
			rank: 1,
		}
	}

	fn k(name: &str, score: f32) -> ScoredCandidate {
		candidate(name, Category::Knowledge, score)
	}

	fn p(name: &str, score: f32) -> ScoredCandidate {
		candidate(name, Category::Personality, score)
	}

	// `count` knowledge items named k0, k1, ... scoring `top`, `top - 0.01`, ...
	fn knowledge_ladder(count: usize, top: f32) -> Vec<ScoredCandidate> {
		(0..count).map(|idx| k(&format!("k{idx}"), top - idx as f32 * 0.01)).collect()
	}

	fn names(items: &[ScoredCandidate]) -> Vec<&str> {
		items.iter().map(ScoredCandidate::name).collect()
	}

	fn limits(min_total: usize, max_total: usize) -> Limits {
		Limits::new(min_total, max_total).expect("limits failed")
	}

	#[test]
	fn limits_reject_inverted_and_tiny_bounds() {
		assert!(matches!(Limits::new(6, 5), Err(Error::InvalidRequest { .. })));
		assert!(matches!(Limits::new(1, 1), Err(Error::InvalidRequest { .. })));
		assert!(Limits::new(2, 2).is_ok());
	}

	#[test]
	fn empty_selection_gets_pool_top() {
		let pools = Pools { knowledge: vec![k("k1", 0.9)], personality: vec![p("p1", 0.4)] };
		let selected = Pools { knowledge: vec![k("k1", 0.9)], personality: Vec::new() };
		let merged = merge_and_guarantee(selected, &pools, PrimaryFocus::Technical, limits(1, 10));

		assert_eq!(names(&merged), vec!["k1", "p1"]);
	}

	#[test]
	fn duplicate_names_keep_the_higher_score() {
		let pools = Pools {
			knowledge: vec![k("shared", 0.6), k("k2", 0.5)],
			personality: vec![p("shared", 0.8), p("p2", 0.3)],
		};
		let merged =
			merge_and_guarantee(pools.clone(), &pools, PrimaryFocus::Balanced, limits(1, 10));

		assert_eq!(names(&merged), vec!["shared", "k2", "p2"]);
		assert_eq!(merged[0].category(), Category::Personality);
	}

	#[test]
	fn backfill_reaches_min_total_without_duplicates() {
		let pools = Pools {
			knowledge: vec![k("k1", 0.9), k("k2", 0.5), k("k3", 0.4)],
			personality: vec![p("p1", 0.7), p("p2", 0.45)],
		};
		let selected = Pools { knowledge: vec![k("k1", 0.9)], personality: vec![p("p1", 0.7)] };
		let merged = merge_and_guarantee(selected, &pools, PrimaryFocus::Balanced, limits(4, 10));

		assert_eq!(names(&merged), vec!["k1", "p1", "k2", "p2"]);
	}

	#[test]
	fn backfill_prefers_focus_pool_on_equal_scores() {
		let pools = Pools {
			knowledge: vec![k("k1", 0.9), k("k2", 0.5)],
			personality: vec![p("p1", 0.8), p("p2", 0.5)],
		};
		let selected = Pools { knowledge: vec![k("k1", 0.9)], personality: vec![p("p1", 0.8)] };
		let behavioral =
			merge_and_guarantee(selected.clone(), &pools, PrimaryFocus::Behavioral, limits(3, 10));
		let technical = merge_and_guarantee(selected, &pools, PrimaryFocus::Technical, limits(3, 10));

		assert_eq!(behavioral[2].name(), "p2");
		assert_eq!(technical[2].name(), "k2");
	}

	#[test]
	fn cap_truncates_lowest_scores() {
		let pools = Pools { knowledge: knowledge_ladder(8, 0.9), personality: vec![p("p0", 0.95)] };
		let merged =
			merge_and_guarantee(pools.clone(), &pools, PrimaryFocus::Technical, limits(2, 4));

		assert_eq!(names(&merged), vec!["p0", "k0", "k1", "k2"]);
	}

	#[test]
	fn truncation_that_drops_a_category_is_corrected() {
		let pools = Pools { knowledge: knowledge_ladder(5, 0.9), personality: vec![p("p0", 0.3)] };
		let merged =
			merge_and_guarantee(pools.clone(), &pools, PrimaryFocus::Technical, limits(2, 3));

		assert_eq!(names(&merged), vec!["k0", "k1", "p0"]);
	}

	#[test]
	fn empty_personality_pool_backfills_knowledge_only() {
		let knowledge = knowledge_ladder(12, 0.6);
		let pools = Pools { knowledge: knowledge.clone(), personality: Vec::new() };
		let selected = Pools { knowledge: knowledge[..3].to_vec(), personality: Vec::new() };
		let merged = merge_and_guarantee(selected, &pools, PrimaryFocus::Balanced, limits(5, 10));

		assert_eq!(merged.len(), 5);
		assert!(merged.iter().all(|candidate| candidate.category() == Category::Knowledge));
	}

	#[test]
	fn presence_correction_evicts_only_the_lowest_other_item() {
		let mut merged = vec![k("k0", 0.9), k("k1", 0.8), k("k2", 0.8)];
		let pools =
			Pools { knowledge: merged.clone(), personality: vec![p("p0", 0.2), p("p1", 0.1)] };

		ensure_category_presence(&mut merged, &pools, 3);

		assert_eq!(names(&merged), vec!["k0", "k1", "p0"]);
	}

	#[test]
	fn distribution_counts_each_category() {
		let items = vec![k("a", 0.9), p("b", 0.8), k("c", 0.7)];

		assert_eq!(Distribution::tally(&items, PrimaryFocus::Technical), Distribution {
			total: 3,
			k_count: 2,
			p_count: 1,
			primary_focus: PrimaryFocus::Technical,
		});
	}
}
