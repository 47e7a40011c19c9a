use std::cmp::Ordering;

use sift_domain::{Category, ScoredCandidate, similarity_from_distance};
use sift_storage::qdrant::StoredHit;

use crate::{CandidateIndex, Error, Result};

/// One candidate list per category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pools {
	pub knowledge: Vec<ScoredCandidate>,
	pub personality: Vec<ScoredCandidate>,
}
impl Pools {
	pub fn get(&self, category: Category) -> &[ScoredCandidate] {
		match category {
			Category::Knowledge => &self.knowledge,
			Category::Personality => &self.personality,
		}
	}

	pub fn get_mut(&mut self, category: Category) -> &mut Vec<ScoredCandidate> {
		match category {
			Category::Knowledge => &mut self.knowledge,
			Category::Personality => &mut self.personality,
		}
	}

	pub fn len(&self) -> usize {
		self.knowledge.len() + self.personality.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Searches one category partition and scores the hits.
///
/// Any index failure is fatal for the request.
pub async fn retrieve(
	index: &dyn CandidateIndex,
	phrase: &str,
	category: Category,
	limit: u32,
) -> Result<Vec<ScoredCandidate>> {
	let hits = index.search(phrase, category, limit).await.map_err(|err| match err {
		Error::Retrieval { .. } => err,
		other => Error::Retrieval { message: format!("{category} search failed: {other}") },
	})?;

	Ok(score_hits(hits, category))
}

/// Converts hits to candidates, keeping retrieval order and numbering ranks from 1.
pub fn score_hits(hits: Vec<StoredHit>, category: Category) -> Vec<ScoredCandidate> {
	let mut candidates = Vec::with_capacity(hits.len());

	for (idx, hit) in hits.into_iter().enumerate() {
		if hit.assessment.category != category {
			tracing::warn!(
				name = %hit.assessment.name,
				expected = %category,
				"Dropping hit from the wrong category partition."
			);

			continue;
		}

		candidates.push(ScoredCandidate {
			similarity_score: similarity_from_distance(hit.distance),
			rank: idx as u32 + 1,
			assessment: hit.assessment,
		});
	}

	candidates
}

pub fn cmp_score_desc(lhs: &ScoredCandidate, rhs: &ScoredCandidate) -> Ordering {
	rhs.similarity_score.total_cmp(&lhs.similarity_score)
}

/// Stable: equal scores keep their current relative order.
pub fn sort_by_score(candidates: &mut [ScoredCandidate]) {
	candidates.sort_by(cmp_score_desc);
}
