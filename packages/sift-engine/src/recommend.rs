use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sift_domain::{Category, QueryIntent, RemoteTesting, ScoredCandidate, SelectionPlan};

use crate::{
	CandidateIndex, Error, IntentAnalyzer, Result,
	filter,
	merge::{self, Distribution, Limits},
	retrieval::{self, Pools},
	threshold::{self, Cutoff, ThresholdScan},
};

#[derive(Clone, Debug, Deserialize)]
pub struct RecommendRequest {
	pub query: String,
	#[serde(default)]
	pub min_total: Option<usize>,
	#[serde(default)]
	pub max_total: Option<usize>,
}
impl RecommendRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self { query: query.into(), min_total: None, max_total: None }
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
	pub name: String,
	pub url: String,
	pub description: String,
	pub category: Category,
	pub duration_minutes: Option<u32>,
	pub remote_ready: RemoteTesting,
	pub adaptive_support: bool,
	pub similarity_score: f32,
}
impl From<ScoredCandidate> for Recommendation {
	fn from(candidate: ScoredCandidate) -> Self {
		let duration_minutes = candidate.assessment.duration_whole_minutes();
		let assessment = candidate.assessment;

		Self {
			name: assessment.name,
			url: assessment.url,
			description: assessment.description,
			category: assessment.category,
			duration_minutes,
			remote_ready: assessment.remote_testing,
			adaptive_support: assessment.adaptive_support,
			similarity_score: candidate.similarity_score,
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
	Success,
	Error,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecommendResponse {
	pub original_query: String,
	/// The intent the selection ran with, fallback included. `None` when the request was
	/// rejected before analysis.
	pub query_analysis: Option<QueryIntent>,
	pub recommendations: Vec<Recommendation>,
	pub distribution: Option<Distribution>,
	pub status: Status,
	pub error_message: Option<String>,
}
impl RecommendResponse {
	fn failed(query: &str, query_analysis: Option<QueryIntent>, err: Error) -> Self {
		Self {
			original_query: query.to_string(),
			query_analysis,
			recommendations: Vec::new(),
			distribution: None,
			status: Status::Error,
			error_message: Some(err.to_string()),
		}
	}

	pub fn is_success(&self) -> bool {
		self.status == Status::Success
	}
}

/// The retrieval and selection result for one intent.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
	pub items: Vec<ScoredCandidate>,
	pub distribution: Distribution,
}

pub struct Recommender {
	settings: sift_config::Recommend,
	scan: ThresholdScan,
	index: Arc<dyn CandidateIndex>,
	intent: Arc<dyn IntentAnalyzer>,
}
impl Recommender {
	pub fn new(
		settings: sift_config::Recommend,
		index: Arc<dyn CandidateIndex>,
		intent: Arc<dyn IntentAnalyzer>,
	) -> Self {
		let scan = ThresholdScan::from(settings.threshold);

		Self { settings, scan, index, intent }
	}

	/// Limits for a request, falling back to `[recommend]` for anything left unset.
	pub fn limits_for(&self, min_total: Option<usize>, max_total: Option<usize>) -> Result<Limits> {
		Limits::new(
			min_total.unwrap_or(self.settings.min_total as usize),
			max_total.unwrap_or(self.settings.max_total as usize),
		)
	}

	/// Runs the full pipeline. Failures are reported in the response, never returned.
	pub async fn recommend(&self, req: RecommendRequest) -> RecommendResponse {
		let query = req.query.trim();

		if query.is_empty() {
			let err = Error::InvalidRequest { message: "query must not be empty.".to_string() };

			return RecommendResponse::failed(&req.query, None, err);
		}

		let limits = match self.limits_for(req.min_total, req.max_total) {
			Ok(limits) => limits,
			Err(err) => return RecommendResponse::failed(&req.query, None, err),
		};
		let intent = match self.intent.analyze(query).await {
			Ok(intent) => intent,
			Err(err) => {
				tracing::warn!(error = %err, "Intent analysis failed. Using the default intent.");

				QueryIntent::fallback(query)
			},
		};

		match self.select(&intent, limits).await {
			Ok(selection) => RecommendResponse {
				original_query: req.query,
				query_analysis: Some(intent),
				recommendations: selection.items.into_iter().map(Recommendation::from).collect(),
				distribution: Some(selection.distribution),
				status: Status::Success,
				error_message: None,
			},
			Err(err) => {
				tracing::error!(error = %err, "Recommendation failed.");

				RecommendResponse::failed(&req.query, Some(intent), err)
			},
		}
	}

	/// Retrieval and selection for an already analyzed intent.
	///
	/// Deterministic for a fixed index state: the same intent and limits always produce the same
	/// membership and order.
	pub async fn select(&self, intent: &QueryIntent, limits: Limits) -> Result<Selection> {
		let limit = self.settings.candidate_limit;
		let (knowledge, personality) = tokio::try_join!(
			retrieval::retrieve(
				self.index.as_ref(),
				intent.phrase_for(Category::Knowledge),
				Category::Knowledge,
				limit,
			),
			retrieval::retrieve(
				self.index.as_ref(),
				intent.phrase_for(Category::Personality),
				Category::Personality,
				limit,
			),
		)?;
		let mut pools = Pools { knowledge, personality };

		for category in Category::ALL {
			let pool = pools.get_mut(category);
			let retrieved = pool.len();

			*pool = filter::apply_duration_ceiling(std::mem::take(pool), intent.duration_ceiling);

			retrieval::sort_by_score(pool);

			tracing::debug!(category = %category, retrieved, kept = pool.len(), "Filtered pool.");
		}

		let plan = SelectionPlan::for_intent(intent.primary_focus, intent.specificity);
		let mut selected = Pools::default();

		for category in Category::ALL {
			let selection =
				threshold::select_adaptive(pools.get(category), plan.band(category), self.scan);

			match selection.cutoff {
				Cutoff::Threshold(threshold) => tracing::debug!(
					category = %category,
					threshold,
					selected = selection.items.len(),
					"Threshold scan satisfied the minimum."
				),
				Cutoff::BestEffort => tracing::debug!(
					category = %category,
					selected = selection.items.len(),
					"Threshold scan fell back to the top candidates."
				),
			}

			*selected.get_mut(category) = selection.items;
		}

		let items = merge::merge_and_guarantee(selected, &pools, intent.primary_focus, limits);
		let distribution = Distribution::tally(&items, intent.primary_focus);

		tracing::info!(
			total = distribution.total,
			k_count = distribution.k_count,
			p_count = distribution.p_count,
			primary_focus = intent.primary_focus.as_str(),
			"Selected recommendations."
		);

		Ok(Selection { items, distribution })
	}
}
