use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Soft-skill phrase searched when intent analysis fails outright.
pub const DEFAULT_SOFT_SKILL_PHRASE: &str = "communication, teamwork";
/// Soft-skill phrase searched when the classifier answered but listed no soft skills.
pub const EXTRACTED_SOFT_SKILL_FALLBACK: &str = "communication, collaboration, teamwork";

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryFocus {
	Technical,
	Behavioral,
	Balanced,
}
impl PrimaryFocus {
	fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_uppercase().as_str() {
			"TECHNICAL" => Some(Self::Technical),
			"BEHAVIORAL" => Some(Self::Behavioral),
			"BALANCED" => Some(Self::Balanced),
			_ => None,
		}
	}

	/// Pool order used when backfilling: the focused category first, K first when balanced.
	pub fn pool_order(self) -> [Category; 2] {
		match self {
			Self::Behavioral => [Category::Personality, Category::Knowledge],
			Self::Technical | Self::Balanced => [Category::Knowledge, Category::Personality],
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Technical => "TECHNICAL",
			Self::Behavioral => "BEHAVIORAL",
			Self::Balanced => "BALANCED",
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specificity {
	HighlySpecific,
	Moderate,
	Broad,
}
impl Specificity {
	fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_uppercase().as_str() {
			"HIGHLY_SPECIFIC" => Some(Self::HighlySpecific),
			"MODERATE" => Some(Self::Moderate),
			"BROAD" => Some(Self::Broad),
			_ => None,
		}
	}
}

/// Structured reading of a hiring query.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct QueryIntent {
	pub primary_focus: PrimaryFocus,
	pub specificity: Specificity,
	/// Searched against the knowledge pool.
	pub technical_phrase: String,
	/// Searched against the personality pool.
	pub soft_skill_phrase: String,
	pub job_level: Option<String>,
	/// Hard duration limit in minutes.
	pub duration_ceiling: Option<u32>,
}
impl QueryIntent {
	/// Descriptor used when the classifier is unreachable or answers with garbage.
	pub fn fallback(query: &str) -> Self {
		Self {
			primary_focus: PrimaryFocus::Balanced,
			specificity: Specificity::Moderate,
			technical_phrase: query.to_string(),
			soft_skill_phrase: DEFAULT_SOFT_SKILL_PHRASE.to_string(),
			job_level: None,
			duration_ceiling: None,
		}
	}

	pub fn phrase_for(&self, category: Category) -> &str {
		match category {
			Category::Knowledge => &self.technical_phrase,
			Category::Personality => &self.soft_skill_phrase,
		}
	}
}

/// Parses the classifier's `KEY: value` reply.
///
/// Unknown keys are ignored and unrecognised enum values keep the defaults, so any text yields
/// a usable descriptor. Returns `None` only when no recognised key appears at all, which callers
/// treat as a failed analysis.
pub fn parse_intent_response(text: &str, query: &str) -> Option<QueryIntent> {
	let mut intent = QueryIntent {
		primary_focus: PrimaryFocus::Balanced,
		specificity: Specificity::Moderate,
		technical_phrase: String::new(),
		soft_skill_phrase: String::new(),
		job_level: None,
		duration_ceiling: None,
	};
	let mut recognised = false;

	for line in text.lines() {
		let Some((key, value)) = line.trim().split_once(':') else { continue };
		let value = value.trim();

		match key.trim().to_ascii_uppercase().as_str() {
			"PRIMARY_FOCUS" => {
				if let Some(focus) = PrimaryFocus::parse(value) {
					intent.primary_focus = focus;
				}
			},
			"SPECIFICITY" => {
				if let Some(specificity) = Specificity::parse(value) {
					intent.specificity = specificity;
				}
			},
			"TECHNICAL_SKILLS" => intent.technical_phrase = value.to_string(),
			"SOFT_SKILLS" => intent.soft_skill_phrase = value.to_string(),
			"JOB_LEVEL" =>
				if !value.is_empty() && !is_unspecified(value) {
					intent.job_level = Some(value.to_string());
				},
			"DURATION_MAX" => intent.duration_ceiling = parse_duration_ceiling(value),
			_ => continue,
		}

		recognised = true;
	}

	if !recognised {
		return None;
	}
	if is_absent_list(&intent.technical_phrase) {
		intent.technical_phrase = query.to_string();
	}
	if is_absent_list(&intent.soft_skill_phrase) {
		intent.soft_skill_phrase = EXTRACTED_SOFT_SKILL_FALLBACK.to_string();
	}

	Some(intent)
}

fn is_unspecified(value: &str) -> bool {
	value.eq_ignore_ascii_case("not specified")
}

fn is_absent_list(value: &str) -> bool {
	let value = value.trim();

	value.is_empty() || value.eq_ignore_ascii_case("none")
}

fn parse_duration_ceiling(value: &str) -> Option<u32> {
	if is_unspecified(value) {
		return None;
	}

	let first = value.split_whitespace().next()?;

	first.parse::<u32>().ok().filter(|minutes| *minutes > 0)
}

#[cfg(test)]
mod tests {
	use super::*;

	const REPLY: &str = "\
PRIMARY_FOCUS: TECHNICAL
SPECIFICITY: HIGHLY_SPECIFIC
TECHNICAL_SKILLS: Java, Spring Boot
SOFT_SKILLS: team leadership
JOB_LEVEL: Senior
DURATION_MAX: 40 minutes";

	#[test]
	fn parses_full_reply() {
		let intent = parse_intent_response(REPLY, "q").expect("Expected intent.");

		assert_eq!(intent.primary_focus, PrimaryFocus::Technical);
		assert_eq!(intent.specificity, Specificity::HighlySpecific);
		assert_eq!(intent.technical_phrase, "Java, Spring Boot");
		assert_eq!(intent.soft_skill_phrase, "team leadership");
		assert_eq!(intent.job_level.as_deref(), Some("Senior"));
		assert_eq!(intent.duration_ceiling, Some(40));
	}

	#[test]
	fn absent_skill_lists_fall_back() {
		let reply = "PRIMARY_FOCUS: BEHAVIORAL\nTECHNICAL_SKILLS: None\nSOFT_SKILLS:";
		let intent = parse_intent_response(reply, "sales lead").expect("Expected intent.");

		assert_eq!(intent.technical_phrase, "sales lead");
		assert_eq!(intent.soft_skill_phrase, EXTRACTED_SOFT_SKILL_FALLBACK);
	}

	#[test]
	fn unknown_enum_values_keep_defaults() {
		let reply = "PRIMARY_FOCUS: MOSTLY_TECHNICAL\nSPECIFICITY: very";
		let intent = parse_intent_response(reply, "q").expect("Expected intent.");

		assert_eq!(intent.primary_focus, PrimaryFocus::Balanced);
		assert_eq!(intent.specificity, Specificity::Moderate);
	}

	#[test]
	fn unspecified_and_malformed_durations_are_absent() {
		for value in ["Not specified", "about an hour", "0", "-10"] {
			let reply = format!("DURATION_MAX: {value}");
			let intent = parse_intent_response(&reply, "q").expect("Expected intent.");

			assert_eq!(intent.duration_ceiling, None, "{value:?} should not set a ceiling");
		}
	}

	#[test]
	fn reply_without_known_keys_is_rejected() {
		assert!(parse_intent_response("I cannot help with that.", "q").is_none());
	}

	#[test]
	fn fallback_is_balanced_and_unconstrained() {
		let intent = QueryIntent::fallback("data analyst");

		assert_eq!(intent.primary_focus, PrimaryFocus::Balanced);
		assert_eq!(intent.specificity, Specificity::Moderate);
		assert_eq!(intent.technical_phrase, "data analyst");
		assert_eq!(intent.soft_skill_phrase, DEFAULT_SOFT_SKILL_PHRASE);
		assert_eq!(intent.duration_ceiling, None);
	}

	#[test]
	fn behavioral_focus_backfills_personality_first() {
		assert_eq!(
			PrimaryFocus::Behavioral.pool_order(),
			[Category::Personality, Category::Knowledge]
		);
		assert_eq!(PrimaryFocus::Balanced.pool_order(), [Category::Knowledge, Category::Personality]);
	}
}
