use serde::Serialize;

use crate::{
	category::Category,
	intent::{PrimaryFocus, Specificity},
};

/// Inclusive target range for one category's share of the results.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct CountBand {
	pub min: usize,
	pub max: usize,
}
impl CountBand {
	pub const fn new(min: usize, max: usize) -> Self {
		Self { min, max }
	}
}

/// Per-category targets derived from a query's focus and specificity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct SelectionPlan {
	pub knowledge: CountBand,
	pub personality: CountBand,
}
impl SelectionPlan {
	pub fn for_intent(focus: PrimaryFocus, specificity: Specificity) -> Self {
		let (knowledge, personality) = match (focus, specificity) {
			(PrimaryFocus::Technical, Specificity::HighlySpecific) =>
				(CountBand::new(6, 9), CountBand::new(1, 2)),
			(PrimaryFocus::Technical, _) => (CountBand::new(4, 7), CountBand::new(1, 3)),
			(PrimaryFocus::Behavioral, Specificity::HighlySpecific) =>
				(CountBand::new(1, 2), CountBand::new(6, 9)),
			(PrimaryFocus::Behavioral, _) => (CountBand::new(1, 3), CountBand::new(4, 7)),
			(PrimaryFocus::Balanced, _) => (CountBand::new(3, 6), CountBand::new(3, 6)),
		};

		Self { knowledge, personality }
	}

	pub fn band(&self, category: Category) -> CountBand {
		match category {
			Category::Knowledge => self.knowledge,
			Category::Personality => self.personality,
		}
	}
}
