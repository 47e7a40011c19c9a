use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Assessment pool. The catalog is partitioned on this label and every query searches both.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Category {
	/// Knowledge and skills: technical or cognitive ability.
	#[serde(rename = "K")]
	Knowledge,
	/// Personality and behaviour.
	#[serde(rename = "P")]
	Personality,
}
impl Category {
	pub const ALL: [Self; 2] = [Self::Knowledge, Self::Personality];

	/// Parses a raw catalog label. Only a lone `K` or `P` maps to a pool; compound labels such
	/// as `K,P` and the other historical codes are excluded from the two-pool model.
	pub fn from_label(raw: &str) -> Option<Self> {
		let label = raw.trim();

		if label.eq_ignore_ascii_case("k") {
			Some(Self::Knowledge)
		} else if label.eq_ignore_ascii_case("p") {
			Some(Self::Personality)
		} else {
			None
		}
	}

	pub fn code(self) -> &'static str {
		match self {
			Self::Knowledge => "K",
			Self::Personality => "P",
		}
	}

	pub fn display_name(self) -> &'static str {
		match self {
			Self::Knowledge => "Knowledge & Skills",
			Self::Personality => "Personality & Behaviour",
		}
	}

	pub fn other(self) -> Self {
		match self {
			Self::Knowledge => Self::Personality,
			Self::Personality => Self::Knowledge,
		}
	}
}
impl Display for Category {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.code())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn labels_parse_case_insensitively() {
		assert_eq!(Category::from_label(" k "), Some(Category::Knowledge));
		assert_eq!(Category::from_label("P"), Some(Category::Personality));
	}

	#[test]
	fn compound_and_foreign_labels_are_excluded() {
		assert_eq!(Category::from_label("K,P"), None);
		assert_eq!(Category::from_label("A"), None);
		assert_eq!(Category::from_label(""), None);
	}
}
