use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::category::Category;

/// One catalog entry as the engine sees it. Immutable for the life of a process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
	/// Display name. Also the dedupe key for result lists.
	pub name: String,
	pub url: String,
	pub category: Category,
	pub description: String,
	pub job_levels: String,
	/// `None` when the catalog cell is missing or unparseable.
	pub duration_minutes: Option<f64>,
	pub remote_testing: RemoteTesting,
	/// Adaptive (IRT) delivery. Catalogs that omit the column read as `false`.
	#[serde(default)]
	pub adaptive_support: bool,
}
impl Assessment {
	/// Whole minutes for display, truncating any fractional part.
	pub fn duration_whole_minutes(&self) -> Option<u32> {
		self.duration_minutes.map(|minutes| minutes as u32)
	}
}

/// Remote-proctoring support flag. Serializes as `true`, `false`, or `"unknown"`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RemoteTesting {
	Yes,
	No,
	#[default]
	Unknown,
}
impl RemoteTesting {
	pub fn from_label(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"yes" | "y" | "true" => Self::Yes,
			"no" | "n" | "false" => Self::No,
			_ => Self::Unknown,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Yes => "Yes",
			Self::No => "No",
			Self::Unknown => "Unknown",
		}
	}
}
impl Serialize for RemoteTesting {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			Self::Yes => serializer.serialize_bool(true),
			Self::No => serializer.serialize_bool(false),
			Self::Unknown => serializer.serialize_str("unknown"),
		}
	}
}
impl<'de> Deserialize<'de> for RemoteTesting {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Flag(bool),
			Label(String),
		}

		Ok(match Raw::deserialize(deserializer)? {
			Raw::Flag(true) => Self::Yes,
			Raw::Flag(false) => Self::No,
			Raw::Label(label) => Self::from_label(&label),
		})
	}
}
