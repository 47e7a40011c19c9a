/// Parses a catalog duration cell into minutes.
///
/// Accepts plain non-negative decimals (`"30"`, `"12.5"`). Everything else, including `"N/A"`,
/// ranges and signed values, is unparseable and yields `None`, which downstream treats as an
/// unconstrained duration.
pub fn parse_minutes(raw: &str) -> Option<f64> {
	let trimmed = raw.trim();

	if trimmed.is_empty() || !trimmed.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
		return None;
	}

	let minutes = trimmed.parse::<f64>().ok()?;

	minutes.is_finite().then_some(minutes)
}

/// `true` when the duration is unknown or fits under the ceiling. Equality fits.
pub fn within_ceiling(minutes: Option<f64>, ceiling: Option<u32>) -> bool {
	match (minutes, ceiling) {
		(Some(minutes), Some(ceiling)) => minutes <= f64::from(ceiling),
		_ => true,
	}
}
