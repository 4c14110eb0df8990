use std::sync::LazyLock;

use regex::Regex;

static RELATIVE_AGE: LazyLock<Option<Regex>> = LazyLock::new(|| {
	Regex::new(r"(?i)\b(\d+)\s*(second|minute|hour|day|week|month|year)s?\s+ago\b").ok()
});

/// Reads the first "N unit(s) ago" phrase in `metadata`, in days.
pub fn parse_relative_age_days(metadata: &str) -> Option<f32> {
	let caps = RELATIVE_AGE.as_ref()?.captures(metadata)?;
	let amount: f32 = caps[1].parse().ok()?;
	let unit_days = match caps[2].to_ascii_lowercase().as_str() {
		"second" => 1.0 / 86_400.0,
		"minute" => 1.0 / 1_440.0,
		"hour" => 1.0 / 24.0,
		"day" => 1.0,
		"week" => 7.0,
		"month" => 30.0,
		"year" => 365.0,
		_ => return None,
	};

	Some(amount * unit_days)
}
