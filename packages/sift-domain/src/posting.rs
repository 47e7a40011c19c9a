use std::collections::HashSet;

use serde::Deserialize;

const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// What the skill extractor pulled out of a job posting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractedPosting {
	pub title: Option<String>,
	pub skills: Vec<String>,
}

#[derive(Deserialize)]
struct RawPosting {
	#[serde(default)]
	title: Option<String>,
	#[serde(default)]
	skills: Vec<String>,
}

/// Human-readable text of an HTML page: markup, scripts and styles removed, whitespace collapsed.
pub fn visible_text(html: &str) -> String {
	let lower = html.to_ascii_lowercase();
	let mut text = String::with_capacity(html.len() / 2);
	let mut pos = 0;

	while let Some(offset) = lower[pos..].find('<') {
		let start = pos + offset;

		text.push_str(&html[pos..start]);
		text.push(' ');

		let Some(tag_len) = lower[start..].find('>') else {
			pos = html.len();

			break;
		};
		let tag_end = start + tag_len + 1;

		pos = match hidden_element(&lower[start + 1..tag_end]) {
			Some(name) => element_end(&lower, tag_end, name).unwrap_or(html.len()),
			None => tag_end,
		};
	}

	text.push_str(&html[pos..]);

	decode_entities(&text).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `<h1>`, or the document `<title>` when the page has no usable heading.
pub fn page_title(html: &str) -> Option<String> {
	let lower = html.to_ascii_lowercase();

	["h1", "title"].into_iter().find_map(|name| {
		let open = lower.find(&format!("<{name}"))?;
		let inner_start = open + lower[open..].find('>')? + 1;
		let inner_end = inner_start + lower[inner_start..].find(&format!("</{name}"))?;
		let title = visible_text(&html[inner_start..inner_end]);

		(!title.is_empty()).then_some(title)
	})
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((idx, _)) => &text[..idx],
		None => text,
	}
}

/// Parses the extractor's `{"title": ..., "skills": [...]}` reply.
///
/// Code fences and prose around the object are ignored. Skills are trimmed, deduplicated
/// case-insensitively and capped at `max_skills`.
pub fn parse_posting_reply(reply: &str, max_skills: usize) -> Option<ExtractedPosting> {
	let start = reply.find('{')?;
	let end = reply.rfind('}')?;

	if end < start {
		return None;
	}

	let raw: RawPosting = serde_json::from_str(&reply[start..=end]).ok()?;
	let mut seen = HashSet::new();
	let skills = raw
		.skills
		.into_iter()
		.map(|skill| skill.trim().to_string())
		.filter(|skill| !skill.is_empty() && seen.insert(skill.to_lowercase()))
		.take(max_skills)
		.collect();
	let title = raw.title.map(|title| title.trim().to_string()).filter(|title| !title.is_empty());

	Some(ExtractedPosting { title, skills })
}

fn hidden_element(tag: &str) -> Option<&'static str> {
	HIDDEN_ELEMENTS.into_iter().find(|name| {
		tag.strip_prefix(name).is_some_and(|rest| {
			rest.starts_with(|c: char| c == '>' || c == '/' || c.is_ascii_whitespace())
		})
	})
}

// Byte offset just past `</name ...>`, searching from `from`.
fn element_end(lower: &str, from: usize, name: &str) -> Option<usize> {
	let close = from + lower[from..].find(&format!("</{name}"))?;

	Some(close + lower[close..].find('>')? + 1)
}

fn decode_entities(text: &str) -> String {
	text.replace("&nbsp;", " ")
		.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&quot;", "\"")
		.replace("&#39;", "'")
		.replace("&amp;", "&")
}
