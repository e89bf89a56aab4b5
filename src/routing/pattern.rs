use anyhow::{Context, bail};
use regex::Regex;

/// A compiled route pattern.
///
/// Literal characters match themselves; each `{name}` placeholder matches one
/// or more characters excluding `/`. Compiled once, anchored to the whole path.
#[derive(Debug)]
pub struct Pattern {
	raw: String,
	regex: Regex,
	names: Vec<String>,
}

impl Pattern {
	pub fn compile(pattern: &str) -> anyhow::Result<Self> {
		let raw = pattern.trim();
		if raw.is_empty() {
			bail!("empty route pattern");
		}

		let mut names = Vec::new();
		let mut source = String::with_capacity(raw.len() + 8);
		source.push('^');

		let mut rest = raw;
		while let Some(start) = rest.find('{') {
			source.push_str(&regex::escape(&rest[..start]));

			let after = &rest[start + 1..];
			let Some(end) = after.find('}') else {
				bail!("unterminated placeholder in `{raw}`");
			};
			let name = &after[..end];
			if name.is_empty() {
				bail!("empty placeholder name in `{raw}`");
			}
			if names.iter().any(|n| n == name) {
				bail!("duplicate placeholder `{{{name}}}` in `{raw}`");
			}
			names.push(name.to_string());
			source.push_str("([^/]+)");

			rest = &after[end + 1..];
		}
		source.push_str(&regex::escape(rest));
		source.push('$');

		let regex =
			Regex::new(&source).with_context(|| format!("compiling route pattern `{raw}`"))?;

		Ok(Self {
			raw: raw.to_string(),
			regex,
			names,
		})
	}

	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Matches `path` end to end, returning captured placeholder values in
	/// pattern-appearance order, or `None` when the path does not match.
	pub fn matches(&self, path: &str) -> Option<PathParams> {
		let caps = self.regex.captures(path)?;
		let params = self
			.names
			.iter()
			.zip(caps.iter().skip(1))
			.filter_map(|(name, m)| m.map(|m| (name.clone(), m.as_str().to_string())))
			.collect();

		Some(PathParams(params))
	}
}

/// Placeholder values captured from a single dispatched path.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
	#[must_use]
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
