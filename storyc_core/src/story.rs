use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::Token;
use crate::TranscodeError;
use crate::TranscodeResult;

/// A tokenized story, as written by the tokenizer:
///
/// ```json
/// {
///   "name": "Kitchen",
///   "start": "Start",
///   "passages": [{ "name": "Start", "tokens": [{ "type": "text", "text": "Hi" }] }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Story {
	#[serde(default)]
	pub name: String,
	/// Name of the passage the story begins in.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub start: Option<String>,
	#[serde(default)]
	pub passages: Vec<Passage>,
}

/// One passage and its token tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Passage {
	pub name: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<String>,
	#[serde(default)]
	pub tokens: Vec<Token>,
}

impl Story {
	pub fn from_json(content: &str) -> TranscodeResult<Self> {
		serde_json::from_str(content).map_err(|e| TranscodeError::StoryParse(e.to_string()))
	}

	pub fn from_path(path: &Path) -> TranscodeResult<Self> {
		let content = std::fs::read_to_string(path)?;
		Self::from_json(&content)
	}

	pub fn passage(&self, name: &str) -> Option<&Passage> {
		self.passages.iter().find(|passage| passage.name == name)
	}
}
