use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DEFAULT_MAX_DEPTH;
use crate::TranscodeError;
use crate::TranscodeResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["storyc.toml", ".storyc.toml", ".config/storyc.toml"];

/// Configuration loaded from a `storyc.toml` file.
///
/// ```toml
/// [output]
/// indent = "  "
/// runtime = "Macros"
/// variables = "vars"
/// temporaries = "temp"
/// header = true
///
/// [limits]
/// max_depth = 64
///
/// [macros]
/// "link-show" = "link"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct StorycConfig {
	/// Shape of the generated code.
	#[serde(default)]
	pub output: OutputConfig,
	/// Safety limits for malformed input.
	#[serde(default)]
	pub limits: LimitsConfig,
	/// Extra macro names, each mapped to the built-in macro it behaves like.
	#[serde(default)]
	pub macros: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
	/// One level of indentation. Defaults to a tab.
	#[serde(default = "default_indent")]
	pub indent: String,
	/// Receiver for calls to macros without a dedicated handler.
	#[serde(default = "default_runtime")]
	pub runtime: String,
	/// Receiver for `$story` variables.
	#[serde(default = "default_variables")]
	pub variables: String,
	/// Receiver for `_temporary` variables.
	#[serde(default = "default_temporaries")]
	pub temporaries: String,
	/// Start compiled stories with a generated-file comment.
	#[serde(default = "default_header")]
	pub header: bool,
}

impl Default for OutputConfig {
	fn default() -> Self {
		Self {
			indent: default_indent(),
			runtime: default_runtime(),
			variables: default_variables(),
			temporaries: default_temporaries(),
			header: default_header(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
	/// Deepest nesting of hooks, macros and groupings accepted.
	#[serde(default = "default_max_depth")]
	pub max_depth: usize,
}

impl Default for LimitsConfig {
	fn default() -> Self {
		Self {
			max_depth: default_max_depth(),
		}
	}
}

fn default_indent() -> String {
	"\t".to_string()
}

fn default_runtime() -> String {
	"Macros".to_string()
}

fn default_variables() -> String {
	"vars".to_string()
}

fn default_temporaries() -> String {
	"temp".to_string()
}

fn default_header() -> bool {
	true
}

fn default_max_depth() -> usize {
	DEFAULT_MAX_DEPTH
}

impl StorycConfig {
	/// Resolve the config file path for the given root, following discovery
	/// order.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> TranscodeResult<Option<StorycConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		Self::from_toml(&content).map(Some)
	}

	pub fn from_toml(content: &str) -> TranscodeResult<StorycConfig> {
		toml::from_str(content).map_err(|e| TranscodeError::ConfigParse(e.to_string()))
	}
}
