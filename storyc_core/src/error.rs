use miette::Diagnostic;
use thiserror::Error;

use crate::MacroUsage;
use crate::Position;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TranscodeError {
	#[error(transparent)]
	#[diagnostic(code(storyc::io_error))]
	Io(#[from] std::io::Error),

	#[error("`{name}` {reason} ({usage} usage at {position})")]
	#[diagnostic(
		code(storyc::usage_violation),
		help("move the macro onto its own line, or attach the hook it expects")
	)]
	UsageViolation {
		name: String,
		usage: MacroUsage,
		reason: String,
		position: Position,
	},

	#[error("malformed `{name}`: {reason} (at {position})")]
	#[diagnostic(code(storyc::structural_error))]
	StructuralError {
		name: String,
		reason: String,
		position: Position,
	},

	#[error("unknown macro `{name}` (at {position})")]
	#[diagnostic(
		code(storyc::unknown_construct),
		help("macro names must contain at least one letter or digit")
	)]
	UnknownConstruct { name: String, position: Position },

	#[error("invalid expression: {reason} (at {position})")]
	#[diagnostic(code(storyc::invalid_expression))]
	InvalidExpression { reason: String, position: Position },

	#[error("failed to compile passage `{passage}`")]
	#[diagnostic(code(storyc::passage))]
	InPassage {
		passage: String,
		#[source]
		source: Box<TranscodeError>,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(storyc::config_parse),
		help("check that storyc.toml is valid TOML with [output], [limits] and/or [macros] sections")
	)]
	ConfigParse(String),

	#[error("failed to parse story file: {0}")]
	#[diagnostic(
		code(storyc::story_parse),
		help("the story file must be a JSON object with a `passages` array of token trees")
	)]
	StoryParse(String),

	#[error("macro alias `{alias}` points at `{target}`, which is not a built-in macro")]
	#[diagnostic(
		code(storyc::unknown_alias),
		help(
			"available targets: set, put, move, if, unless, elseif, else, link, linkreveal, \
			 linkrepeat, linkgoto, goto, hook, print"
		)
	)]
	UnknownAlias { alias: String, target: String },
}

impl TranscodeError {
	pub(crate) fn usage(
		name: &str,
		usage: MacroUsage,
		reason: impl Into<String>,
		position: Position,
	) -> Self {
		Self::UsageViolation {
			name: name.to_string(),
			usage,
			reason: reason.into(),
			position,
		}
	}

	pub(crate) fn structural(name: &str, reason: impl Into<String>, position: Position) -> Self {
		Self::StructuralError {
			name: name.to_string(),
			reason: reason.into(),
			position,
		}
	}

	/// The innermost error, unwrapping passage context.
	pub fn root_cause(&self) -> &TranscodeError {
		match self {
			Self::InPassage { source, .. } => source.root_cause(),
			other => other,
		}
	}
}

pub type TranscodeResult<T> = Result<T, TranscodeError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
