use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

/// Syntactic category of a [`Token`], as produced by the markup tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
	/// `(name: ...)`
	Macro,
	/// `[...]`, optionally named with `|name>[...]` or `[...]<name|`
	Hook,
	/// `,`
	Comma,
	/// ` ` | `\t`
	Whitespace,
	/// `\n`
	Br,
	/// Plain prose.
	Text,
	/// Prose that must be printed exactly as written.
	Verbatim,
	/// A string literal. `text` holds the unquoted value.
	String,
	/// A numeric literal, e.g. `12` or `0.5`
	Number,
	/// `true` | `false`
	Boolean,
	/// `$name`
	Variable,
	/// `_name`
	TempVariable,
	/// A bare keyword such as `it` or `time`.
	Identifier,
	/// `is`, `is not`, `and`, `to`, `+`, ...
	Operator,
	/// A parenthesised sub-expression.
	Grouping,
	/// `[[label->Passage]]`
	TwineLink,
}

impl TokenKind {
	/// Whitespace and line breaks are skipped when looking for an attached
	/// hook or a continuation of a conditional chain.
	pub fn is_blank(self) -> bool {
		matches!(self, TokenKind::Whitespace | TokenKind::Br)
	}
}

/// 1-indexed line and column of a token in the passage source. A line of `0`
/// means the tokenizer did not report a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Position {
	pub line: usize,
	pub column: usize,
}

impl Position {
	pub fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

impl Display for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.line == 0 {
			write!(f, "unknown position")
		} else {
			write!(f, "line {}, column {}", self.line, self.column)
		}
	}
}

/// A node of the tokenized markup tree.
///
/// Macro tokens hold their argument tokens flat in `children`, with commas as
/// sibling [`TokenKind::Comma`] tokens. Hook tokens hold their body. Tokens are
/// never mutated once produced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Token {
	#[serde(rename = "type")]
	pub kind: TokenKind,
	/// Macro name, hook name, or variable name depending on `kind`.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub name: String,
	/// The lexeme (or unquoted value for strings).
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub text: String,
	/// Destination of a `twineLink`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub passage: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<Token>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<Position>,
}

impl Token {
	fn leaf(kind: TokenKind, text: impl Into<String>) -> Self {
		Self {
			kind,
			name: String::new(),
			text: text.into(),
			passage: None,
			children: vec![],
			position: None,
		}
	}

	pub fn macro_call(name: impl Into<String>, children: Vec<Token>) -> Self {
		Self {
			name: name.into(),
			children,
			..Self::leaf(TokenKind::Macro, "")
		}
	}

	pub fn hook(children: Vec<Token>) -> Self {
		Self {
			children,
			..Self::leaf(TokenKind::Hook, "")
		}
	}

	pub fn named_hook(name: impl Into<String>, children: Vec<Token>) -> Self {
		Self {
			name: name.into(),
			..Self::hook(children)
		}
	}

	pub fn grouping(children: Vec<Token>) -> Self {
		Self {
			children,
			..Self::leaf(TokenKind::Grouping, "")
		}
	}

	pub fn text(text: impl Into<String>) -> Self {
		Self::leaf(TokenKind::Text, text)
	}

	pub fn verbatim(text: impl Into<String>) -> Self {
		Self::leaf(TokenKind::Verbatim, text)
	}

	pub fn whitespace() -> Self {
		Self::leaf(TokenKind::Whitespace, " ")
	}

	pub fn br() -> Self {
		Self::leaf(TokenKind::Br, "\n")
	}

	pub fn comma() -> Self {
		Self::leaf(TokenKind::Comma, ",")
	}

	pub fn string(value: impl Into<String>) -> Self {
		Self::leaf(TokenKind::String, value)
	}

	pub fn number(lexeme: impl Into<String>) -> Self {
		Self::leaf(TokenKind::Number, lexeme)
	}

	pub fn boolean(value: bool) -> Self {
		Self::leaf(TokenKind::Boolean, value.to_string())
	}

	pub fn identifier(lexeme: impl Into<String>) -> Self {
		Self::leaf(TokenKind::Identifier, lexeme)
	}

	pub fn operator(lexeme: impl Into<String>) -> Self {
		Self::leaf(TokenKind::Operator, lexeme)
	}

	pub fn variable(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::leaf(TokenKind::Variable, "")
		}
	}

	pub fn temp_variable(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::leaf(TokenKind::TempVariable, "")
		}
	}

	pub fn twine_link(label: impl Into<String>, passage: impl Into<String>) -> Self {
		Self {
			passage: Some(passage.into()),
			..Self::leaf(TokenKind::TwineLink, label)
		}
	}

	/// Attach a source position.
	#[must_use]
	pub fn at(mut self, line: usize, column: usize) -> Self {
		self.position = Some(Position::new(line, column));
		self
	}

	pub fn is_macro(&self) -> bool {
		self.kind == TokenKind::Macro
	}

	pub fn is_hook(&self) -> bool {
		self.kind == TokenKind::Hook
	}

	/// The reported position, or the unknown position.
	pub fn location(&self) -> Position {
		self.position.unwrap_or_default()
	}
}

/// True when a span holds nothing but whitespace and line breaks.
pub fn is_blank_span(tokens: &[Token]) -> bool {
	tokens.iter().all(|token| token.kind.is_blank())
}

/// Split a flat argument list on its comma tokens.
///
/// Only sibling commas split: commas inside a grouping or a nested macro live
/// in that token's children and never reach this level. A trailing comma
/// yields a trailing empty span.
pub fn split_commas(tokens: &[Token]) -> Vec<&[Token]> {
	tokens
		.split(|token| token.kind == TokenKind::Comma)
		.collect()
}

/// Index of the first token after `index` that is neither whitespace nor a
/// line break.
pub fn next_significant(tokens: &[Token], index: usize) -> Option<usize> {
	tokens
		.iter()
		.enumerate()
		.skip(index + 1)
		.find(|(_, token)| !token.kind.is_blank())
		.map(|(position, _)| position)
}

/// Index of the hook attached to the macro at `index`, if one follows it with
/// only whitespace or line breaks in between.
pub fn attached_hook(tokens: &[Token], index: usize) -> Option<usize> {
	next_significant(tokens, index).filter(|&next| tokens[next].is_hook())
}
