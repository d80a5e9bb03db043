use crate::Position;
use crate::Token;
use crate::TokenKind;
use crate::TranscodeError;
use crate::TranscodeResult;

/// Renders a run of leaf expression tokens into target code.
///
/// The transcoder never hands macro or grouping tokens to the renderer: it
/// dispatches nested macros with inline usage and wraps groupings itself,
/// stitching the rendered pieces together with [`join_pieces`].
pub trait ExpressionRenderer: Send + Sync {
	fn render(&self, tokens: &[Token]) -> TranscodeResult<String>;
}

/// Maps an arbitrary macro name onto a safe target identifier. Returns `None`
/// when no identifier can be derived from the name.
pub trait IdentifierEscaper: Send + Sync {
	fn escape(&self, name: &str) -> Option<String>;
}

const RESERVED_WORDS: [&str; 46] = [
	"await",
	"break",
	"case",
	"catch",
	"class",
	"const",
	"continue",
	"debugger",
	"default",
	"delete",
	"do",
	"else",
	"enum",
	"export",
	"extends",
	"false",
	"finally",
	"for",
	"function",
	"if",
	"implements",
	"import",
	"in",
	"instanceof",
	"interface",
	"let",
	"new",
	"null",
	"package",
	"private",
	"protected",
	"public",
	"return",
	"static",
	"super",
	"switch",
	"this",
	"throw",
	"true",
	"try",
	"typeof",
	"undefined",
	"var",
	"void",
	"while",
	"yield",
];

/// Identifier escaping for the generator-script target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptIdentifiers;

impl IdentifierEscaper for ScriptIdentifiers {
	fn escape(&self, name: &str) -> Option<String> {
		if !name.chars().any(|ch| ch.is_ascii_alphanumeric()) {
			return None;
		}

		let mut escaped: String = name
			.chars()
			.map(|ch| {
				if ch.is_ascii_alphanumeric() || ch == '_' {
					ch
				} else {
					'_'
				}
			})
			.collect();

		if escaped.starts_with(|ch: char| ch.is_ascii_digit()) {
			escaped.insert(0, '_');
		}

		if RESERVED_WORDS.contains(&escaped.as_str()) {
			escaped.push('_');
		}

		Some(escaped)
	}
}

/// Default expression renderer for Harlowe expression tokens.
#[derive(Debug, Clone)]
pub struct HarloweExpressions {
	/// Receiver of story variables (`$name`).
	pub variables: String,
	/// Receiver of temporary variables (`_name`).
	pub temporaries: String,
}

impl Default for HarloweExpressions {
	fn default() -> Self {
		Self {
			variables: "vars".to_string(),
			temporaries: "temp".to_string(),
		}
	}
}

impl HarloweExpressions {
	fn render_variable(&self, receiver: &str, token: &Token) -> TranscodeResult<String> {
		let Some(name) = ScriptIdentifiers.escape(&token.name) else {
			return Err(TranscodeError::InvalidExpression {
				reason: format!("`{}` is not a valid variable name", token.name),
				position: token.location(),
			});
		};

		Ok(format!("{receiver}.{name}"))
	}

	fn render_token(&self, token: &Token) -> TranscodeResult<Option<String>> {
		let piece = match token.kind {
			TokenKind::Whitespace | TokenKind::Br => return Ok(None),
			TokenKind::String => quote(&token.text, token.location())?,
			TokenKind::Number | TokenKind::Identifier => token.text.clone(),
			TokenKind::Boolean => token.text.to_ascii_lowercase(),
			TokenKind::Variable => self.render_variable(&self.variables, token)?,
			TokenKind::TempVariable => self.render_variable(&self.temporaries, token)?,
			TokenKind::Operator => operator(&token.text).to_string(),
			TokenKind::Comma => ",".to_string(),
			TokenKind::Text | TokenKind::Verbatim => token.text.trim().to_string(),
			TokenKind::Macro | TokenKind::Hook | TokenKind::Grouping | TokenKind::TwineLink => {
				return Err(TranscodeError::InvalidExpression {
					reason: format!("a {:?} token cannot be rendered as a value", token.kind),
					position: token.location(),
				});
			}
		};

		Ok(Some(piece))
	}
}

impl ExpressionRenderer for HarloweExpressions {
	fn render(&self, tokens: &[Token]) -> TranscodeResult<String> {
		let mut pieces = Vec::with_capacity(tokens.len());
		for token in tokens {
			if let Some(piece) = self.render_token(token)? {
				pieces.push(piece);
			}
		}

		Ok(join_pieces(pieces))
	}
}

/// Harlowe word operators and their target equivalents.
fn operator(lexeme: &str) -> &str {
	match lexeme.trim() {
		"is" => "==",
		"is not" => "!=",
		"and" => "&&",
		"or" => "||",
		"not" => "!",
		other => other,
	}
}

/// Quote a value as a double-quoted string literal.
pub fn quote(value: &str, position: Position) -> TranscodeResult<String> {
	serde_json::to_string(value).map_err(|e| {
		TranscodeError::InvalidExpression {
			reason: e.to_string(),
			position,
		}
	})
}

/// Join rendered expression pieces with single spaces, keeping commas and
/// closing parentheses attached to what precedes them and unary `!` attached
/// to what follows.
pub fn join_pieces(pieces: impl IntoIterator<Item = String>) -> String {
	let mut joined = String::new();

	for piece in pieces {
		if piece.is_empty() {
			continue;
		}

		let attach = joined.is_empty()
			|| piece.starts_with([',', ')'])
			|| joined.ends_with(['(', '!']);
		if !attach {
			joined.push(' ');
		}

		joined.push_str(&piece);
	}

	joined
}
