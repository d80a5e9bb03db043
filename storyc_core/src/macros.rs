//! Code generation handlers for the built-in macros.
//!
//! Every handler receives the token sequence of the body being generated, the
//! index of its macro token and the usage the driver determined. It returns
//! the index of the last token it consumed: its own index, or the index of the
//! hook it attached to.

use crate::MacroUsage;
use crate::Token;
use crate::TokenKind;
use crate::TranscodeError;
use crate::TranscodeResult;
use crate::Transcoder;
use crate::dispatch::normalize_name;
use crate::tokens::attached_hook;
use crate::tokens::is_blank_span;
use crate::tokens::next_significant;
use crate::tokens::split_commas;

/// `(set:)`, `(put:)` and `(move:)`: one assignment statement per
/// comma-separated clause.
pub fn assignment(
	transcoder: &mut Transcoder<'_>,
	tokens: &[Token],
	index: usize,
	usage: MacroUsage,
) -> TranscodeResult<usize> {
	let token = &tokens[index];

	if usage == MacroUsage::Inline {
		return Err(TranscodeError::usage(
			&token.name,
			usage,
			"cannot be used inside another macro",
			token.location(),
		));
	}

	let clauses: Vec<&[Token]> = split_commas(&token.children)
		.into_iter()
		.filter(|clause| !is_blank_span(clause))
		.collect();

	if clauses.is_empty() {
		return Err(TranscodeError::structural(
			&token.name,
			"needs at least one assignment",
			token.location(),
		));
	}

	for (position, clause) in clauses.into_iter().enumerate() {
		let statement = assignment_clause(transcoder, clause, token)?;
		if position > 0 {
			transcoder.code().append(" ");
		}
		transcoder.code().append(&statement);
		transcoder.code().append(";");
	}

	transcoder.code().newline();

	Ok(index)
}

/// `A to B` and `A = B` assign `B` to `A`; `B into A` assigns `B` to `A`.
fn assignment_clause(
	transcoder: &mut Transcoder<'_>,
	clause: &[Token],
	macro_token: &Token,
) -> TranscodeResult<String> {
	let Some(split) = clause.iter().position(is_assignment_operator) else {
		return Err(TranscodeError::InvalidExpression {
			reason: format!(
				"`{}` clause has no `to`, `=` or `into` operator",
				macro_token.name
			),
			position: macro_token.location(),
		});
	};

	let (before, after) = (&clause[..split], &clause[split + 1..]);
	let (target, value) = if clause[split].text.trim() == "into" {
		(after, before)
	} else {
		(before, after)
	};

	if is_blank_span(target) || is_blank_span(value) {
		return Err(TranscodeError::InvalidExpression {
			reason: format!("`{}` clause is incomplete", macro_token.name),
			position: clause[split].position.unwrap_or(macro_token.location()),
		});
	}

	let target = transcoder.render_expression(target)?;
	let value = transcoder.render_expression(value)?;

	Ok(format!("{target} = {value}"))
}

fn is_assignment_operator(token: &Token) -> bool {
	token.kind == TokenKind::Operator && matches!(token.text.trim(), "to" | "=" | "into")
}

/// `(if:)`, `(unless:)`, `(elseif:)` and `(else:)` with their hooks.
///
/// When only whitespace and line breaks separate the hook from a following
/// `elseif` or `else`, the returned index points just before that macro so
/// the driver dispatches it next and the chain stays one statement. An
/// `elseif` or `else` that does not continue such a chain is rejected.
pub fn conditional(
	transcoder: &mut Transcoder<'_>,
	tokens: &[Token],
	index: usize,
	usage: MacroUsage,
) -> TranscodeResult<usize> {
	let token = &tokens[index];
	let keyword = transcoder.resolve_name(&token.name);

	match usage {
		MacroUsage::Line => {
			return Err(TranscodeError::usage(
				&token.name,
				usage,
				"must be followed by a hook",
				token.location(),
			));
		}
		MacroUsage::Inline => {
			return Err(TranscodeError::usage(
				&token.name,
				usage,
				"cannot be used inline",
				token.location(),
			));
		}
		MacroUsage::LineAndHook => {}
	}

	let is_else = keyword == "else";
	let continues_chain = transcoder.take_open_chain();

	if matches!(keyword.as_str(), "elseif" | "else") && !continues_chain {
		return Err(TranscodeError::structural(
			&token.name,
			"must directly follow the hook of an `if`, `unless` or `elseif`",
			token.location(),
		));
	}

	let Some(hook_index) = attached_hook(tokens, index) else {
		return Err(TranscodeError::structural(
			&token.name,
			"no hook follows the macro",
			token.location(),
		));
	};

	if is_else {
		transcoder.code().append_line("else {");
	} else {
		if is_blank_span(&token.children) {
			return Err(TranscodeError::structural(
				&token.name,
				"needs a condition",
				token.location(),
			));
		}

		let mut condition = transcoder.render_expression(&token.children)?;
		if keyword == "unless" {
			condition = format!("!({condition})");
		}

		let branch = if keyword == "elseif" { "else if" } else { "if" };
		transcoder
			.code()
			.append_line(&format!("{branch} ({condition}) {{"));
	}

	transcoder.code().increase_indent();
	transcoder.generate_body(&tokens[hook_index].children)?;
	transcoder.code().decrease_indent();
	transcoder.code().indent();
	transcoder.code().append_line("}");

	if !is_else {
		if let Some(next) = next_significant(tokens, hook_index) {
			let next_token = &tokens[next];
			if next_token.is_macro()
				&& matches!(
					transcoder.resolve_name(&next_token.name).as_str(),
					"elseif" | "else"
				) {
				transcoder.open_chain();
				return Ok(next - 1);
			}
		}
	}

	Ok(hook_index)
}

/// Whether a link macro runs an action hook when clicked. `(link-goto:)` only
/// navigates.
fn supports_action(keyword: &str) -> bool {
	keyword != "linkgoto"
}

/// `(link:)`, `(link-reveal:)`, `(link-repeat:)` and `(link-goto:)`.
pub fn link(
	transcoder: &mut Transcoder<'_>,
	tokens: &[Token],
	index: usize,
	usage: MacroUsage,
) -> TranscodeResult<usize> {
	let token = &tokens[index];
	let keyword = transcoder.resolve_name(&token.name);

	if usage == MacroUsage::Inline {
		return Err(TranscodeError::usage(
			&token.name,
			usage,
			"cannot be used inside another macro",
			token.location(),
		));
	}

	let spans = split_commas(&token.children);
	let text_span = spans.first().copied().unwrap_or_default();
	if is_blank_span(text_span) {
		return Err(TranscodeError::structural(
			&token.name,
			"needs the link text as its first argument",
			token.location(),
		));
	}

	if spans.iter().skip(2).any(|span| !is_blank_span(span)) {
		return Err(TranscodeError::structural(
			&token.name,
			"takes at most the link text and a passage name",
			token.location(),
		));
	}

	let text = transcoder.render_expression(text_span)?;
	let passage = match spans.get(1) {
		Some(span) if !is_blank_span(span) => transcoder.render_expression(span)?,
		_ => "null".to_string(),
	};

	let mut last = index;
	let action = if supports_action(&keyword) {
		if usage != MacroUsage::LineAndHook {
			return Err(TranscodeError::usage(
				&token.name,
				usage,
				"must be followed by a hook",
				token.location(),
			));
		}

		let Some(hook_index) = attached_hook(tokens, index) else {
			return Err(TranscodeError::structural(
				&token.name,
				"no hook follows the macro",
				token.location(),
			));
		};

		last = hook_index;
		transcoder.generate_fragment(&tokens[hook_index].children)?
	} else {
		"null".to_string()
	};

	transcoder
		.code()
		.append_line(&format!("yield link({text}, {passage}, {action});"));

	Ok(last)
}

/// `(go-to:)`: abort the passage and navigate.
pub fn goto(
	transcoder: &mut Transcoder<'_>,
	tokens: &[Token],
	index: usize,
	usage: MacroUsage,
) -> TranscodeResult<usize> {
	let token = &tokens[index];

	if usage == MacroUsage::Inline {
		return Err(TranscodeError::usage(
			&token.name,
			usage,
			"cannot be used inside another macro",
			token.location(),
		));
	}

	let spans = split_commas(&token.children);
	let target_span = spans.first().copied().unwrap_or_default();
	if is_blank_span(target_span) {
		return Err(TranscodeError::structural(
			&token.name,
			"needs a passage name",
			token.location(),
		));
	}

	if spans.iter().skip(1).any(|span| !is_blank_span(span)) {
		return Err(TranscodeError::structural(
			&token.name,
			"takes a single passage name",
			token.location(),
		));
	}

	let target = transcoder.render_expression(target_span)?;
	transcoder
		.code()
		.append_line(&format!("yield abort({target});"));

	Ok(index)
}

/// `(hook: name)[...]`: register the hook as a named fragment.
pub fn hook(
	transcoder: &mut Transcoder<'_>,
	tokens: &[Token],
	index: usize,
	usage: MacroUsage,
) -> TranscodeResult<usize> {
	let token = &tokens[index];

	if usage != MacroUsage::LineAndHook {
		return Err(TranscodeError::usage(
			&token.name,
			usage,
			"must be followed by a hook",
			token.location(),
		));
	}

	if is_blank_span(&token.children) {
		return Err(TranscodeError::structural(
			&token.name,
			"needs a hook name",
			token.location(),
		));
	}

	let Some(hook_index) = attached_hook(tokens, index) else {
		return Err(TranscodeError::structural(
			&token.name,
			"no hook follows the macro",
			token.location(),
		));
	};

	let name = transcoder.render_expression(&token.children)?;
	let fragment = transcoder.generate_fragment(&tokens[hook_index].children)?;
	transcoder
		.code()
		.append_line(&format!("yield fragment({name}, {fragment});"));

	Ok(hook_index)
}

/// `(print:)`: output a value, or produce it when nested in another macro.
pub fn print(
	transcoder: &mut Transcoder<'_>,
	tokens: &[Token],
	index: usize,
	usage: MacroUsage,
) -> TranscodeResult<usize> {
	let token = &tokens[index];

	if is_blank_span(&token.children) {
		return Err(TranscodeError::structural(
			&token.name,
			"needs a value to print",
			token.location(),
		));
	}

	let value = transcoder.render_expression(&token.children)?;
	if usage == MacroUsage::Inline {
		transcoder.code().append(&value);
	} else {
		transcoder
			.code()
			.append_line(&format!("yield text({value});"));
	}

	Ok(index)
}

/// Any macro without a dedicated handler becomes a call on the runtime macro
/// library.
pub fn runtime_macro(
	transcoder: &mut Transcoder<'_>,
	tokens: &[Token],
	index: usize,
	usage: MacroUsage,
) -> TranscodeResult<usize> {
	let token = &tokens[index];

	let Some(function) = transcoder.escape_identifier(&normalize_name(&token.name)) else {
		return Err(TranscodeError::UnknownConstruct {
			name: token.name.clone(),
			position: token.location(),
		});
	};

	let arguments = transcoder.render_expression(&token.children)?;
	let runtime = &transcoder.generator().options().runtime;
	let call = format!("{runtime}.{function}({arguments})");

	if usage == MacroUsage::Inline {
		transcoder.code().append(&call);
	} else {
		transcoder.code().append_line(&format!("{call};"));
	}

	Ok(index)
}
