use crate::CodeBuffer;
use crate::Generator;
use crate::MacroUsage;
use crate::Token;
use crate::TokenKind;
use crate::TranscodeError;
use crate::TranscodeResult;
use crate::expression::join_pieces;
use crate::expression::quote;
use crate::macros;
use crate::tokens::attached_hook;

/// One compilation session: the code buffer and nesting depth of the passage
/// being generated. Sessions borrow a shared [`Generator`] and are never
/// shared themselves.
pub struct Transcoder<'a> {
	generator: &'a Generator,
	code: CodeBuffer,
	depth: usize,
	/// Set when the last conditional left its chain open for the `elseif` or
	/// `else` the driver dispatches next.
	open_chain: bool,
}

impl<'a> Transcoder<'a> {
	pub fn new(generator: &'a Generator) -> Self {
		Self::with_indentation(generator, 0)
	}

	pub fn with_indentation(generator: &'a Generator, indentation: usize) -> Self {
		Self {
			generator,
			code: CodeBuffer::with_indentation(&generator.options().indent, indentation),
			depth: 0,
			open_chain: false,
		}
	}

	pub fn generator(&self) -> &'a Generator {
		self.generator
	}

	pub fn code(&mut self) -> &mut CodeBuffer {
		&mut self.code
	}

	pub fn into_code(self) -> String {
		self.code.into_string()
	}

	/// The built-in name a macro token dispatches as, following aliases.
	pub fn resolve_name(&self, name: &str) -> String {
		self.generator.table().resolve(name)
	}

	/// Invoke the handler registered for the macro at `index`, or the runtime
	/// macro handler when none is registered. Returns the index of the last
	/// token the handler consumed.
	pub fn dispatch(
		&mut self,
		tokens: &[Token],
		index: usize,
		usage: MacroUsage,
	) -> TranscodeResult<usize> {
		let token = &tokens[index];
		let handler = self
			.generator
			.table()
			.get(&token.name)
			.unwrap_or(macros::runtime_macro);

		tracing::trace!(name = %token.name, %usage, index, "dispatching macro");
		let last = handler(self, tokens, index, usage)?;
		debug_assert!(last >= index, "handlers never move the cursor backwards");

		Ok(last)
	}

	/// Emit `tokens` as statements into the current buffer at the current
	/// indentation.
	pub fn generate_body(&mut self, tokens: &[Token]) -> TranscodeResult<()> {
		self.descend(tokens)?;
		let result = self.body(tokens);
		self.depth -= 1;
		result
	}

	/// Generate `tokens` into a deferred `function* () { ... }` value without
	/// touching the current statement stream. The caller embeds the returned
	/// text, which is laid out to sit on a line at the current indentation.
	pub fn generate_fragment(&mut self, tokens: &[Token]) -> TranscodeResult<String> {
		let indentation = self.code.indentation();
		let unit = self.code.unit().to_string();
		let nested = CodeBuffer::with_indentation(unit.as_str(), indentation + 1);

		let outer = std::mem::replace(&mut self.code, nested);
		let result = self.generate_body(tokens);
		let body = std::mem::replace(&mut self.code, outer).into_string();
		result?;

		let mut fragment = String::from("function* () {\n");
		fragment.push_str(&body);
		fragment.push_str(&unit.repeat(indentation));
		fragment.push('}');

		Ok(fragment)
	}

	/// Render an expression span and append it to the buffer.
	pub fn generate_expression(&mut self, tokens: &[Token]) -> TranscodeResult<()> {
		let rendered = self.render_expression(tokens)?;
		self.code.append(&rendered);
		Ok(())
	}

	/// Render an expression span to text. Nested macros dispatch with
	/// [`MacroUsage::Inline`]; groupings render inside parentheses; every run
	/// of other tokens goes to the configured expression renderer.
	pub fn render_expression(&mut self, tokens: &[Token]) -> TranscodeResult<String> {
		self.descend(tokens)?;
		let result = self.expression(tokens);
		self.depth -= 1;
		result
	}

	pub(crate) fn open_chain(&mut self) {
		self.open_chain = true;
	}

	/// Whether the previous dispatch left a conditional chain open. Clears
	/// the flag.
	pub(crate) fn take_open_chain(&mut self) -> bool {
		std::mem::take(&mut self.open_chain)
	}

	/// Escape a macro name for the runtime macro surface.
	pub fn escape_identifier(&self, name: &str) -> Option<String> {
		self.generator.identifiers().escape(name)
	}

	fn descend(&mut self, tokens: &[Token]) -> TranscodeResult<()> {
		let limit = self.generator.options().max_depth;
		if self.depth >= limit {
			let position = tokens.first().map(Token::location).unwrap_or_default();
			return Err(TranscodeError::structural(
				"nesting",
				format!("exceeds the maximum depth of {limit}"),
				position,
			));
		}

		self.depth += 1;
		Ok(())
	}

	fn body(&mut self, tokens: &[Token]) -> TranscodeResult<()> {
		let mut index = 0;

		while index < tokens.len() {
			let token = &tokens[index];

			match token.kind {
				TokenKind::Macro => {
					let usage = if attached_hook(tokens, index).is_some() {
						MacroUsage::LineAndHook
					} else {
						MacroUsage::Line
					};

					self.code.indent();
					index = self.dispatch(tokens, index, usage)? + 1;
					continue;
				}
				TokenKind::Br => {
					self.code.indent();
					self.code.append_line("yield lineBreak();");
				}
				TokenKind::Hook => self.unattached_hook(token)?,
				TokenKind::Variable | TokenKind::TempVariable => {
					let value = self.render_expression(std::slice::from_ref(token))?;
					self.code.indent();
					self.code.append_line(&format!("yield text({value});"));
				}
				TokenKind::TwineLink => {
					let label = quote(&token.text, token.location())?;
					let passage = match &token.passage {
						Some(passage) => quote(passage, token.location())?,
						None => "null".to_string(),
					};
					self.code.indent();
					self.code
						.append_line(&format!("yield link({label}, {passage}, null);"));
				}
				TokenKind::Grouping => {
					return Err(TranscodeError::structural(
						"grouping",
						"parentheses can only appear inside a macro",
						token.location(),
					));
				}
				_ => {
					index = self.text_run(tokens, index)?;
					continue;
				}
			}

			index += 1;
		}

		Ok(())
	}

	/// Merge consecutive prose tokens into one text statement and return the
	/// index after the run.
	fn text_run(&mut self, tokens: &[Token], start: usize) -> TranscodeResult<usize> {
		let end = tokens[start..]
			.iter()
			.position(|token| !is_prose(token.kind))
			.map_or(tokens.len(), |offset| start + offset);

		let text: String = tokens[start..end]
			.iter()
			.map(|token| token.text.as_str())
			.collect();
		let literal = quote(&text, tokens[start].location())?;

		self.code.indent();
		self.code.append_line(&format!("yield text({literal});"));

		Ok(end)
	}

	/// A hook not attached to any macro: named hooks become named fragments,
	/// anonymous hooks are generated in place.
	fn unattached_hook(&mut self, token: &Token) -> TranscodeResult<()> {
		if token.name.is_empty() {
			return self.generate_body(&token.children);
		}

		let name = quote(&token.name, token.location())?;
		let fragment = self.generate_fragment(&token.children)?;
		self.code.indent();
		self.code
			.append_line(&format!("yield fragment({name}, {fragment});"));

		Ok(())
	}

	fn expression(&mut self, tokens: &[Token]) -> TranscodeResult<String> {
		let mut pieces = Vec::new();
		let mut run_start = 0;

		for (index, token) in tokens.iter().enumerate() {
			let piece = match token.kind {
				TokenKind::Macro => self.inline_macro(tokens, index)?,
				TokenKind::Grouping => format!("({})", self.render_expression(&token.children)?),
				_ => continue,
			};

			if run_start < index {
				pieces.push(self.generator.expressions().render(&tokens[run_start..index])?);
			}

			pieces.push(piece);
			run_start = index + 1;
		}

		if run_start < tokens.len() {
			pieces.push(self.generator.expressions().render(&tokens[run_start..])?);
		}

		Ok(join_pieces(pieces))
	}

	/// Dispatch a nested macro with inline usage and capture what it wrote.
	fn inline_macro(&mut self, tokens: &[Token], index: usize) -> TranscodeResult<String> {
		let mark = self.code.len();
		self.dispatch(tokens, index, MacroUsage::Inline)?;
		Ok(self.code.take_from(mark))
	}
}

fn is_prose(kind: TokenKind) -> bool {
	matches!(
		kind,
		TokenKind::Text
			| TokenKind::Whitespace
			| TokenKind::Verbatim
			| TokenKind::Comma
			| TokenKind::String
			| TokenKind::Number
			| TokenKind::Boolean
			| TokenKind::Identifier
			| TokenKind::Operator
	)
}
