use crate::ExpressionRenderer;
use crate::HarloweExpressions;
use crate::IdentifierEscaper;
use crate::MacroTable;
use crate::Position;
use crate::ScriptIdentifiers;
use crate::Story;
use crate::StorycConfig;
use crate::Token;
use crate::TranscodeError;
use crate::TranscodeResult;
use crate::Transcoder;
use crate::expression::quote;

/// Default nesting cap for hooks, macros and groupings.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings that shape the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
	/// Text of one indentation level.
	pub indent: String,
	/// Receiver of runtime macro calls, e.g. `Macros.either(1, 2)`.
	pub runtime: String,
	/// Maximum nesting depth before generation fails.
	pub max_depth: usize,
	/// Whether story output starts with a generated-file comment.
	pub header: bool,
}

impl Default for GenerateOptions {
	fn default() -> Self {
		Self {
			indent: "\t".to_string(),
			runtime: "Macros".to_string(),
			max_depth: DEFAULT_MAX_DEPTH,
			header: true,
		}
	}
}

/// The read-only half of code generation: macro table, expression renderer,
/// identifier escaper and options. A `Generator` can be shared between
/// threads; each compilation runs in its own [`Transcoder`] session.
pub struct Generator {
	table: MacroTable,
	expressions: Box<dyn ExpressionRenderer>,
	identifiers: Box<dyn IdentifierEscaper>,
	options: GenerateOptions,
}

impl Default for Generator {
	fn default() -> Self {
		Self::new(GenerateOptions::default())
	}
}

impl Generator {
	pub fn new(options: GenerateOptions) -> Self {
		Self {
			table: MacroTable::builtin(),
			expressions: Box::new(HarloweExpressions::default()),
			identifiers: Box::new(ScriptIdentifiers),
			options,
		}
	}

	/// Build a generator from a loaded `storyc.toml`.
	pub fn from_config(config: &StorycConfig) -> TranscodeResult<Self> {
		let mut table = MacroTable::builtin();
		for (alias, target) in &config.macros {
			table.alias(alias, target)?;
		}

		let expressions = HarloweExpressions {
			variables: config.output.variables.clone(),
			temporaries: config.output.temporaries.clone(),
		};

		let options = GenerateOptions {
			indent: config.output.indent.clone(),
			runtime: config.output.runtime.clone(),
			max_depth: config.limits.max_depth,
			header: config.output.header,
		};

		Ok(Self::new(options)
			.with_table(table)
			.with_expressions(expressions))
	}

	#[must_use]
	pub fn with_table(mut self, table: MacroTable) -> Self {
		self.table = table;
		self
	}

	#[must_use]
	pub fn with_expressions(mut self, expressions: impl ExpressionRenderer + 'static) -> Self {
		self.expressions = Box::new(expressions);
		self
	}

	#[must_use]
	pub fn with_identifiers(mut self, identifiers: impl IdentifierEscaper + 'static) -> Self {
		self.identifiers = Box::new(identifiers);
		self
	}

	pub fn table(&self) -> &MacroTable {
		&self.table
	}

	pub fn expressions(&self) -> &dyn ExpressionRenderer {
		self.expressions.as_ref()
	}

	pub fn identifiers(&self) -> &dyn IdentifierEscaper {
		self.identifiers.as_ref()
	}

	pub fn options(&self) -> &GenerateOptions {
		&self.options
	}

	/// Start a new compilation session.
	pub fn session(&self) -> Transcoder<'_> {
		Transcoder::new(self)
	}

	/// Compile the body of one passage into statements at indentation zero.
	pub fn compile_passage(&self, tokens: &[Token]) -> TranscodeResult<String> {
		let mut transcoder = self.session();
		transcoder.generate_body(tokens)?;
		Ok(transcoder.into_code())
	}

	/// Compile a whole story: one `story.passage(...)` registration per
	/// passage, in input order.
	pub fn compile_story(&self, story: &Story) -> TranscodeResult<String> {
		let mut output = String::new();

		if self.options.header {
			if story.name.is_empty() {
				output.push_str("// Generated by storyc. Do not edit.\n\n");
			} else {
				let name = quote(&story.name, Position::default())?;
				output.push_str(&format!("// Generated by storyc from {name}. Do not edit.\n\n"));
			}
		}

		for (position, passage) in story.passages.iter().enumerate() {
			tracing::debug!(passage = %passage.name, "compiling passage");

			let body = self.passage_body(&passage.tokens).map_err(|e| {
				TranscodeError::InPassage {
					passage: passage.name.clone(),
					source: Box::new(e),
				}
			})?;

			if position > 0 {
				output.push('\n');
			}

			let name = quote(&passage.name, Position::default())?;
			output.push_str(&format!("story.passage({name}, function* () {{\n"));
			output.push_str(&body);
			output.push_str("});\n");
		}

		if let Some(start) = story.start.as_deref().filter(|start| !start.is_empty()) {
			if story.passage(start).is_none() {
				return Err(TranscodeError::StoryParse(format!(
					"start passage `{start}` does not exist"
				)));
			}

			output.push_str(&format!(
				"\nstory.start({});\n",
				quote(start, Position::default())?
			));
		}

		tracing::debug!(story = %story.name, passages = story.passages.len(), "compiled story");

		Ok(output)
	}

	fn passage_body(&self, tokens: &[Token]) -> TranscodeResult<String> {
		let mut transcoder = Transcoder::with_indentation(self, 1);
		transcoder.generate_body(tokens)?;
		Ok(transcoder.into_code())
	}
}
