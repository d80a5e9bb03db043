use derive_more::Deref;

/// Append-only sink for generated code.
///
/// The buffer never indents on its own: a handler calls [`CodeBuffer::indent`]
/// before writing the content of a new line.
#[derive(Debug, Clone, Deref)]
pub struct CodeBuffer {
	#[deref]
	buffer: String,
	indentation: usize,
	unit: String,
}

impl CodeBuffer {
	pub fn new(unit: impl Into<String>) -> Self {
		Self::with_indentation(unit, 0)
	}

	pub fn with_indentation(unit: impl Into<String>, indentation: usize) -> Self {
		Self {
			buffer: String::new(),
			indentation,
			unit: unit.into(),
		}
	}

	pub fn indentation(&self) -> usize {
		self.indentation
	}

	/// The text of a single indentation level.
	pub fn unit(&self) -> &str {
		&self.unit
	}

	pub fn increase_indent(&mut self) {
		self.indentation += 1;
	}

	pub fn decrease_indent(&mut self) {
		self.indentation = self.indentation.saturating_sub(1);
	}

	/// Write the leading whitespace for the current depth.
	pub fn indent(&mut self) {
		for _ in 0..self.indentation {
			self.buffer.push_str(&self.unit);
		}
	}

	pub fn append(&mut self, text: &str) {
		self.buffer.push_str(text);
	}

	pub fn append_line(&mut self, text: &str) {
		self.buffer.push_str(text);
		self.buffer.push('\n');
	}

	pub fn newline(&mut self) {
		self.buffer.push('\n');
	}

	/// Remove and return everything written after byte offset `mark`.
	pub(crate) fn take_from(&mut self, mark: usize) -> String {
		self.buffer.split_off(mark)
	}

	pub fn into_string(self) -> String {
		self.buffer
	}
}
