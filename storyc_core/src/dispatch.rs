use std::collections::BTreeMap;
use std::fmt::Display;

use crate::Token;
use crate::TranscodeError;
use crate::TranscodeResult;
use crate::Transcoder;
use crate::macros;

/// The syntactic position a macro occupies, fixed by the driver from the
/// surrounding tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroUsage {
	/// Nested inside another macro's argument list.
	Inline,
	/// Alone on a line with no attached hook.
	Line,
	/// Alone on a line and followed by a hook.
	LineAndHook,
}

impl Display for MacroUsage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			MacroUsage::Inline => write!(f, "inline"),
			MacroUsage::Line => write!(f, "line"),
			MacroUsage::LineAndHook => write!(f, "line-and-hook"),
		}
	}
}

/// Generates code for the macro at `index` of `tokens` and returns the index
/// of the last token it consumed. The driver resumes at the returned index
/// plus one.
pub type MacroHandler =
	fn(&mut Transcoder<'_>, &[Token], usize, MacroUsage) -> TranscodeResult<usize>;

/// Canonical macro name: lowercase with `-` and `_` removed.
pub fn normalize_name(name: &str) -> String {
	name.chars()
		.filter(|ch| *ch != '-' && *ch != '_')
		.flat_map(char::to_lowercase)
		.collect()
}

/// Built-in macro names and their handlers.
pub const BUILTIN_MACROS: [(&str, MacroHandler); 14] = [
	("set", macros::assignment),
	("put", macros::assignment),
	("move", macros::assignment),
	("if", macros::conditional),
	("unless", macros::conditional),
	("elseif", macros::conditional),
	("else", macros::conditional),
	("link", macros::link),
	("linkreveal", macros::link),
	("linkrepeat", macros::link),
	("linkgoto", macros::link),
	("goto", macros::goto),
	("hook", macros::hook),
	("print", macros::print),
];

/// Mapping from canonical macro name to handler. Names without an entry fall
/// through to the runtime macro handler.
#[derive(Debug, Clone)]
pub struct MacroTable {
	handlers: BTreeMap<String, MacroHandler>,
	aliases: BTreeMap<String, String>,
}

impl Default for MacroTable {
	fn default() -> Self {
		Self::builtin()
	}
}

impl MacroTable {
	/// An empty table: every macro becomes a runtime call.
	pub fn empty() -> Self {
		Self {
			handlers: BTreeMap::new(),
			aliases: BTreeMap::new(),
		}
	}

	pub fn builtin() -> Self {
		let mut table = Self::empty();
		for (name, handler) in BUILTIN_MACROS {
			table.register(name, handler);
		}

		table
	}

	pub fn register(&mut self, name: &str, handler: MacroHandler) {
		self.handlers.insert(normalize_name(name), handler);
	}

	/// Make `alias` dispatch like the built-in macro `target`.
	pub fn alias(&mut self, alias: &str, target: &str) -> TranscodeResult<()> {
		let canonical = normalize_name(target);
		let Some((_, handler)) = BUILTIN_MACROS
			.iter()
			.find(|(builtin, _)| *builtin == canonical)
		else {
			return Err(TranscodeError::UnknownAlias {
				alias: alias.to_string(),
				target: target.to_string(),
			});
		};

		let alias = normalize_name(alias);
		self.handlers.insert(alias.clone(), *handler);
		self.aliases.insert(alias, canonical);
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<MacroHandler> {
		self.handlers.get(&normalize_name(name)).copied()
	}

	/// The built-in name behind `name`, following aliases.
	pub fn resolve(&self, name: &str) -> String {
		let canonical = normalize_name(name);
		self.aliases.get(&canonical).cloned().unwrap_or(canonical)
	}

	/// All registered names in sorted order, with the alias target if any.
	pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
		self.handlers
			.keys()
			.map(|name| (name.as_str(), self.aliases.get(name).map(String::as_str)))
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}
