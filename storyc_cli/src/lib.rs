use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Compile tokenized Harlowe stories into generator-based narrative scripts.",
	long_about = "storyc compiles the token trees of a Harlowe story into a script of \
	              generator functions. Running a passage function yields story events: text, \
	              line breaks, links, named fragments and navigation.\n\nQuick start:\n  \
	              storyc compile story.json          Write story.js\n  storyc compile \
	              story.json --check  Verify story.js is up to date\n  storyc macros         \
	              List the macros with dedicated code generation"
)]
pub struct StorycCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory searched for `storyc.toml`.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Log each compiled passage to stderr.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Compile a tokenized story into a script.
	///
	/// Reads the story JSON written by the tokenizer, generates one passage
	/// function per passage and writes the script next to the input with a
	/// `.js` extension unless `--output` names another file.
	Compile {
		/// The tokenized story JSON file.
		input: PathBuf,

		/// Where to write the generated script.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Compare the generated script with the existing output instead of
		/// writing it. Exits with status 1 when the output is stale.
		#[arg(long, default_value_t = false)]
		check: bool,

		/// With `--check`, print a unified diff of a stale output.
		#[arg(long, default_value_t = false, requires = "check")]
		diff: bool,
	},
	/// List the macros with dedicated code generation.
	///
	/// Every other macro name compiles to a call on the runtime macro
	/// library. Aliases from `storyc.toml` are shown with their target.
	Macros,
}
