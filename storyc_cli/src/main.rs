use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use storyc_cli::Commands;
use storyc_cli::StorycCli;
use storyc_core::AnyResult;
use storyc_core::Generator;
use storyc_core::Story;
use storyc_core::StorycConfig;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
}

/// What a `compile` run ended with.
enum Outcome {
	Written,
	UpToDate,
	Stale,
}

fn main() {
	let args = StorycCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Compile {
			input,
			output,
			check,
			diff,
		}) => run_compile(&args, input, output.as_deref(), *check, *diff),
		Some(Commands::Macros) => run_macros(&args).map(|()| Outcome::Written),
		None => {
			eprintln!("No subcommand specified. Run `storyc --help` for usage.");
			process::exit(2);
		}
	};

	match result {
		Ok(Outcome::Stale) => process::exit(1),
		Ok(Outcome::Written | Outcome::UpToDate) => {}
		Err(e) => {
			match e.downcast::<storyc_core::TranscodeError>() {
				Ok(error) => {
					let report: miette::Report = (*error).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Log to stderr. `--verbose` forces `debug`; otherwise `RUST_LOG` decides,
/// falling back to warnings only.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &StorycCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_generator(root: &Path) -> AnyResult<Generator> {
	let config = StorycConfig::load(root)?.unwrap_or_default();
	Ok(Generator::from_config(&config)?)
}

fn run_compile(
	args: &StorycCli,
	input: &Path,
	output: Option<&Path>,
	check: bool,
	diff: bool,
) -> AnyResult<Outcome> {
	let root = resolve_root(args);
	let generator = load_generator(&root)?;
	let story = Story::from_path(input)?;
	let code = generator.compile_story(&story)?;

	let output = output.map_or_else(|| input.with_extension("js"), Path::to_path_buf);

	if !check {
		std::fs::write(&output, &code)?;
		println!(
			"{} {} passage(s) into {}",
			colored!("Compiled", green),
			story.passages.len(),
			output.display()
		);
		return Ok(Outcome::Written);
	}

	let current = match std::fs::read_to_string(&output) {
		Ok(current) => current,
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
		Err(e) => return Err(e.into()),
	};

	if current == code {
		println!("{} is up to date.", output.display());
		return Ok(Outcome::UpToDate);
	}

	eprintln!(
		"{} {} is out of date.",
		colored!("stale:", yellow),
		output.display()
	);
	if diff {
		print_diff(&current, &code);
	}
	eprintln!(
		"{}",
		colored!("Run `storyc compile` to regenerate it.", dimmed)
	);

	Ok(Outcome::Stale)
}

fn run_macros(args: &StorycCli) -> AnyResult<()> {
	let root = resolve_root(args);
	let generator = load_generator(&root)?;
	let table = generator.table();

	for (name, target) in table.entries() {
		match target {
			Some(target) => println!("{name:<12} {}", colored!(format!("-> {target}"), dimmed)),
			None => println!("{name}"),
		}
	}

	println!();
	println!(
		"{} macro(s). Any other name calls `{}.<name>(...)`.",
		table.len(),
		generator.options().runtime
	);

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}
