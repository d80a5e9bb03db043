use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn storyc_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("storyc"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Copy a fixture story into `dir` and return its new path.
#[allow(dead_code)]
pub fn copy_fixture(name: &str, dir: &Path) -> PathBuf {
	let source = Path::new(env!("CARGO_MANIFEST_DIR"))
		.join("tests/fixtures")
		.join(name);
	let target = dir.join(name);
	std::fs::copy(&source, &target)
		.unwrap_or_else(|e| panic!("copy {} -> {}: {e}", source.display(), target.display()));
	target
}
