mod common;

use storyc_core::AnyEmptyResult;

#[test]
fn lists_builtin_macros() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::storyc_cmd()
		.arg("macros")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("linkgoto"))
		.stdout(predicates::str::contains("elseif"))
		.stdout(predicates::str::contains("14 macro(s)"))
		.stdout(predicates::str::contains("Macros.<name>(...)"));

	Ok(())
}

#[test]
fn lists_aliases_with_their_target() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join(".storyc.toml"),
		"[output]\nruntime = \"Lib\"\n\n[macros]\nshow = \"link-reveal\"\n",
	)?;

	common::storyc_cmd()
		.arg("macros")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("-> linkreveal"))
		.stdout(predicates::str::contains("15 macro(s)"))
		.stdout(predicates::str::contains("Lib.<name>(...)"));

	Ok(())
}

#[test]
fn no_subcommand_exits_with_error() {
	common::storyc_cmd()
		.assert()
		.code(2)
		.stderr(predicates::str::contains("storyc --help"));
}
