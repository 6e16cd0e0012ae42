mod common;

use metalink_core::AnyEmptyResult;
use rstest::rstest;
use serde_json::Value;

#[test]
fn check_passes_for_linked_content() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_lesson(tmp.path(), "foo", "Foo", &[])?;
	common::write_lesson(tmp.path(), "bar", "Bar", &["foo"])?;

	common::metalink_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Check passed: 2 content unit(s), 1 reference(s) resolved.",
		));

	Ok(())
}

#[test]
fn check_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_lesson(tmp.path(), "a", "A", &["b"])?;
	common::write_lesson(tmp.path(), "b", "B", &["a"])?;

	let output = common::metalink_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], true);
	assert_eq!(json["units"], 2);
	assert_eq!(json["references"], 2);
	assert_eq!(json["cycle"], serde_json::json!(["a", "b", "a"]));

	Ok(())
}

#[test]
fn check_warns_about_allowed_cycles() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_lesson(tmp.path(), "a", "A", &["b"])?;
	common::write_lesson(tmp.path(), "b", "B", &["a"])?;

	let output = common::metalink_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let stderr = String::from_utf8(output.stderr)?;
	assert_eq!(stderr.matches("reference cycle").count(), 1, "stderr was `{stderr}`");
	assert!(stderr.contains("a -> b -> a"), "stderr was `{stderr}`");

	Ok(())
}

#[test]
fn check_reports_which_files_share_an_identifier() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "content/foo.md", "---\ntitle: Foo\n---\n")?;
	common::write_file(tmp.path(), "content/foo.mdx", "---\ntitle: Foo\n---\n")?;

	common::metalink_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("`foo.md`"))
		.stderr(predicates::str::contains("`foo.mdx`"));

	Ok(())
}

#[test]
fn check_rejects_cycles_when_forbidden() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("metalink.toml"),
		"[resolve]\nforbid_cycles = true\n",
	)?;
	common::write_lesson(tmp.path(), "a", "A", &["b"])?;
	common::write_lesson(tmp.path(), "b", "B", &["a"])?;

	common::metalink_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("reference cycle detected"));

	Ok(())
}

#[rstest]
#[case::duplicate_identifier(
	&[("content/foo.md", "---\ntitle: Foo\n---\n"), ("content/foo.mdx", "---\ntitle: Foo\n---\n")],
	"duplicate identifier `foo`"
)]
#[case::missing_title(&[("content/foo.md", "---\nsummary: x\n---\n")], "missing `title`")]
#[case::no_frontmatter(&[("content/foo.md", "# Foo\n")], "no frontmatter block found")]
#[case::invalid_config(
	&[("metalink.toml", "[content]\ndir = 5\n"), ("content/foo.md", "---\ntitle: Foo\n---\n")],
	"failed to parse config file"
)]
#[case::missing_content_dir(&[("readme.md", "# Readme\n")], "failed to discover content")]
fn check_reports_errors(
	#[case] files: &[(&str, &str)],
	#[case] expected: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	for (path, content) in files {
		common::write_file(tmp.path(), path, content)?;
	}

	common::metalink_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains(expected));

	Ok(())
}

#[test]
fn check_uses_dot_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		tmp.path(),
		".config/metalink.toml",
		"[content]\ndir = \"lessons\"\n\n[metadata]\nreferences_key = \"prerequisites\"\n",
	)?;
	common::write_file(tmp.path(), "lessons/intro.md", "---\ntitle: Intro\n---\n")?;
	common::write_file(
		tmp.path(),
		"lessons/traits.md",
		"---\ntitle: Traits\nprerequisites: [intro]\n---\n",
	)?;

	let expected_path = tmp.path().join(".config/metalink.toml").display().to_string();
	common::metalink_cmd()
		.arg("check")
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains(format!("Using config: {expected_path}")))
		.stdout(predicates::str::contains("2 content unit(s), 1 reference(s)"));

	Ok(())
}

#[test]
fn check_respects_exclude_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("metalink.toml"),
		"[exclude]\npatterns = [\"drafts/\"]\n",
	)?;
	common::write_lesson(tmp.path(), "intro", "Intro", &[])?;
	common::write_lesson(tmp.path(), "drafts/broken", "Broken", &["ghost"])?;

	common::metalink_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("1 content unit(s)"));

	Ok(())
}
