#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn metalink_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("metalink"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("METALINK_LOG");
	cmd
}

/// Write a content unit with YAML frontmatter under `root/content`.
pub fn write_lesson(root: &Path, id: &str, title: &str, references: &[&str]) -> std::io::Result<()> {
	let references = references
		.iter()
		.map(|reference| format!("\"{reference}\""))
		.collect::<Vec<_>>()
		.join(", ");
	write_file(
		root,
		&format!("content/{id}.md"),
		&format!("---\ntitle: {title}\nreferences: [{references}]\n---\n\n# {title}\n"),
	)
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}
