//! The textual stage that runs before lexing: `#version` detection and
//! macro expansion through an external C preprocessor.

use std::io::Write;
use std::path::Path;
use std::process::{Command,Stdio};

use crate::{Error,Result};

/// Detects a leading `#version 300 es` line (whitespace-tolerant). When
/// present the line is blanked, not removed, so downstream line numbers
/// are unchanged. Anything else leaves the text untouched at version 100.
pub(crate) fn strip_version(source: &str) -> (String, u32) {
  let first = source.lines().next().unwrap_or("");
  if !is_version_300(first) {
    return (source.to_string(), 100);
  }

  let rest = match source.find('\n') {
    Some(i) => format!("\n{}", &source[i + 1..]),
    None => String::new(),
  };
  (rest, 300)
}

fn is_version_300(line: &str) -> bool {
  let line = line.trim_start();
  let rest = match line.strip_prefix('#') {
    Some(rest) => rest,
    None => return false,
  };
  let parts: Vec<&str> = rest.split_whitespace().collect();
  parts == ["version", "300", "es"]
}

/// Pipes the source through `<cpp> -DGL_ES` and strips the line markers
/// cpp leaves behind. Failure to launch or talk to the subprocess is
/// fatal to the parse; diagnostics on its stderr are logged only.
pub(crate) fn expand(source: &str, cpp_path: &Path) -> Result<String> {
  if source.trim().is_empty() {
    return Ok(source.to_string());
  }

  let command = cpp_path.display().to_string();
  log::debug!("Preprocess command: {} -DGL_ES", command);

  let invocation_error = |e| Error::Preprocessor{ command: command.clone(), source: e };

  let mut child = Command::new(cpp_path)
    .arg("-DGL_ES")
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .map_err(invocation_error)?;

  if let Some(mut stdin) = child.stdin.take() {
    stdin.write_all(source.as_bytes()).map_err(invocation_error)?;
  }

  let output = child.wait_with_output().map_err(invocation_error)?;
  if !output.stderr.is_empty() {
    log::error!("Preprocess error: {}", String::from_utf8_lossy(&output.stderr).trim_end());
  }

  Ok(strip_line_markers(&String::from_utf8_lossy(&output.stdout)))
}

/// Replaces `# <n> "<file>"` markers with enough blank lines to keep the
/// following lines near their original numbers.
fn strip_line_markers(text: &str) -> String {
  let mut new_lines: Vec<&str> = vec![];
  let mut line_number = 1usize;

  for line in text.lines() {
    match line_marker_target(line) {
      Some(next_line_number) => {
        for _ in line_number..next_line_number {
          new_lines.push("");
        }
        line_number = next_line_number;
      },
      None => {
        new_lines.push(line);
        line_number += 1;
      },
    }
  }

  new_lines.join("\n")
}

fn line_marker_target(line: &str) -> Option<usize> {
  let rest = line.strip_prefix("# ")?;
  let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
  let number = rest[..digits_end].parse().ok()?;
  if rest[digits_end..].trim_start().starts_with('"') {
    Some(number)
  } else {
    None
  }
}

#[cfg(test)]
#[test]
fn test_strip_version() {
  let (text, version) = strip_version("#version 300 es\nvoid main() {}\n");
  assert_eq!(version, 300);
  assert_eq!(text, "\nvoid main() {}\n");

  let (_, version) = strip_version("  \t #  version   300  es  \nx");
  assert_eq!(version, 300);

  // only 300 es is recognized
  let (text, version) = strip_version("#version 310 es\nx");
  assert_eq!(version, 100);
  assert_eq!(text, "#version 310 es\nx");

  let (text, version) = strip_version("");
  assert_eq!(version, 100);
  assert_eq!(text, "");

  // no trailing newline after the version line
  let (text, version) = strip_version("  #version 300 es");
  assert_eq!(version, 300);
  assert_eq!(text, "");
}

#[cfg(test)]
#[test]
fn test_strip_line_markers() {
  let text = "# 1 \"<stdin>\"\nfoo\n# 5 \"header.h\"\nbar";
  assert_eq!(strip_line_markers(text), "foo\n\n\n\nbar");

  // markers that jump backwards never remove lines
  let text = "foo\nbar\n# 1 \"<stdin>\"\nbaz";
  assert_eq!(strip_line_markers(text), "foo\nbar\nbaz");

  assert_eq!(strip_line_markers("plain\ntext"), "plain\ntext");
}
