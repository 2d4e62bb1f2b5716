use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use wfdef_builder::{LoadOptions, Loaded};
use wfdef_config::{WorkflowDef, parse_workflow};

/// wfdef - load workflow definitions and report every field that failed
#[derive(Parser)]
#[command(name = "wfdef")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Abort on the first failure instead of substituting defaults
  #[arg(long, global = true, env = "WFDEF_STRICT")]
  strict: bool,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Log as JSON lines
  #[arg(long, global = true)]
  log_json: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Load a workflow and report its failures
  Check {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },

  /// Load a workflow and print it with defaults filled in
  Normalize {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_tracing(cli.verbose, cli.log_json);

  let options = LoadOptions {
    strict: cli.strict,
  };

  match cli.command {
    Some(Commands::Check { workflow_file }) => check(&workflow_file, options)?,
    Some(Commands::Normalize { workflow_file }) => normalize(&workflow_file, options)?,
    None => {
      println!("wfdef - use --help to see available commands");
    }
  }

  Ok(())
}

fn setup_tracing(verbose: bool, json: bool) {
  let level = if verbose { Level::DEBUG } else { Level::INFO };
  let filter = EnvFilter::from_default_env().add_directive(level.into());

  if json {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .json()
      .init();
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .compact()
      .init();
  }
}

fn load_file(workflow_file: &Path, options: LoadOptions) -> Result<Loaded<WorkflowDef>> {
  let content = std::fs::read_to_string(workflow_file)
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;

  parse_workflow(&content, options)
    .with_context(|| format!("failed to load workflow file: {}", workflow_file.display()))
}

fn check(workflow_file: &Path, options: LoadOptions) -> Result<()> {
  let loaded = load_file(workflow_file, options)?;

  let leaves = loaded.failures().leaves();
  for (path, failure) in &leaves {
    warn!(path = %path, cause = %failure.cause(), "field failed to load");
  }

  for link in loaded.dangling_links() {
    warn!(
      source_id = link.source_id,
      dest_id = link.dest_id,
      "link refers to a missing node"
    );
  }

  if !leaves.is_empty() {
    bail!(
      "{}: {} field(s) failed to load",
      workflow_file.display(),
      leaves.len()
    );
  }

  info!(
    workflow = %loaded.name,
    nodes = loaded.nodes.len(),
    links = loaded.links.len(),
    "workflow loaded"
  );
  println!("{}: ok", workflow_file.display());

  Ok(())
}

fn normalize(workflow_file: &Path, options: LoadOptions) -> Result<()> {
  let loaded = load_file(workflow_file, options)?;

  if loaded.has_failures() {
    warn!(
      failures = loaded.failures().len(),
      "defaults substituted for failed fields"
    );
  }

  println!("{}", serde_json::to_string_pretty(loaded.value())?);

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn write_workflow(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
    file
      .write_all(content.as_bytes())
      .expect("failed to write workflow");
    file
  }

  const VALID: &str = r#"{
    "name": "copy",
    "nodes": [
      { "node_id": 1, "name": "Source", "factory": "io.reader", "position": { "x": 0, "y": 0 } },
      { "node_id": 2, "name": "Sink", "factory": "io.writer", "position": { "x": 120, "y": 0 } }
    ],
    "links": [{ "source_id": 1, "source_port": 0, "dest_id": 2, "dest_port": 0 }]
  }"#;

  #[test]
  fn test_check_valid_file() {
    let file = write_workflow(VALID);
    check(file.path(), LoadOptions::default()).expect("check should pass");
  }

  #[test]
  fn test_check_reports_failures() {
    let file = write_workflow(r#"{ "name": "copy", "nodes": [{ "node_id": "one" }] }"#);
    let err = check(file.path(), LoadOptions::default()).unwrap_err();
    assert!(err.to_string().contains("4 field(s) failed to load"));
  }

  #[test]
  fn test_load_file_strict() {
    let file = write_workflow(r#"{ "name": "" }"#);

    let loaded = load_file(file.path(), LoadOptions::default()).expect("lenient load");
    assert!(loaded.has_failures());

    let err = load_file(file.path(), LoadOptions::strict()).unwrap_err();
    assert!(err.to_string().contains("failed to load workflow file"));
  }

  #[test]
  fn test_load_missing_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let err = load_file(&dir.path().join("missing.json"), LoadOptions::default()).unwrap_err();
    assert!(err.to_string().contains("failed to read workflow file"));
  }

  #[test]
  fn test_normalize() {
    let file = write_workflow(r#"{ "name": "copy", "version": 500 }"#);
    normalize(file.path(), LoadOptions::default()).expect("normalize");
  }
}
