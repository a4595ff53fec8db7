//! Implementation of the `depgraph generate` and `depgraph aggregate` commands.
//!
//! Both commands share one path: load settings, manifest, and lock file,
//! assemble the document in the requested mode, then either print the JSON
//! report or write the JSON and XML reports under the project directory.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;

use depgraph_core::{
  BomMode, LOCK_FILENAME, LockFile, MANIFEST_FILENAME, Manifest, SETTINGS_FILENAME, Settings,
  assemble, render_json, write_reports,
};

use crate::output::{format_duration, symbols};

pub fn cmd_generate(
  project: &Path,
  config: Option<&Path>,
  mode: BomMode,
  print: bool,
  no_serial: bool,
  verbose: bool,
) -> Result<()> {
  let start = Instant::now();

  let settings_path = config
    .map(Path::to_path_buf)
    .unwrap_or_else(|| project.join(SETTINGS_FILENAME));
  let mut settings = Settings::load(&settings_path)
    .with_context(|| format!("Failed to load settings: {}", settings_path.display()))?
    .unwrap_or_default();
  if no_serial {
    settings.include_serial_number = false;
  }

  let manifest_path = project.join(MANIFEST_FILENAME);
  let manifest = Manifest::load(&manifest_path)
    .with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;

  let lock_path = project.join(LOCK_FILENAME);
  let Some(lock) = LockFile::load(&lock_path)
    .with_context(|| format!("Failed to load lock file: {}", lock_path.display()))?
  else {
    bail!(
      "no {} found in {}; run `cargo generate-lockfile` first",
      LOCK_FILENAME,
      project.display()
    );
  };

  let bom = assemble(&settings, &manifest, &lock, mode);

  if print {
    print!("{}", render_json(&bom)?);
    return Ok(());
  }

  // Relative report paths land inside the project directory
  let json_path = project.join(settings.json_path());
  let xml_path = project.join(settings.xml_path());
  write_reports(&bom, &json_path, &xml_path).context("Failed to write reports")?;

  println!(
    "{} {} component(s) for {}",
    symbols::SUCCESS.green(),
    bom.components.len(),
    bom.metadata.component.name.cyan()
  );
  if verbose {
    for component in &bom.components {
      println!(
        "  {} {}@{}",
        symbols::INFO.dimmed(),
        component.name,
        component.version
      );
    }
  }
  println!("  {} JSON: {}", symbols::ARROW.dimmed(), json_path.display());
  println!("  {} XML:  {}", symbols::ARROW.dimmed(), xml_path.display());
  println!(
    "  {} Duration: {}",
    symbols::INFO.dimmed(),
    format_duration(start.elapsed()).dimmed()
  );

  Ok(())
}
