use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vyper_guard::classifier::Classifier;
use vyper_guard_detectors::LockReuseClassifier;

use super::load_config;
use crate::output;
use crate::OutputFormat;

pub fn run(path: &Path, format: OutputFormat, config: Option<PathBuf>, no_color: bool) -> Result<()> {
    let config = load_config(config)?;
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let classifier = LockReuseClassifier::default()
        .with_extra_safe_calls(config.classifier.extra_safe_calls.iter().cloned());
    let assessment = classifier.assess(&source);

    match format {
        OutputFormat::Json => output::json::print(&assessment)?,
        OutputFormat::Text => output::text::print_assessment(path, &assessment, no_color),
    }

    // Exit code
    if assessment.vulnerable {
        std::process::exit(1);
    }

    Ok(())
}
