//! # Assess Subcommand
//!
//! Drives the assessment walker from an answers file instead of an
//! interactive session. The file maps controls to judgements:
//!
//! ```yaml
//! "1-1-1":
//!   status: partially-compliant
//!   impact: high
//!   likelihood: medium
//!   notes: Strategy drafted, not yet approved
//! "2-3-1":
//!   status: compliant
//!   impact: medium
//!   likelihood: low
//! ```
//!
//! A key matches a control by its full text or by its leading code (the
//! first whitespace-separated token). A code shared by several controls
//! is rejected; use the full text for those. Controls without an answer are
//! skipped, exactly as the interactive skip does. JSON answers files work
//! too, since JSON is valid YAML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use gapwise_catalog::ControlCatalog;
use gapwise_core::{ControlStatus, Impact, Likelihood};
use gapwise_report::AssessmentResult;
use gapwise_state::AssessmentWalker;
use serde::Deserialize;

use crate::submit::{print_receipt, submit_result, SubmissionTarget};

/// Arguments for the `gapwise assess` subcommand.
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Answers file (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub answers: PathBuf,

    /// Catalog file. Defaults to the embedded ECC catalog.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Write the JSON report here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Submit the result after writing it.
    #[arg(long, requires_all = ["assessor", "project"])]
    pub submit: bool,

    #[command(flatten)]
    pub target: SubmissionTarget,
}

/// One answered control.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Answer {
    pub status: ControlStatus,
    pub impact: Impact,
    pub likelihood: Likelihood,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Answers keyed by control text or control code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, Answer>);

impl Answers {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("answers file is malformed")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answers {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| path.display().to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Map every key onto exactly one control of `catalog`, keyed by
    /// control text. A full-text match wins over a code match.
    fn resolve<'c>(&self, catalog: &'c ControlCatalog) -> Result<BTreeMap<&'c str, &Answer>> {
        let mut resolved = BTreeMap::new();
        let mut unknown = Vec::new();
        let mut ambiguous = Vec::new();
        let mut repeated = Vec::new();

        for (key, answer) in &self.0 {
            let control = match catalog.iter().find(|e| e.control == key.as_str()) {
                Some(entry) => entry.control,
                None => {
                    let mut by_code = catalog
                        .iter()
                        .filter(|e| control_code(e.control) == Some(key.as_str()));
                    match (by_code.next(), by_code.next()) {
                        (Some(entry), None) => entry.control,
                        (None, _) => {
                            unknown.push(key.as_str());
                            continue;
                        }
                        (Some(_), Some(_)) => {
                            ambiguous.push(key.as_str());
                            continue;
                        }
                    }
                }
            };
            if resolved.insert(control, answer).is_some() {
                repeated.push(control);
            }
        }

        if !unknown.is_empty() {
            bail!("answers reference unknown controls: {}", unknown.join(", "));
        }
        if !ambiguous.is_empty() {
            bail!(
                "answer keys match more than one control, use the full control text: {}",
                ambiguous.join(", ")
            );
        }
        if !repeated.is_empty() {
            bail!("controls answered more than once: {}", repeated.join(", "));
        }
        Ok(resolved)
    }
}

fn control_code(control: &str) -> Option<&str> {
    control.split_whitespace().next()
}

/// Walk every control of `catalog`, judging answered controls and
/// skipping the rest.
///
/// # Errors
///
/// Fails if an answer key matches no control, names a code shared by
/// several controls, or answers a control already answered by another key.
pub fn run_walk(catalog: Arc<ControlCatalog>, answers: &Answers) -> Result<AssessmentResult> {
    let resolved = answers.resolve(&catalog)?;

    let mut walker = AssessmentWalker::new(Arc::clone(&catalog));
    let mut skipped = 0usize;
    while let Some(current) = walker.current() {
        match resolved.get(current.control.as_str()) {
            Some(answer) => {
                walker.submit(
                    answer.status,
                    answer.impact,
                    answer.likelihood,
                    answer.notes.clone(),
                )?;
            }
            None => {
                tracing::debug!(control = %current.control, "no answer; skipping");
                skipped += 1;
                walker.skip()?;
            }
        }
    }
    tracing::info!(answered = answers.len(), skipped, "walk finished");

    walker
        .result()
        .cloned()
        .context("walk ended without producing a result")
}

/// Execute the assess subcommand.
///
/// Returns exit code: 0 on success, 2 if the requested submission failed.
/// The report is written before submission is attempted.
pub fn run_assess(args: &AssessArgs) -> Result<u8> {
    let catalog = Arc::new(crate::load_catalog(args.catalog.as_deref())?);
    let answers = Answers::load(&args.answers)?;
    let result = run_walk(catalog, &answers)?;
    let report = serde_json::to_string_pretty(&result).context("failed to serialize report")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{report}\n"))
                .with_context(|| format!("failed to write report {}", path.display()))?;
            print!("{}", summary(&result));
            println!("Report written to {}", path.display());
        }
        None => println!("{report}"),
    }

    if !args.submit {
        return Ok(0);
    }
    match submit_result(&args.target, &result) {
        Ok(receipt) => {
            print_receipt(&receipt);
            Ok(0)
        }
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("submission failed: {e:#}");
            if let Some(path) = &args.output {
                eprintln!(
                    "report kept at {}; retry with `gapwise submit {}`",
                    path.display(),
                    path.display()
                );
            }
            Ok(2)
        }
    }
}

/// Human-readable score summary.
pub fn summary(result: &AssessmentResult) -> String {
    let mut out = format!(
        "Overall compliance: {}% (weighted {}%)\n",
        result.overall_score, result.weighted_overall_score
    );
    for (domain, score) in result.domain_scores.iter() {
        out.push_str(&format!("  {domain}: {score}%\n"));
    }
    out.push_str(&format!(
        "High-risk controls: {}\n",
        result.high_risk_controls.len()
    ));
    for rec in &result.recommendations {
        out.push_str(&format!("  * {rec}\n"));
    }
    out
}
