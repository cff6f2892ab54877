//! # Submit Subcommand
//!
//! Sends a saved report to the persistence service with one POST. A
//! failure leaves the report file untouched so the command can simply be
//! run again.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use gapwise_client::{ClientConfig, SubmissionClient, SubmissionReceipt};
use gapwise_core::{AssessorId, ProjectId};
use gapwise_report::AssessmentResult;

/// Arguments for the `gapwise submit` subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Report written by `gapwise assess --output`.
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,

    #[command(flatten)]
    pub target: SubmissionTarget,
}

/// Who and where to submit for. Shared with `gapwise assess --submit`.
#[derive(Args, Debug, Clone, Default)]
pub struct SubmissionTarget {
    /// Assessor identifier recorded with the result.
    #[arg(long)]
    pub assessor: Option<String>,

    /// Project identifier recorded with the result.
    #[arg(long)]
    pub project: Option<String>,

    /// Service base URL. Overrides GAPWISE_API_URL.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,
}

/// Execute the submit subcommand.
///
/// Returns exit code: 0 when stored, 2 when the service could not be
/// reached or rejected the report.
pub fn run_submit(args: &SubmitArgs) -> Result<u8> {
    let result = read_report(&args.report)?;
    match submit_result(&args.target, &result) {
        Ok(receipt) => {
            print_receipt(&receipt);
            Ok(0)
        }
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("submission failed: {e:#}");
            Ok(2)
        }
    }
}

/// Load a report and check that its derived fields follow from its
/// judgements, the same check the service applies on submission.
pub fn read_report(path: &Path) -> Result<AssessmentResult> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    let result: AssessmentResult = serde_json::from_str(&content)
        .with_context(|| format!("{} is not an assessment report", path.display()))?;
    gapwise_report::verify(&result)
        .with_context(|| format!("{} is inconsistent", path.display()))?;
    Ok(result)
}

/// Submit once on a single-threaded runtime.
pub fn submit_result(
    target: &SubmissionTarget,
    result: &AssessmentResult,
) -> Result<SubmissionReceipt> {
    let assessor = AssessorId::new(target.assessor.clone().unwrap_or_default())
        .context("--assessor is required")?;
    let project = ProjectId::new(target.project.clone().unwrap_or_default())
        .context("--project is required")?;

    let env = ClientConfig::from_env().context("invalid client configuration")?;
    let config = match &target.api_url {
        Some(url) => ClientConfig {
            base_url: ClientConfig::new(url)?.base_url,
            ..env
        },
        None => env,
    };
    tracing::debug!(?config, "submitting result");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(async {
        let client = SubmissionClient::new(config)?;
        let receipt = client.submit(&assessor, &project, result).await?;
        Ok::<_, anyhow::Error>(receipt)
    })
}

pub fn print_receipt(receipt: &SubmissionReceipt) {
    println!("Submitted: {} (digest {})", receipt.id, receipt.result_digest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_report_is_an_error() {
        let args = SubmitArgs {
            report: PathBuf::from("/nonexistent/report.json"),
            target: SubmissionTarget::default(),
        };
        assert!(run_submit(&args).is_err());
    }

    #[test]
    fn garbage_report_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"overall_score\": \"high\"}}").unwrap();
        let err = read_report(file.path()).unwrap_err();
        assert!(err.to_string().contains("not an assessment report"));
    }

    #[test]
    fn edited_report_is_an_error() {
        let mut report = serde_json::to_value(gapwise_report::aggregate(Vec::new())).unwrap();
        report["overall_score"] = serde_json::json!(90);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{report}").unwrap();
        let err = read_report(file.path()).unwrap_err();
        assert!(err.to_string().contains("is inconsistent"));
        assert!(format!("{err:#}").contains("overall_score"));
    }

    #[test]
    fn blank_assessor_rejected_before_any_request() {
        let result = gapwise_report::aggregate(Vec::new());
        let target = SubmissionTarget {
            assessor: Some("  ".into()),
            project: Some("p".into()),
            api_url: Some("http://127.0.0.1:1".into()),
        };
        let err = submit_result(&target, &result).unwrap_err();
        assert!(format!("{err:#}").contains("--assessor"));
    }

    #[test]
    fn unreachable_service_fails() {
        let result = gapwise_report::aggregate(Vec::new());
        let target = SubmissionTarget {
            assessor: Some("a".into()),
            project: Some("p".into()),
            api_url: Some("http://127.0.0.1:1".into()),
        };
        assert!(submit_result(&target, &result).is_err());
    }
}
