//! # Score Subcommand
//!
//! Scores one control judgement from raw identifiers. Unknown values fall
//! back to the scoring defaults rather than failing.

use anyhow::Result;
use clap::Args;
use gapwise_risk::{score_lenient, HIGH_RISK_THRESHOLD};

/// Arguments for the `gapwise score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// compliant, partially-compliant, non-compliant or not-assessed.
    #[arg(long)]
    pub status: String,
    /// critical, high, medium or low.
    #[arg(long)]
    pub impact: String,
    /// very-high, high, medium, low or very-low.
    #[arg(long)]
    pub likelihood: String,
    /// Domain display name, e.g. "Cybersecurity Defence".
    #[arg(long)]
    pub domain: String,
}

pub fn run_score(args: &ScoreArgs) -> Result<u8> {
    let risk_score = score_lenient(&args.status, &args.impact, &args.likelihood, &args.domain);
    println!("{}", format_score(risk_score));
    Ok(0)
}

fn format_score(risk_score: f64) -> String {
    if risk_score >= HIGH_RISK_THRESHOLD {
        format!("{risk_score:.1} (high risk)")
    } else {
        format!("{risk_score:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_risk_is_flagged() {
        assert_eq!(format_score(10.0), "10.0 (high risk)");
        assert_eq!(format_score(7.0), "7.0 (high risk)");
        assert_eq!(format_score(0.2), "0.2");
    }
}
