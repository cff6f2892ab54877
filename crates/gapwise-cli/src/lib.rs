//! # gapwise-cli: Command-Line Gap Assessments
//!
//! Provides the `gapwise` command-line interface.
//!
//! ## Subcommands
//!
//! - `gapwise catalog show`: Print the control catalog tree.
//! - `gapwise catalog validate PATH`: Check a catalog file.
//! - `gapwise score`: Lenient risk score calculator.
//! - `gapwise assess`: Run an assessment from an answers file.
//! - `gapwise submit`: (Re)submit a saved report.
//!
//! ```bash
//! gapwise assess --answers answers.yaml --output report.json
//! gapwise submit report.json --assessor ciso@example.com --project hq-2024
//! ```
//!
//! Exit codes: 0 on success, 1 on validation failure, 2 when the result
//! could not be submitted.

pub mod assess;
pub mod catalog;
pub mod score;
pub mod submit;

use std::path::Path;

use anyhow::{Context, Result};
use gapwise_catalog::ControlCatalog;

/// Load the catalog at `path`, or the embedded ECC catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<ControlCatalog> {
    match path {
        Some(path) => ControlCatalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => ControlCatalog::ecc_default().context("embedded catalog is invalid"),
    }
}
