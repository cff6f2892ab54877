//! # Catalog Subcommand
//!
//! `gapwise catalog show` prints the traversal order an assessment will
//! follow. `gapwise catalog validate` checks a catalog file against the
//! catalog schema and the structural rules (unique, non-empty domains,
//! subdomains and controls).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use gapwise_catalog::ControlCatalog;

/// Arguments for the `gapwise catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// Print the catalog tree in assessment order.
    Show {
        /// Catalog file (YAML or JSON). Defaults to the embedded ECC catalog.
        #[arg(long, value_name = "PATH")]
        catalog: Option<PathBuf>,
    },
    /// Validate a catalog file.
    Validate {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

/// Execute the catalog subcommand.
///
/// Returns exit code: 0 on success, 1 if the file fails validation.
pub fn run_catalog(args: &CatalogArgs) -> Result<u8> {
    match &args.command {
        CatalogCommand::Show { catalog } => {
            let catalog = crate::load_catalog(catalog.as_deref())?;
            print!("{}", render_tree(&catalog));
            Ok(0)
        }
        CatalogCommand::Validate { path } => match ControlCatalog::load(path) {
            Ok(catalog) => {
                println!(
                    "OK: {} — {} ({} domains, {} controls)",
                    path.display(),
                    catalog.framework(),
                    catalog.domains().len(),
                    catalog.total_controls()
                );
                Ok(0)
            }
            Err(e) => {
                println!("FAIL: {} — {e}", path.display());
                Ok(1)
            }
        },
    }
}

/// Indented tree: framework, domains, subdomains, controls.
pub fn render_tree(catalog: &ControlCatalog) -> String {
    let mut out = format!(
        "{} ({} controls)\n",
        catalog.framework(),
        catalog.total_controls()
    );
    for section in catalog.domains() {
        out.push_str(&format!(
            "{} ({} controls)\n",
            section.domain,
            section.control_count()
        ));
        for subdomain in &section.subdomains {
            out.push_str(&format!("  {}\n", subdomain.name));
            for control in &subdomain.controls {
                out.push_str(&format!("    - {control}\n"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn tree_lists_controls_under_subdomains() {
        let catalog = ControlCatalog::from_yaml_str(
            "framework: demo\n\
             domains:\n\
             \x20 - domain: Governance\n\
             \x20   subdomains:\n\
             \x20     - name: Strategy\n\
             \x20       controls: [G1, G2]\n",
        )
        .unwrap();
        let tree = render_tree(&catalog);
        assert_eq!(
            tree,
            "demo (2 controls)\nGovernance (2 controls)\n  Strategy\n    - G1\n    - G2\n"
        );
    }

    #[test]
    fn validate_reports_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "domains: []").unwrap();
        let args = CatalogArgs {
            command: CatalogCommand::Validate {
                path: file.path().to_path_buf(),
            },
        };
        assert_eq!(run_catalog(&args).unwrap(), 1);
    }

    #[test]
    fn validate_accepts_good_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "domains:\n  - domain: Cybersecurity Resilience\n    subdomains:\n      - name: Continuity\n        controls: [R1]"
        )
        .unwrap();
        let args = CatalogArgs {
            command: CatalogCommand::Validate {
                path: file.path().to_path_buf(),
            },
        };
        assert_eq!(run_catalog(&args).unwrap(), 0);
    }

    #[test]
    fn show_embedded_catalog() {
        let args = CatalogArgs {
            command: CatalogCommand::Show { catalog: None },
        };
        assert_eq!(run_catalog(&args).unwrap(), 0);
    }
}
