//! # gapwise-catalog: Control Catalog
//!
//! The static, ordered hierarchy of compliance controls an assessment
//! walks: five domains, each with subdomains, each with controls.
//!
//! ## Key Design Principles
//!
//! - **Validated on load.** A [`ControlCatalog`] only exists after schema
//!   validation and semantic checks pass, so walkers never meet an empty
//!   subdomain.
//!
//! - **Order is data.** Domains, subdomains and controls are kept as
//!   ordered lists, never maps. The walk order is the document order.
//!
//! - **Embedded default.** The ECC-1:2018 catalog ships inside the binary;
//!   custom catalogs are loaded from YAML or JSON files.
//!
//! ## Crate Policy
//!
//! - Depends only on `gapwise-core` internally.
//! - No `unwrap()` or `expect()` outside tests.

pub mod catalog;
pub mod error;
pub mod schema;

pub use catalog::{CatalogEntry, ControlCatalog, DomainSection, Subdomain};
pub use error::CatalogError;
