//! # Route Modules
//!
//! Each module defines an Axum Router for one API surface area.
//! Routers are assembled in [`crate::app`].

pub mod assessments;
pub mod audit;
pub mod catalog;
pub mod results;
pub mod risk;
pub mod risks;
