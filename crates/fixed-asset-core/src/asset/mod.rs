//! Asset records as supplied by the record-management collaborator.
//!
//! The engine never creates or mutates these; it only reads them.

pub mod filter;
pub mod model;
pub mod validation;

pub use model::*;
