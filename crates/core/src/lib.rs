//! `shelfline-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the extraction
//! and resolution crates (no infrastructure concerns).

pub mod catalog;
pub mod error;
pub mod id;

pub use catalog::CatalogEntry;
pub use error::{DomainError, DomainResult, LineError, LineErrorKind};
pub use id::{AlertId, BatchId, ProductId};
