//! `shelfline-matching` — fuzzy product-name matching.
//!
//! Matches a free-text invoice line name against a read-only catalog
//! snapshot. Pure function of its inputs: identical `(name, catalog)` always
//! yields the identical result, which is what makes reprocessing idempotent
//! and tests deterministic.

pub mod matcher;
pub mod normalize;
pub mod score;

pub use matcher::{MatchResult, MatchTier, MatcherConfig, gtin_eq, match_product};
pub use normalize::normalize_name;
