//! Catalog matching and tier policy.

use serde::{Deserialize, Serialize};
use shelfline_core::{CatalogEntry, ProductId};

use crate::normalize::normalize_name;
use crate::score::composite;

/// Match confidence tier. The three ordered bands are policy; the band
/// boundaries are configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Safe to link automatically.
    Auto,
    /// Candidate found; requires human confirmation.
    Suggested,
    /// No confident candidate. A valid terminal outcome, not an error.
    None,
}

/// Outcome of matching one name against a catalog snapshot.
/// `product_id` is set iff `tier != none`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub product_id: Option<ProductId>,
    pub score: f64,
    pub tier: MatchTier,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            product_id: None,
            score: 0.0,
            tier: MatchTier::None,
        }
    }
}

/// Matcher tuning knobs. Defaults follow the observed tiering policy; treat
/// them as starting points to validate against representative product-name
/// data, not ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Scores at or above this link automatically.
    pub auto_threshold: f64,
    /// Scores at or above this (but below auto) need confirmation.
    pub suggest_threshold: f64,
    /// Weight of token-set similarity; edit-distance gets the remainder.
    pub token_weight: f64,
    /// Scores within this of the best are treated as tied.
    pub epsilon: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            auto_threshold: 0.85,
            suggest_threshold: 0.55,
            token_weight: 0.6,
            epsilon: 0.005,
        }
    }
}

impl MatcherConfig {
    fn tier_for(&self, score: f64) -> MatchTier {
        if score >= self.auto_threshold {
            MatchTier::Auto
        } else if score >= self.suggest_threshold {
            MatchTier::Suggested
        } else {
            MatchTier::None
        }
    }
}

/// Compare GTINs ignoring leading-zero padding (GTIN-13 vs GTIN-14).
pub fn gtin_eq(a: &str, b: &str) -> bool {
    a.trim_start_matches('0') == b.trim_start_matches('0') && !a.is_empty() && !b.is_empty()
}

/// Match a free-text name against a catalog snapshot.
///
/// `gtin_hint` is the decoded (check-digit-valid) GTIN from the same invoice
/// line, if any; it only breaks score ties, it does not override scoring.
/// Deterministic: equal scores within `epsilon` resolve by GTIN hint first,
/// then lexicographically smallest SKU.
pub fn match_product(
    name: &str,
    catalog: &[CatalogEntry],
    gtin_hint: Option<&str>,
    config: &MatcherConfig,
) -> MatchResult {
    let needle = normalize_name(name);
    if needle.is_empty() || catalog.is_empty() {
        return MatchResult::none();
    }

    let mut scored: Vec<(f64, &CatalogEntry)> = catalog
        .iter()
        .map(|entry| {
            let hay = normalize_name(&entry.name);
            (composite(&needle, &hay, config.token_weight), entry)
        })
        .collect();

    let best_score = scored
        .iter()
        .map(|(s, _)| *s)
        .fold(0.0f64, f64::max);

    let tier = config.tier_for(best_score);
    if tier == MatchTier::None {
        return MatchResult {
            product_id: None,
            score: best_score,
            tier,
        };
    }

    // Tied candidates within epsilon of the best.
    scored.retain(|(s, _)| best_score - *s <= config.epsilon);

    let winner = scored
        .iter()
        .find(|(_, e)| {
            matches!(
                (gtin_hint, e.barcode_gtin.as_deref()),
                (Some(hint), Some(gtin)) if gtin_eq(hint, gtin)
            )
        })
        .or_else(|| scored.iter().min_by(|a, b| a.1.sku.cmp(&b.1.sku)))
        .map(|(_, e)| *e);

    match winner {
        Some(entry) => {
            tracing::debug!(
                name = %name,
                sku = %entry.sku,
                score = best_score,
                ?tier,
                "matched catalog entry"
            );
            MatchResult {
                product_id: Some(entry.product_id),
                score: best_score,
                tier,
            }
        }
        None => MatchResult::none(),
    }
}
