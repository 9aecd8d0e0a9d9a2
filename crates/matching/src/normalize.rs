//! Name normalization applied identically to candidate and catalog names.

use once_cell::sync::Lazy;
use regex::Regex;

/// Size/unit suffix tokens that carry no identity: `1L`, `500 ML`, `6LI`,
/// `X4`, bare unit words, and pack fractions like `1/1`.
static UNIT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\d+(?:[.,]\d+)?\s*(?:kg|gr?|lt?|ml|cl|ad(?:et)?|li|lu)|x\d+|\d+x|\d+/\d+|kg|gr?|lt|ml|adet)$")
        .unwrap()
});

/// Fold a single character: lowercase plus Turkish/Latin diacritic removal.
fn fold_char(c: char) -> Option<char> {
    let c = match c {
        'Ç' | 'ç' => 'c',
        'Ğ' | 'ğ' => 'g',
        'İ' | 'ı' | 'I' | 'i' => 'i',
        'Ö' | 'ö' => 'o',
        'Ş' | 'ş' => 's',
        'Ü' | 'ü' => 'u',
        'Â' | 'â' | 'Á' | 'á' | 'À' | 'à' | 'Ä' | 'ä' => 'a',
        'É' | 'é' | 'È' | 'è' | 'Ê' | 'ê' | 'Ë' | 'ë' => 'e',
        'Î' | 'î' | 'Í' | 'í' => 'i',
        'Ô' | 'ô' | 'Ó' | 'ó' => 'o',
        'Û' | 'û' | 'Ú' | 'ú' => 'u',
        other => other.to_ascii_lowercase(),
    };
    if c.is_ascii_alphanumeric() || c.is_whitespace() || c == '/' {
        Some(c)
    } else {
        // Punctuation becomes a token boundary rather than vanishing, so
        // "D.ICIM" splits into two tokens instead of gluing together.
        Some(' ')
    }
}

/// Normalize a product name for comparison: case-fold, strip diacritics,
/// collapse whitespace, drop unit/size tokens.
pub fn normalize_name(name: &str) -> String {
    let folded: String = name.chars().filter_map(fold_char).collect();
    folded
        .split_whitespace()
        .filter(|token| !UNIT_TOKEN.is_match(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokenize an already-normalized name.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}
