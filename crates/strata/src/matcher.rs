//! Term matching against field targets.
//!
//! A term is matched against a list of *targets*: the normalized string
//! forms of a field's value (list elements for list-valued fields). The
//! three modes are substring (the default), exact equality, and fuzzy
//! similarity, where the acceptance threshold is driven by a temperature
//! parameter.

use strata_schema::value;

/// How a single term is matched against its targets.
#[derive(Debug, Clone, Copy)]
pub struct MatchParams {
    /// Use fuzzy similarity instead of substring/equality.
    pub fuzzy: bool,
    /// Non-fuzzy mode: require equality instead of substring containment.
    pub exact: bool,
    /// Fuzzy temperature in [0, 100]; out-of-range values are clamped.
    /// Higher temperatures accept weaker matches.
    pub temp: f64,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            fuzzy: false,
            exact: false,
            temp: 80.0,
        }
    }
}

/// Returns the similarity threshold for a temperature.
///
/// `threshold(t) = 0.9 - 0.8 * (clamp(t, 0, 100) / 100)`, so temperature 0
/// demands ~0.9 similarity and temperature 100 accepts ~0.1.
pub fn similarity_threshold(temp: f64) -> f64 {
    let t = temp.clamp(0.0, 100.0);
    0.9 - 0.8 * (t / 100.0)
}

/// Matches one term against a list of normalized targets.
///
/// The term is trimmed and case-folded first; empty terms and empty target
/// lists never match.
pub fn term_matches(targets: &[String], term: &str, params: MatchParams) -> bool {
    let term = value::normalize(term);
    if term.is_empty() || targets.is_empty() {
        return false;
    }

    if !params.fuzzy {
        if params.exact {
            return targets.iter().any(|t| *t == term);
        }
        return targets.iter().any(|t| t.contains(&term));
    }

    let best = targets
        .iter()
        .map(|t| strsim::normalized_levenshtein(&term, t))
        .fold(0.0_f64, f64::max);
    best >= similarity_threshold(params.temp)
}
