//! Approximate substring matching.
//!
//! Uses the bitap (shift-and) algorithm extended for edit distance
//! (Wu–Manber). For a pattern of length `m` the matcher finds the
//! smallest `k` such that the pattern occurs somewhere in the text with
//! at most `k` insertions, deletions or substitutions, and reports the
//! normalized distance `k / m`:
//!
//! - `0.0` — the pattern occurs verbatim (case-insensitive)
//! - `tolerance` — the weakest match still accepted
//!
//! Patterns longer than [`MAX_PATTERN_CHARS`] are matched piecewise; each
//! piece must match and the distance is the mean over pieces.

use std::collections::HashMap;

use crate::error::{Result, SpecError};

/// Default error tolerance on the 0-to-1 scale.
pub const DEFAULT_TOLERANCE: f64 = 0.3;

/// Longest pattern piece a single bitap pass handles (one bit per char).
pub const MAX_PATTERN_CHARS: usize = 64;

/// Case-insensitive bounded-error matcher.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    tolerance: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl FuzzyMatcher {
    /// Create a matcher accepting distances up to `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Config`] if `tolerance` is outside `[0, 1]`.
    pub fn new(tolerance: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&tolerance) {
            return Err(SpecError::Config(format!(
                "tolerance must be between 0 and 1, got {tolerance}"
            )));
        }
        Ok(Self { tolerance })
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Distance of the best occurrence of `pattern` in `text`, or `None`
    /// if every occurrence exceeds the tolerance.
    #[must_use]
    pub fn distance(&self, pattern: &str, text: &str) -> Option<f64> {
        let pattern: Vec<char> = pattern.trim().to_lowercase().chars().collect();
        if pattern.is_empty() {
            return None;
        }
        let text: Vec<char> = text.to_lowercase().chars().collect();

        let pieces: Vec<&[char]> = pattern.chunks(MAX_PATTERN_CHARS).collect();
        let mut total = 0.0;
        for piece in &pieces {
            let max_errors = (self.tolerance * piece.len() as f64).floor() as usize;
            let errors = bitap_min_errors(piece, &text, max_errors)?;
            total += errors as f64 / piece.len() as f64;
        }
        Some(total / pieces.len() as f64)
    }
}

/// Minimum edit count (at most `max_errors`) with which `pattern` occurs
/// in `text`. `pattern` must be 1..=64 chars long.
fn bitap_min_errors(pattern: &[char], text: &[char], max_errors: usize) -> Option<usize> {
    let m = pattern.len();
    debug_assert!((1..=MAX_PATTERN_CHARS).contains(&m));
    let k = max_errors.min(m);
    if k == m {
        // Deleting every pattern char always matches; look for better.
        return Some(bitap_scan(pattern, text, m - 1).unwrap_or(m));
    }
    bitap_scan(pattern, text, k)
}

fn bitap_scan(pattern: &[char], text: &[char], k: usize) -> Option<usize> {
    let m = pattern.len();
    let accept = 1u64 << (m - 1);

    let mut masks: HashMap<char, u64> = HashMap::new();
    for (i, c) in pattern.iter().enumerate() {
        *masks.entry(*c).or_insert(0) |= 1u64 << i;
    }

    // state[d] bit i: pattern[..=i] ends at the current text position
    // with at most d errors.
    let mut state: Vec<u64> = (0..=k).map(low_bits).collect();
    let mut best = state
        .iter()
        .position(|s| s & accept != 0);

    for c in text {
        let mask = masks.get(c).copied().unwrap_or(0);
        let mut prev_old = state[0];
        state[0] = ((state[0] << 1) | 1) & mask;
        for d in 1..=k {
            let old = state[d];
            let matched = ((old << 1) | 1) & mask;
            let substituted = (prev_old << 1) | 1;
            let inserted = prev_old;
            let deleted = (state[d - 1] << 1) | 1;
            state[d] = matched | substituted | inserted | deleted;
            prev_old = old;
        }
        if let Some(d) = state.iter().position(|s| s & accept != 0) {
            best = Some(best.map_or(d, |b| b.min(d)));
            if d == 0 {
                break;
            }
        }
    }

    best
}

fn low_bits(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}
