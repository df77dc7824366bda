//! Soft-link derivation: two hunks are soft-linked when their base
//! snippets are line-count-equal, their current snippets are
//! line-count-equal, and the averaged normalized similarity of the two
//! sides meets the configured threshold.
//!
//! `strsim::normalized_levenshtein` supplies the "symmetric, `1.0` on
//! identical input, range `[0,1]`" similarity contract spec.md §4.3/§9
//! asks for — the same crate the wider pack (`jj`, `zed`, `sbom-tool`)
//! reaches for whenever it needs exactly this ratio.

use crate::model::DiffHunk;

pub type SoftLink = (String, String, f64);

/// All soft links among `hunks` meeting `threshold`, per spec.md §4.3.
///
/// The length-equality check runs before the O(n) `strsim` call per pair,
/// short-circuiting the similarity pass for any pair whose snippets
/// can't possibly match — the resource-bound note from §5.
pub fn derive(hunks: &[DiffHunk], threshold: f64) -> Vec<SoftLink> {
    let mut links = Vec::new();

    for i in 0..hunks.len() {
        for j in (i + 1)..hunks.len() {
            let (h1, h2) = (&hunks[i], &hunks[j]);
            if h1.unique_index == h2.unique_index {
                continue;
            }
            let Some(similarity) = similarity_if_comparable(h1, h2) else {
                continue;
            };
            if similarity >= threshold {
                let (a, b) = sorted_pair(&h1.unique_index, &h2.unique_index);
                links.push((a, b, similarity));
            }
        }
    }

    links
}

fn similarity_if_comparable(h1: &DiffHunk, h2: &DiffHunk) -> Option<f64> {
    let base1 = h1.base_hunk.as_ref();
    let base2 = h2.base_hunk.as_ref();
    let current1 = h1.current_hunk.as_ref();
    let current2 = h2.current_hunk.as_ref();

    let base_len_match = match (base1, base2) {
        (Some(a), Some(b)) => a.lines.len() == b.lines.len(),
        (None, None) => true,
        _ => false,
    };
    let current_len_match = match (current1, current2) {
        (Some(a), Some(b)) => a.lines.len() == b.lines.len(),
        (None, None) => true,
        _ => false,
    };
    if !base_len_match || !current_len_match {
        return None;
    }

    let base_sim = match (base1, base2) {
        (Some(a), Some(b)) => strsim::normalized_levenshtein(&a.joined(), &b.joined()),
        _ => 1.0,
    };
    let current_sim = match (current1, current2) {
        (Some(a), Some(b)) => strsim::normalized_levenshtein(&a.joined(), &b.joined()),
        _ => 1.0,
    };

    Some(round2((base_sim + current_sim) / 2.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn sorted_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    }
}
