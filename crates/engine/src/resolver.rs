// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Agent Bus Contributors

//! Reference resolution (C3): turns a human-typed agent or thread reference
//! into exactly one candidate, or a structured error telling the caller why
//! it couldn't.

use agentbus_core::CoreError;

/// Resolve `input` against `candidates` (exact match, then case-insensitive
/// exact match, then unique prefix match, then a did-you-mean suggestion).
///
/// `kind` names what's being resolved (e.g. `"agent"`, `"thread"`) for error
/// messages.
pub fn resolve<'a>(
    kind: &'static str,
    input: &str,
    candidates: &'a [String],
) -> Result<&'a str, CoreError> {
    if let Some(exact) = candidates.iter().find(|c| c.as_str() == input) {
        return Ok(exact.as_str());
    }

    let lower = input.to_lowercase();
    if let Some(exact_ci) = candidates.iter().find(|c| c.to_lowercase() == lower) {
        return Ok(exact_ci.as_str());
    }

    let prefix_matches: Vec<&str> = candidates
        .iter()
        .filter(|c| c.starts_with(input))
        .map(|c| c.as_str())
        .collect();
    match prefix_matches.len() {
        1 => return Ok(prefix_matches[0]),
        n if n > 1 => {
            return Err(CoreError::AmbiguousReference {
                input: input.to_string(),
                candidates: prefix_matches.iter().map(|s| s.to_string()).collect(),
            });
        }
        _ => {}
    }

    if let Some(closest) = closest_within(input, candidates, 2) {
        return Err(CoreError::DidYouMean {
            input: input.to_string(),
            suggestion: closest.to_string(),
        });
    }

    Err(CoreError::NotFound {
        kind,
        reference: input.to_string(),
    })
}

fn closest_within<'a>(input: &str, candidates: &'a [String], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (c.as_str(), levenshtein(input, c)))
        .filter(|(_, d)| *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

/// Classic dynamic-programming edit distance; candidate pools here are small
/// (agents, threads in one project) so the O(n*m) cost is not worth
/// optimizing away.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for i in 1..=a.len() {
        let mut prev_diag = row[0];
        row[0] = i;
        for j in 1..=b.len() {
            let temp = row[j];
            row[j] = if a[i - 1] == b[j - 1] {
                prev_diag
            } else {
                1 + prev_diag.min(row[j]).min(row[j - 1])
            };
            prev_diag = temp;
        }
    }
    row[b.len()]
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
