//! Index selection mini-language
//!
//! Comma-separated terms, each `n`, `a-b` (inclusive) or `a-step-b`.

use std::collections::BTreeSet;

use crate::error::{CutselError, CutselResult};

/// Parse `input` into sorted, de-duplicated indices within `1..=max`
pub fn parse_index_range(input: &str, max: usize) -> CutselResult<Vec<usize>> {
    let invalid = |reason: String| CutselError::InvalidRange {
        input: input.to_string(),
        reason,
    };

    let mut selected = BTreeSet::new();
    for term in input.split(',').map(str::trim) {
        if term.is_empty() {
            return Err(invalid("empty term".to_string()));
        }

        let numbers = term
            .split('-')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| invalid(format!("'{}' is not a number", part.trim())))
            })
            .collect::<CutselResult<Vec<usize>>>()?;

        let (first, step, last) = match numbers.as_slice() {
            [n] => (*n, 1, *n),
            [a, b] => (*a, 1, *b),
            [a, step, b] => (*a, *step, *b),
            _ => return Err(invalid(format!("too many separators in '{}'", term))),
        };

        if step == 0 {
            return Err(invalid(format!("step must be positive in '{}'", term)));
        }
        if first > last {
            return Err(invalid(format!("'{}' runs backwards", term)));
        }
        if first < 1 || last > max {
            return Err(invalid(format!("'{}' is outside 1-{}", term, max)));
        }

        selected.extend((first..=last).step_by(step));
    }

    Ok(selected.into_iter().collect())
}
