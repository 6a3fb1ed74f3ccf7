//! Best-effort pairing of returned results with the operations that produced them.
//!
//! The service does not promise positional correspondence, so pairing is by
//! content only: campaign, negativity, criterion type, and the criterion id
//! (location, language) or URL (placement, when the result carries one).

use crate::types::{Criterion, MutationResult, Operation};

/// A result and the operation it was matched to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correlation<'a> {
    pub result: &'a MutationResult,
    pub operation: Option<&'a Operation>,
}

/// Pair each result with the first unclaimed operation it matches.
pub fn correlate<'a>(
    operations: &'a [Operation],
    results: &'a [MutationResult],
) -> Vec<Correlation<'a>> {
    let mut claimed = vec![false; operations.len()];

    results
        .iter()
        .map(|result| {
            let index = operations
                .iter()
                .enumerate()
                .find(|(i, op)| !claimed[*i] && is_match(op, result))
                .map(|(i, _)| i);
            if let Some(i) = index {
                claimed[i] = true;
            }
            Correlation {
                result,
                operation: index.map(|i| &operations[i]),
            }
        })
        .collect()
}

fn is_match(operation: &Operation, result: &MutationResult) -> bool {
    let operand = &operation.operand;
    if operand.campaign_id() != &result.campaign_id || operand.is_negative() != result.is_negative
    {
        return false;
    }

    let criterion = operand.criterion();
    if criterion.criterion_type() != result.criterion_type {
        return false;
    }

    match criterion {
        Criterion::Location { id } | Criterion::Language { id } => *id == result.criterion_id,
        Criterion::Placement { url } => result.url.as_deref().map_or(true, |u| u == url.as_str()),
    }
}
