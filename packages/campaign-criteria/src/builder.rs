//! Turns the desired targeting set into an ordered batch of ADD operations.

use tracing::debug;

use crate::error::BuildResult;
use crate::types::{CampaignId, Criterion, Operand, Operation};

/// Build the batch for one campaign.
///
/// Each criterion becomes one ADD over a campaign criterion operand, in input
/// order. A negative placement URL, when given, becomes exactly one trailing
/// ADD over a negative campaign criterion operand. Nothing is built if that
/// URL is malformed.
pub fn build_operations(
    campaign_id: &CampaignId,
    criteria: &[Criterion],
    negative_placement_url: Option<&str>,
) -> BuildResult<Vec<Operation>> {
    let exclusion = negative_placement_url
        .map(Criterion::placement)
        .transpose()?;

    let mut operations = Vec::with_capacity(criteria.len() + usize::from(exclusion.is_some()));
    operations.extend(criteria.iter().map(|criterion| {
        Operation::add(Operand::CampaignCriterion {
            campaign_id: campaign_id.clone(),
            criterion: criterion.clone(),
        })
    }));

    if let Some(criterion) = exclusion {
        operations.push(Operation::add(Operand::NegativeCampaignCriterion {
            campaign_id: campaign_id.clone(),
            criterion,
        }));
    }

    debug!(
        %campaign_id,
        criteria = criteria.len(),
        operations = operations.len(),
        "Built campaign criterion operations"
    );

    Ok(operations)
}
