use std::io::Write;

use tracing::{debug, warn};

use crate::builder::build_operations;
use crate::correlate::correlate;
use crate::error::WorkflowError;
use crate::report::report;
use crate::service::MutationService;
use crate::submit::BatchSubmitter;
use crate::types::{CampaignId, Criterion, Outcome};

/// Build, submit and report one targeting batch for a campaign.
///
/// Classified API failures are reported to `sink` and returned inside the
/// [`Outcome`]. Build errors, unclassified service failures and sink I/O
/// errors are returned as `Err` and nothing further is attempted.
pub async fn add_campaign_targeting_criteria<S, W>(
    submitter: &BatchSubmitter<S>,
    campaign_id: &CampaignId,
    criteria: &[Criterion],
    negative_placement_url: Option<&str>,
    sink: &mut W,
) -> Result<Outcome, WorkflowError>
where
    S: MutationService,
    W: Write,
{
    let operations = build_operations(campaign_id, criteria, negative_placement_url)?;

    let outcome = match submitter.submit(&operations).await {
        Ok(results) => {
            for pair in correlate(&operations, &results) {
                match pair.operation {
                    Some(op) => debug!(
                        criterion_id = pair.result.criterion_id,
                        negative = op.operand.is_negative(),
                        "Result matched operation"
                    ),
                    None => warn!(
                        campaign_id = %pair.result.campaign_id,
                        criterion_id = pair.result.criterion_id,
                        criterion_type = %pair.result.criterion_type,
                        "Result does not match any submitted operation"
                    ),
                }
            }
            Ok(results)
        }
        Err(e) => Err(e.classify()?),
    };

    report(&outcome, sink)?;
    Ok(outcome)
}
