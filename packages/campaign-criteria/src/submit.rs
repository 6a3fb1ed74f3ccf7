use tracing::{info, warn};

use crate::error::ServiceResult;
use crate::service::MutationService;
use crate::types::{MutationResult, Operation};

/// Sends a whole batch to the mutation service in a single call.
///
/// One attempt per `submit`: no chunking, no retries. A batch that exceeds a
/// service-side limit comes back as a validation error.
pub struct BatchSubmitter<S> {
    service: S,
}

impl<S: MutationService> BatchSubmitter<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn submit(&self, operations: &[Operation]) -> ServiceResult<Vec<MutationResult>> {
        info!(operations = operations.len(), "Submitting campaign criterion batch");

        match self.service.mutate(operations).await {
            Ok(response) => {
                info!(results = response.value.len(), "Campaign criterion batch applied");
                Ok(response.value)
            }
            Err(e) => {
                warn!(error = %e, "Campaign criterion batch failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ServiceError, TransportError};
    use crate::testing::MockMutationService;
    use crate::types::{CampaignId, Criterion, CriterionType, Operand};

    fn batch() -> Vec<Operation> {
        vec![Operation::add(Operand::CampaignCriterion {
            campaign_id: CampaignId::from(123),
            criterion: Criterion::location(21137),
        })]
    }

    #[tokio::test]
    async fn test_submit_makes_exactly_one_call() {
        let mock = MockMutationService::new().with_results(vec![MutationResult::new(
            123,
            21137,
            CriterionType::Location,
        )]);
        let submitter = BatchSubmitter::new(mock.clone());

        let results = submitter.submit(&batch()).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(mock.calls(), vec![batch()]);
    }

    #[tokio::test]
    async fn test_submit_does_not_retry_transport_failures() {
        let mock = MockMutationService::new()
            .with_api_error(TransportError::Request("connection refused".into()).into());
        let submitter = BatchSubmitter::new(mock.clone());

        let err = submitter.submit(&batch()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Api(ApiError::Transport(_))));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_is_still_sent() {
        let mock = MockMutationService::new();
        let submitter = BatchSubmitter::new(mock.clone());

        let results = submitter.submit(&[]).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(mock.call_count(), 1);
    }
}
