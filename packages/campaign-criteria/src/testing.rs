//! Testing utilities including a scripted mutation service.
//!
//! Useful for exercising the workflow without reaching a real ads service.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{ApiError, ServiceError, ServiceResult};
use crate::service::MutationService;
use crate::types::{Criterion, MutateResponse, MutationResult, Operation};

/// First criterion id handed out for echoed placements.
const FIRST_PLACEMENT_ID: i64 = 1_000_000;

/// A mock mutation service.
///
/// Scripted replies are consumed one per call. Once they run out, the mock
/// echoes every operation back as an applied criterion. Clones share state,
/// so keep one clone to inspect calls after handing another to a submitter.
#[derive(Clone, Default)]
pub struct MockMutationService {
    replies: Arc<Mutex<VecDeque<MockReply>>>,

    /// Batches received, in call order
    calls: Arc<Mutex<Vec<Vec<Operation>>>>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Results(Vec<MutationResult>),
    Api(ApiError),
    Unclassified(String),
}

impl MockMutationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to the next call with these results.
    pub fn with_results(self, results: Vec<MutationResult>) -> Self {
        self.push(MockReply::Results(results))
    }

    /// Fail the next call with a classified error.
    pub fn with_api_error(self, error: ApiError) -> Self {
        self.push(MockReply::Api(error))
    }

    /// Fail the next call with something outside the known taxonomy.
    pub fn with_unclassified(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Unclassified(message.into()))
    }

    pub fn calls(&self) -> Vec<Vec<Operation>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn push(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    fn echo(operations: &[Operation]) -> Vec<MutationResult> {
        let mut next_placement_id = FIRST_PLACEMENT_ID;
        operations
            .iter()
            .map(|op| {
                let criterion = op.operand.criterion();
                let id = criterion.id().unwrap_or_else(|| {
                    next_placement_id += 1;
                    next_placement_id
                });
                let mut result = MutationResult::new(
                    op.operand.campaign_id().clone(),
                    id,
                    criterion.criterion_type(),
                );
                if let Criterion::Placement { url } = criterion {
                    result = result.with_url(url.clone());
                }
                if op.operand.is_negative() {
                    result = result.negative();
                }
                result
            })
            .collect()
    }
}

#[async_trait]
impl MutationService for MockMutationService {
    async fn mutate(&self, operations: &[Operation]) -> ServiceResult<MutateResponse> {
        self.calls.lock().unwrap().push(operations.to_vec());

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Results(value)) => Ok(MutateResponse { value }),
            Some(MockReply::Api(error)) => Err(error.into()),
            Some(MockReply::Unclassified(message)) => Err(ServiceError::unclassified(message)),
            None => Ok(MutateResponse {
                value: Self::echo(operations),
            }),
        }
    }
}
