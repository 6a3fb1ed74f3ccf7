//! Campaign targeting criteria mutations.
//!
//! Builds a batch of ADD operations attaching location, language and negative
//! placement criteria to one campaign, sends it to a remote mutation service
//! in a single call, and reports either the applied criteria or a classified
//! failure (authorization, transport, validation).
//!
//! # Example
//!
//! ```rust,ignore
//! use campaign_criteria::{
//!     add_campaign_targeting_criteria, BatchSubmitter, CampaignId, Criterion,
//!     HttpMutationService, ServiceConfig,
//! };
//!
//! let service = HttpMutationService::new(
//!     ServiceConfig::new("developer-token").with_access_token("ya29..."),
//! );
//! let submitter = BatchSubmitter::new(service);
//!
//! let outcome = add_campaign_targeting_criteria(
//!     &submitter,
//!     &CampaignId::new("1234567")?,
//!     &[Criterion::location(21137), Criterion::language(1000)],
//!     Some("http://mars.google.com"),
//!     &mut std::io::stdout(),
//! )
//! .await?;
//! ```

pub mod builder;
pub mod correlate;
pub mod error;
pub mod report;
pub mod service;
pub mod submit;
pub mod taxonomy;
pub mod testing;
pub mod types;
pub mod workflow;

pub use builder::build_operations;
pub use correlate::{correlate, Correlation};
pub use error::{
    ApiError, BuildError, FieldViolation, ServiceError, TransportError, UnclassifiedError,
    ValidationError, WorkflowError,
};
pub use report::{report, report_lines};
pub use service::{classify_response, HttpMutationService, MutationService, ServiceConfig};
pub use submit::BatchSubmitter;
pub use types::{
    CampaignId, Criterion, CriterionType, MutateResponse, MutationResult, Operand, Operation,
    Operator, Outcome,
};
pub use workflow::add_campaign_targeting_criteria;
