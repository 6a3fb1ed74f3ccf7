use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ApiError, BuildError, BuildResult};

/// Outcome of one batch submission as seen by the reporter.
pub type Outcome = std::result::Result<Vec<MutationResult>, ApiError>;

/// Identifier of an existing campaign. Existence is checked by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    pub fn new(id: impl Into<String>) -> BuildResult<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(BuildError::EmptyCampaignId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for CampaignId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// int64 values may arrive as JSON numbers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Int64Repr {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for CampaignId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Int64Repr::deserialize(deserializer)? {
            Int64Repr::Number(n) => Ok(Self(n.to_string())),
            Int64Repr::Text(s) => Self::new(s).map_err(serde::de::Error::custom),
        }
    }
}

fn deserialize_int64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Int64Repr::deserialize(deserializer)? {
        Int64Repr::Number(n) => Ok(n),
        Int64Repr::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// A single targeting dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "xsi_type")]
pub enum Criterion {
    Location { id: i64 },
    Language { id: i64 },
    Placement { url: String },
}

impl Criterion {
    pub fn location(id: i64) -> Self {
        Criterion::Location { id }
    }

    pub fn language(id: i64) -> Self {
        Criterion::Language { id }
    }

    /// Placement criterion for an absolute http(s) URL. The text is kept as given.
    pub fn placement(url: impl Into<String>) -> BuildResult<Self> {
        let url = url.into();
        validate_placement_url(&url)?;
        Ok(Criterion::Placement { url })
    }

    pub fn criterion_type(&self) -> CriterionType {
        match self {
            Criterion::Location { .. } => CriterionType::Location,
            Criterion::Language { .. } => CriterionType::Language,
            Criterion::Placement { .. } => CriterionType::Placement,
        }
    }

    /// Taxonomy id for location and language criteria.
    pub fn id(&self) -> Option<i64> {
        match self {
            Criterion::Location { id } | Criterion::Language { id } => Some(*id),
            Criterion::Placement { .. } => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Criterion::Placement { url } => Some(url),
            _ => None,
        }
    }
}

fn validate_placement_url(raw: &str) -> BuildResult<()> {
    let invalid = |reason: String| BuildError::InvalidPlacementUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

/// Criterion type tag as the service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CriterionType {
    Location,
    Language,
    Placement,
    /// A type this crate does not model
    Other(String),
}

impl CriterionType {
    pub fn as_str(&self) -> &str {
        match self {
            CriterionType::Location => "LOCATION",
            CriterionType::Language => "LANGUAGE",
            CriterionType::Placement => "PLACEMENT",
            CriterionType::Other(s) => s,
        }
    }
}

impl From<String> for CriterionType {
    fn from(s: String) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "LOCATION" => CriterionType::Location,
            "LANGUAGE" => CriterionType::Language,
            "PLACEMENT" => CriterionType::Placement,
            _ => CriterionType::Other(s),
        }
    }
}

impl From<CriterionType> for String {
    fn from(t: CriterionType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for CriterionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutation verb. This workflow only ever sends `Add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Add,
    Remove,
    Set,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Add => "ADD",
            Operator::Remove => "REMOVE",
            Operator::Set => "SET",
        })
    }
}

/// What an operation acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "xsi_type")]
pub enum Operand {
    CampaignCriterion {
        #[serde(rename = "campaignId")]
        campaign_id: CampaignId,
        criterion: Criterion,
    },
    /// Exclusion. Only ever wraps a placement when built by this crate.
    NegativeCampaignCriterion {
        #[serde(rename = "campaignId")]
        campaign_id: CampaignId,
        criterion: Criterion,
    },
}

impl Operand {
    pub fn campaign_id(&self) -> &CampaignId {
        match self {
            Operand::CampaignCriterion { campaign_id, .. }
            | Operand::NegativeCampaignCriterion { campaign_id, .. } => campaign_id,
        }
    }

    pub fn criterion(&self) -> &Criterion {
        match self {
            Operand::CampaignCriterion { criterion, .. }
            | Operand::NegativeCampaignCriterion { criterion, .. } => criterion,
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Operand::NegativeCampaignCriterion { .. })
    }
}

/// One requested mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub operator: Operator,
    pub operand: Operand,
}

impl Operation {
    pub fn add(operand: Operand) -> Self {
        Self {
            operator: Operator::Add,
            operand,
        }
    }
}

/// Request body for the mutate call.
#[derive(Debug, Clone, Serialize)]
pub struct MutateRequest<'a> {
    pub operations: &'a [Operation],
}

/// Response of a successful mutate call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MutateResponse {
    #[serde(default)]
    pub value: Vec<MutationResult>,
}

/// A criterion the service applied to a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireCampaignCriterion")]
pub struct MutationResult {
    pub campaign_id: CampaignId,
    pub criterion_id: i64,
    pub criterion_type: CriterionType,
    pub is_negative: bool,
    /// Present for placements
    pub url: Option<String>,
}

impl MutationResult {
    pub fn new(
        campaign_id: impl Into<CampaignId>,
        criterion_id: i64,
        criterion_type: CriterionType,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            criterion_id,
            criterion_type,
            is_negative: false,
            url: None,
        }
    }

    pub fn negative(mut self) -> Self {
        self.is_negative = true;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[derive(Deserialize)]
struct WireCampaignCriterion {
    #[serde(rename = "campaignId")]
    campaign_id: CampaignId,
    #[serde(rename = "isNegative", default)]
    is_negative: bool,
    criterion: WireCriterion,
}

#[derive(Deserialize)]
struct WireCriterion {
    #[serde(deserialize_with = "deserialize_int64")]
    id: i64,
    #[serde(rename = "type")]
    criterion_type: CriterionType,
    #[serde(default)]
    url: Option<String>,
}

impl From<WireCampaignCriterion> for MutationResult {
    fn from(wire: WireCampaignCriterion) -> Self {
        Self {
            campaign_id: wire.campaign_id,
            criterion_id: wire.criterion.id,
            criterion_type: wire.criterion.criterion_type,
            is_negative: wire.is_negative,
            url: wire.criterion.url,
        }
    }
}
