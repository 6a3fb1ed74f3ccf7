//! Adds targeting criteria to a campaign in one batch and prints the outcome.
//!
//! Report lines go to stdout; logs go to stderr.

mod config;

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use campaign_criteria::taxonomy::{language, location};
use campaign_criteria::{
    add_campaign_targeting_criteria, ApiError, BatchSubmitter, CampaignId, Criterion,
    HttpMutationService, Outcome,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const DEFAULT_EXCLUDED_PLACEMENT: &str = "http://mars.google.com";

#[derive(Parser, Debug)]
#[command(name = "add-campaign-targeting")]
#[command(about = "Add location, language and negative placement criteria to a campaign")]
struct Cli {
    /// Campaign to attach the criteria to
    #[arg(long, env = "ADS_CAMPAIGN_ID")]
    campaign_id: String,

    /// Location criterion id (repeatable)
    #[arg(
        long = "location",
        value_name = "ID",
        default_values_t = [location::CALIFORNIA, location::MEXICO]
    )]
    locations: Vec<i64>,

    /// Language criterion id (repeatable)
    #[arg(
        long = "language",
        value_name = "ID",
        default_values_t = [language::ENGLISH, language::SPANISH]
    )]
    languages: Vec<i64>,

    /// Placement URL the campaign must avoid
    #[arg(long, value_name = "URL", default_value = DEFAULT_EXCLUDED_PLACEMENT)]
    exclude_placement: String,

    /// Do not add a negative placement
    #[arg(long, conflicts_with = "exclude_placement")]
    no_exclude_placement: bool,
}

impl Cli {
    fn criteria(&self) -> Vec<Criterion> {
        self.locations
            .iter()
            .copied()
            .map(Criterion::location)
            .chain(self.languages.iter().copied().map(Criterion::language))
            .collect()
    }

    fn excluded_placement(&self) -> Option<&str> {
        (!self.no_exclude_placement).then_some(self.exclude_placement.as_str())
    }
}

/// Load `.env` (or `env_file`) first so clap's `env` fallbacks can see it, then parse.
fn parse_cli<I, T>(env_file: Option<&Path>, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let _ = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    Cli::try_parse_from(args)
}

/// 0 on success, one distinct code per classified failure. Build errors and
/// unclassified failures leave through `main`'s error path with code 1; clap
/// owns 2 for usage errors.
fn exit_code(outcome: &Outcome) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(ApiError::Authorization { .. }) => 3,
        Err(ApiError::Transport(_)) => 4,
        Err(ApiError::Validation(_)) => 5,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,campaign_criteria=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = parse_cli(None, std::env::args_os()).unwrap_or_else(|e| e.exit());

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(version = %config.version, endpoint = %config.endpoint, "Configuration loaded");

    let campaign_id = CampaignId::new(cli.campaign_id.as_str()).context("Invalid campaign id")?;
    let criteria = cli.criteria();

    let submitter = BatchSubmitter::new(HttpMutationService::new(config.service_config()));
    let outcome = add_campaign_targeting_criteria(
        &submitter,
        &campaign_id,
        &criteria,
        cli.excluded_placement(),
        &mut io::stdout(),
    )
    .await
    .context("Campaign targeting run failed")?;

    if let Err(e) = &outcome {
        tracing::warn!(kind = e.kind(), "Campaign targeting was not applied");
    }

    Ok(ExitCode::from(exit_code(&outcome)))
}
