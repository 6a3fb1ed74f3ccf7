//! Human-readable reporting of a batch outcome.
//!
//! Reporting makes no control decisions. Every [`ApiError`] kind gets its own
//! wording so operators can tell them apart.

use std::io::{self, Write};

use crate::error::{ApiError, ValidationError};
use crate::types::{MutationResult, Outcome};

const AUTHORIZATION_GUIDANCE: &str = "Authorization credentials are not valid. Update the stored \
     OAuth2 client ID, client secret and tokens, then re-run the OAuth2 setup flow to retrieve \
     and store fresh tokens.";
const AUTHORIZATION_DOCS: &str = "See https://developers.google.com/adwords/api/docs/guides/authentication \
     for more details.";

/// Render the report lines for an outcome.
pub fn report_lines(outcome: &Outcome) -> Vec<String> {
    match outcome {
        Ok(results) => results.iter().map(success_line).collect(),
        Err(ApiError::Authorization { message }) => vec![
            AUTHORIZATION_GUIDANCE.to_string(),
            AUTHORIZATION_DOCS.to_string(),
            format!("Service said: {}", message),
        ],
        Err(ApiError::Transport(e)) => vec![format!("HTTP Error: {}", e)],
        Err(ApiError::Validation(e)) => validation_lines(e),
    }
}

/// Write the report for an outcome to `sink`, returning the lines written.
pub fn report<W: Write>(outcome: &Outcome, sink: &mut W) -> io::Result<Vec<String>> {
    let lines = report_lines(outcome);
    for line in &lines {
        writeln!(sink, "{}", line)?;
    }
    sink.flush()?;
    Ok(lines)
}

fn success_line(result: &MutationResult) -> String {
    format!(
        "Campaign criterion with campaign ID {}, criterion ID {} and type '{}' was added.",
        result.campaign_id, result.criterion_id, result.criterion_type
    )
}

fn validation_lines(error: &ValidationError) -> Vec<String> {
    let mut lines = vec![format!("Message: {}", error.message), "Errors:".to_string()];
    for (index, violation) in error.violations.iter().enumerate() {
        lines.push(format!("\tError [{}]:", index + 1));
        lines.extend(
            violation
                .iter()
                .map(|(field, value)| format!("\t\t{}: {}", field, value)),
        );
    }
    lines
}
