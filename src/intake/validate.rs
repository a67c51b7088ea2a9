//! Intake validation
//!
//! Single pass, fail fast: the first violated rule wins and nothing is
//! aggregated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Intake, CORPORATION, HOURLY_STRATEGY};

/// Which intake answers make the retainer amount mandatory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetainerRule {
    /// Matter type is exactly "Hourly Strategy"
    HourlyStrategy,
    /// Payment method is "retainer" (case-insensitive)
    RetainerPayment,
    /// Either of the above
    #[default]
    Either,
}

impl RetainerRule {
    fn hourly_strategy_applies(self) -> bool {
        matches!(self, RetainerRule::HourlyStrategy | RetainerRule::Either)
    }

    fn retainer_payment_applies(self) -> bool {
        matches!(self, RetainerRule::RetainerPayment | RetainerRule::Either)
    }
}

/// First rule an intake submission broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{} is required.", label(.0))]
    MissingField(&'static str),

    #[error("Instructing officer name is required for corporations.")]
    MissingInstructingOfficer,

    #[error("Retainer amount is required for Hourly Strategy matters.")]
    RetainerRequiredForHourlyStrategy,

    #[error("Retainer amount is required when paying by retainer.")]
    RetainerRequiredForRetainerPayment,
}

fn label(field: &str) -> &'static str {
    match field {
        "client_name" => "Client name",
        "client_type" => "Client type",
        "matter_type" => "Matter type",
        "payment_method" => "Payment method",
        "matter_description" => "Matter description",
        "instructing_officer_name" => "Instructing officer name",
        "retainer_amount" => "Retainer amount",
        _ => "Field",
    }
}

/// Check `intake` (already trimmed) against the required-field rules.
pub fn validate(intake: &Intake, retainer_rule: RetainerRule) -> Result<(), ValidationError> {
    let required = [
        ("client_name", &intake.client_name),
        ("client_type", &intake.client_type),
        ("matter_type", &intake.matter_type),
        ("payment_method", &intake.payment_method),
        ("matter_description", &intake.matter_description),
    ];
    if let Some(&(field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(ValidationError::MissingField(field));
    }

    if intake.client_type == CORPORATION && intake.instructing_officer_name.is_empty() {
        return Err(ValidationError::MissingInstructingOfficer);
    }

    if intake.retainer_amount.is_empty() {
        if retainer_rule.hourly_strategy_applies() && intake.matter_type == HOURLY_STRATEGY {
            return Err(ValidationError::RetainerRequiredForHourlyStrategy);
        }
        if retainer_rule.retainer_payment_applies() && intake.pays_by_retainer() {
            return Err(ValidationError::RetainerRequiredForRetainerPayment);
        }
    }

    Ok(())
}
