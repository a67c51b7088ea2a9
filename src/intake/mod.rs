//! Engagement intake
//!
//! The seven form fields collected by the intake page, plus the single-pass
//! validation that gates document generation.

mod validate;

pub use validate::{validate, RetainerRule, ValidationError};

use serde::{Deserialize, Serialize};

/// Client type that requires an instructing officer
pub const CORPORATION: &str = "Corporation";

/// Matter type that requires a retainer amount under [`RetainerRule::HourlyStrategy`]
pub const HOURLY_STRATEGY: &str = "Hourly Strategy";

/// Value substituted for empty fields
pub const NOT_APPLICABLE: &str = "N/A";

/// Intake form submission.
///
/// Every field is optional on the wire; missing fields deserialize to the
/// empty string and are rejected by [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intake {
    pub client_name: String,
    pub client_type: String,
    pub matter_type: String,
    pub payment_method: String,
    pub matter_description: String,
    pub instructing_officer_name: String,
    pub retainer_amount: String,
}

impl Intake {
    /// Field names in form order
    pub const FIELDS: [&'static str; 7] = [
        "client_name",
        "client_type",
        "matter_type",
        "payment_method",
        "matter_description",
        "instructing_officer_name",
        "retainer_amount",
    ];

    /// Copy with surrounding whitespace stripped from every field
    pub fn trimmed(&self) -> Self {
        Self {
            client_name: self.client_name.trim().to_string(),
            client_type: self.client_type.trim().to_string(),
            matter_type: self.matter_type.trim().to_string(),
            payment_method: self.payment_method.trim().to_string(),
            matter_description: self.matter_description.trim().to_string(),
            instructing_officer_name: self.instructing_officer_name.trim().to_string(),
            retainer_amount: self.retainer_amount.trim().to_string(),
        }
    }

    /// `(field name, value)` pairs in form order
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("client_name", self.client_name.as_str()),
            ("client_type", self.client_type.as_str()),
            ("matter_type", self.matter_type.as_str()),
            ("payment_method", self.payment_method.as_str()),
            ("matter_description", self.matter_description.as_str()),
            ("instructing_officer_name", self.instructing_officer_name.as_str()),
            ("retainer_amount", self.retainer_amount.as_str()),
        ]
    }

    /// Placeholder values keyed by field name, in form order.
    ///
    /// Empty fields resolve to [`NOT_APPLICABLE`].
    pub fn replacements(&self) -> Vec<(String, String)> {
        self.fields()
            .iter()
            .map(|&(key, value)| {
                let value = if value.is_empty() {
                    NOT_APPLICABLE
                } else {
                    value
                };
                (key.to_string(), value.to_string())
            })
            .collect()
    }

    /// Whether the payment method is a retainer, ignoring case and padding
    pub fn pays_by_retainer(&self) -> bool {
        self.payment_method.trim().eq_ignore_ascii_case("retainer")
    }
}
