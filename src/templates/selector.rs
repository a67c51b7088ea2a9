//! Template selection strategies

use serde::{Deserialize, Serialize};

use super::table::TemplateTable;
use crate::intake::Intake;

/// Outcome of picking a template for an intake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Template file name, relative to the template directory
    Template(String),
    /// The table has no row for the combination
    Unmapped,
    /// No rule covers the combination; values are the trimmed submission
    Unsupported {
        client_type: String,
        matter_type: String,
        payment_method: String,
    },
}

/// Maps an intake's (client type, matter type, payment method) to a template
pub trait TemplateSelector: Send + Sync {
    fn select(&self, intake: &Intake) -> Selection;

    /// Short name for logs
    fn strategy(&self) -> &'static str;
}

/// Verbatim lookup in a [`TemplateTable`]
#[derive(Debug, Clone, Default)]
pub struct ExactTableSelector {
    table: TemplateTable,
}

impl ExactTableSelector {
    pub fn new(table: TemplateTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TemplateTable {
        &self.table
    }
}

impl TemplateSelector for ExactTableSelector {
    fn select(&self, intake: &Intake) -> Selection {
        match self.table.lookup(
            &intake.client_type,
            &intake.matter_type,
            &intake.payment_method,
        ) {
            Some(template) => Selection::Template(template.to_string()),
            None => Selection::Unmapped,
        }
    }

    fn strategy(&self) -> &'static str {
        "exact_table"
    }
}

/// Template file names used by [`RuleTreeSelector`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTemplates {
    pub individual_flat: String,
    pub individual_hourly: String,
    pub corporation: String,
    pub individual_retainer: String,
    pub corporation_retainer: String,
}

impl Default for RuleTemplates {
    fn default() -> Self {
        Self {
            individual_flat: "individual_flat_fee.docx".into(),
            individual_hourly: "individual_hourly.docx".into(),
            corporation: "corporation_engagement.docx".into(),
            individual_retainer: "individual_retainer.docx".into(),
            corporation_retainer: "corporation_retainer.docx".into(),
        }
    }
}

impl RuleTemplates {
    /// Distinct file names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names = vec![
            self.individual_flat.clone(),
            self.individual_hourly.clone(),
            self.corporation.clone(),
            self.individual_retainer.clone(),
            self.corporation_retainer.clone(),
        ];
        names.sort();
        names.dedup();
        names
    }
}

/// Case-insensitive rules over trimmed input.
///
/// Retainer payment decides first (by client type), then client type and
/// matter type: individual flat, individual hourly (any "hourly" label),
/// or corporation with any matter type.
#[derive(Debug, Clone, Default)]
pub struct RuleTreeSelector {
    templates: RuleTemplates,
}

const HOURLY_MATTERS: [&str; 3] = ["hourly solution", "hourly strategy", "hourly"];

impl RuleTreeSelector {
    pub fn new(templates: RuleTemplates) -> Self {
        Self { templates }
    }
}

impl TemplateSelector for RuleTreeSelector {
    fn select(&self, intake: &Intake) -> Selection {
        let client_type = intake.client_type.trim().to_lowercase();
        let matter_type = intake.matter_type.trim().to_lowercase();
        let payment_method = intake.payment_method.trim().to_lowercase();

        let chosen = if payment_method == "retainer" {
            match client_type.as_str() {
                "individual" => Some(&self.templates.individual_retainer),
                "corporation" => Some(&self.templates.corporation_retainer),
                _ => None,
            }
        } else {
            match client_type.as_str() {
                "individual" if matter_type == "flat" => Some(&self.templates.individual_flat),
                "individual" if HOURLY_MATTERS.contains(&matter_type.as_str()) => {
                    Some(&self.templates.individual_hourly)
                }
                "corporation" => Some(&self.templates.corporation),
                _ => None,
            }
        };

        match chosen {
            Some(template) => Selection::Template(template.clone()),
            None => Selection::Unsupported {
                client_type: intake.client_type.trim().to_string(),
                matter_type: intake.matter_type.trim().to_string(),
                payment_method: intake.payment_method.trim().to_string(),
            },
        }
    }

    fn strategy(&self) -> &'static str {
        "rule_tree"
    }
}
