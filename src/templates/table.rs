//! Exact (client type, matter type, payment method) → template table

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One row of the template table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMapping {
    pub client_type: String,
    pub matter_type: String,
    pub payment_method: String,
    pub template: String,
}

impl TemplateMapping {
    pub fn new(client_type: &str, matter_type: &str, payment_method: &str, template: &str) -> Self {
        Self {
            client_type: client_type.into(),
            matter_type: matter_type.into(),
            payment_method: payment_method.into(),
            template: template.into(),
        }
    }

    fn matches(&self, client_type: &str, matter_type: &str, payment_method: &str) -> bool {
        self.client_type == client_type
            && self.matter_type == matter_type
            && self.payment_method == payment_method
    }
}

/// Case-sensitive lookup table. Later rows never shadow earlier ones: the
/// first matching row wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateTable {
    mappings: Vec<TemplateMapping>,
}

impl TemplateTable {
    pub fn new(mappings: Vec<TemplateMapping>) -> Self {
        Self { mappings }
    }

    /// Table shipped with the service
    pub fn builtin() -> Self {
        const INDIVIDUAL_FLAT: &str = "individual_flat_fee.docx";
        const INDIVIDUAL_HOURLY: &str = "individual_hourly.docx";
        const INDIVIDUAL_RETAINER: &str = "individual_retainer.docx";
        const CORPORATION: &str = "corporation_engagement.docx";
        const CORPORATION_RETAINER: &str = "corporation_retainer.docx";

        let mut mappings = Vec::new();
        for payment in ["pay on invoice", "authorize credit card"] {
            mappings.push(TemplateMapping::new("Individual", "Flat", payment, INDIVIDUAL_FLAT));
            for hourly in ["Hourly Solution", "Hourly Strategy"] {
                mappings.push(TemplateMapping::new("Individual", hourly, payment, INDIVIDUAL_HOURLY));
            }
        }
        for matter in ["Flat", "Hourly Solution", "Hourly Strategy"] {
            mappings.push(TemplateMapping::new("Individual", matter, "retainer", INDIVIDUAL_RETAINER));
        }
        // Corporations are invoiced or on retainer; card payment is not offered
        for matter in ["Flat", "Hourly Solution", "Hourly Strategy"] {
            mappings.push(TemplateMapping::new("Corporation", matter, "pay on invoice", CORPORATION));
            mappings.push(TemplateMapping::new("Corporation", matter, "retainer", CORPORATION_RETAINER));
        }
        Self { mappings }
    }

    /// Load a YAML list of [`TemplateMapping`] rows
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        info!("Loading template table from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let table: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if table.mappings.is_empty() {
            anyhow::bail!("Template table {} has no rows", path.display());
        }
        info!("Loaded {} template mappings", table.mappings.len());
        Ok(table)
    }

    pub fn lookup(&self, client_type: &str, matter_type: &str, payment_method: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.matches(client_type, matter_type, payment_method))
            .map(|m| m.template.as_str())
    }

    pub fn mappings(&self) -> &[TemplateMapping] {
        &self.mappings
    }

    /// Distinct template file names, sorted
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.mappings.iter().map(|m| m.template.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

impl Default for TemplateTable {
    fn default() -> Self {
        Self::builtin()
    }
}
