//! Service configuration
//!
//! Everything a request handler needs to know about its environment lives in
//! [`AppConfig`]: where templates are read from, where generated letters are
//! written, and which selection/validation variants are active. The binary
//! builds one from an optional YAML file plus CLI/env overrides.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::generation::OutputNaming;
use crate::intake::RetainerRule;
use crate::storage::DEFAULT_ENGAGEMENTS_ROOT;
use crate::templates::{
    ExactTableSelector, RuleTemplates, RuleTreeSelector, TemplateSelector, TemplateTable,
};

/// Which [`TemplateSelector`] serves requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Case-sensitive (client type, matter type, payment method) table
    #[default]
    ExactTable,
    /// Normalized rules; unmatched input is rejected as unsupported
    RuleTree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub engagements_root: PathBuf,
    pub selection: SelectionStrategy,
    /// YAML table replacing the built-in one (exact_table only)
    pub template_map: Option<PathBuf>,
    /// File names used by rule_tree
    pub rule_templates: RuleTemplates,
    pub retainer_rule: RetainerRule,
    pub output_naming: OutputNaming,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            template_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output"),
            engagements_root: PathBuf::from(DEFAULT_ENGAGEMENTS_ROOT),
            selection: SelectionStrategy::default(),
            template_map: None,
            rule_templates: RuleTemplates::default(),
            retainer_rule: RetainerRule::default(),
            output_naming: OutputNaming::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, or the YAML file at `path` layered over them
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn build_selector(&self) -> Result<Arc<dyn TemplateSelector>> {
        let selector: Arc<dyn TemplateSelector> = match self.selection {
            SelectionStrategy::ExactTable => {
                let table = match &self.template_map {
                    Some(path) => TemplateTable::from_yaml_file(path)?,
                    None => TemplateTable::builtin(),
                };
                Arc::new(ExactTableSelector::new(table))
            }
            SelectionStrategy::RuleTree => {
                Arc::new(RuleTreeSelector::new(self.rule_templates.clone()))
            }
        };
        Ok(selector)
    }

    /// Template file names the active strategy can hand out
    pub fn referenced_templates(&self) -> Result<Vec<String>> {
        match self.selection {
            SelectionStrategy::ExactTable => {
                let table = match &self.template_map {
                    Some(path) => TemplateTable::from_yaml_file(path)?,
                    None => TemplateTable::builtin(),
                };
                Ok(table.template_names())
            }
            SelectionStrategy::RuleTree => Ok(self.rule_templates.names()),
        }
    }
}
