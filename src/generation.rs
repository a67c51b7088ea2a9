//! Intake → engagement letter pipeline
//!
//! validate → select template → resolve on disk → substitute placeholders →
//! write to the output directory. The document is only written once every
//! substitution has succeeded in memory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::docx::{DocxError, DocxPackage, Replacements, SubstitutionSummary};
use crate::intake::{validate, Intake, RetainerRule, ValidationError};
use crate::storage::sanitize_filename;
use crate::templates::{SelectionError, TemplateDirectory, TemplateSelector};

/// How generated files are named in the output directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputNaming {
    /// `{sanitized client name}.docx`; repeat submissions overwrite
    #[default]
    ClientName,
    /// `document_YYYYMMDD_HHMMSS.docx`
    Timestamp,
}

impl OutputNaming {
    pub fn file_name(self, intake: &Intake, now: NaiveDateTime) -> String {
        match self {
            OutputNaming::ClientName => format!("{}.docx", sanitize_filename(&intake.client_name)),
            OutputNaming::Timestamp => format!("document_{}.docx", now.format("%Y%m%d_%H%M%S")),
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Document error: {0}")]
    Document(#[from] DocxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A letter written to the output directory
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub file_name: String,
    pub path: PathBuf,
    pub template: PathBuf,
    pub bytes: Vec<u8>,
    pub summary: SubstitutionSummary,
}

pub struct DocumentGenerator {
    templates: TemplateDirectory,
    selector: Arc<dyn TemplateSelector>,
    output_dir: PathBuf,
    retainer_rule: RetainerRule,
    naming: OutputNaming,
}

impl DocumentGenerator {
    pub fn new(
        templates: TemplateDirectory,
        selector: Arc<dyn TemplateSelector>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            templates,
            selector,
            output_dir: output_dir.into(),
            retainer_rule: RetainerRule::default(),
            naming: OutputNaming::default(),
        }
    }

    pub fn with_retainer_rule(mut self, rule: RetainerRule) -> Self {
        self.retainer_rule = rule;
        self
    }

    pub fn with_naming(mut self, naming: OutputNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Build from configuration, creating the output directory if needed
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.output_dir)?;
        let selector = config.build_selector()?;
        info!(
            strategy = selector.strategy(),
            template_dir = %config.template_dir.display(),
            output_dir = %config.output_dir.display(),
            "Document generator ready"
        );
        Ok(Self::new(
            TemplateDirectory::new(&config.template_dir),
            selector,
            &config.output_dir,
        )
        .with_retainer_rule(config.retainer_rule)
        .with_naming(config.output_naming))
    }

    pub fn templates(&self) -> &TemplateDirectory {
        &self.templates
    }

    pub fn generate(&self, submitted: &Intake) -> Result<GeneratedDocument, GenerationError> {
        self.generate_at(submitted, Local::now().naive_local())
    }

    pub fn generate_at(
        &self,
        submitted: &Intake,
        now: NaiveDateTime,
    ) -> Result<GeneratedDocument, GenerationError> {
        let intake = submitted.trimmed();
        validate(&intake, self.retainer_rule)?;

        let selection = self.selector.select(&intake);
        debug!(strategy = self.selector.strategy(), ?selection, "Template selected");
        let template = self.templates.resolve(selection, &intake)?;

        let mut package = DocxPackage::open(&template)?;
        let summary = package.substitute(&Replacements::new(intake.replacements()))?;
        let bytes = package.to_bytes()?;

        std::fs::create_dir_all(&self.output_dir)?;
        let file_name = self.naming.file_name(&intake, now);
        let path = self.output_dir.join(&file_name);
        std::fs::write(&path, &bytes)?;

        info!(
            template = %template.display(),
            output = %path.display(),
            paragraphs_changed = summary.paragraphs_changed,
            tokens_replaced = summary.tokens_replaced,
            "Generated engagement document"
        );

        Ok(GeneratedDocument {
            file_name,
            path,
            template,
            bytes,
            summary,
        })
    }
}
