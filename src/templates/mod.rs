//! Engagement letter templates
//!
//! Choosing a template for an intake ([`TemplateSelector`]) and resolving the
//! choice against the template directory on disk. When resolution fails the
//! error carries a plain-text diagnostic listing what the directory holds and
//! what the form submitted.

mod selector;
mod table;

pub use selector::{
    ExactTableSelector, RuleTemplates, RuleTreeSelector, Selection, TemplateSelector,
};
pub use table::{TemplateMapping, TemplateTable};

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::intake::Intake;

/// File name reported when the table has no row for a combination
pub const UNKNOWN_TEMPLATE: &str = "UNKNOWN";

/// Plain-text report attached to selection failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDiagnostic {
    pub headline: String,
    pub template_path: Option<PathBuf>,
    pub available_templates: Vec<String>,
    pub received_values: Vec<(&'static str, String)>,
}

impl fmt::Display for TemplateDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;
        if let Some(path) = &self.template_path {
            writeln!(f, "template_path: {}", path.display())?;
        }
        writeln!(f, "available_templates:")?;
        for name in &self.available_templates {
            writeln!(f, "  - {}", name)?;
        }
        writeln!(f, "received_values:")?;
        for (field, value) in &self.received_values {
            writeln!(f, "  {}: {}", field, value)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// No rule covers the submitted combination
    #[error("{0}")]
    Unsupported(TemplateDiagnostic),

    /// A template was chosen (or the table missed) but no such file exists
    #[error("{0}")]
    NotFound(TemplateDiagnostic),
}

impl SelectionError {
    pub fn diagnostic(&self) -> &TemplateDiagnostic {
        match self {
            SelectionError::Unsupported(d) | SelectionError::NotFound(d) => d,
        }
    }
}

/// Read-only directory of `.docx` templates
#[derive(Debug, Clone)]
pub struct TemplateDirectory {
    root: PathBuf,
}

impl TemplateDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted names of the `.docx` files in the directory.
    ///
    /// An unreadable or missing directory lists as empty.
    pub fn available(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list template directory {}: {}", self.root.display(), e);
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".docx"))
            .collect();
        names.sort();
        names
    }

    /// Turn a [`Selection`] into the path of an existing template file
    pub fn resolve(&self, selection: Selection, intake: &Intake) -> Result<PathBuf, SelectionError> {
        match selection {
            Selection::Template(name) => {
                let path = self.root.join(name);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(SelectionError::NotFound(self.not_found(path, intake)))
                }
            }
            Selection::Unmapped => {
                let path = self.root.join(UNKNOWN_TEMPLATE);
                Err(SelectionError::NotFound(self.not_found(path, intake)))
            }
            Selection::Unsupported {
                client_type,
                matter_type,
                payment_method,
            } => Err(SelectionError::Unsupported(TemplateDiagnostic {
                headline: format!(
                    "Unsupported combination: client_type='{}', matter_type='{}', payment_method='{}'",
                    client_type, matter_type, payment_method
                ),
                template_path: None,
                available_templates: self.available(),
                received_values: received_values(intake),
            })),
        }
    }

    fn not_found(&self, path: PathBuf, intake: &Intake) -> TemplateDiagnostic {
        TemplateDiagnostic {
            headline: "Template not found.".to_string(),
            template_path: Some(path),
            available_templates: self.available(),
            received_values: received_values(intake),
        }
    }
}

fn received_values(intake: &Intake) -> Vec<(&'static str, String)> {
    intake
        .fields()
        .iter()
        .map(|&(field, value)| (field, value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn intake() -> Intake {
        Intake {
            client_name: "Morgan".into(),
            client_type: "Corporation".into(),
            matter_type: "Hourly Solution".into(),
            payment_method: "authorize credit card".into(),
            matter_description: "business acquisition".into(),
            instructing_officer_name: "Taylor".into(),
            ..Default::default()
        }
    }

    fn directory_with(names: &[&str]) -> (tempfile::TempDir, TemplateDirectory) {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"stub").unwrap();
        }
        std::fs::create_dir(dir.path().join("archive.docx")).unwrap();
        let templates = TemplateDirectory::new(dir.path());
        (dir, templates)
    }

    #[test]
    fn test_available_lists_docx_files_only() {
        let (_dir, templates) = directory_with(&["b.docx", "a.docx", "notes.txt"]);
        assert_eq!(templates.available(), vec!["a.docx", "b.docx"]);
    }

    #[test]
    fn test_missing_directory_lists_empty() {
        let templates = TemplateDirectory::new("/nonexistent/templates");
        assert!(templates.available().is_empty());
    }

    #[test]
    fn test_resolve_existing_template() {
        let (dir, templates) = directory_with(&["a.docx"]);
        let path = templates
            .resolve(Selection::Template("a.docx".into()), &intake())
            .unwrap();
        assert_eq!(path, dir.path().join("a.docx"));
    }

    #[test]
    fn test_unmapped_reports_unknown_path() {
        let (dir, templates) = directory_with(&["b.docx", "a.docx"]);
        let err = templates.resolve(Selection::Unmapped, &intake()).unwrap_err();
        assert!(matches!(err, SelectionError::NotFound(_)));

        let expected = format!(
            "Template not found.\n\
             template_path: {}\n\
             available_templates:\n  - a.docx\n  - b.docx\n\
             received_values:\n  client_name: Morgan\n  client_type: Corporation\n  \
             matter_type: Hourly Solution\n  payment_method: authorize credit card\n  \
             matter_description: business acquisition\n  instructing_officer_name: Taylor\n  \
             retainer_amount: \n",
            dir.path().join("UNKNOWN").display()
        );
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_missing_file_reports_not_found() {
        let (dir, templates) = directory_with(&[]);
        let err = templates
            .resolve(Selection::Template("gone.docx".into()), &intake())
            .unwrap_err();
        assert_eq!(
            err.diagnostic().template_path,
            Some(dir.path().join("gone.docx"))
        );
    }

    #[test]
    fn test_unsupported_names_combination() {
        let (_dir, templates) = directory_with(&["a.docx"]);
        let err = templates
            .resolve(
                Selection::Unsupported {
                    client_type: "trust".into(),
                    matter_type: "flat".into(),
                    payment_method: "retainer".into(),
                },
                &intake(),
            )
            .unwrap_err();
        assert!(matches!(err, SelectionError::Unsupported(_)));
        let text = err.to_string();
        assert!(text.starts_with(
            "Unsupported combination: client_type='trust', matter_type='flat', payment_method='retainer'\n"
        ));
        assert!(!text.contains("template_path"));
        assert!(text.contains("  - a.docx\n"));
    }
}
