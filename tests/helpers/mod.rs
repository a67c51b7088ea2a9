//! Shared fixtures for HTTP integration tests
//!
//! Builds small but structurally real `.docx` templates (body paragraphs
//! with split runs, a table, a header and a footer) and an app wired to a
//! temporary template/output directory pair.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use axum::Router;
use engagement_docgen::api::{create_router, AppState};
use engagement_docgen::config::{AppConfig, SelectionStrategy};
use zip::write::FileOptions;
use zip::ZipWriter;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub const ALL_TEMPLATES: [&str; 5] = [
    "corporation_engagement.docx",
    "corporation_retainer.docx",
    "individual_flat_fee.docx",
    "individual_hourly.docx",
    "individual_retainer.docx",
];

/// Incrementally assembled `.docx` template
#[derive(Default)]
pub struct TemplateBuilder {
    body: String,
    header: Option<String>,
    footer: Option<String>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paragraph made of one run per entry, so a token can straddle runs
    pub fn paragraph(mut self, runs: &[&str]) -> Self {
        self.body.push_str(&paragraph_xml(runs));
        self
    }

    /// Single-row table, one paragraph per cell
    pub fn table_row(mut self, cells: &[&str]) -> Self {
        let cells: String = cells
            .iter()
            .map(|text| format!("<w:tc>{}</w:tc>", paragraph_xml(&[text])))
            .collect();
        self.body
            .push_str(&format!("<w:tbl><w:tr>{}</w:tr></w:tbl>", cells));
        self
    }

    pub fn header(mut self, text: &str) -> Self {
        self.header = Some(paragraph_xml(&[text]));
        self
    }

    pub fn footer(mut self, text: &str) -> Self {
        self.footer = Some(paragraph_xml(&[text]));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut rels = String::new();
        let mut parts = Vec::new();
        if let Some(header) = &self.header {
            rels.push_str(&format!(
                r#"<Relationship Id="rId10" Type="{}/header" Target="header1.xml"/>"#,
                REL_TYPE
            ));
            parts.push((
                "word/header1.xml".to_string(),
                format!(r#"<w:hdr xmlns:w="{}">{}</w:hdr>"#, W_NS, header),
            ));
        }
        if let Some(footer) = &self.footer {
            rels.push_str(&format!(
                r#"<Relationship Id="rId11" Type="{}/footer" Target="footer1.xml"/>"#,
                REL_TYPE
            ));
            parts.push((
                "word/footer1.xml".to_string(),
                format!(r#"<w:ftr xmlns:w="{}">{}</w:ftr>"#, W_NS, footer),
            ));
        }

        parts.insert(
            0,
            (
                "_rels/.rels".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="word/document.xml"/></Relationships>"#,
                    REL_NS, REL_TYPE
                ),
            ),
        );
        parts.insert(
            1,
            (
                "word/document.xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
                    W_NS, self.body
                ),
            ),
        );
        parts.insert(
            2,
            (
                "word/_rels/document.xml.rels".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}">{}</Relationships>"#,
                    REL_NS, rels
                ),
            ),
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in &parts {
            writer.start_file(name.as_str(), FileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}

fn paragraph_xml(runs: &[&str]) -> String {
    let runs: String = runs
        .iter()
        .map(|text| {
            format!(
                r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
                text
            )
        })
        .collect();
    format!("<w:p>{}</w:p>", runs)
}

/// The letter every test template uses
pub fn engagement_letter() -> TemplateBuilder {
    TemplateBuilder::new()
        .paragraph(&["Dear {{client", "_name}},"])
        .paragraph(&["Matter: {{matter_description}}"])
        .paragraph(&["Officer: {{instructing_officer_name}}"])
        .table_row(&["Fee basis", "{{matter_type}} / {{payment_method}}"])
        .table_row(&["Retainer", "{{retainer_amount}}"])
        .header("Engagement letter for {{client_name}}")
        .footer("{{client_type}} client")
}

/// Temporary template and output directories plus a router serving them
pub struct TestApp {
    _dir: tempfile::TempDir,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub router: Router,
}

impl TestApp {
    pub fn new(selection: SelectionStrategy) -> Self {
        Self::with_templates(selection, &ALL_TEMPLATES)
    }

    pub fn with_templates(selection: SelectionStrategy, templates: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let template_dir = dir.path().join("templates");
        let output_dir = dir.path().join("output");
        std::fs::create_dir(&template_dir).unwrap();
        for name in templates {
            engagement_letter().write_to(&template_dir.join(name));
        }

        let config = AppConfig {
            template_dir: template_dir.clone(),
            output_dir: output_dir.clone(),
            selection,
            ..Default::default()
        };
        let router = create_router(AppState::from_config(&config).unwrap());

        Self {
            _dir: dir,
            template_dir,
            output_dir,
            router,
        }
    }

    /// Files currently in the output directory
    pub fn outputs(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// URL-encoded form body
pub fn form_body(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).unwrap()
}

/// A submission that passes validation and maps to `individual_hourly.docx`
pub fn valid_intake() -> Vec<(&'static str, &'static str)> {
    vec![
        ("client_name", "Jordan"),
        ("client_type", "Individual"),
        ("matter_type", "Hourly Solution"),
        ("payment_method", "pay on invoice"),
        ("matter_description", "Lease review"),
        ("instructing_officer_name", ""),
        ("retainer_amount", ""),
    ]
}

/// `base` with `key` set to `value`
pub fn with_field(
    mut base: Vec<(&'static str, &'static str)>,
    key: &'static str,
    value: &'static str,
) -> Vec<(&'static str, &'static str)> {
    match base.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => base.push((key, value)),
    }
    base
}
