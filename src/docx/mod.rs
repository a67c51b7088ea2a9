//! `.docx` template handling
//!
//! A `.docx` file is a zip package of XML parts. [`DocxPackage`] keeps every
//! entry in memory, locates the main document part and its header/footer
//! parts through the package relationships, and rewrites only the parts whose
//! text actually changed. A package with no changes saves back to its
//! original bytes.

mod paragraph;
mod substitute;
pub mod xml;

pub use substitute::{Replacements, SubstitutionSummary};

use std::io::{Cursor, Read, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use paragraph::{
    body_paragraphs, body_paragraphs_mut, paragraph_text, set_paragraph_text, W_BODY, W_P,
};
use xml::{Element, XmlDocument};

const PACKAGE_RELS: &str = "_rels/.rels";
const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";
const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
const REL_HEADER: &str = "/header";
const REL_FOOTER: &str = "/footer";

/// Errors reading, rewriting or saving a `.docx` package
#[derive(Error, Debug)]
pub enum DocxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid .docx package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("Package has no part named {0}")]
    MissingPart(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartKind {
    Document,
    HeaderFooter,
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// An opened `.docx` package
#[derive(Debug, Clone)]
pub struct DocxPackage {
    source: Vec<u8>,
    entries: Vec<Entry>,
    document_part: String,
    header_footer_parts: Vec<String>,
    modified: bool,
}

impl DocxPackage {
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DocxError> {
        let entries = read_entries(&bytes)?;
        let mut package = Self {
            source: bytes,
            entries,
            document_part: String::new(),
            header_footer_parts: Vec::new(),
            modified: false,
        };
        package.document_part = package.locate_document_part()?;
        package.header_footer_parts = package.locate_header_footer_parts()?;
        debug!(
            document = %package.document_part,
            headers_footers = package.header_footer_parts.len(),
            "Opened .docx package"
        );
        Ok(package)
    }

    /// Name of the main document part (normally `word/document.xml`)
    pub fn document_part(&self) -> &str {
        &self.document_part
    }

    /// Header and footer parts referenced by the main document, sorted
    pub fn header_footer_parts(&self) -> &[String] {
        &self.header_footer_parts
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    fn part_xml(&self, name: &str) -> Result<XmlDocument, DocxError> {
        let data = self
            .part(name)
            .ok_or_else(|| DocxError::MissingPart(name.to_string()))?;
        xml::parse(data).map_err(|e| DocxError::Xml {
            part: name.to_string(),
            message: e.0,
        })
    }

    fn locate_document_part(&self) -> Result<String, DocxError> {
        if self.part(PACKAGE_RELS).is_some() {
            let rels = self.part_xml(PACKAGE_RELS)?;
            if let Some(target) = relationship_targets(&rels, "", REL_OFFICE_DOCUMENT)
                .into_iter()
                .next()
            {
                if self.part(&target).is_some() {
                    return Ok(target);
                }
            }
        }
        if self.part(DEFAULT_DOCUMENT_PART).is_some() {
            return Ok(DEFAULT_DOCUMENT_PART.to_string());
        }
        Err(DocxError::MissingPart(DEFAULT_DOCUMENT_PART.to_string()))
    }

    fn locate_header_footer_parts(&self) -> Result<Vec<String>, DocxError> {
        let (dir, file) = match self.document_part.rsplit_once('/') {
            Some((dir, file)) => (dir.to_string(), file.to_string()),
            None => (String::new(), self.document_part.clone()),
        };
        let rels_name = if dir.is_empty() {
            format!("_rels/{}.rels", file)
        } else {
            format!("{}/_rels/{}.rels", dir, file)
        };
        if self.part(&rels_name).is_none() {
            return Ok(Vec::new());
        }

        let rels = self.part_xml(&rels_name)?;
        let mut parts = relationship_targets(&rels, &dir, REL_HEADER);
        parts.extend(relationship_targets(&rels, &dir, REL_FOOTER));
        parts.retain(|name| self.part(name).is_some());
        parts.sort();
        parts.dedup();
        Ok(parts)
    }

    fn text_parts(&self) -> Vec<(String, PartKind)> {
        std::iter::once((self.document_part.clone(), PartKind::Document))
            .chain(
                self.header_footer_parts
                    .iter()
                    .map(|name| (name.clone(), PartKind::HeaderFooter)),
            )
            .collect()
    }

    /// Replace placeholder tokens in every body, table-cell, header and
    /// footer paragraph.
    ///
    /// Only paragraphs whose joined text changes are rewritten: their runs
    /// are emptied and the new text goes into the first run.
    pub fn substitute(
        &mut self,
        replacements: &Replacements,
    ) -> Result<SubstitutionSummary, DocxError> {
        let mut summary = SubstitutionSummary::default();

        for (name, kind) in self.text_parts() {
            let mut doc = self.part_xml(&name)?;
            let mut changed_here = 0;

            if let Some(root) = doc.root_mut() {
                for paragraph in region_paragraphs_mut(root, kind) {
                    let Some(text) = paragraph_text(paragraph) else {
                        continue;
                    };
                    summary.paragraphs_visited += 1;
                    let (updated, count) = replacements.apply(&text);
                    if updated != text {
                        set_paragraph_text(paragraph, &updated);
                        summary.tokens_replaced += count;
                        changed_here += 1;
                    }
                }
            }

            if changed_here > 0 {
                let data = xml::write(&doc).map_err(|e| DocxError::Xml {
                    part: name.clone(),
                    message: e.0,
                })?;
                if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
                    entry.data = data;
                }
                summary.paragraphs_changed += changed_here;
                summary.parts_changed.push(name);
                self.modified = true;
            }
        }

        Ok(summary)
    }

    /// Text of every visited paragraph (body, cells, headers, footers), one
    /// per line
    pub fn plain_text(&self) -> Result<String, DocxError> {
        let mut lines = Vec::new();
        for (name, kind) in self.text_parts() {
            let doc = self.part_xml(&name)?;
            if let Some(root) = doc.root() {
                lines.extend(
                    region_paragraphs(root, kind)
                        .into_iter()
                        .map(|p| paragraph_text(p).unwrap_or_default()),
                );
            }
        }
        Ok(lines.join("\n"))
    }

    /// Serialize the package. Unmodified packages return their source bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        if !self.modified {
            return Ok(self.source.clone());
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in &self.entries {
            let options = FileOptions::default().compression_method(entry.compression);
            if entry.is_dir {
                writer.add_directory(entry.name.as_str(), options)?;
            } else {
                writer.start_file(entry.name.as_str(), options)?;
                writer.write_all(&entry.data)?;
            }
        }
        Ok(writer.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<(), DocxError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn read_entries(bytes: &[u8]) -> Result<Vec<Entry>, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        entries.push(Entry {
            name: file.name().to_string(),
            // Anything other than stored is rewritten deflated
            compression: match file.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            },
            is_dir: file.is_dir(),
            data,
        });
    }
    Ok(entries)
}

fn region_paragraphs(root: &Element, kind: PartKind) -> Vec<&Element> {
    match kind {
        PartKind::Document => root
            .children_named(W_BODY)
            .flat_map(body_paragraphs)
            .collect(),
        PartKind::HeaderFooter => root.children_named(W_P).collect(),
    }
}

fn region_paragraphs_mut(root: &mut Element, kind: PartKind) -> Vec<&mut Element> {
    match kind {
        PartKind::Document => root
            .children_named_mut(W_BODY)
            .flat_map(body_paragraphs_mut)
            .collect(),
        PartKind::HeaderFooter => root.children_named_mut(W_P).collect(),
    }
}

/// Targets of relationships whose type ends with `type_suffix`, resolved
/// against `base_dir`. External targets are skipped.
fn relationship_targets(rels: &XmlDocument, base_dir: &str, type_suffix: &str) -> Vec<String> {
    let Some(root) = rels.root() else {
        return Vec::new();
    };
    root.child_elements()
        .filter(|rel| rel.name().ends_with(b"Relationship"))
        .filter(|rel| {
            rel.attribute(b"Type")
                .is_some_and(|t| t.ends_with(type_suffix))
        })
        .filter(|rel| {
            rel.attribute(b"TargetMode")
                .map_or(true, |mode| !mode.eq_ignore_ascii_case("External"))
        })
        .filter_map(|rel| rel.attribute(b"Target"))
        .map(|target| resolve_target(base_dir, &target))
        .collect()
}

fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
