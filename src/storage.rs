//! Engagement naming helpers
//!
//! Slugs, engagement ids, safe file names and the on-disk layout of an
//! engagement's artifact bundle. Nothing here touches the filesystem: the
//! bundle is a naming convention that other tooling populates.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Default root under which engagement directories live
pub const DEFAULT_ENGAGEMENTS_ROOT: &str = "engagements";

/// Lowercase `value` and collapse every run of characters outside `[a-z0-9]`
/// into a single hyphen, trimming hyphens from both ends.
///
/// ```
/// use engagement_docgen::storage::sanitize_slug;
/// assert_eq!(sanitize_slug("  Acme Holdings, Ltd. "), "acme-holdings-ltd");
/// ```
pub fn sanitize_slug(value: &str) -> String {
    collapse_runs(&value.to_lowercase(), '-', |c| {
        c.is_ascii_lowercase() || c.is_ascii_digit()
    })
}

/// Build an engagement id of the form `{year}-{seq:03}-{slug}`.
///
/// Uniqueness is the caller's problem.
pub fn format_engagement_id(year: i32, seq: u32, slug: &str) -> String {
    format!("{}-{:03}-{}", year, seq, sanitize_slug(slug))
}

/// Turn free text into a file stem safe for the output directory.
///
/// Runs of characters outside `[A-Za-z0-9_-]` become `_`, leading and
/// trailing underscores are dropped, and an empty result becomes `document`.
pub fn sanitize_filename(value: &str) -> String {
    let cleaned = collapse_runs(value, '_', |c| {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    });
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

fn collapse_runs(value: &str, separator: char, keep: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending = false;
    for c in value.chars() {
        if keep(c) {
            if pending && !out.is_empty() {
                out.push(separator);
            }
            pending = false;
            out.push(c);
        } else {
            pending = true;
        }
    }
    // The separator may itself be a kept char ('_' in file names)
    out.trim_matches(separator).to_string()
}

/// Directory holding one engagement's artifacts
pub fn engagement_dir(root: &Path, engagement_id: &str) -> PathBuf {
    root.join(engagement_id)
}

/// Expected file locations for one engagement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementArtifacts {
    pub dir: PathBuf,
    pub intake: PathBuf,
    pub docx: PathBuf,
    pub pdf: PathBuf,
    pub manifest: PathBuf,
}

/// Paths for the intake record, versioned letter (docx + pdf) and manifest
/// of `engagement_id` under `root`.
pub fn engagement_artifacts(root: &Path, engagement_id: &str, version: u32) -> EngagementArtifacts {
    let dir = engagement_dir(root, engagement_id);
    EngagementArtifacts {
        intake: dir.join("intake.json"),
        docx: dir.join(format!("engagement_v{}.docx", version)),
        pdf: dir.join(format!("engagement_v{}.pdf", version)),
        manifest: dir.join("manifest.json"),
        dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_collapses_and_trims() {
        assert_eq!(sanitize_slug("Acme Corp"), "acme-corp");
        assert_eq!(sanitize_slug("--Acme---Corp--"), "acme-corp");
        assert_eq!(sanitize_slug("O'Brien & Sons (2024)"), "o-brien-sons-2024");
        assert_eq!(sanitize_slug("!!!"), "");
    }

    #[test]
    fn test_slug_drops_non_ascii_letters() {
        // Lowercasing happens first, so "É" becomes "é" which is still outside [a-z0-9]
        assert_eq!(sanitize_slug("Émile Zola"), "mile-zola");
    }

    #[test]
    fn test_engagement_id_pads_sequence() {
        assert_eq!(format_engagement_id(2024, 7, "Acme Corp"), "2024-007-acme-corp");
        assert_eq!(format_engagement_id(2025, 1234, "x"), "2025-1234-x");
    }

    #[test]
    fn test_filename_rules() {
        assert_eq!(sanitize_filename("Jordan"), "Jordan");
        assert_eq!(sanitize_filename("Jordan Smith"), "Jordan_Smith");
        assert_eq!(sanitize_filename("  a/b\\c  "), "a_b_c");
        assert_eq!(sanitize_filename("__x__"), "x");
        assert_eq!(sanitize_filename("well-known_co"), "well-known_co");
        assert_eq!(sanitize_filename("///"), "document");
        assert_eq!(sanitize_filename(""), "document");
    }

    #[test]
    fn test_artifact_layout() {
        let artifacts = engagement_artifacts(Path::new("engagements"), "2024-001-acme", 2);
        assert_eq!(artifacts.dir, PathBuf::from("engagements/2024-001-acme"));
        assert_eq!(
            artifacts.intake,
            PathBuf::from("engagements/2024-001-acme/intake.json")
        );
        assert_eq!(
            artifacts.docx,
            PathBuf::from("engagements/2024-001-acme/engagement_v2.docx")
        );
        assert_eq!(
            artifacts.pdf,
            PathBuf::from("engagements/2024-001-acme/engagement_v2.pdf")
        );
        assert_eq!(
            artifacts.manifest,
            PathBuf::from("engagements/2024-001-acme/manifest.json")
        );
    }
}
