//! JAR manifest parsing and `Class-Path` extraction.
//!
//! Only the main section matters here: the manifest format folds long values
//! onto continuation lines (a leading single space), the first blank line ends
//! the main section, and attribute names compare case-insensitively.

use crate::resolve;
use classmap_api::PathEntry;
use std::io::{Read, Seek};
use tracing::debug;
use zip::ZipArchive;

/// Archive member holding the manifest.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Main attribute naming companion class-path locations.
pub const CLASS_PATH_ATTRIBUTE: &str = "Class-Path";

/// Parsed main section of a manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    pub fn parse(text: &str) -> Self {
        let mut attributes: Vec<(String, String)> = Vec::new();
        for line in text.lines() {
            if line.is_empty() {
                // end of the main section; individual-entry sections follow
                break;
            }
            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some((_, value)) = attributes.last_mut() {
                    value.push_str(continuation);
                }
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                let value = value.strip_prefix(' ').unwrap_or(value);
                attributes.push((name.to_string(), value.to_string()));
            }
            // lines without a colon are malformed; ignored
        }
        Self { attributes }
    }

    /// Look up a main attribute by case-insensitive name.
    pub fn main_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn class_path(&self) -> Option<&str> {
        self.main_attribute(CLASS_PATH_ATTRIBUTE)
    }
}

/// Read and parse the manifest out of an open archive. Absence, unreadability
/// and malformed content all yield `None` — a manifest is optional metadata.
pub fn read_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<Manifest> {
    let mut member = archive.by_name(MANIFEST_PATH).ok()?;
    let mut text = String::new();
    member.read_to_string(&mut text).ok()?;
    Some(Manifest::parse(&text))
}

/// Companion class-path references declared by an archive's manifest, resolved
/// against the archive's own directory.
///
/// Order is the declaration order; duplicates are kept (the scanner's visited
/// set collapses them); tokens that fail to resolve are dropped.
pub fn class_path_refs(declaring: &PathEntry, manifest: Option<&Manifest>) -> Vec<PathEntry> {
    let Some(value) = manifest.and_then(Manifest::class_path) else {
        return Vec::new();
    };
    let base_dir = declaring.parent_dir();
    value
        .split_whitespace()
        .filter_map(|token| {
            let resolved = resolve::resolve(&base_dir, token);
            if resolved.is_none() {
                debug!(token, declaring = %declaring, "dropping unresolvable Class-Path token");
            }
            resolved
        })
        .collect()
}
