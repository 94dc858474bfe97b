//! Resource content access for downstream consumers.
//!
//! The scan engine itself never reads file contents; callers that want to
//! verify or load what a scan discovered use this.

use crate::error::{ClassMapError, Result};
use classmap_api::ResourceInfo;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Read a discovered resource's bytes from the first of its origins that can
/// still provide it: a plain file below a directory entry, or the named
/// member of an archive entry.
///
/// Origins that have gone stale since the scan are skipped; if none remains
/// readable the resource is reported missing.
pub fn read_resource(info: &ResourceInfo) -> Result<Vec<u8>> {
    for origin in info.origins() {
        let path = origin.as_path();
        if path.is_dir() {
            if let Ok(bytes) = std::fs::read(file_below(path, info.name())) {
                return Ok(bytes);
            }
        } else if path.is_file() {
            if let Some(bytes) = read_archive_member(path, info.name()) {
                return Ok(bytes);
            }
        }
    }
    Err(ClassMapError::MissingResource(info.name().to_string()))
}

/// Map a slash-delimited resource name onto a path below a directory entry.
fn file_below(root: &Path, resource_name: &str) -> PathBuf {
    resource_name
        .split('/')
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

fn read_archive_member(archive_path: &Path, resource_name: &str) -> Option<Vec<u8>> {
    let file = File::open(archive_path).ok()?;
    let mut archive = ZipArchive::new(file).ok()?;
    let mut member = archive.by_name(resource_name).ok()?;
    let mut bytes = Vec::new();
    member.read_to_end(&mut bytes).ok()?;
    Some(bytes)
}
