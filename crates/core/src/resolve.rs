//! Class-path reference resolution.
//!
//! Manifest `Class-Path` tokens and initial entry lists name locations either
//! as plain paths (resolved against a base directory) or with a `file:` scheme.
//! Resolution is purely textual: nothing here touches the filesystem, and
//! whether the result exists is the scanner's business.

use classmap_api::PathEntry;
use std::path::Path;
use tracing::debug;

/// Resolve a possibly-relative class-path reference against a base directory.
///
/// - `file:` references resolve to the named path; a relative remainder
///   (`file:lib/a.jar`) joins against `base_dir`. Characters that are illegal
///   in URL syntax (an unescaped `^`, a space) are taken literally.
/// - References carrying any other scheme are not local paths and resolve to
///   `None`; callers skip the token.
/// - Everything else joins against `base_dir`.
///
/// The result is normalized (no `.`/`..` segments) but not canonicalized.
pub fn resolve(base_dir: &Path, reference: &str) -> Option<PathEntry> {
    match split_scheme(reference) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("file") => {
            Some(resolve_file_reference(base_dir, rest))
        }
        Some((scheme, _)) => {
            debug!(scheme, reference, "dropping reference with unsupported scheme");
            None
        }
        None => Some(PathEntry::new(base_dir.join(reference))),
    }
}

/// Split `scheme:rest` if the prefix is a well-formed scheme
/// (ALPHA *(ALPHA / DIGIT / "+" / "-" / ".")). A colon after a separator or
/// inside an ordinary file name does not count.
fn split_scheme(reference: &str) -> Option<(&str, &str)> {
    let colon = reference.find(':')?;
    let scheme = &reference[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some((scheme, &reference[colon + 1..]))
}

fn resolve_file_reference(base_dir: &Path, rest: &str) -> PathEntry {
    // "file://host/path" carries an authority; only the path part names the
    // location.
    let rest = match rest.strip_prefix("//") {
        Some(after_authority) => match after_authority.find('/') {
            Some(idx) => &after_authority[idx..],
            None => "/",
        },
        None => rest,
    };
    if rest.starts_with('/') {
        PathEntry::new(rest)
    } else {
        PathEntry::new(base_dir.join(rest))
    }
}
