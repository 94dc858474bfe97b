//! Class-path discovery engine.
//!
//! Given a loader hierarchy (see [`classmap_api::LoaderScope`]), the engine
//! flattens it into an ordered entry→scope map where ancestors win duplicate
//! entries, scans every entry — directories recursively, archives member by
//! member — follows `Class-Path` manifest references relative to the declaring
//! archive, terminates reference cycles with a visited set, and classifies the
//! discovered names into resource and class records.
//!
//! The one-call surface is [`ClassPath::scan`]; the building blocks
//! ([`flatten`], [`resolve`], [`manifest`], [`Scanner`]) are usable on their
//! own.

pub mod classpath;
pub mod content;
pub mod error;
pub mod flatten;
pub mod logging;
pub mod manifest;
pub mod resolve;
pub mod scanner;

pub use classmap_api::{
    ClassInfo, LoaderScope, PathEntry, ResourceInfo, ScopeHandle, StaticScope,
};
pub use classpath::ClassPath;
pub use content::read_resource;
pub use error::{ClassMapError, Result};
pub use flatten::flatten;
pub use manifest::Manifest;
pub use resolve::resolve;
pub use scanner::{ScanOptions, Scanner};
