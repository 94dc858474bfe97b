//! The capability seam over the host's loader hierarchy.
//!
//! The host runtime owns a live graph of loaders with dynamic dispatch over
//! loader kinds. The engine only needs two capabilities from it: walk to the
//! parent, and enumerate the declared class-path entries. [`LoaderScope`]
//! captures exactly that; hosts write one adapter per concrete loader kind.

use crate::entry::PathEntry;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use url::Url;

/// Error type for host-side operations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One node in the loader hierarchy.
pub trait LoaderScope: Send + Sync {
    /// Human-readable name (for logging and serialized records).
    fn name(&self) -> &str;

    /// Parent scope, or `None` for a root scope.
    fn parent(&self) -> Option<ScopeHandle>;

    /// Class-path entries declared directly by this scope, in declaration
    /// order. A scope that exposes no entries (a bootstrap scope, say) returns
    /// an empty vector; an `Err` means the host hierarchy itself is broken and
    /// aborts the whole scan.
    fn declared_entries(&self) -> Result<Vec<PathEntry>, BoxError>;
}

/// Shared handle to a scope.
///
/// Equality and hashing are by scope *identity* (the underlying allocation),
/// mirroring how the host runtime distinguishes loader instances: two distinct
/// scopes with identical names and entries are still different owners.
#[derive(Clone)]
pub struct ScopeHandle(Arc<dyn LoaderScope>);

impl ScopeHandle {
    pub fn new(scope: Arc<dyn LoaderScope>) -> Self {
        Self(scope)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn parent(&self) -> Option<ScopeHandle> {
        self.0.parent()
    }

    pub fn declared_entries(&self) -> Result<Vec<PathEntry>, BoxError> {
        self.0.declared_entries()
    }
}

impl PartialEq for ScopeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ScopeHandle {}

impl Hash for ScopeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

impl fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopeHandle").field(&self.name()).finish()
    }
}

/// A scope with a fixed entry list, the reference [`LoaderScope`]
/// implementation.
///
/// Host adapters over simple loaders reduce to this; tests use it directly.
pub struct StaticScope {
    name: String,
    parent: Option<ScopeHandle>,
    entries: Vec<PathEntry>,
}

impl StaticScope {
    pub fn new(name: impl Into<String>, entries: Vec<PathEntry>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            entries,
        }
    }

    /// Build from `file:` URLs, silently skipping URLs of any other scheme —
    /// non-local locations are not scannable class-path entries.
    pub fn from_urls(name: impl Into<String>, urls: &[Url]) -> Self {
        let entries = urls.iter().filter_map(PathEntry::from_url).collect();
        Self::new(name, entries)
    }

    pub fn with_parent(mut self, parent: ScopeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn into_handle(self) -> ScopeHandle {
        ScopeHandle::new(Arc::new(self))
    }
}

impl LoaderScope for StaticScope {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<ScopeHandle> {
        self.parent.clone()
    }

    fn declared_entries(&self) -> Result<Vec<PathEntry>, BoxError> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_equality_is_by_identity() {
        let a = StaticScope::new("app", vec![]).into_handle();
        let b = StaticScope::new("app", vec![]).into_handle();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn static_scope_reports_parent_chain() {
        let root = StaticScope::new("boot", vec![]).into_handle();
        let child = StaticScope::new("app", vec![PathEntry::new("/a")])
            .with_parent(root.clone())
            .into_handle();
        assert_eq!(child.parent(), Some(root));
        assert_eq!(
            child.declared_entries().unwrap(),
            vec![PathEntry::new("/a")]
        );
    }

    #[test]
    fn from_urls_skips_non_file_schemes() {
        let urls = [
            Url::parse("file:///a.jar").unwrap(),
            Url::parse("https://example.com/b.jar").unwrap(),
        ];
        let scope = StaticScope::from_urls("app", &urls).into_handle();
        assert_eq!(
            scope.declared_entries().unwrap(),
            vec![PathEntry::new("/a.jar")]
        );
    }
}
