//! Loader-hierarchy flattening.

use crate::error::{ClassMapError, Result};
use classmap_api::{PathEntry, ScopeHandle};
use indexmap::IndexMap;

/// Flatten a scope's ancestor chain into an ordered entry→scope map.
///
/// Scopes are processed root-most ancestor first, each contributing its
/// declared entries in declaration order; an entry already claimed by an
/// ancestor is never overwritten. The result says, for every reachable
/// class-path entry, which scope actually loads from it.
///
/// A scope that declares nothing contributes nothing without breaking the
/// chain. A scope that *fails* to enumerate its entries aborts the whole
/// operation — that signals a broken host runtime, not a stale path.
pub fn flatten(scope: &ScopeHandle) -> Result<IndexMap<PathEntry, ScopeHandle>> {
    let mut chain = Vec::new();
    let mut cursor = Some(scope.clone());
    while let Some(current) = cursor {
        cursor = current.parent();
        chain.push(current);
    }
    chain.reverse();

    let mut entries = IndexMap::new();
    for scope in chain {
        let declared = scope
            .declared_entries()
            .map_err(|source| ClassMapError::Hierarchy {
                scope: scope.name().to_string(),
                source,
            })?;
        for entry in declared {
            entries.entry(entry).or_insert_with(|| scope.clone());
        }
    }
    Ok(entries)
}
