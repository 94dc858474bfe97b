//! Recursive class-path scanner.
//!
//! One `Scanner` instance is one scan pass. The visited set is claimed
//! *before* an entry is examined, so an archive whose manifest references
//! itself (directly or through other archives) terminates after the first
//! visit — the invariant the whole engine rests on.

use crate::manifest;
use classmap_api::{PathEntry, ResourceInfo, ScopeHandle};
use dashmap::DashSet;
use indexmap::IndexMap;
use indexmap::IndexSet;
use indexmap::map::Entry;
use rayon::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Options for one scan pass, builder style.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    parallel: bool,
    cancel: Option<CancellationToken>,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan sibling top-level entries on the rayon pool. The visited and
    /// resource sets are shared across workers; recursion stays inside the
    /// worker that reached the entry first.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Cooperative cancellation: in-flight directory and archive reads stop
    /// early and the scan returns whatever it has accumulated.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Recursive scanner over class-path entries.
///
/// Missing entries, unreadable archives and entries that are neither
/// directories nor archives contribute nothing; none of them is an error.
pub struct Scanner {
    options: ScanOptions,
    /// Canonical identities of entries already claimed by this pass.
    visited: DashSet<PathBuf>,
    /// Accumulated records, keyed by (name, scope); duplicates merge origins.
    resources: Mutex<IndexMap<(String, ScopeHandle), ResourceInfo>>,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            visited: DashSet::new(),
            resources: Mutex::new(IndexMap::new()),
        }
    }

    /// Scan a flattened entry→scope map, respecting its order.
    pub fn scan_all<'a>(
        &self,
        entries: impl IntoIterator<Item = (&'a PathEntry, &'a ScopeHandle)>,
    ) {
        if self.options.parallel {
            let pairs: Vec<_> = entries.into_iter().collect();
            pairs
                .par_iter()
                .for_each(|(entry, scope)| self.scan(entry, scope));
        } else {
            for (entry, scope) in entries {
                self.scan(entry, scope);
            }
        }
    }

    /// Scan one entry for the given owning scope. Idempotent: an entry already
    /// claimed by this pass is not examined again.
    pub fn scan(&self, entry: &PathEntry, scope: &ScopeHandle) {
        if self.is_cancelled() {
            return;
        }
        // Claim before examining anything; this is what breaks reference
        // cycles between archives.
        if !self.visited.insert(canonical_identity(entry)) {
            trace!(%entry, "entry already scanned");
            return;
        }
        let path = entry.as_path();
        if !path.exists() {
            debug!(%entry, "skipping missing class-path entry");
            return;
        }
        if path.is_dir() {
            self.scan_directory(entry, scope);
        } else {
            self.scan_archive(entry, scope);
        }
    }

    /// Consume the scanner, yielding the accumulated records in discovery
    /// order.
    pub fn into_resources(self) -> IndexSet<ResourceInfo> {
        let resources = self.resources.into_inner().unwrap();
        let set: IndexSet<ResourceInfo> = resources.into_values().collect();
        info!(resources = set.len(), "scan pass complete");
        set
    }

    fn scan_directory(&self, entry: &PathEntry, scope: &ScopeHandle) {
        let root = entry.as_path();
        let mut names = Vec::new();
        for walked in WalkDir::new(root).follow_links(true) {
            if self.is_cancelled() {
                break;
            }
            let file = match walked {
                Ok(file) => file,
                Err(err) => {
                    debug!(%entry, error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !file.file_type().is_file() {
                continue;
            }
            let Ok(relative) = file.path().strip_prefix(root) else {
                continue;
            };
            names.push(slash_name(relative));
        }
        trace!(%entry, files = names.len(), "scanned directory");
        self.record_all(names, entry, scope);
    }

    fn scan_archive(&self, entry: &PathEntry, scope: &ScopeHandle) {
        let file = match File::open(entry.as_path()) {
            Ok(file) => file,
            Err(err) => {
                debug!(%entry, error = %err, "cannot open class-path entry");
                return;
            }
        };
        let mut archive = match ZipArchive::new(file) {
            Ok(archive) => archive,
            Err(err) => {
                debug!(%entry, error = %err, "unreadable archive treated as empty");
                return;
            }
        };

        let mut names = Vec::new();
        for index in 0..archive.len() {
            if self.is_cancelled() {
                break;
            }
            let member = match archive.by_index(index) {
                Ok(member) => member,
                Err(err) => {
                    debug!(%entry, index, error = %err, "skipping unreadable archive member");
                    continue;
                }
            };
            // Directory markers carry no content; the manifest is archive
            // metadata, not a loadable resource.
            if member.is_dir() || member.name() == manifest::MANIFEST_PATH {
                continue;
            }
            names.push(member.name().to_string());
        }
        trace!(%entry, members = names.len(), "scanned archive");
        self.record_all(names, entry, scope);

        // Companion references inherit the scope that owns the declaring
        // entry, not a scope of their own.
        let parsed = manifest::read_from_archive(&mut archive);
        for companion in manifest::class_path_refs(entry, parsed.as_ref()) {
            self.scan(&companion, scope);
        }
    }

    fn record_all(&self, names: Vec<String>, entry: &PathEntry, scope: &ScopeHandle) {
        let mut resources = self.resources.lock().unwrap();
        for name in names {
            match resources.entry((name, scope.clone())) {
                Entry::Occupied(mut slot) => slot.get_mut().push_origin(entry.clone()),
                Entry::Vacant(slot) => {
                    let mut info = ResourceInfo::new(slot.key().0.clone(), scope.clone());
                    info.push_origin(entry.clone());
                    slot.insert(info);
                }
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanOptions::new())
    }
}

/// Identity under which an entry is entered into the visited set. Resolves
/// symlinks where the platform allows so that two spellings of one location
/// are scanned once; nonexistent entries fall back to their normalized
/// absolute form.
fn canonical_identity(entry: &PathEntry) -> PathBuf {
    let path = entry.as_path();
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

fn slash_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use classmap_api::StaticScope;
    use std::fs;

    fn scope() -> ScopeHandle {
        StaticScope::new("test", vec![]).into_handle()
    }

    fn names(scanner: Scanner) -> Vec<String> {
        scanner
            .into_resources()
            .into_iter()
            .map(|info| info.name().to_string())
            .collect()
    }

    #[test]
    fn directory_files_get_slash_delimited_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("top.txt"), b"top").unwrap();
        fs::create_dir_all(dir.path().join("com/example")).unwrap();
        fs::write(dir.path().join("com/example/App.class"), b"\xca\xfe").unwrap();

        let scanner = Scanner::default();
        scanner.scan(&PathEntry::new(dir.path()), &scope());
        let mut found = names(scanner);
        found.sort();
        assert_eq!(found, vec!["com/example/App.class", "top.txt"]);
    }

    #[test]
    fn missing_entry_contributes_nothing() {
        let scanner = Scanner::default();
        scanner.scan(&PathEntry::new("no/such/file/anywhere"), &scope());
        assert!(names(scanner).is_empty());
    }

    #[test]
    fn not_an_archive_contributes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_jar = dir.path().join("not_a_jar.txt");
        fs::write(&not_a_jar, b"plain text").unwrap();

        let scanner = Scanner::default();
        scanner.scan(&PathEntry::new(&not_a_jar), &scope());
        assert!(names(scanner).is_empty());
    }

    #[test]
    fn rescanning_an_entry_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let owner = scope();
        let scanner = Scanner::default();
        let entry = PathEntry::new(dir.path());
        scanner.scan(&entry, &owner);
        scanner.scan(&entry, &owner);
        let resources = scanner.into_resources();
        assert_eq!(resources.len(), 1);
        // the single record still has a single origin
        assert_eq!(resources[0].origins().len(), 1);
    }

    #[test]
    fn pre_cancelled_scan_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let scanner = Scanner::new(ScanOptions::new().with_cancellation(token));
        scanner.scan(&PathEntry::new(dir.path()), &scope());
        assert!(names(scanner).is_empty());
    }

    #[test]
    fn same_name_under_two_entries_merges_origins() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        fs::write(dir_a.path().join("shared.txt"), b"a").unwrap();
        fs::write(dir_b.path().join("shared.txt"), b"b").unwrap();

        let owner = scope();
        let scanner = Scanner::default();
        let first = PathEntry::new(dir_a.path());
        let second = PathEntry::new(dir_b.path());
        scanner.scan(&first, &owner);
        scanner.scan(&second, &owner);
        let resources = scanner.into_resources();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].origins(), &[first, second]);
    }
}
