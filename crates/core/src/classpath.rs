//! The scanned class path and its query surface.

use crate::error::Result;
use crate::flatten::flatten;
use crate::scanner::{ScanOptions, Scanner};
use classmap_api::{ClassInfo, ResourceInfo, ScopeHandle};
use indexmap::IndexSet;
use serde::ser::{Serialize, Serializer};
use tracing::debug;

/// Every loadable resource reachable from a scope's loader hierarchy.
///
/// Immutable once built; records keep the order in which they were
/// discovered. Build one with [`ClassPath::scan`], or from records directly
/// via `FromIterator` when the scan has been run elsewhere.
#[derive(Debug, Clone, Default)]
pub struct ClassPath {
    resources: IndexSet<ResourceInfo>,
}

impl ClassPath {
    /// Discover everything reachable from `scope`: flatten its hierarchy,
    /// scan each entry under its owning scope, follow manifest companions.
    pub fn scan(scope: &ScopeHandle) -> Result<Self> {
        Self::scan_with(scope, ScanOptions::new())
    }

    pub fn scan_with(scope: &ScopeHandle, options: ScanOptions) -> Result<Self> {
        let entries = flatten(scope)?;
        debug!(scope = scope.name(), entries = entries.len(), "scanning class path");
        let scanner = Scanner::new(options);
        scanner.scan_all(entries.iter());
        Ok(Self {
            resources: scanner.into_resources(),
        })
    }

    /// All discovered resources, classes included, in discovery order.
    pub fn resources(&self) -> impl ExactSizeIterator<Item = &ResourceInfo> {
        self.resources.iter()
    }

    /// The record for `name` under `scope`, if the scan found one.
    pub fn get(&self, name: &str, scope: &ScopeHandle) -> Option<&ResourceInfo> {
        self.resources
            .get(&ResourceInfo::new(name, scope.clone()))
    }

    pub fn contains(&self, name: &str, scope: &ScopeHandle) -> bool {
        self.get(name, scope).is_some()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// All class resources.
    pub fn classes(&self) -> impl Iterator<Item = ClassInfo> + '_ {
        self.resources.iter().filter_map(ResourceInfo::to_class)
    }

    /// Classes declared directly in a compilation unit (no `$` in the name).
    pub fn top_level_classes(&self) -> impl Iterator<Item = ClassInfo> + '_ {
        self.classes().filter(|class| class.is_top_level())
    }

    /// Top-level classes whose package is exactly `package`.
    pub fn top_level_classes_in<'a>(
        &'a self,
        package: &'a str,
    ) -> impl Iterator<Item = ClassInfo> + 'a {
        self.top_level_classes()
            .filter(move |class| class.package_name() == package)
    }

    /// Top-level classes in `package` or any package below it.
    pub fn top_level_classes_under<'a>(
        &'a self,
        package: &'a str,
    ) -> impl Iterator<Item = ClassInfo> + 'a {
        let prefix = format!("{package}.");
        self.top_level_classes().filter(move |class| {
            let name = class.package_name();
            name == package || name.starts_with(&prefix)
        })
    }
}

impl FromIterator<ResourceInfo> for ClassPath {
    fn from_iter<I: IntoIterator<Item = ResourceInfo>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ClassPath {
    type Item = &'a ResourceInfo;
    type IntoIter = indexmap::set::Iter<'a, ResourceInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

impl Serialize for ClassPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classmap_api::StaticScope;

    fn scope() -> ScopeHandle {
        StaticScope::new("test", vec![]).into_handle()
    }

    fn class_path(names: &[&str]) -> (ClassPath, ScopeHandle) {
        let owner = scope();
        let class_path = names
            .iter()
            .map(|name| ResourceInfo::new(*name, owner.clone()))
            .collect();
        (class_path, owner)
    }

    #[test]
    fn classes_are_filtered_from_resources() {
        let (class_path, _) = class_path(&[
            "com/example/App.class",
            "com/example/app.properties",
            "module-info.class",
        ]);
        assert_eq!(class_path.len(), 3);
        let classes: Vec<_> = class_path
            .classes()
            .map(|class| class.class_name().to_string())
            .collect();
        assert_eq!(classes, vec!["com.example.App"]);
    }

    #[test]
    fn top_level_queries() {
        let (class_path, _) = class_path(&[
            "com/example/App.class",
            "com/example/App$Builder.class",
            "com/example/deep/Util.class",
            "org/other/Thing.class",
        ]);
        let all: Vec<_> = class_path
            .top_level_classes()
            .map(|class| class.class_name().to_string())
            .collect();
        assert_eq!(
            all,
            vec!["com.example.App", "com.example.deep.Util", "org.other.Thing"]
        );

        let exact: Vec<_> = class_path
            .top_level_classes_in("com.example")
            .map(|class| class.class_name().to_string())
            .collect();
        assert_eq!(exact, vec!["com.example.App"]);

        let recursive: Vec<_> = class_path
            .top_level_classes_under("com.example")
            .map(|class| class.class_name().to_string())
            .collect();
        assert_eq!(recursive, vec!["com.example.App", "com.example.deep.Util"]);
    }

    #[test]
    fn lookup_by_name_and_scope() {
        let (class_path, owner) = class_path(&["a/b/c.txt"]);
        assert!(class_path.contains("a/b/c.txt", &owner));
        let other = scope();
        assert!(!class_path.contains("a/b/c.txt", &other));
    }
}
