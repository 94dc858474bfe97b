//! Resource records and class-name derivation.
//!
//! Classification is pure string work over slash-delimited resource names; no
//! bytecode is ever read. The rules follow the class-file naming convention:
//! `$` separates nested types, and local/anonymous classes carry a numeric
//! prefix after the `$` (fully numeric for anonymous classes, digits followed
//! by the source-level name for local classes).

use crate::entry::PathEntry;
use crate::scope::ScopeHandle;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// File-name suffix of compiled class resources.
pub const CLASS_FILE_SUFFIX: &str = ".class";

/// Whether a resource name denotes a class resource.
///
/// Module descriptors and package descriptors end in the class-file suffix but
/// do not denote loadable types, so they classify as plain resources.
pub fn is_class_resource(resource_name: &str) -> bool {
    if !resource_name.ends_with(CLASS_FILE_SUFFIX) {
        return false;
    }
    let file_name = resource_name
        .rsplit('/')
        .next()
        .unwrap_or(resource_name);
    file_name != "module-info.class" && file_name != "package-info.class"
}

/// Dotted type name for a class resource name.
///
/// ```
/// # use classmap_api::resource::class_name_of;
/// assert_eq!(class_name_of("abc/d/Abc.class"), "abc.d.Abc");
/// ```
pub fn class_name_of(resource_name: &str) -> String {
    resource_name
        .strip_suffix(CLASS_FILE_SUFFIX)
        .unwrap_or(resource_name)
        .replace('/', ".")
}

/// One discovered resource: a slash-delimited name plus the scope that owns
/// the entry it was found under.
///
/// Equality and hashing are by `(name, scope)` only. The origin list records
/// every class-path entry that provided the name, in discovery order; origins
/// of records that collapse to the same `(name, scope)` pair are merged.
#[derive(Debug, Clone)]
pub struct ResourceInfo {
    name: String,
    scope: ScopeHandle,
    origins: Vec<PathEntry>,
}

impl ResourceInfo {
    pub fn new(name: impl Into<String>, scope: ScopeHandle) -> Self {
        Self {
            name: name.into(),
            scope,
            origins: Vec::new(),
        }
    }

    /// Slash-delimited resource name, e.g. `com/example/App.class`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scope that owns the entry this resource was found under.
    pub fn scope(&self) -> &ScopeHandle {
        &self.scope
    }

    /// Entries that provided this resource, first occurrence first.
    pub fn origins(&self) -> &[PathEntry] {
        &self.origins
    }

    /// Record one more providing entry, keeping the list duplicate-free.
    pub fn push_origin(&mut self, entry: PathEntry) {
        if !self.origins.contains(&entry) {
            self.origins.push(entry);
        }
    }

    pub fn is_class(&self) -> bool {
        is_class_resource(&self.name)
    }

    /// Promote to a class record, if the name denotes one.
    pub fn to_class(&self) -> Option<ClassInfo> {
        ClassInfo::new(self.clone())
    }
}

impl PartialEq for ResourceInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.scope == other.scope
    }
}

impl Eq for ResourceInfo {}

impl Hash for ResourceInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.scope.hash(state);
    }
}

impl fmt::Display for ResourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.scope.name())
    }
}

impl Serialize for ResourceInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResourceInfo", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("scope", self.scope.name())?;
        state.serialize_field("origins", &self.origins)?;
        state.end()
    }
}

/// A resource whose name denotes a compiled type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    resource: ResourceInfo,
    class_name: String,
}

impl ClassInfo {
    /// Returns `None` if the resource is not a class resource.
    pub fn new(resource: ResourceInfo) -> Option<Self> {
        if !resource.is_class() {
            return None;
        }
        let class_name = class_name_of(resource.name());
        Some(Self {
            resource,
            class_name,
        })
    }

    pub fn resource(&self) -> &ResourceInfo {
        &self.resource
    }

    pub fn into_resource(self) -> ResourceInfo {
        self.resource
    }

    /// Fully qualified dotted name, e.g. `com.example.App`.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Package prefix of the class name, empty for the default package.
    pub fn package_name(&self) -> &str {
        match self.class_name.rfind('.') {
            Some(idx) => &self.class_name[..idx],
            None => "",
        }
    }

    /// Source-level simple name.
    ///
    /// Nested types take the segment after the last `$`. Local and anonymous
    /// classes carry a numeric prefix there: stripping it yields the local
    /// class name, or the empty string for a purely anonymous class.
    ///
    /// ```
    /// # use classmap_api::{ResourceInfo, ClassInfo, StaticScope};
    /// # let scope = StaticScope::new("app", vec![]).into_handle();
    /// # let simple = |name: &str| ClassInfo::new(ResourceInfo::new(name, scope.clone()))
    /// #     .unwrap().simple_name().to_string();
    /// assert_eq!(simple("a/b/Bar$Foo.class"), "Foo");
    /// assert_eq!(simple("a/b/Bar$1.class"), "");
    /// assert_eq!(simple("a/b/Bar$1Local.class"), "Local");
    /// ```
    pub fn simple_name(&self) -> &str {
        if let Some(idx) = self.class_name.rfind('$') {
            let inner = &self.class_name[idx + 1..];
            return inner.trim_start_matches(|c: char| c.is_ascii_digit());
        }
        match self.class_name.rfind('.') {
            Some(idx) => &self.class_name[idx + 1..],
            None => &self.class_name,
        }
    }

    /// A top-level class is one declared directly in a compilation unit, i.e.
    /// its binary name contains no `$`.
    pub fn is_top_level(&self) -> bool {
        !self.class_name.contains('$')
    }

    pub fn scope(&self) -> &ScopeHandle {
        self.resource.scope()
    }
}

impl Hash for ClassInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource.hash(state);
    }
}

impl fmt::Display for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.class_name.fmt(f)
    }
}

impl Serialize for ClassInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ClassInfo", 2)?;
        state.serialize_field("class_name", &self.class_name)?;
        state.serialize_field("resource", &self.resource)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::StaticScope;

    fn scope() -> ScopeHandle {
        StaticScope::new("test", vec![]).into_handle()
    }

    fn class(name: &str) -> ClassInfo {
        ClassInfo::new(ResourceInfo::new(name, scope())).unwrap()
    }

    #[test]
    fn class_resource_detection() {
        assert!(is_class_resource("Foo.class"));
        assert!(is_class_resource("a/b/Foo.class"));
        assert!(!is_class_resource("a/b/data.txt"));
        assert!(!is_class_resource("module-info.class"));
        assert!(!is_class_resource("a/b/package-info.class"));
        // only the file name itself is special
        assert!(is_class_resource("a/package-info/Foo.class"));
    }

    #[test]
    fn class_name_derivation() {
        assert_eq!(class_name_of("abc/d/Abc.class"), "abc.d.Abc");
        assert_eq!(class("Foo.class").class_name(), "Foo");
    }

    #[test]
    fn package_name_derivation() {
        assert_eq!(class("Foo.class").package_name(), "");
        assert_eq!(class("a/b/Foo.class").package_name(), "a.b");
    }

    #[test]
    fn simple_name_derivation() {
        assert_eq!(class("Foo.class").simple_name(), "Foo");
        assert_eq!(class("a/b/Foo.class").simple_name(), "Foo");
        assert_eq!(class("a/b/Bar$Foo.class").simple_name(), "Foo");
        assert_eq!(class("a/b/Bar$1.class").simple_name(), "");
        assert_eq!(class("a/b/Bar$1Local.class").simple_name(), "Local");
    }

    #[test]
    fn top_level_detection() {
        assert!(class("a/b/Foo.class").is_top_level());
        assert!(!class("a/b/Bar$Foo.class").is_top_level());
        assert!(!class("a/b/Bar$1.class").is_top_level());
    }

    #[test]
    fn equality_is_by_name_and_scope() {
        let s1 = scope();
        let s2 = scope();
        let a = ResourceInfo::new("a/b/c.txt", s1.clone());
        let mut b = ResourceInfo::new("a/b/c.txt", s1.clone());
        b.push_origin(PathEntry::new("/lib/x.jar"));
        assert_eq!(a, b); // origins do not affect identity
        assert_ne!(a, ResourceInfo::new("a/b/c.txt", s2));
        assert_ne!(a, ResourceInfo::new("x.txt", s1));
    }

    #[test]
    fn classification_is_idempotent() {
        let s = scope();
        let first = class("a/b/Foo.class");
        let again = ClassInfo::new(ResourceInfo::new(
            first.resource().name(),
            s.clone(),
        ))
        .unwrap();
        assert_eq!(again.class_name(), first.class_name());
        assert_eq!(again.resource().name(), first.resource().name());
    }

    #[test]
    fn origins_stay_ordered_and_unique() {
        let mut info = ResourceInfo::new("a.txt", scope());
        info.push_origin(PathEntry::new("/first"));
        info.push_origin(PathEntry::new("/second"));
        info.push_origin(PathEntry::new("/first"));
        assert_eq!(
            info.origins(),
            &[PathEntry::new("/first"), PathEntry::new("/second")]
        );
    }
}
