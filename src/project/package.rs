use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use smol_str::SmolStr;

use super::accessible::{Accessible, Entry, last_segment};
use super::error::ProjectError;
use super::source::SourceUnit;
use crate::base::QualifiedName;

/// An insertion refused because the key is already taken by another node.
#[derive(Clone, Debug)]
pub struct Collision {
    pub key: SmolStr,
    pub existing: Entry,
    pub rejected: Entry,
}

/// One directory's worth of named entries.
///
/// Entries are keyed by simple name and kept in insertion order. The map
/// is behind its own lock so concurrent discoveries of the same package
/// merge into one node.
pub struct PackageNode {
    name: QualifiedName,
    entries: Mutex<IndexMap<SmolStr, Entry>>,
}

impl PackageNode {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            entries: Mutex::new(IndexMap::new()),
        }
    }

    /// Insert one entry. An existing entry under `key` is never replaced;
    /// re-inserting the very same node is a no-op.
    pub fn insert(&self, key: impl Into<SmolStr>, entry: Entry) -> Result<(), Collision> {
        let key = key.into();
        let mut entries = self.entries.lock();
        match entries.get(&key) {
            Some(existing) if existing.same_node(&entry) => Ok(()),
            Some(existing) => Err(Collision {
                key,
                existing: existing.clone(),
                rejected: entry,
            }),
            None => {
                entries.insert(key, entry);
                Ok(())
            }
        }
    }

    /// Merge a batch of entries, returning every collision.
    pub fn merge<I>(&self, entries: I) -> Vec<Collision>
    where
        I: IntoIterator<Item = (SmolStr, Entry)>,
    {
        entries
            .into_iter()
            .filter_map(|(key, entry)| self.insert(key, entry).err())
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<Entry> {
        self.entries.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn source(&self, key: &str) -> Option<Arc<SourceUnit>> {
        self.get(key).and_then(|e| e.as_source().cloned())
    }

    pub fn subpackage(&self, key: &str) -> Option<Arc<PackageNode>> {
        self.get(key).and_then(|e| e.as_package().cloned())
    }

    /// Resolve a name relative to this package, e.g. `sub.Bar`.
    ///
    /// The empty name does not resolve; a package does not contain itself.
    pub fn lookup(&self, relative: &QualifiedName) -> Option<Entry> {
        let (first, rest) = relative.segments().split_first()?;
        let mut entry = self.get(first)?;
        for segment in rest {
            entry = entry.as_package()?.get(segment)?;
        }
        Some(entry)
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<(SmolStr, Entry)> {
        self.entries
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn keys(&self) -> Vec<SmolStr> {
        self.entries.lock().keys().cloned().collect()
    }

    pub fn sources(&self) -> Vec<Arc<SourceUnit>> {
        self.entries
            .lock()
            .values()
            .filter_map(|e| e.as_source().cloned())
            .collect()
    }

    pub fn subpackages(&self) -> Vec<Arc<PackageNode>> {
        self.entries
            .lock()
            .values()
            .filter_map(|e| e.as_package().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Accessible for PackageNode {
    fn qualified_name(&self) -> &QualifiedName {
        &self.name
    }

    fn simple_name(&self) -> Result<&str, ProjectError> {
        last_segment("package", &self.name)
    }
}

impl fmt::Debug for PackageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageNode")
            .field("name", &self.name)
            .field("entries", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ParseResult;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    fn source(qualified: &str) -> Entry {
        Entry::Source(Arc::new(SourceUnit::new(
            name(qualified),
            format!("{}.java", qualified.replace('.', "/")),
            ParseResult::Error,
        )))
    }

    #[test]
    fn test_insert_and_get() {
        let package = PackageNode::new(name("pkg"));
        package.insert("Foo", source("pkg.Foo")).unwrap();
        assert!(package.contains("Foo"));
        assert_eq!(
            package.source("Foo").unwrap().qualified_name(),
            &name("pkg.Foo")
        );
        assert!(package.subpackage("Foo").is_none());
        assert_eq!(package.simple_name().unwrap(), "pkg");
    }

    #[test]
    fn test_collision_keeps_first() {
        let package = PackageNode::new(name("pkg"));
        package.insert("Foo", source("pkg.Foo")).unwrap();

        let sub = Entry::Package(Arc::new(PackageNode::new(name("pkg.Foo"))));
        let collision = package.insert("Foo", sub).unwrap_err();
        assert_eq!(collision.key, "Foo");
        assert_eq!(collision.existing.kind(), "source unit");
        assert_eq!(collision.rejected.kind(), "package");
        assert!(package.source("Foo").is_some());
        assert_eq!(package.len(), 1);
    }

    #[test]
    fn test_reinserting_same_node_is_not_a_collision() {
        let package = PackageNode::new(name("a"));
        let sub = Entry::Package(Arc::new(PackageNode::new(name("a.b"))));
        package.insert("b", sub.clone()).unwrap();
        package.insert("b", sub).unwrap();
        assert_eq!(package.len(), 1);
    }

    #[test]
    fn test_merge_disjoint_is_union_in_any_order() {
        let left = vec![
            (SmolStr::new("A"), source("p.A")),
            (SmolStr::new("B"), source("p.B")),
        ];
        let right = vec![(SmolStr::new("C"), source("p.C"))];

        let one = PackageNode::new(name("p"));
        assert!(one.merge(left.clone()).is_empty());
        assert!(one.merge(right.clone()).is_empty());

        let two = PackageNode::new(name("p"));
        assert!(two.merge(right).is_empty());
        assert!(two.merge(left).is_empty());

        let mut keys_one = one.keys();
        let mut keys_two = two.keys();
        keys_one.sort();
        keys_two.sort();
        assert_eq!(keys_one, keys_two);
        assert_eq!(keys_one, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_lookup_nested() {
        let root = PackageNode::new(QualifiedName::root());
        let pkg = Arc::new(PackageNode::new(name("pkg")));
        let sub = Arc::new(PackageNode::new(name("pkg.sub")));
        sub.insert("Bar", source("pkg.sub.Bar")).unwrap();
        pkg.insert("sub", Entry::Package(sub)).unwrap();
        root.insert("pkg", Entry::Package(pkg)).unwrap();

        let bar = root.lookup(&name("pkg.sub.Bar")).unwrap();
        assert_eq!(bar.qualified_name(), &name("pkg.sub.Bar"));
        assert!(root.lookup(&name("pkg.sub.Baz")).is_none());
        assert!(root.lookup(&name("pkg.sub.Bar.Inner")).is_none());
        assert!(root.lookup(&QualifiedName::root()).is_none());
    }

    #[test]
    fn test_default_package_has_no_simple_name() {
        let root = PackageNode::new(QualifiedName::root());
        assert!(matches!(
            root.simple_name(),
            Err(ProjectError::NoSimpleName { kind: "package", .. })
        ));
    }
}
