use smol_str::SmolStr;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("key '{0}' is already present")]
pub struct DuplicateKey(pub SmolStr);

/// Exact-match map from names to entries.
///
/// Keys are unique and never removed. Enumeration order is unspecified and
/// may change after any insert.
#[derive(Debug, Clone)]
pub struct StringTable<V> {
    entries: HashMap<SmolStr, V>,
}

impl<V> Default for StringTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> StringTable<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<SmolStr>, value: V) -> Result<(), DuplicateKey> {
        match self.entries.entry(key.into()) {
            Entry::Occupied(occupied) => Err(DuplicateKey(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                vacant.insert(value);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Calls `f` once per entry, in unspecified order.
    pub fn enumerate(&self, mut f: impl FnMut(&str, &V)) {
        for (key, value) in &self.entries {
            f(key, value);
        }
    }

    /// Moves every entry of `other` into this table.
    ///
    /// All keys are checked before anything is inserted, so on error this
    /// table is unchanged.
    pub fn absorb(&mut self, other: StringTable<V>) -> Result<(), DuplicateKey> {
        if let Some(key) = other.entries.keys().find(|k| self.entries.contains_key(*k)) {
            return Err(DuplicateKey(key.clone()));
        }
        self.entries.reserve(other.entries.len());
        self.entries.extend(other.entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_existing_key() {
        let mut table = StringTable::new();
        table.insert("pkg.A", 1).unwrap();
        assert_eq!(table.insert("pkg.A", 2), Err(DuplicateKey("pkg.A".into())));
        assert_eq!(table.lookup("pkg.A"), Some(&1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn lookup_is_exact() {
        let mut table = StringTable::new();
        table.insert("pkg.Outer.Inner", ()).unwrap();
        assert!(table.lookup("pkg.Outer").is_none());
        assert!(table.lookup("Inner").is_none());
        assert!(table.lookup("pkg.Outer.Inner.").is_none());
        assert!(table.contains_key("pkg.Outer.Inner"));
    }

    #[test]
    fn enumerate_visits_every_entry_once() {
        let mut table = StringTable::new();
        for name in ["a", "b", "c"] {
            table.insert(name, name.len()).unwrap();
        }
        let mut seen = Vec::new();
        table.enumerate(|k, _| seen.push(k.to_string()));
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn absorb_is_all_or_nothing() {
        let mut table = StringTable::new();
        table.insert("a", 1).unwrap();

        let mut clash = StringTable::new();
        clash.insert("b", 2).unwrap();
        clash.insert("a", 3).unwrap();
        assert_eq!(table.absorb(clash), Err(DuplicateKey("a".into())));
        assert_eq!(table.len(), 1);
        assert!(table.lookup("b").is_none());

        let mut fresh = StringTable::new();
        fresh.insert("b", 2).unwrap();
        table.absorb(fresh).unwrap();
        assert_eq!(table.lookup("b"), Some(&2));
    }
}
