//! Scoped symbol resolution.
//!
//! A reference starting with `.` is fully qualified. Anything else is looked
//! up C++-style: first inside the referring scope, then in each enclosing
//! scope, out to the root. Nested types are keyed by their full names, so
//! walking the prefixes of the base name visits the nested types of every
//! enclosing message as well as every enclosing package.

use crate::symtab::StringTable;

pub const SEPARATOR: char = '.';

/// Anything the resolver can probe for an exact name.
pub trait SymbolSource {
    type Entry;

    fn find(&self, full_name: &str) -> Option<Self::Entry>;
}

impl<V: Clone> SymbolSource for StringTable<V> {
    type Entry = V;

    fn find(&self, full_name: &str) -> Option<V> {
        self.lookup(full_name).cloned()
    }
}

/// Strips the last scope component: `a.b.C` -> `a.b`, `C` -> ``.
pub fn parent_scope(name: &str) -> &str {
    match name.rfind(SEPARATOR) {
        Some(idx) => &name[..idx],
        None => "",
    }
}

/// Joins a scope and a relative name, treating the empty scope as the root.
pub fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        let mut joined = String::with_capacity(scope.len() + 1 + name.len());
        joined.push_str(scope);
        joined.push(SEPARATOR);
        joined.push_str(name);
        joined
    }
}

/// Resolves `reference` as seen from the symbol named `base`.
///
/// Returns the entry in the innermost enclosing scope that defines the name.
/// A fully-qualified reference is looked up as is, whatever the base.
pub fn resolve<S>(source: &S, base: &str, reference: &str) -> Option<S::Entry>
where
    S: SymbolSource + ?Sized,
{
    if let Some(absolute) = reference.strip_prefix(SEPARATOR) {
        return source.find(absolute);
    }
    if reference.is_empty() {
        return None;
    }

    let mut scope = base.strip_prefix(SEPARATOR).unwrap_or(base);
    let mut candidate = String::with_capacity(scope.len() + 1 + reference.len());
    loop {
        candidate.clear();
        if !scope.is_empty() {
            candidate.push_str(scope);
            candidate.push(SEPARATOR);
        }
        candidate.push_str(reference);

        if let Some(entry) = source.find(&candidate) {
            tracing::trace!("Resolved '{}' from '{}' to '{}'", reference, base, candidate);
            return Some(entry);
        }
        if scope.is_empty() {
            return None;
        }
        scope = parent_scope(scope);
    }
}
