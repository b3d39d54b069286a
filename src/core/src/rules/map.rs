//! The derived rule mapping: ordered `path -> atom sequence` entries.

use crate::rules::RuleAtom;
use indexmap::IndexMap;
use std::fmt;

/// A flat, path-addressed validation rule mapping.
///
/// Keys are dotted paths with optional `*` wildcard segments
/// (`"collection.*.sku"`). Entries keep insertion order, so a parent path
/// always precedes its children. Built fresh per resolution call; never
/// cached, since payload-dependent custom rules may vary the output.
#[derive(Debug, Clone, Default)]
pub struct RuleMap {
    entries: IndexMap<String, Vec<RuleAtom>>,
}

impl RuleMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the atom sequence for a path.
    ///
    /// Replacing an existing path keeps its original position, so override
    /// merging does not reorder the mapping.
    pub fn insert(&mut self, path: impl Into<String>, atoms: Vec<RuleAtom>) {
        self.entries.insert(path.into(), atoms);
    }

    /// The atom sequence for a path, if present.
    pub fn get(&self, path: &str) -> Option<&Vec<RuleAtom>> {
        self.entries.get(path)
    }

    /// True if the mapping has an entry for this path.
    pub fn contains_path(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of path entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<RuleAtom>)> {
        self.entries.iter()
    }

    /// The atom sequence for a path, rendered to canonical strings.
    ///
    /// Convenient for assertions and debugging.
    pub fn atoms_rendered(&self, path: &str) -> Option<Vec<String>> {
        self.entries
            .get(path)
            .map(|atoms| atoms.iter().map(RuleAtom::canonical).collect())
    }

    /// Render the whole mapping as `path -> "a|b:c"` strings.
    pub fn to_display_map(&self) -> IndexMap<String, String> {
        self.entries
            .iter()
            .map(|(path, atoms)| {
                let run = atoms
                    .iter()
                    .map(RuleAtom::canonical)
                    .collect::<Vec<_>>()
                    .join("|");
                (path.clone(), run)
            })
            .collect()
    }
}

impl fmt::Display for RuleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, run)) in self.to_display_map().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", path, run)?;
        }
        Ok(())
    }
}

impl IntoIterator for RuleMap {
    type Item = (String, Vec<RuleAtom>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<RuleAtom>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
