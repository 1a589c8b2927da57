use std::collections::HashSet;
use std::ops::{BitAnd, BitOr, Sub};

use crate::{GoTerm, TermGraph, TermId};

/// A set of unique [`TermId`]s
///
/// Each term can occur only once in the set. The ids are kept sorted,
/// so iteration order is deterministic.
///
/// The [`TermSet`] is the result of a closure computation
/// and the input for annotation lookups.
///
/// # Examples
///
/// ```
/// use go_interactome::{TermId, TermSet};
///
/// let mut set = TermSet::new();
/// assert!(set.insert("GO:0000278"));
/// assert!(set.insert("GO:0007049"));
/// assert!(!set.insert("GO:0000278"));
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.iter().next().unwrap(), "GO:0000278");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct TermSet {
    ids: Vec<TermId>,
}

impl TermSet {
    /// Constructs a new, empty [`TermSet`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermSet`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the set contains no [`TermId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`TermId`]s in the set
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`TermId`] to the set
    ///
    /// Returns whether the `TermId` was newly inserted. That is:
    ///
    /// - If the set did not previously contain this `TermId`, true is returned.
    /// - If the set already contained this `TermId`, false is returned.
    pub fn insert<I: Into<TermId>>(&mut self, id: I) -> bool {
        let id = id.into();
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Removes the [`TermId`] from the set, returns `true` if it was present
    pub fn remove(&mut self, id: &TermId) -> bool {
        match self.ids.binary_search(id) {
            Ok(idx) => {
                self.ids.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns `true` if the set contains the [`TermId`]
    pub fn contains(&self, id: &TermId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns an Iterator of the [`TermId`]s inside the set
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.ids.iter(),
        }
    }

    /// Returns an Iterator of the [`GoTerm`]s of the set
    ///
    /// Ids that are not present in the `graph` are skipped.
    pub fn terms<'a>(&'a self, graph: &'a TermGraph) -> impl Iterator<Item = GoTerm<'a>> + 'a {
        self.ids.iter().filter_map(|id| graph.term(id))
    }
}

impl From<HashSet<TermId>> for TermSet {
    fn from(s: HashSet<TermId>) -> Self {
        let mut ids: Vec<TermId> = s.into_iter().collect();
        ids.sort_unstable();
        Self { ids }
    }
}

impl From<Vec<TermId>> for TermSet {
    fn from(mut ids: Vec<TermId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }
}

impl<I: Into<TermId>> FromIterator<I> for TermSet {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        iter.into_iter()
            .map(Into::into)
            .collect::<Vec<TermId>>()
            .into()
    }
}

impl<I: Into<TermId>> Extend<I> for TermSet {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        self.ids.extend(iter.into_iter().map(Into::into));
        self.ids.sort_unstable();
        self.ids.dedup();
    }
}

/// Iterates the [`TermId`]s of a [`TermSet`]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, TermId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TermId;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a TermSet {
    type Item = &'a TermId;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for TermSet {
    type Item = TermId;
    type IntoIter = std::vec::IntoIter<TermId>;
    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl BitOr for &TermSet {
    type Output = TermSet;

    /// Returns the union of both sets
    fn bitor(self, rhs: Self) -> Self::Output {
        let mut ids = Vec::with_capacity(self.len() + rhs.len());
        let (mut i, mut j) = (0, 0);
        while i < self.ids.len() && j < rhs.ids.len() {
            match self.ids[i].cmp(&rhs.ids[j]) {
                std::cmp::Ordering::Less => {
                    ids.push(self.ids[i].clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    ids.push(rhs.ids[j].clone());
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    ids.push(self.ids[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        ids.extend_from_slice(&self.ids[i..]);
        ids.extend_from_slice(&rhs.ids[j..]);
        TermSet { ids }
    }
}

impl BitAnd for &TermSet {
    type Output = TermSet;

    /// Returns the intersection of both sets
    fn bitand(self, rhs: Self) -> Self::Output {
        TermSet {
            ids: self
                .ids
                .iter()
                .filter(|id| rhs.contains(id))
                .cloned()
                .collect(),
        }
    }
}

impl Sub for &TermSet {
    type Output = TermSet;

    /// Returns all ids of `self` that are not in `rhs`
    fn sub(self, rhs: Self) -> Self::Output {
        TermSet {
            ids: self
                .ids
                .iter()
                .filter(|id| !rhs.contains(id))
                .cloned()
                .collect(),
        }
    }
}
