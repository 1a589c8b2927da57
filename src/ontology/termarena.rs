use std::collections::hash_map::Values;
use std::collections::HashMap;

use crate::term::internal::TermInternal;
use crate::TermId;

pub(crate) struct Arena {
    terms: HashMap<TermId, TermInternal>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Inserts the term, replacing and returning a previous term with the same id
    pub fn insert(&mut self, term: TermInternal) -> Option<TermInternal> {
        self.terms.insert(term.id().clone(), term)
    }

    pub fn contains(&self, id: &TermId) -> bool {
        self.terms.contains_key(id)
    }

    pub fn get(&self, id: &TermId) -> Option<&TermInternal> {
        self.terms.get(id)
    }

    pub fn get_mut(&mut self, id: &TermId) -> Option<&mut TermInternal> {
        self.terms.get_mut(id)
    }

    pub fn values(&self) -> Values<'_, TermId, TermInternal> {
        self.terms.values()
    }

    /// Returns all ids, sorted
    pub fn keys(&self) -> Vec<&TermId> {
        let mut keys: Vec<&TermId> = self.terms.keys().collect();
        keys.sort_unstable();
        keys
    }
}

impl Arena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: HashMap::with_capacity(capacity),
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
