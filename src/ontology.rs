use core::fmt::Debug;
use std::collections::BTreeMap;

use tracing::trace;

use crate::term::internal::TermInternal;
use crate::term::{Direction, GoTerm, Relation, RelationKind, TermNamespace};
use crate::{GoError, GoResult, TermId};

mod termarena;
use termarena::Arena;

/// How [`TermGraph::search`] matches a query against term names
///
/// All modes are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// The whole name must match
    Exact,
    /// The name must start with the query
    Prefix,
    /// The name must contain the query
    Substring,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `TermGraph` holds all terms of the ontology and their typed relations
///
/// The graph is built once, using [`TermGraph::insert_term`] and
/// [`TermGraph::add_relation`], and is not modified afterwards. All
/// traversals (see [`crate::ClosureEngine`]) only borrow it.
///
/// # Examples
///
/// ```
/// use go_interactome::{Direction, RelationKind, TermGraph};
/// use go_interactome::term::TermNamespace;
///
/// let mut graph = TermGraph::default();
/// graph.insert_term("GO:0007049", "cell cycle", TermNamespace::BiologicalProcess);
/// graph.insert_term("GO:0000278", "mitotic cell cycle", TermNamespace::BiologicalProcess);
/// graph.insert_term("GO:0051726", "regulation of cell cycle", TermNamespace::BiologicalProcess);
///
/// graph.add_relation("GO:0000278", "GO:0007049", RelationKind::IsA).unwrap();
/// graph.add_relation("GO:0051726", "GO:0007049", RelationKind::Regulates).unwrap();
///
/// assert_eq!(graph.len(), 3);
/// assert_eq!(graph.relation_count(), 2);
///
/// let children = graph.relations_from(&"GO:0007049".into(), Direction::Descendants);
/// assert_eq!(children.len(), 2);
///
/// // unknown terms have no relations
/// assert!(graph.relations_from(&"GO:9999999".into(), Direction::Ancestors).is_empty());
/// ```
///
/// # Layout
///
/// Relations are stored at both ends, so walking up (to ancestors) and
/// down (to descendants) is equally cheap. By convention each relation points
/// from the child to the parent.
///
/// ```mermaid
/// graph BT
/// GO:0000278["GO:0000278<br>mitotic cell cycle"] -- is_a --> GO:0007049["GO:0007049<br>cell cycle"]
/// GO:0051726["GO:0051726<br>regulation of cell cycle"] -- regulates --> GO:0007049
/// GO:0000281["GO:0000281<br>mitotic cytokinesis"] -- part_of --> GO:0000278
/// ```
#[derive(Default)]
pub struct TermGraph {
    terms: Arena,
    labels: BTreeMap<String, Vec<TermId>>,
    relation_count: usize,
}

impl Debug for TermGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TermGraph with {} terms and {} relations",
            self.terms.len(),
            self.relation_count
        )
    }
}

impl TermGraph {
    /// Constructs an empty graph with room for `capacity` terms
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Arena::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Returns the number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the graph does not contain any terms
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::TermGraph;
    /// assert!(TermGraph::default().is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of distinct relations
    pub fn relation_count(&self) -> usize {
        self.relation_count
    }

    /// Returns `true` if a term with the id is present
    pub fn contains(&self, id: &TermId) -> bool {
        self.terms.contains(id)
    }

    /// Returns the [`GoTerm`] of the provided [`TermId`]
    ///
    /// If no such term is present, `None` is returned
    pub fn term<I: Into<TermId>>(&self, id: I) -> Option<GoTerm<'_>> {
        self.get(&id.into()).map(|term| GoTerm::new(self, term))
    }

    /// Returns an Iterator of all [`GoTerm`]s, ordered by [`TermId`]
    pub fn terms(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns all direct relations of the term in `direction`
    ///
    /// Relations always point from child to parent, independent of the
    /// requested direction. Unknown terms have no relations.
    pub fn relations_from(&self, id: &TermId, direction: Direction) -> Vec<Relation> {
        self.get(id)
            .map(|term| GoTerm::new(self, term).relations(direction))
            .unwrap_or_default()
    }

    /// Returns the first term (ordered by id) with exactly the given name
    ///
    /// The comparison is case-insensitive.
    pub fn term_by_name(&self, name: &str) -> Option<GoTerm<'_>> {
        self.labels
            .get(&name.to_lowercase())
            .and_then(|ids| ids.first())
            .map(|id| self.term_unchecked(id))
    }

    /// Returns all terms whose name matches `query`, ordered by id
    ///
    /// The search uses the name index that is built while inserting terms,
    /// so prefix searches do not scan all terms.
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::{SearchMode, TermGraph};
    /// use go_interactome::term::TermNamespace;
    ///
    /// let mut graph = TermGraph::default();
    /// graph.insert_term("GO:0007049", "cell cycle", TermNamespace::BiologicalProcess);
    /// graph.insert_term("GO:0051301", "cell division", TermNamespace::BiologicalProcess);
    /// graph.insert_term("GO:0000278", "mitotic cell cycle", TermNamespace::BiologicalProcess);
    ///
    /// assert_eq!(graph.search("Cell", SearchMode::Prefix).len(), 2);
    /// assert_eq!(graph.search("cell cycle", SearchMode::Substring).len(), 2);
    /// assert_eq!(graph.search("cell cycle", SearchMode::Exact).len(), 1);
    /// ```
    pub fn search(&self, query: &str, mode: SearchMode) -> Vec<GoTerm<'_>> {
        let query = query.to_lowercase();
        let mut ids: Vec<&TermId> = match mode {
            SearchMode::Exact => self
                .labels
                .get(&query)
                .map(|ids| ids.iter().collect())
                .unwrap_or_default(),
            SearchMode::Prefix => self
                .labels
                .range(query.clone()..)
                .take_while(|(name, _)| name.starts_with(&query))
                .flat_map(|(_, ids)| ids)
                .collect(),
            SearchMode::Substring => self
                .labels
                .iter()
                .filter(|(name, _)| name.contains(&query))
                .flat_map(|(_, ids)| ids)
                .collect(),
        };
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter().map(|id| self.term_unchecked(id)).collect()
    }

    /// Returns the code to create a `Mermaid` flow diagram
    ///
    /// This is meant to be used with smaller ontologies, e.g. the terms of
    /// a single category.
    pub fn as_mermaid(&self) -> String {
        let mut code = String::new();
        code.push_str("graph BT\n");
        for term in self {
            code.push_str(&format!(
                "{}[\"{}<br>{}\"]\n",
                term.id(),
                term.id(),
                term.name()
            ));
            for (kind, parent) in term.parents() {
                code.push_str(&format!("{} -- {} --> {}\n", term.id(), kind, parent.id()));
            }
        }
        code
    }
}

/// Methods to build the graph
impl TermGraph {
    /// Creates and inserts a new term
    ///
    /// Returns `false` if a term with the same id already exists, in that
    /// case the existing term is kept unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::TermGraph;
    /// use go_interactome::term::TermNamespace;
    ///
    /// let mut graph = TermGraph::default();
    /// assert!(graph.insert_term("GO:0007049", "cell cycle", TermNamespace::BiologicalProcess));
    /// assert!(!graph.insert_term("GO:0007049", "foobar", TermNamespace::Unknown));
    ///
    /// assert_eq!(graph.len(), 1);
    /// assert_eq!(graph.term("GO:0007049").unwrap().name(), "cell cycle");
    /// ```
    pub fn insert_term<I: Into<TermId>>(
        &mut self,
        id: I,
        name: &str,
        namespace: TermNamespace,
    ) -> bool {
        let id = id.into();
        if self.terms.contains(&id) {
            trace!("Term {} already present", id);
            return false;
        }
        let ids = self.labels.entry(name.to_lowercase()).or_default();
        if let Err(idx) = ids.binary_search(&id) {
            ids.insert(idx, id.clone());
        }
        self.terms
            .insert(TermInternal::new(id, name.to_string(), namespace));
        true
    }

    /// Connects `child` to `parent` with a relation of `kind`
    ///
    /// Adding the same relation twice has no effect.
    ///
    /// # Errors
    ///
    /// If either term is not present, [`GoError::DoesNotExist`] is returned
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::{RelationKind, RelationKinds, TermGraph};
    /// use go_interactome::term::TermNamespace;
    ///
    /// let mut graph = TermGraph::default();
    /// graph.insert_term("GO:1", "Foo", TermNamespace::Unknown);
    /// graph.insert_term("GO:2", "Bar", TermNamespace::Unknown);
    ///
    /// graph.add_relation("GO:2", "GO:1", RelationKind::PartOf).unwrap();
    /// assert!(graph.add_relation("GO:2", "GO:3", RelationKind::IsA).is_err());
    ///
    /// let parents = graph.term("GO:2").unwrap().parent_ids(&RelationKinds::from([RelationKind::PartOf]));
    /// assert!(parents.contains(&"GO:1".into()));
    /// ```
    pub fn add_relation<I: Into<TermId>, J: Into<TermId>>(
        &mut self,
        child: I,
        parent: J,
        kind: RelationKind,
    ) -> GoResult<()> {
        let child = child.into();
        let parent = parent.into();
        if !self.terms.contains(&parent) {
            return Err(GoError::DoesNotExist);
        }
        let added = self
            .terms
            .get_mut(&child)
            .ok_or(GoError::DoesNotExist)?
            .add_parent(kind.clone(), parent.clone());
        if added {
            self.terms
                .get_mut(&parent)
                .ok_or(GoError::DoesNotExist)?
                .add_child(kind, child);
            self.relation_count += 1;
        }
        Ok(())
    }

    /// Flags the term as obsolete
    ///
    /// # Errors
    ///
    /// If the term is not present, [`GoError::DoesNotExist`] is returned
    pub fn set_obsolete(&mut self, id: &TermId, obsolete: bool) -> GoResult<()> {
        *self
            .terms
            .get_mut(id)
            .ok_or(GoError::DoesNotExist)?
            .obsolete_mut() = obsolete;
        Ok(())
    }
}

/// Crate-only accessors
impl TermGraph {
    pub(crate) fn get(&self, id: &TermId) -> Option<&TermInternal> {
        self.terms.get(id)
    }

    /// Returns the [`GoTerm`] of an id that is known to exist
    ///
    /// # Panics
    ///
    /// This method will panic if the `id` is not present in the graph
    pub(crate) fn term_unchecked(&self, id: &TermId) -> GoTerm<'_> {
        GoTerm::new(
            self,
            self.terms
                .get(id)
                .expect("Relations and labels only reference existing terms"),
        )
    }

    pub(crate) fn internal_terms(&self) -> impl Iterator<Item = &TermInternal> {
        self.terms.values()
    }
}

/// Iterates the [`TermGraph`] and yields [`GoTerm`]s
pub struct Iter<'a> {
    inner: std::vec::IntoIter<&'a TermId>,
    graph: &'a TermGraph,
}

impl<'a> Iterator for Iter<'a> {
    type Item = GoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|id| self.graph.term_unchecked(id))
    }
}

impl<'a> IntoIterator for &'a TermGraph {
    type Item = GoTerm<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.terms.keys().into_iter(),
            graph: self,
        }
    }
}
