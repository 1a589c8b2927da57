//! Transitive closure of ontology terms
//!
//! The [`ClosureEngine`] expands seed terms into the set of all terms
//! reachable through a chosen set of relation kinds, up to a maximum
//! number of hops.
//!
//! Each traversal uses a [`RelationIndex`], a pre-filtered adjacency list
//! that only depends on the relation kinds and the direction. The engine
//! builds every index once and keeps it for all later calls.
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::term::{Direction, RelationKinds};
use crate::{GoError, GoResult, TermGraph, TermId, TermSet};

/// What to do with seed terms that are missing from the [`TermGraph`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Unknown seeds are skipped and reported in the [`Expansion`]
    #[default]
    Permissive,
    /// Unknown seeds fail the expansion with [`GoError::UnknownTerm`]
    Strict,
}

/// Adjacency list of a [`TermGraph`], restricted to some relation kinds
///
/// The index maps every term to its direct neighbours in one [`Direction`].
/// Only relations of the requested kinds are present, all others are never
/// traversed.
#[derive(Debug)]
pub struct RelationIndex {
    kinds: RelationKinds,
    direction: Direction,
    neighbours: HashMap<TermId, Vec<TermId>>,
}

impl RelationIndex {
    /// Builds the index for `kinds` and `direction`
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::{Direction, RelationKind, RelationKinds, TermGraph};
    /// use go_interactome::closure::RelationIndex;
    /// use go_interactome::term::TermNamespace;
    ///
    /// let mut graph = TermGraph::default();
    /// graph.insert_term("GO:1", "root", TermNamespace::Unknown);
    /// graph.insert_term("GO:2", "child", TermNamespace::Unknown);
    /// graph.insert_term("GO:3", "regulation", TermNamespace::Unknown);
    /// graph.add_relation("GO:2", "GO:1", RelationKind::IsA).unwrap();
    /// graph.add_relation("GO:3", "GO:1", RelationKind::Regulates).unwrap();
    ///
    /// let index = RelationIndex::build(&graph, &RelationKinds::is_a(), Direction::Descendants);
    /// assert_eq!(index.neighbours(&"GO:1".into()).len(), 1);
    /// ```
    pub fn build(graph: &TermGraph, kinds: &RelationKinds, direction: Direction) -> Self {
        let mut neighbours: HashMap<TermId, Vec<TermId>> = HashMap::new();
        for term in graph.internal_terms() {
            let mut ids: Vec<TermId> = term
                .links(direction)
                .iter()
                .filter(|link| kinds.contains(&link.kind))
                .map(|link| link.term.clone())
                .collect();
            if ids.is_empty() {
                continue;
            }
            // the same neighbour can be linked through several kinds
            ids.sort_unstable();
            ids.dedup();
            neighbours.insert(term.id().clone(), ids);
        }
        debug!(
            "Built {:?} index for {} relation kinds with {} entries",
            direction,
            kinds.len(),
            neighbours.len()
        );
        Self {
            kinds: kinds.clone(),
            direction,
            neighbours,
        }
    }

    /// Returns the direct neighbours of `id`
    pub fn neighbours(&self, id: &TermId) -> &[TermId] {
        self.neighbours.get(id).map_or(&[], Vec::as_slice)
    }

    /// The relation kinds covered by the index
    pub fn kinds(&self) -> &RelationKinds {
        &self.kinds
    }

    /// The direction of the index
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the number of terms with at least one neighbour
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns `true` if no term has a neighbour
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }
}

/// The result of [`ClosureEngine::expand_with_report`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    terms: TermSet,
    unknown_seeds: Vec<TermId>,
}

impl Expansion {
    /// All terms reached from the seeds
    pub fn terms(&self) -> &TermSet {
        &self.terms
    }

    /// Seeds that are not present in the [`TermGraph`] and were skipped
    pub fn unknown_seeds(&self) -> &[TermId] {
        &self.unknown_seeds
    }

    /// Consumes the expansion and returns the reached terms
    pub fn into_terms(self) -> TermSet {
        self.terms
    }
}

type IndexKey = (RelationKinds, Direction);

/// Computes transitive closures of terms in a [`TermGraph`]
///
/// The engine borrows the graph and caches one [`RelationIndex`] for each
/// combination of relation kinds and direction that it was asked for.
/// It can be shared between threads, the cache is behind a lock and the
/// indexes themselves are never modified.
///
/// # Examples
///
/// ```
/// use go_interactome::{ClosureEngine, Direction, RelationKind, RelationKinds, TermGraph, TermSet};
/// use go_interactome::term::TermNamespace;
///
/// let mut graph = TermGraph::default();
/// graph.insert_term("GO:0007049", "cell cycle", TermNamespace::BiologicalProcess);
/// graph.insert_term("GO:0000278", "mitotic cell cycle", TermNamespace::BiologicalProcess);
/// graph.insert_term("GO:0000281", "mitotic cytokinesis", TermNamespace::BiologicalProcess);
/// graph.insert_term("GO:1902412", "regulation of mitotic cytokinesis", TermNamespace::BiologicalProcess);
/// graph.add_relation("GO:0000278", "GO:0007049", RelationKind::IsA).unwrap();
/// graph.add_relation("GO:0000281", "GO:0000278", RelationKind::PartOf).unwrap();
/// graph.add_relation("GO:1902412", "GO:0000281", RelationKind::Regulates).unwrap();
///
/// let engine = ClosureEngine::new(&graph);
/// let seeds: TermSet = ["GO:0007049"].into_iter().collect();
///
/// let is_a = engine
///     .expand(&seeds, &RelationKinds::is_a(), go_interactome::UNBOUNDED_DEPTH, Direction::Descendants)
///     .unwrap();
/// assert_eq!(is_a.len(), 1);
///
/// let all = engine
///     .expand(&seeds, &RelationKinds::hierarchy_and_regulation(), 2, Direction::Descendants)
///     .unwrap();
/// assert_eq!(all.len(), 2);
/// assert!(!all.contains(&"GO:1902412".into()));
/// ```
#[derive(Debug)]
pub struct ClosureEngine<'a> {
    graph: &'a TermGraph,
    strictness: Strictness,
    indexes: RwLock<HashMap<IndexKey, Arc<RelationIndex>>>,
}

impl<'a> ClosureEngine<'a> {
    /// Constructs a permissive engine for `graph`
    pub fn new(graph: &'a TermGraph) -> Self {
        Self {
            graph,
            strictness: Strictness::default(),
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Sets how unknown seed terms are handled
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Returns the configured [`Strictness`]
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Returns the underlying [`TermGraph`]
    pub fn graph(&self) -> &'a TermGraph {
        self.graph
    }

    /// Returns the number of cached indexes
    pub fn cached_indexes(&self) -> usize {
        self.indexes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns the [`RelationIndex`] for `kinds` and `direction`
    ///
    /// The index is built on first use and cached afterwards.
    pub fn index(&self, kinds: &RelationKinds, direction: Direction) -> Arc<RelationIndex> {
        let key = (kinds.clone(), direction);
        if let Some(index) = self
            .indexes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(index);
        }

        let mut indexes = self
            .indexes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // another thread might have built it in the meantime
        Arc::clone(
            indexes
                .entry(key)
                .or_insert_with(|| Arc::new(RelationIndex::build(self.graph, kinds, direction))),
        )
    }

    /// Returns all terms reachable from `seeds` within `max_depth` hops
    ///
    /// Only relations of `kinds` are followed. The seeds themselves are
    /// not part of the result, unless they are reachable from another seed
    /// (or from themselves through a cycle).
    ///
    /// - `max_depth == 0` returns an empty set
    /// - [`crate::UNBOUNDED_DEPTH`] computes the complete closure
    ///
    /// # Errors
    ///
    /// In [`Strictness::Strict`] mode, an unknown seed returns [`GoError::UnknownTerm`]
    pub fn expand<'s, S: IntoIterator<Item = &'s TermId>>(
        &self,
        seeds: S,
        kinds: &RelationKinds,
        max_depth: usize,
        direction: Direction,
    ) -> GoResult<TermSet> {
        self.expand_with_report(seeds, kinds, max_depth, direction)
            .map(Expansion::into_terms)
    }

    /// Same as [`ClosureEngine::expand`] but also reports skipped seeds
    ///
    /// # Errors
    ///
    /// In [`Strictness::Strict`] mode, an unknown seed returns [`GoError::UnknownTerm`]
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::{ClosureEngine, Direction, RelationKinds, TermGraph, TermId};
    /// use go_interactome::closure::Strictness;
    /// use go_interactome::term::TermNamespace;
    ///
    /// let mut graph = TermGraph::default();
    /// graph.insert_term("GO:1", "root", TermNamespace::Unknown);
    /// let seeds = [TermId::from("GO:1"), TermId::from("GO:404")];
    ///
    /// let engine = ClosureEngine::new(&graph);
    /// let expansion = engine
    ///     .expand_with_report(&seeds, &RelationKinds::is_a(), 1, Direction::Descendants)
    ///     .unwrap();
    /// assert!(expansion.terms().is_empty());
    /// assert_eq!(expansion.unknown_seeds(), &[TermId::from("GO:404")]);
    ///
    /// let strict = ClosureEngine::new(&graph).with_strictness(Strictness::Strict);
    /// assert!(strict
    ///     .expand_with_report(&seeds, &RelationKinds::is_a(), 1, Direction::Descendants)
    ///     .is_err());
    /// ```
    pub fn expand_with_report<'s, S: IntoIterator<Item = &'s TermId>>(
        &self,
        seeds: S,
        kinds: &RelationKinds,
        max_depth: usize,
        direction: Direction,
    ) -> GoResult<Expansion> {
        self.expand_with(seeds, kinds, max_depth, direction, self.strictness)
    }

    /// Same as [`ClosureEngine::expand_with_report`] with a different [`Strictness`]
    ///
    /// This allows callers with different needs to share one engine
    /// and its cached indexes.
    ///
    /// # Errors
    ///
    /// In [`Strictness::Strict`] mode, an unknown seed returns [`GoError::UnknownTerm`]
    pub fn expand_with<'s, S: IntoIterator<Item = &'s TermId>>(
        &self,
        seeds: S,
        kinds: &RelationKinds,
        max_depth: usize,
        direction: Direction,
        strictness: Strictness,
    ) -> GoResult<Expansion> {
        let mut unknown_seeds = Vec::new();
        let mut expanded: HashSet<TermId> = HashSet::new();
        let mut frontier: Vec<TermId> = Vec::new();

        for seed in seeds {
            if !self.graph.contains(seed) {
                if strictness == Strictness::Strict {
                    return Err(GoError::UnknownTerm(seed.clone()));
                }
                warn!("Skipping unknown seed term {}", seed);
                unknown_seeds.push(seed.clone());
                continue;
            }
            if expanded.insert(seed.clone()) {
                frontier.push(seed.clone());
            }
        }

        if max_depth == 0 || frontier.is_empty() {
            return Ok(Expansion {
                terms: TermSet::new(),
                unknown_seeds,
            });
        }

        let index = self.index(kinds, direction);
        let mut reached: HashSet<TermId> = HashSet::new();
        let mut depth = 0;

        // Breadth first: every term is expanded at most once
        while !frontier.is_empty() && depth < max_depth {
            depth += 1;
            let mut next = Vec::new();
            for term in &frontier {
                for neighbour in index.neighbours(term) {
                    reached.insert(neighbour.clone());
                    if expanded.insert(neighbour.clone()) {
                        next.push(neighbour.clone());
                    }
                }
            }
            frontier = next;
        }

        debug!(
            "Expanded to {} terms in {} steps ({:?})",
            reached.len(),
            depth,
            direction
        );

        Ok(Expansion {
            terms: reached.into(),
            unknown_seeds,
        })
    }
}
