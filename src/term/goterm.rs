use crate::term::internal::TermInternal;
use crate::term::{Direction, Relation, RelationKind, RelationKinds, TermNamespace};
use crate::{GoError, GoResult, TermGraph, TermId, TermSet};

/// The `GoTerm` represents a single term from the Gene Ontology
///
/// It is a lightweight view into the [`TermGraph`] and gives access to the
/// term's data and its direct relations.
///
/// # Examples
///
/// ```
/// use go_interactome::{RelationKind, TermGraph};
/// use go_interactome::term::TermNamespace;
///
/// let mut graph = TermGraph::default();
/// graph.insert_term("GO:0007049", "cell cycle", TermNamespace::BiologicalProcess);
/// graph.insert_term("GO:0000278", "mitotic cell cycle", TermNamespace::BiologicalProcess);
/// graph.add_relation("GO:0000278", "GO:0007049", RelationKind::IsA).unwrap();
///
/// let term = graph.term("GO:0000278").unwrap();
/// assert_eq!(term.name(), "mitotic cell cycle");
/// assert_eq!(term.parents().next().unwrap().1.name(), "cell cycle");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GoTerm<'a> {
    term: &'a TermInternal,
    graph: &'a TermGraph,
}

impl<'a> GoTerm<'a> {
    /// Constructs a new [`GoTerm`]
    ///
    /// # Errors
    ///
    /// If the given [`TermId`] does not match an existing term
    /// it returns [`GoError::DoesNotExist`]
    pub fn try_new(graph: &'a TermGraph, term: &TermId) -> GoResult<GoTerm<'a>> {
        let term = graph.get(term).ok_or(GoError::DoesNotExist)?;
        Ok(GoTerm::new(graph, term))
    }

    pub(crate) fn new(graph: &'a TermGraph, term: &'a TermInternal) -> GoTerm<'a> {
        GoTerm { term, graph }
    }

    /// Returns the [`TermId`] of the term
    ///
    /// e.g.: `GO:0007049`
    pub fn id(&self) -> &'a TermId {
        self.term.id()
    }

    /// Returns the name of the term
    ///
    /// e.g.: `cell cycle`
    pub fn name(&self) -> &'a str {
        self.term.name()
    }

    /// Returns the GO namespace of the term
    pub fn namespace(&self) -> &'a TermNamespace {
        self.term.namespace()
    }

    /// Returns `true` if the term is flagged as obsolete
    pub fn is_obsolete(&self) -> bool {
        self.term.obsolete()
    }

    /// Returns an iterator of the direct parents and the relation kind
    pub fn parents(&self) -> impl Iterator<Item = (&'a RelationKind, GoTerm<'a>)> + 'a {
        self.neighbours(Direction::Ancestors)
    }

    /// Returns an iterator of the direct children and the relation kind
    pub fn children(&self) -> impl Iterator<Item = (&'a RelationKind, GoTerm<'a>)> + 'a {
        self.neighbours(Direction::Descendants)
    }

    /// Returns the ids of all direct parents connected by any of `kinds`
    pub fn parent_ids(&self, kinds: &RelationKinds) -> TermSet {
        self.neighbour_ids(Direction::Ancestors, kinds)
    }

    /// Returns the ids of all direct children connected by any of `kinds`
    pub fn children_ids(&self, kinds: &RelationKinds) -> TermSet {
        self.neighbour_ids(Direction::Descendants, kinds)
    }

    /// Returns all direct relations of the term in `direction`
    ///
    /// The returned [`Relation`]s always point from child to parent
    pub fn relations(&self, direction: Direction) -> Vec<Relation> {
        let own = self.term.id();
        self.term
            .links(direction)
            .iter()
            .map(|link| match direction {
                Direction::Ancestors => {
                    Relation::new(own.clone(), link.term.clone(), link.kind.clone())
                }
                Direction::Descendants => {
                    Relation::new(link.term.clone(), own.clone(), link.kind.clone())
                }
            })
            .collect()
    }

    /// Returns `true` if `other` is a direct parent of `self` (via any relation)
    pub fn child_of(&self, other: &GoTerm) -> bool {
        self.term
            .parents()
            .iter()
            .any(|link| &link.term == other.id())
    }

    /// Returns `true` if `other` is a direct child of `self` (via any relation)
    pub fn parent_of(&self, other: &GoTerm) -> bool {
        other.child_of(self)
    }

    fn neighbours(
        &self,
        direction: Direction,
    ) -> impl Iterator<Item = (&'a RelationKind, GoTerm<'a>)> + 'a {
        let graph = self.graph;
        self.term
            .links(direction)
            .iter()
            .map(move |link| (&link.kind, graph.term_unchecked(&link.term)))
    }

    fn neighbour_ids(&self, direction: Direction, kinds: &RelationKinds) -> TermSet {
        self.term
            .links(direction)
            .iter()
            .filter(|link| kinds.contains(&link.kind))
            .map(|link| link.term.clone())
            .collect()
    }
}

impl PartialEq for GoTerm<'_> {
    fn eq(&self, other: &GoTerm) -> bool {
        self.id() == other.id()
    }
}

impl Eq for GoTerm<'_> {}
