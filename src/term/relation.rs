use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt::Display;

use crate::TermId;

/// The semantic type of an edge between two terms
///
/// The named variants cover the relations used in `go-basic.obo`
/// and the Gene Ontology relationship tags. Every other relation is
/// kept as [`RelationKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    /// `is_a`
    IsA,
    /// `part_of`
    PartOf,
    /// `regulates`
    Regulates,
    /// `positively_regulates`
    PositivelyRegulates,
    /// `negatively_regulates`
    NegativelyRegulates,
    /// `has_part`
    HasPart,
    /// `occurs_in`
    OccursIn,
    /// `happens_during`
    HappensDuring,
    /// `ends_during`
    EndsDuring,
    /// Any other relation
    Other(String),
}

impl RelationKind {
    /// Returns the OBO name of the relation
    pub fn as_str(&self) -> &str {
        match self {
            RelationKind::IsA => "is_a",
            RelationKind::PartOf => "part_of",
            RelationKind::Regulates => "regulates",
            RelationKind::PositivelyRegulates => "positively_regulates",
            RelationKind::NegativelyRegulates => "negatively_regulates",
            RelationKind::HasPart => "has_part",
            RelationKind::OccursIn => "occurs_in",
            RelationKind::HappensDuring => "happens_during",
            RelationKind::EndsDuring => "ends_during",
            RelationKind::Other(name) => name,
        }
    }
}

impl From<&str> for RelationKind {
    fn from(s: &str) -> Self {
        match s {
            "is_a" => RelationKind::IsA,
            "part_of" => RelationKind::PartOf,
            "regulates" => RelationKind::Regulates,
            "positively_regulates" => RelationKind::PositivelyRegulates,
            "negatively_regulates" => RelationKind::NegativelyRegulates,
            "has_part" => RelationKind::HasPart,
            "occurs_in" => RelationKind::OccursIn,
            "happens_during" => RelationKind::HappensDuring,
            "ends_during" => RelationKind::EndsDuring,
            other => RelationKind::Other(other.to_string()),
        }
    }
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A set of [`RelationKind`]s that are followed during a traversal
///
/// The set is ordered, so two sets with the same content compare and
/// hash equal, regardless of insertion order.
///
/// # Examples
///
/// ```
/// use go_interactome::{RelationKind, RelationKinds};
///
/// let kinds: RelationKinds = ["part_of", "is_a"].into_iter().map(RelationKind::from).collect();
/// assert!(kinds.contains(&RelationKind::IsA));
/// assert!(!kinds.contains(&RelationKind::Regulates));
/// assert_eq!(kinds, RelationKinds::from([RelationKind::IsA, RelationKind::PartOf]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RelationKinds {
    kinds: BTreeSet<RelationKind>,
}

impl RelationKinds {
    /// Constructs a new, empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `is_a` relations
    pub fn is_a() -> Self {
        Self::from([RelationKind::IsA])
    }

    /// `is_a`, `part_of` and all three regulation relations
    ///
    /// This is the set used to collect every term "belonging" to a
    /// biological process, including its regulation.
    pub fn hierarchy_and_regulation() -> Self {
        Self::from([
            RelationKind::IsA,
            RelationKind::PartOf,
            RelationKind::Regulates,
            RelationKind::PositivelyRegulates,
            RelationKind::NegativelyRegulates,
        ])
    }

    /// Adds a kind to the set, returns `true` if it was not present before
    pub fn insert(&mut self, kind: RelationKind) -> bool {
        self.kinds.insert(kind)
    }

    /// Returns `true` if relations of `kind` should be followed
    pub fn contains(&self, kind: &RelationKind) -> bool {
        self.kinds.contains(kind)
    }

    /// Returns the number of kinds
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no kind is present
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Returns an iterator of all kinds
    pub fn iter(&self) -> btree_set::Iter<'_, RelationKind> {
        self.kinds.iter()
    }
}

impl<const N: usize> From<[RelationKind; N]> for RelationKinds {
    fn from(kinds: [RelationKind; N]) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }
}

impl FromIterator<RelationKind> for RelationKinds {
    fn from_iter<T: IntoIterator<Item = RelationKind>>(iter: T) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RelationKinds {
    type Item = &'a RelationKind;
    type IntoIter = btree_set::Iter<'a, RelationKind>;
    fn into_iter(self) -> Self::IntoIter {
        self.kinds.iter()
    }
}

/// The direction of a traversal through the ontology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Follow relations from child to parent
    Ancestors,
    /// Follow relations from parent to child
    Descendants,
}

/// A typed, directed edge between two terms
///
/// Relations always point from the child (`source`) to the parent (`target`),
/// e.g. `GO:0000278 (mitotic cell cycle) --is_a--> GO:0007049 (cell cycle)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Relation {
    source: TermId,
    target: TermId,
    kind: RelationKind,
}

impl Relation {
    /// Constructs a new relation from `source` (child) to `target` (parent)
    pub fn new(source: TermId, target: TermId, kind: RelationKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }

    /// The child term
    pub fn source(&self) -> &TermId {
        &self.source
    }

    /// The parent term
    pub fn target(&self) -> &TermId {
        &self.target
    }

    /// The type of the relation
    pub fn kind(&self) -> &RelationKind {
        &self.kind
    }

    /// Returns the term at the end of the relation, walking in `direction`
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::{Direction, Relation, RelationKind, TermId};
    ///
    /// let rel = Relation::new("GO:0000278".into(), "GO:0007049".into(), RelationKind::IsA);
    /// assert_eq!(rel.toward(Direction::Ancestors), "GO:0007049");
    /// assert_eq!(rel.toward(Direction::Descendants), "GO:0000278");
    /// ```
    pub fn toward(&self, direction: Direction) -> &TermId {
        match direction {
            Direction::Ancestors => &self.target,
            Direction::Descendants => &self.source,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn relation_kind_names() {
        for name in [
            "is_a",
            "part_of",
            "regulates",
            "positively_regulates",
            "negatively_regulates",
            "has_part",
            "occurs_in",
            "happens_during",
            "ends_during",
            "capable_of",
        ] {
            assert_eq!(RelationKind::from(name).as_str(), name);
        }
        assert_eq!(
            RelationKind::from("capable_of"),
            RelationKind::Other("capable_of".to_string())
        );
    }

    #[test]
    fn kinds_are_order_independent() {
        let a: RelationKinds = [RelationKind::PartOf, RelationKind::IsA].into();
        let b: RelationKinds = [RelationKind::IsA, RelationKind::PartOf, RelationKind::IsA].into();
        assert_eq!(a, b);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn regulation_set() {
        let kinds = RelationKinds::hierarchy_and_regulation();
        assert_eq!(kinds.len(), 5);
        assert!(kinds.contains(&RelationKind::NegativelyRegulates));
        assert!(!kinds.contains(&RelationKind::HasPart));
    }
}
