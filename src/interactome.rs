//! Pairwise gene interactions
//!
//! The [`InteractionStore`] is the source of all interactions. The pipeline
//! only ever asks for the interactions between a given set of genes.
use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use crate::identity::Identifier;
use crate::GoResult;

/// An undirected interaction between two genes
///
/// The order of `a` and `b` is the order of the source data. Use
/// [`InteractionEdge::unordered_key`] to compare edges regardless of
/// orientation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InteractionEdge {
    a: Identifier,
    b: Identifier,
}

impl InteractionEdge {
    /// Constructs a new edge
    pub fn new(a: Identifier, b: Identifier) -> Self {
        Self { a, b }
    }

    /// The first interactor
    pub fn a(&self) -> &Identifier {
        &self.a
    }

    /// The second interactor
    pub fn b(&self) -> &Identifier {
        &self.b
    }

    /// Returns `true` if the gene interacts with itself
    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }

    /// Returns both endpoints, smallest first
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::identity::Identifier;
    /// use go_interactome::interactome::InteractionEdge;
    ///
    /// let ab = InteractionEdge::new(Identifier::ensembl("ENSG1"), Identifier::ensembl("ENSG2"));
    /// let ba = InteractionEdge::new(Identifier::ensembl("ENSG2"), Identifier::ensembl("ENSG1"));
    /// assert_ne!(ab, ba);
    /// assert_eq!(ab.unordered_key(), ba.unordered_key());
    /// ```
    pub fn unordered_key(&self) -> (&Identifier, &Identifier) {
        if self.a <= self.b {
            (&self.a, &self.b)
        } else {
            (&self.b, &self.a)
        }
    }
}

impl Display for InteractionEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.a, self.b)
    }
}

/// Provides interactions between genes
pub trait InteractionStore {
    /// Returns every stored edge with both endpoints in `nodes`
    ///
    /// Edges with only one endpoint in `nodes` are never returned.
    /// Duplicates and reverse duplicates of the source data are kept.
    ///
    /// # Errors
    ///
    /// [`crate::GoError::CollaboratorUnavailable`] if the store cannot be queried
    fn edges_within(&self, nodes: &HashSet<Identifier>) -> GoResult<Vec<InteractionEdge>>;
}

/// In-memory [`InteractionStore`]
///
/// Edges are kept in insertion order, including duplicates and self loops.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use go_interactome::identity::Identifier;
/// use go_interactome::interactome::{Interactome, InteractionStore};
///
/// let mut interactome = Interactome::default();
/// interactome.add(Identifier::ensembl("ENSG1"), Identifier::ensembl("ENSG2"));
/// interactome.add(Identifier::ensembl("ENSG2"), Identifier::ensembl("ENSG3"));
///
/// let filter: HashSet<Identifier> = [Identifier::ensembl("ENSG1"), Identifier::ensembl("ENSG2")]
///     .into_iter()
///     .collect();
/// assert_eq!(interactome.edges_within(&filter).unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Interactome {
    edges: Vec<InteractionEdge>,
    by_node: HashMap<Identifier, Vec<usize>>,
}

impl Interactome {
    /// Adds an interaction
    pub fn add(&mut self, a: Identifier, b: Identifier) {
        let idx = self.edges.len();
        self.by_node.entry(a.clone()).or_default().push(idx);
        if a != b {
            self.by_node.entry(b.clone()).or_default().push(idx);
        }
        self.edges.push(InteractionEdge::new(a, b));
    }

    /// Returns the number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if there are no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the number of distinct genes
    pub fn node_count(&self) -> usize {
        self.by_node.len()
    }

    /// Returns an iterator of all edges
    pub fn iter(&self) -> std::slice::Iter<'_, InteractionEdge> {
        self.edges.iter()
    }
}

impl InteractionStore for Interactome {
    fn edges_within(&self, nodes: &HashSet<Identifier>) -> GoResult<Vec<InteractionEdge>> {
        let mut indices: Vec<usize> = nodes
            .iter()
            .filter_map(|node| self.by_node.get(node))
            .flatten()
            .copied()
            .filter(|idx| {
                let edge = &self.edges[*idx];
                nodes.contains(&edge.a) && nodes.contains(&edge.b)
            })
            .collect();
        // every edge is found once from each endpoint
        indices.sort_unstable();
        indices.dedup();
        Ok(indices
            .into_iter()
            .map(|idx| self.edges[idx].clone())
            .collect())
    }
}

impl<'a> IntoIterator for &'a Interactome {
    type Item = &'a InteractionEdge;
    type IntoIter = std::slice::Iter<'a, InteractionEdge>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
