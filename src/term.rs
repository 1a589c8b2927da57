//! [`GoTerm`]s are the nodes of the ontology and are connected by typed [`Relation`]s
//!
//! This module contains the identifier type [`TermId`], the relation
//! vocabulary ([`RelationKind`], [`RelationKinds`]), the set type
//! [`TermSet`] and the term view [`GoTerm`].

mod goterm;
mod group;
pub(crate) mod internal;
mod relation;
mod termid;

pub use goterm::GoTerm;
pub use group::{Iter, TermSet};
pub use relation::{Direction, Relation, RelationKind, RelationKinds};
pub use termid::TermId;

use std::fmt::Display;

/// The sub-ontology (GO aspect) a term belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TermNamespace {
    /// `biological_process`
    BiologicalProcess,
    /// `molecular_function`
    MolecularFunction,
    /// `cellular_component`
    CellularComponent,
    /// Any other namespace the ontology defines
    Other(String),
    /// No namespace information available
    #[default]
    Unknown,
}

impl TermNamespace {
    /// Returns the OBO name of the namespace, e.g. `biological_process`
    pub fn as_str(&self) -> &str {
        match self {
            TermNamespace::BiologicalProcess => "biological_process",
            TermNamespace::MolecularFunction => "molecular_function",
            TermNamespace::CellularComponent => "cellular_component",
            TermNamespace::Other(name) => name,
            TermNamespace::Unknown => "",
        }
    }
}

impl From<&str> for TermNamespace {
    /// Parses the OBO namespace name or the single-letter GAF aspect
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::term::TermNamespace;
    ///
    /// assert_eq!(TermNamespace::from("biological_process"), TermNamespace::BiologicalProcess);
    /// assert_eq!(TermNamespace::from("C"), TermNamespace::CellularComponent);
    /// assert_eq!(TermNamespace::from(""), TermNamespace::Unknown);
    /// ```
    fn from(s: &str) -> Self {
        match s {
            "biological_process" | "P" => TermNamespace::BiologicalProcess,
            "molecular_function" | "F" => TermNamespace::MolecularFunction,
            "cellular_component" | "C" => TermNamespace::CellularComponent,
            "" => TermNamespace::Unknown,
            other => TermNamespace::Other(other.to_string()),
        }
    }
}

impl Display for TermNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
