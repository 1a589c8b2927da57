//! Filter a protein interaction network down to the genes of selected
//! Gene Ontology categories
//!
//! ## Main components
//!
//! - [`TermGraph`]: GO terms and their typed relations
//! - [`ClosureEngine`]: transitive closure of seed terms for a set of relation
//!   kinds, a direction and a maximum depth
//! - [`annotations`]: GO annotations with optional evidence filtering
//! - [`identity`]: mapping between Ensembl, UniProtKB and HGNC identifiers
//! - [`interactome`]: pairwise interactions
//! - [`GraphFilterPipeline`]: combines all of the above into a
//!   [`FilteredGraph`](pipeline::FilteredGraph)
//! - [`export`] and [`parser`]: node/edge tables out, GO and gene tables in
//!
//! ## Example
//!
//! ```
//! use go_interactome::{CategoryLabel, ClosureEngine, GraphFilterPipeline, RelationKind, TermGraph};
//! use go_interactome::annotations::{Annotation, AnnotationTable};
//! use go_interactome::identity::{GeneRegistry, Identifier};
//! use go_interactome::interactome::Interactome;
//! use go_interactome::term::TermNamespace;
//!
//! let mut graph = TermGraph::default();
//! graph.insert_term("GO:0007049", "cell cycle", TermNamespace::BiologicalProcess);
//! graph.insert_term("GO:0000278", "mitotic cell cycle", TermNamespace::BiologicalProcess);
//! graph.add_relation("GO:0000278", "GO:0007049", RelationKind::IsA).unwrap();
//!
//! let mut annotations = AnnotationTable::default();
//! annotations.add(Annotation::new(Identifier::uniprot("P06493"), "GO:0000278", "IDA", "UniProtKB"));
//! annotations.add(Annotation::new(Identifier::uniprot("P14635"), "GO:0000278", "IDA", "UniProtKB"));
//!
//! let mut registry = GeneRegistry::default();
//! registry.add_uniprot_mapping("P06493", &["ENSG00000170312"]);
//! registry.add_uniprot_mapping("P14635", &["ENSG00000134057"]);
//!
//! let mut interactome = Interactome::default();
//! interactome.add(Identifier::ensembl("ENSG00000170312"), Identifier::ensembl("ENSG00000134057"));
//!
//! let engine = ClosureEngine::new(&graph);
//! let network = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
//!     .run(&[CategoryLabel::new("cell_cycle", ["GO:0007049"])])
//!     .unwrap();
//!
//! assert_eq!(network.nodes().len(), 2);
//! assert_eq!(network.edges().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use thiserror::Error;

pub mod annotations;
pub mod closure;
pub mod export;
pub mod identity;
pub mod interactome;
mod ontology;
pub mod parser;
pub mod pipeline;
pub mod term;

pub use closure::ClosureEngine;
pub use ontology::{SearchMode, TermGraph};
pub use pipeline::{CategoryLabel, GraphFilterPipeline, PipelineConfig};
pub use term::{Direction, GoTerm, Relation, RelationKind, RelationKinds, TermId, TermSet};

/// Traversal depth that is never reached in practice
///
/// Use this as `max_depth` to compute the complete closure of a term.
pub const UNBOUNDED_DEPTH: usize = usize::MAX;

const DEFAULT_NUM_RELATIONS: usize = 4;

/// Main Error type for this crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GoError {
    /// A seed term is not present in the [`TermGraph`] (only in strict mode)
    #[error("term {0} does not exist in the ontology")]
    UnknownTerm(TermId),
    /// Failed to find a term while building the ontology
    #[error("term does not exist")]
    DoesNotExist,
    /// An external data source (annotations, interactions, ID mapping) failed
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),
    /// The graph could not be handed over to the export target
    #[error("export unavailable: {0}")]
    ExportUnavailable(String),
    /// Failed to open a file for reading
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// A line or record of an input table is invalid
    #[error("invalid data: {0}")]
    InvalidInput(String),
}

/// Shortcut for `Result<T, GoError>`
pub type GoResult<T> = Result<T, GoError>;
