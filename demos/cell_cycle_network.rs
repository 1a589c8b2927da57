//! Builds the cell cycle interaction network from the bundled test tables
//!
//! Prints the node and edge tables to stdout. If a folder is given as
//! first argument, `nodes.tsv` and `edges.tsv` are written into it instead.

use std::io::stdout;

use go_interactome::annotations::AnnotationTable;
use go_interactome::export::{ExportMetadata, TabularExporter};
use go_interactome::identity::GeneRegistry;
use go_interactome::interactome::Interactome;
use go_interactome::parser;
use go_interactome::term::TermNamespace;
use go_interactome::{
    CategoryLabel, ClosureEngine, GraphFilterPipeline, PipelineConfig, RelationKind, TermGraph,
};

fn ontology() -> TermGraph {
    let mut graph = TermGraph::default();
    for (id, name) in [
        ("GO:0007049", "cell cycle"),
        ("GO:0000278", "mitotic cell cycle"),
        ("GO:0010458", "exit from mitosis"),
        ("GO:0051301", "cell division"),
        ("GO:0000910", "cytokinesis"),
        ("GO:0000281", "mitotic cytokinesis"),
        ("GO:1902412", "regulation of mitotic cytokinesis"),
    ] {
        graph.insert_term(id, name, TermNamespace::BiologicalProcess);
    }
    graph.insert_term("GO:0005515", "protein binding", TermNamespace::MolecularFunction);
    graph.insert_term("GO:0005737", "cytoplasm", TermNamespace::CellularComponent);

    for (child, parent, kind) in [
        ("GO:0000278", "GO:0007049", RelationKind::IsA),
        ("GO:0010458", "GO:0000278", RelationKind::PartOf),
        ("GO:0000910", "GO:0051301", RelationKind::PartOf),
        ("GO:0000281", "GO:0000910", RelationKind::IsA),
        ("GO:0000281", "GO:0000278", RelationKind::PartOf),
        ("GO:1902412", "GO:0000281", RelationKind::Regulates),
    ] {
        graph.add_relation(child, parent, kind).unwrap();
    }
    graph
}

fn main() {
    simple_logger::init_with_env().unwrap();

    let graph = ontology();

    let mut annotations = AnnotationTable::default();
    parser::gaf::parse_file("tests/data/goa_small.gaf", &mut annotations).unwrap();

    let mut registry = GeneRegistry::default();
    parser::idmapping::parse_file("tests/data/idmapping_selected.tab", &mut registry).unwrap();
    parser::hgnc::parse_file("tests/data/hgnc_small.txt", &mut registry).unwrap();

    let mut interactome = Interactome::default();
    parser::interactome::parse_file("tests/data/hi_union.tsv.gz", &mut interactome).unwrap();

    let labels = [
        CategoryLabel::new("cell_cycle", ["GO:0007049"]),
        CategoryLabel::new("cell_division", ["GO:0051301"]),
    ];

    let engine = ClosureEngine::new(&graph);
    let pipeline = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
        .with_config(PipelineConfig::default().with_include_seeds(true));
    let network = pipeline.run(&labels).unwrap();

    for label in network.report().labels() {
        eprintln!(
            "{}: {} terms, {} genes, {} unmapped",
            label.name(),
            label.terms().len(),
            label.candidate_genes(),
            label.unmapped_identifiers()
        );
    }

    let metadata = ExportMetadata::default();
    if let Some(folder) = std::env::args().nth(1) {
        let mut exporter = TabularExporter::to_folder(&folder).unwrap();
        network.publish(&mut exporter, &metadata).unwrap();
        eprintln!("Network written to {folder}");
    } else {
        let mut exporter = TabularExporter::new(stdout(), stdout());
        network.publish(&mut exporter, &metadata).unwrap();
    }
}
