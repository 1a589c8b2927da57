//! Searches GO terms by name and prints their direct relations

use go_interactome::term::TermNamespace;
use go_interactome::{Direction, RelationKind, SearchMode, TermGraph};

fn main() {
    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cytokinesis".to_string());

    let mut graph = TermGraph::default();
    graph.insert_term("GO:0051301", "cell division", TermNamespace::BiologicalProcess);
    graph.insert_term("GO:0000910", "cytokinesis", TermNamespace::BiologicalProcess);
    graph.insert_term("GO:0000281", "mitotic cytokinesis", TermNamespace::BiologicalProcess);
    graph.insert_term(
        "GO:1902412",
        "regulation of mitotic cytokinesis",
        TermNamespace::BiologicalProcess,
    );
    graph
        .add_relation("GO:0000910", "GO:0051301", RelationKind::PartOf)
        .unwrap();
    graph
        .add_relation("GO:0000281", "GO:0000910", RelationKind::IsA)
        .unwrap();
    graph
        .add_relation("GO:1902412", "GO:0000281", RelationKind::Regulates)
        .unwrap();

    match graph.term_by_name(&query) {
        Some(term) => println!("exact match: {} {}", term.id(), term.name()),
        None => println!("no exact match for {query:?}"),
    }

    for term in graph.search(&query, SearchMode::Substring) {
        println!("{}\t{}\t{}", term.id(), term.name(), term.namespace());
        for relation in graph.relations_from(term.id(), Direction::Ancestors) {
            println!("\t{} {}", relation.kind(), relation.target());
        }
    }

    println!("{}", graph.as_mermaid());
}
