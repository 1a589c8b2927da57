//! Handing a [`FilteredGraph`](crate::pipeline::FilteredGraph) to a visualization or file
//!
//! Exporters receive the final nodes and edges and never modify them.
//! A failed export can be repeated without running the pipeline again.
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::pipeline::{FilteredEdge, FilteredNode};
use crate::{GoError, GoResult};

/// Interaction type of every exported edge
const INTERACTION: &str = "interacts";
/// Weight of every exported edge
const WEIGHT: &str = "1.0";

/// Replaces tabs and line breaks, they would break the table layout
fn field(value: &str) -> Cow<'_, str> {
    if value.contains(['\t', '\n', '\r']) {
        Cow::Owned(value.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

/// Title and collection of an exported network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMetadata {
    title: String,
    collection_name: String,
}

impl ExportMetadata {
    /// Constructs new metadata
    pub fn new(title: &str, collection_name: &str) -> Self {
        Self {
            title: title.to_string(),
            collection_name: collection_name.to_string(),
        }
    }

    /// The title of the network
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The collection the network belongs to
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }
}

impl Default for ExportMetadata {
    fn default() -> Self {
        Self::new("cell cycle network", "HuRI")
    }
}

/// Receives the nodes and edges of a filtered graph
pub trait GraphExporter {
    /// Publishes the graph
    ///
    /// # Errors
    ///
    /// [`GoError::ExportUnavailable`] if the target cannot be reached or written
    fn publish(
        &mut self,
        nodes: &[FilteredNode],
        edges: &[FilteredEdge],
        metadata: &ExportMetadata,
    ) -> GoResult<()>;
}

/// Writes a node table and an edge table as tab separated text
///
/// The node table has the columns `id`, `name`, `desc` and one column per
/// label with `true` or `false`. The edge table has the columns `source`,
/// `target`, `interaction` and `weight`. Both tables start with a comment
/// line that contains title and collection.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use go_interactome::export::{ExportMetadata, GraphExporter, TabularExporter};
/// use go_interactome::identity::Identifier;
/// use go_interactome::pipeline::{FilteredEdge, FilteredNode};
///
/// let labels = BTreeMap::from([("cell_cycle".to_string(), true)]);
/// let nodes = [
///     FilteredNode::new(Identifier::ensembl("ENSG1"), "CDK1", "cyclin dependent kinase 1", labels.clone()),
///     FilteredNode::new(Identifier::ensembl("ENSG2"), "CCNB1", "cyclin B1", labels),
/// ];
/// let edges = [FilteredEdge::new(Identifier::ensembl("ENSG1"), Identifier::ensembl("ENSG2"))];
///
/// let mut exporter = TabularExporter::new(Vec::new(), Vec::new());
/// exporter.publish(&nodes, &edges, &ExportMetadata::default()).unwrap();
/// let (_, edge_table) = exporter.into_inner();
///
/// let text = String::from_utf8(edge_table).unwrap();
/// assert_eq!(text.lines().last(), Some("ENSG1\tENSG2\tinteracts\t1.0"));
/// ```
#[derive(Debug)]
pub struct TabularExporter<W: Write> {
    nodes: W,
    edges: W,
}

impl<W: Write> TabularExporter<W> {
    /// Constructs an exporter that writes into `nodes` and `edges`
    pub fn new(nodes: W, edges: W) -> Self {
        Self { nodes, edges }
    }

    /// Returns the node and edge writers
    pub fn into_inner(self) -> (W, W) {
        (self.nodes, self.edges)
    }

    fn write_tables(
        &mut self,
        nodes: &[FilteredNode],
        edges: &[FilteredEdge],
        metadata: &ExportMetadata,
    ) -> std::io::Result<()> {
        let header = format!(
            "# {} ({})",
            field(metadata.title()),
            field(metadata.collection_name())
        );
        // all nodes of a run share the same labels
        let labels: Vec<&String> = nodes
            .first()
            .map(|node| node.labels().keys().collect())
            .unwrap_or_default();

        writeln!(self.nodes, "{header}")?;
        write!(self.nodes, "id\tname\tdesc")?;
        for label in &labels {
            write!(self.nodes, "\t{}", field(label))?;
        }
        writeln!(self.nodes)?;
        for node in nodes {
            write!(
                self.nodes,
                "{}\t{}\t{}",
                node.identifier(),
                field(node.name()),
                field(node.description())
            )?;
            for label in &labels {
                write!(self.nodes, "\t{}", node.is_member(label))?;
            }
            writeln!(self.nodes)?;
        }

        writeln!(self.edges, "{header}")?;
        writeln!(self.edges, "source\ttarget\tinteraction\tweight")?;
        for edge in edges {
            writeln!(
                self.edges,
                "{}\t{}\t{INTERACTION}\t{WEIGHT}",
                edge.a(),
                edge.b()
            )?;
        }

        self.nodes.flush()?;
        self.edges.flush()
    }
}

impl TabularExporter<BufWriter<File>> {
    /// Constructs an exporter that writes `nodes.tsv` and `edges.tsv` into `folder`
    ///
    /// # Errors
    ///
    /// [`GoError::ExportUnavailable`] if the files cannot be created
    pub fn to_folder<P: AsRef<Path>>(folder: P) -> GoResult<Self> {
        let create = |name: &str| {
            let path = folder.as_ref().join(name);
            File::create(&path)
                .map(BufWriter::new)
                .map_err(|err| GoError::ExportUnavailable(format!("{}: {err}", path.display())))
        };
        Ok(Self::new(create("nodes.tsv")?, create("edges.tsv")?))
    }
}

impl<W: Write> GraphExporter for TabularExporter<W> {
    fn publish(
        &mut self,
        nodes: &[FilteredNode],
        edges: &[FilteredEdge],
        metadata: &ExportMetadata,
    ) -> GoResult<()> {
        self.write_tables(nodes, edges, metadata)
            .map_err(|err| GoError::ExportUnavailable(err.to_string()))?;
        debug!(
            "Exported {} nodes and {} edges of {}",
            nodes.len(),
            edges.len(),
            metadata.title()
        );
        Ok(())
    }
}
