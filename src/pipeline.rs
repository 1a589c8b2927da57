//! Projection of the interactome onto GO-annotated genes
//!
//! The [`GraphFilterPipeline`] turns a list of [`CategoryLabel`]s into a
//! [`FilteredGraph`]: all interactions between genes that are annotated
//! with at least one term of any category, each gene flagged with the
//! categories it belongs to.
use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, info, warn};

use crate::annotations::{AnnotationIndex, EvidenceFilter};
use crate::closure::{ClosureEngine, Strictness};
use crate::export::{ExportMetadata, GraphExporter};
use crate::identity::{GeneRecord, Identifier, IdentityResolver, Namespace};
use crate::interactome::InteractionStore;
use crate::{Direction, GoError, GoResult, RelationKinds, TermId, TermSet, UNBOUNDED_DEPTH};

/// A named category of genes, defined by GO seed terms
///
/// # Examples
///
/// ```
/// use go_interactome::CategoryLabel;
///
/// let label = CategoryLabel::new("cell_cycle", ["GO:0007049"]);
/// assert_eq!(label.name(), "cell_cycle");
/// assert_eq!(label.seeds().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLabel {
    name: String,
    seeds: TermSet,
}

impl CategoryLabel {
    /// Constructs a new label
    pub fn new<I, T>(name: &str, seeds: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TermId>,
    {
        Self {
            name: name.to_string(),
            seeds: seeds.into_iter().collect(),
        }
    }

    /// The name of the label, used as column name in exports
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The seed terms of the label
    pub fn seeds(&self) -> &TermSet {
        &self.seeds
    }
}

/// Settings of a [`GraphFilterPipeline`] run
///
/// The default settings follow all hierarchy and regulation relations
/// from the seeds down to the leaf terms, accept every evidence code and
/// keep duplicate edges.
///
/// # Examples
///
/// ```
/// use go_interactome::PipelineConfig;
/// use go_interactome::annotations::EvidenceFilter;
///
/// let config = PipelineConfig::default()
///     .with_max_depth(3)
///     .with_evidence_filter(EvidenceFilter::experimental())
///     .with_deduplicate_edges(true);
///
/// assert_eq!(config.max_depth(), 3);
/// assert!(config.deduplicate_edges());
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    relation_kinds: RelationKinds,
    max_depth: usize,
    direction: Direction,
    evidence_filter: Option<EvidenceFilter>,
    namespace_priority: Vec<Namespace>,
    target_namespace: Namespace,
    deduplicate_edges: bool,
    strictness: Strictness,
    include_seeds: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            relation_kinds: RelationKinds::hierarchy_and_regulation(),
            max_depth: UNBOUNDED_DEPTH,
            direction: Direction::Descendants,
            evidence_filter: None,
            namespace_priority: Namespace::ALL.to_vec(),
            target_namespace: Namespace::Ensembl,
            deduplicate_edges: false,
            strictness: Strictness::Permissive,
            include_seeds: false,
        }
    }
}

impl PipelineConfig {
    /// Sets the relation kinds that are followed from the seeds
    #[must_use]
    pub fn with_relation_kinds(mut self, kinds: RelationKinds) -> Self {
        self.relation_kinds = kinds;
        self
    }

    /// Sets the maximum number of relation hops from the seeds
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the traversal direction
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Only use annotations with evidence codes in `filter`
    #[must_use]
    pub fn with_evidence_filter(mut self, filter: EvidenceFilter) -> Self {
        self.evidence_filter = Some(filter);
        self
    }

    /// Sets the order of namespaces to pick display names from
    ///
    /// Namespaces that are not listed come last.
    #[must_use]
    pub fn with_namespace_priority(mut self, priority: Vec<Namespace>) -> Self {
        self.namespace_priority = priority;
        self
    }

    /// Sets the namespace of the interaction data
    #[must_use]
    pub fn with_target_namespace(mut self, namespace: Namespace) -> Self {
        self.target_namespace = namespace;
        self
    }

    /// Collapse edges between the same two genes, regardless of orientation
    #[must_use]
    pub fn with_deduplicate_edges(mut self, dedup: bool) -> Self {
        self.deduplicate_edges = dedup;
        self
    }

    /// Sets how unknown seed terms are handled
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Also use the genes annotated to the seed terms themselves
    #[must_use]
    pub fn with_include_seeds(mut self, include: bool) -> Self {
        self.include_seeds = include;
        self
    }

    /// The relation kinds that are followed
    pub fn relation_kinds(&self) -> &RelationKinds {
        &self.relation_kinds
    }

    /// The maximum number of relation hops
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The traversal direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The evidence allow-list, `None` accepts all codes
    pub fn evidence_filter(&self) -> Option<&EvidenceFilter> {
        self.evidence_filter.as_ref()
    }

    /// The namespace priority for display names
    pub fn namespace_priority(&self) -> &[Namespace] {
        &self.namespace_priority
    }

    /// The namespace of the interaction data
    pub fn target_namespace(&self) -> Namespace {
        self.target_namespace
    }

    /// Whether duplicate edges are collapsed
    pub fn deduplicate_edges(&self) -> bool {
        self.deduplicate_edges
    }

    /// The handling of unknown seed terms
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Whether the seed terms are part of the term set
    pub fn include_seeds(&self) -> bool {
        self.include_seeds
    }

    fn priority_of(&self, namespace: Namespace) -> usize {
        self.namespace_priority
            .iter()
            .position(|ns| *ns == namespace)
            .unwrap_or(self.namespace_priority.len())
    }
}

/// A gene of the [`FilteredGraph`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredNode {
    identifier: Identifier,
    name: String,
    description: String,
    labels: BTreeMap<String, bool>,
}

impl FilteredNode {
    /// Constructs a new node
    pub fn new<S: Into<String>, T: Into<String>>(
        identifier: Identifier,
        name: S,
        description: T,
        labels: BTreeMap<String, bool>,
    ) -> Self {
        Self {
            identifier,
            name: name.into(),
            description: description.into(),
            labels,
        }
    }

    /// The gene identifier, in the namespace of the interaction data
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Display name, e.g. the gene symbol
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Membership flag of every label of the run
    pub fn labels(&self) -> &BTreeMap<String, bool> {
        &self.labels
    }

    /// Returns `true` if the node belongs to the label `name`
    pub fn is_member(&self, name: &str) -> bool {
        self.labels.get(name).copied().unwrap_or(false)
    }
}

/// An interaction of the [`FilteredGraph`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilteredEdge {
    a: Identifier,
    b: Identifier,
}

impl FilteredEdge {
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
}

/// Expanded terms and counts of a single label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelReport {
    name: String,
    unknown_seeds: Vec<TermId>,
    terms: TermSet,
    annotated_identifiers: usize,
    unmapped_identifiers: usize,
    candidate_genes: usize,
}

impl LabelReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Name of the label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seed terms missing from the ontology, they are skipped
    pub fn unknown_seeds(&self) -> &[TermId] {
        &self.unknown_seeds
    }

    /// The expanded terms that were used to look up annotations
    ///
    /// Contains the seeds only if [`PipelineConfig::include_seeds`] is set.
    pub fn terms(&self) -> &TermSet {
        &self.terms
    }

    /// Distinct annotated identifiers before mapping
    pub fn annotated_identifiers(&self) -> usize {
        self.annotated_identifiers
    }

    /// Identifiers without a mapping to the target namespace
    pub fn unmapped_identifiers(&self) -> usize {
        self.unmapped_identifiers
    }

    /// Distinct genes after mapping
    pub fn candidate_genes(&self) -> usize {
        self.candidate_genes
    }
}

/// Counts of a complete pipeline run
///
/// Everything that was skipped during the run is counted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    labels: Vec<LabelReport>,
    filter_set: usize,
    edges_found: usize,
    duplicate_edges: usize,
    foreign_edges: usize,
}

impl RunReport {
    /// One report per label, in input order
    pub fn labels(&self) -> &[LabelReport] {
        &self.labels
    }

    /// Returns the report of the label `name`
    pub fn label(&self, name: &str) -> Option<&LabelReport> {
        self.labels.iter().find(|l| l.name == name)
    }

    /// Size of the union of all candidate genes
    pub fn filter_set(&self) -> usize {
        self.filter_set
    }

    /// Edges returned by the interaction store
    pub fn edges_found(&self) -> usize {
        self.edges_found
    }

    /// Edges that were removed as duplicates
    pub fn duplicate_edges(&self) -> usize {
        self.duplicate_edges
    }

    /// Edges with an endpoint outside of the filter set
    pub fn foreign_edges(&self) -> usize {
        self.foreign_edges
    }

    /// Total number of unmapped identifiers over all labels
    pub fn unmapped_identifiers(&self) -> usize {
        self.labels.iter().map(|l| l.unmapped_identifiers).sum()
    }

    /// All unknown seed terms of all labels
    pub fn unknown_seeds(&self) -> BTreeSet<&TermId> {
        self.labels
            .iter()
            .flat_map(|l| l.unknown_seeds.iter())
            .collect()
    }
}

/// The result of a [`GraphFilterPipeline`] run
///
/// Nodes are sorted by identifier, edges keep the order of the
/// interaction store.
#[derive(Debug, Clone, Default)]
pub struct FilteredGraph {
    nodes: Vec<FilteredNode>,
    edges: Vec<FilteredEdge>,
    report: RunReport,
}

impl FilteredGraph {
    /// All nodes
    pub fn nodes(&self) -> &[FilteredNode] {
        &self.nodes
    }

    /// All edges
    pub fn edges(&self) -> &[FilteredEdge] {
        &self.edges
    }

    /// Counts of the run
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Returns the node of `identifier`
    pub fn node(&self, identifier: &Identifier) -> Option<&FilteredNode> {
        self.nodes
            .binary_search_by(|node| node.identifier.cmp(identifier))
            .ok()
            .map(|idx| &self.nodes[idx])
    }

    /// Hands the graph over to `exporter`
    ///
    /// The graph itself is not changed, so a failed export can be retried.
    ///
    /// # Errors
    ///
    /// [`GoError::ExportUnavailable`] if the exporter fails
    pub fn publish(
        &self,
        exporter: &mut dyn GraphExporter,
        metadata: &ExportMetadata,
    ) -> GoResult<()> {
        exporter.publish(&self.nodes, &self.edges, metadata)
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Filters the interactome down to genes of GO categories
///
/// ```mermaid
/// graph LR
///     S[seed terms] --> C[ClosureEngine]
///     C --> A[AnnotationIndex]
///     A --> R[IdentityResolver]
///     R --> I[InteractionStore]
///     I --> G[FilteredGraph]
/// ```
///
/// For every [`CategoryLabel`] the pipeline
/// 1. expands the seeds into a term set
/// 2. collects all identifiers annotated with any of the terms
/// 3. maps them to the namespace of the interaction data
///
/// The candidate genes of all labels form the filter set. Only edges with
/// both endpoints in the filter set are kept, and only genes with at least
/// one kept edge become nodes.
///
/// Unmapped identifiers and unknown seeds are skipped and counted in the
/// [`RunReport`]. Any error of a data source aborts the run.
///
/// # Examples
///
/// ```
/// use go_interactome::{CategoryLabel, ClosureEngine, GraphFilterPipeline, RelationKind, TermGraph};
/// use go_interactome::annotations::{Annotation, AnnotationTable};
/// use go_interactome::identity::{GeneRegistry, Identifier};
/// use go_interactome::interactome::Interactome;
/// use go_interactome::term::TermNamespace;
///
/// let mut graph = TermGraph::default();
/// graph.insert_term("GO:0007049", "cell cycle", TermNamespace::BiologicalProcess);
/// graph.insert_term("GO:0000278", "mitotic cell cycle", TermNamespace::BiologicalProcess);
/// graph.add_relation("GO:0000278", "GO:0007049", RelationKind::IsA).unwrap();
///
/// let mut annotations = AnnotationTable::default();
/// annotations.add(Annotation::new(Identifier::uniprot("P06493"), "GO:0000278", "IDA", "UniProtKB"));
/// annotations.add(Annotation::new(Identifier::uniprot("P24941"), "GO:0000278", "IDA", "UniProtKB"));
///
/// let mut registry = GeneRegistry::default();
/// registry.add_uniprot_mapping("P06493", &["ENSG00000170312"]);
/// registry.add_uniprot_mapping("P24941", &["ENSG00000123374"]);
/// registry.add_hgnc("CDK1", "cyclin dependent kinase 1", Some("ENSG00000170312"), &[]);
///
/// let mut interactome = Interactome::default();
/// interactome.add(Identifier::ensembl("ENSG00000170312"), Identifier::ensembl("ENSG00000123374"));
/// interactome.add(Identifier::ensembl("ENSG00000170312"), Identifier::ensembl("ENSG00000000001"));
///
/// let engine = ClosureEngine::new(&graph);
/// let pipeline = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome);
/// let result = pipeline
///     .run(&[CategoryLabel::new("cell_cycle", ["GO:0007049"])])
///     .unwrap();
///
/// assert_eq!(result.nodes().len(), 2);
/// assert_eq!(result.edges().len(), 1);
/// assert_eq!(result.nodes()[1].name(), "CDK1");
/// ```
pub struct GraphFilterPipeline<'a> {
    engine: &'a ClosureEngine<'a>,
    annotations: &'a dyn AnnotationIndex,
    resolver: &'a dyn IdentityResolver,
    interactions: &'a dyn InteractionStore,
    config: PipelineConfig,
}

impl<'a> GraphFilterPipeline<'a> {
    /// Constructs a pipeline with the default [`PipelineConfig`]
    pub fn new(
        engine: &'a ClosureEngine<'a>,
        annotations: &'a dyn AnnotationIndex,
        resolver: &'a dyn IdentityResolver,
        interactions: &'a dyn InteractionStore,
    ) -> Self {
        Self {
            engine,
            annotations,
            resolver,
            interactions,
            config: PipelineConfig::default(),
        }
    }

    /// Replaces the [`PipelineConfig`]
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// The active [`PipelineConfig`]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline for `labels`
    ///
    /// # Errors
    ///
    /// - [`GoError::InvalidInput`]: two labels have the same name
    /// - [`GoError::UnknownTerm`]: unknown seed term in [`Strictness::Strict`] mode
    /// - [`GoError::CollaboratorUnavailable`]: a data source failed
    pub fn run(&self, labels: &[CategoryLabel]) -> GoResult<FilteredGraph> {
        let mut names = HashSet::new();
        for label in labels {
            if !names.insert(label.name()) {
                return Err(GoError::InvalidInput(format!(
                    "duplicate label name {}",
                    label.name()
                )));
            }
        }

        let mut report = RunReport::default();
        let mut members: Vec<HashSet<Identifier>> = Vec::with_capacity(labels.len());
        for label in labels {
            let (genes, label_report) = self.candidates(label)?;
            report.labels.push(label_report);
            members.push(genes);
        }

        let filter_set: HashSet<Identifier> = members.iter().flatten().cloned().collect();
        report.filter_set = filter_set.len();
        debug!("Filter set contains {} genes", filter_set.len());

        let mut edges = if filter_set.is_empty() {
            Vec::new()
        } else {
            self.interactions.edges_within(&filter_set)?
        };
        report.edges_found = edges.len();

        edges.retain(|edge| filter_set.contains(edge.a()) && filter_set.contains(edge.b()));
        report.foreign_edges = report.edges_found - edges.len();
        if report.foreign_edges > 0 {
            warn!(
                "Interaction store returned {} edges outside of the filter set",
                report.foreign_edges
            );
        }

        if self.config.deduplicate_edges {
            let before = edges.len();
            let mut seen: HashSet<(Identifier, Identifier)> = HashSet::new();
            edges.retain(|edge| {
                let (a, b) = edge.unordered_key();
                seen.insert((a.clone(), b.clone()))
            });
            report.duplicate_edges = before - edges.len();
        }

        let endpoints: BTreeSet<&Identifier> =
            edges.iter().flat_map(|edge| [edge.a(), edge.b()]).collect();

        let mut nodes = Vec::with_capacity(endpoints.len());
        for identifier in endpoints {
            let (name, description) = self.display_name(identifier)?;
            let flags = labels
                .iter()
                .zip(&members)
                .map(|(label, genes)| (label.name().to_string(), genes.contains(identifier)))
                .collect();
            nodes.push(FilteredNode {
                identifier: identifier.clone(),
                name,
                description,
                labels: flags,
            });
        }

        let edges: Vec<FilteredEdge> = edges
            .into_iter()
            .map(|edge| FilteredEdge {
                a: edge.a().clone(),
                b: edge.b().clone(),
            })
            .collect();

        info!(
            "Filtered graph with {} nodes and {} edges ({} unmapped identifiers)",
            nodes.len(),
            edges.len(),
            report.unmapped_identifiers()
        );

        Ok(FilteredGraph {
            nodes,
            edges,
            report,
        })
    }

    /// Expands, annotates and maps a single label
    fn candidates(&self, label: &CategoryLabel) -> GoResult<(HashSet<Identifier>, LabelReport)> {
        let mut report = LabelReport::new(label.name());

        let expansion = self.engine.expand_with(
            label.seeds(),
            &self.config.relation_kinds,
            self.config.max_depth,
            self.config.direction,
            self.config.strictness,
        )?;
        report.unknown_seeds = expansion.unknown_seeds().to_vec();

        let mut terms = expansion.into_terms();
        if self.config.include_seeds {
            let graph = self.engine.graph();
            terms.extend(label.seeds().iter().filter(|id| graph.contains(id)));
        }

        let mut genes = HashSet::new();
        if terms.is_empty() {
            warn!("Label {} does not contain any terms", label.name());
            return Ok((genes, report));
        }

        let annotated = self
            .annotations
            .identifiers_for_terms(&terms, self.config.evidence_filter.as_ref())?;
        report.terms = terms;
        let identifiers: BTreeSet<&Identifier> = annotated.iter().map(|(id, _)| id).collect();
        report.annotated_identifiers = identifiers.len();

        for identifier in identifiers {
            match self
                .resolver
                .resolve(identifier, self.config.target_namespace)?
            {
                Some(gene) => {
                    genes.insert(gene);
                }
                None => report.unmapped_identifiers += 1,
            }
        }
        report.candidate_genes = genes.len();

        debug!(
            "Label {}: {} terms, {} identifiers, {} genes, {} unmapped",
            label.name(),
            report.terms.len(),
            report.annotated_identifiers,
            report.candidate_genes,
            report.unmapped_identifiers
        );
        Ok((genes, report))
    }

    /// Picks name and description from the highest priority record
    fn display_name(&self, identifier: &Identifier) -> GoResult<(String, String)> {
        let records = self.resolver.gene_records(identifier)?;
        let best = records.iter().min_by(|a: &&GeneRecord, b: &&GeneRecord| {
            (self.config.priority_of(a.source()), a.name(), a.description()).cmp(&(
                self.config.priority_of(b.source()),
                b.name(),
                b.description(),
            ))
        });
        Ok(best.map_or_else(
            || (identifier.value().to_string(), String::new()),
            |record| (record.name().to_string(), record.description().to_string()),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::{Annotation, AnnotationTable, EvidenceCode};
    use crate::identity::GeneRegistry;
    use crate::interactome::{InteractionEdge, Interactome};
    use crate::term::TermNamespace;
    use crate::{RelationKind, TermGraph};

    /// GO:C <- is_a - GO:B <- is_a - GO:A
    /// GO:C <- regulates - GO:R
    /// GO:M (separate root) <- part_of - GO:N
    fn graph() -> TermGraph {
        let mut graph = TermGraph::default();
        for id in ["GO:A", "GO:B", "GO:C", "GO:R", "GO:M", "GO:N"] {
            graph.insert_term(id, id, TermNamespace::BiologicalProcess);
        }
        graph.add_relation("GO:A", "GO:B", RelationKind::IsA).unwrap();
        graph.add_relation("GO:B", "GO:C", RelationKind::IsA).unwrap();
        graph.add_relation("GO:R", "GO:C", RelationKind::Regulates).unwrap();
        graph.add_relation("GO:N", "GO:M", RelationKind::PartOf).unwrap();
        graph
    }

    fn ens(id: &str) -> Identifier {
        Identifier::ensembl(id)
    }

    fn annotate(table: &mut AnnotationTable, id: Identifier, term: &str, code: &str) {
        table.add(Annotation::new(id, term, code, "test"));
    }

    #[test]
    fn inner_join_excludes_unannotated_partner() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, ens("ENSG1"), "GO:B", "IDA");
        let registry = GeneRegistry::default();
        let mut interactome = Interactome::default();
        interactome.add(ens("ENSG1"), ens("ENSG2"));

        let engine = ClosureEngine::new(&graph);
        let pipeline = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .with_config(
                PipelineConfig::default()
                    .with_relation_kinds(RelationKinds::is_a())
                    .with_max_depth(2),
            );
        let res = pipeline.run(&[CategoryLabel::new("c", ["GO:C"])]).unwrap();

        assert!(res.nodes().is_empty());
        assert!(res.edges().is_empty());
        assert_eq!(res.report().filter_set(), 1);
        assert_eq!(res.report().labels()[0].candidate_genes(), 1);
    }

    #[test]
    fn two_labels_flag_the_same_node() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, ens("ENSG1"), "GO:A", "IDA");
        annotate(&mut annotations, ens("ENSG1"), "GO:N", "IEA");
        annotate(&mut annotations, ens("ENSG2"), "GO:N", "IDA");
        annotate(&mut annotations, ens("ENSG3"), "GO:B", "IDA");
        let registry = GeneRegistry::default();
        let mut interactome = Interactome::default();
        interactome.add(ens("ENSG1"), ens("ENSG2"));
        interactome.add(ens("ENSG1"), ens("ENSG3"));

        let engine = ClosureEngine::new(&graph);
        let pipeline = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome);
        let res = pipeline
            .run(&[
                CategoryLabel::new("cycle", ["GO:C"]),
                CategoryLabel::new("other", ["GO:M"]),
            ])
            .unwrap();

        assert_eq!(res.nodes().len(), 3);
        assert_eq!(res.edges().len(), 2);

        let node = res.node(&ens("ENSG1")).unwrap();
        assert!(node.is_member("cycle"));
        assert!(node.is_member("other"));

        let node = res.node(&ens("ENSG2")).unwrap();
        assert!(!node.is_member("cycle"));
        assert!(node.is_member("other"));

        let node = res.node(&ens("ENSG3")).unwrap();
        assert!(node.is_member("cycle"));
        assert!(!node.is_member("other"));
        assert_eq!(node.labels().len(), 2);
    }

    #[test]
    fn no_dangling_endpoints() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        for (gene, term) in [
            ("ENSG1", "GO:A"),
            ("ENSG2", "GO:B"),
            ("ENSG3", "GO:R"),
            ("ENSG4", "GO:N"),
        ] {
            annotate(&mut annotations, ens(gene), term, "IDA");
        }
        let registry = GeneRegistry::default();
        let mut interactome = Interactome::default();
        for (a, b) in [
            ("ENSG1", "ENSG2"),
            ("ENSG2", "ENSG3"),
            ("ENSG3", "ENSG4"),
            ("ENSG4", "ENSG5"),
            ("ENSG3", "ENSG3"),
        ] {
            interactome.add(ens(a), ens(b));
        }

        let engine = ClosureEngine::new(&graph);
        let pipeline = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome);
        let res = pipeline.run(&[CategoryLabel::new("cycle", ["GO:C"])]).unwrap();

        let nodes: HashSet<&Identifier> = res.nodes().iter().map(FilteredNode::identifier).collect();
        for edge in res.edges() {
            assert!(nodes.contains(edge.a()));
            assert!(nodes.contains(edge.b()));
        }
        // ENSG1, ENSG2 via is_a and ENSG3 via regulates
        assert_eq!(res.edges().len(), 3);
        assert_eq!(nodes.len(), 3);
        assert!(res.node(&ens("ENSG4")).is_none());
    }

    #[test]
    fn runs_are_deterministic() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        let mut registry = GeneRegistry::default();
        let mut interactome = Interactome::default();
        for i in 0..40 {
            let term = ["GO:A", "GO:B", "GO:R", "GO:N"][i % 4];
            let accession = format!("P{i:05}");
            let gene = format!("ENSG{:03}", i / 2);
            let partner = format!("ENSG{:03}", (i * 7) % 20);
            annotate(&mut annotations, Identifier::uniprot(accession.as_str()), term, "IDA");
            registry.add_uniprot_mapping(&accession, &[gene.as_str()]);
            registry.add_hgnc(&format!("GENE{i}"), "some gene", Some(gene.as_str()), &[]);
            interactome.add(ens(&gene), ens(&partner));
        }
        let labels = [
            CategoryLabel::new("cycle", ["GO:C"]),
            CategoryLabel::new("other", ["GO:M"]),
        ];

        let engine = ClosureEngine::new(&graph);
        let first = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .run(&labels)
            .unwrap();
        let second = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .run(&labels)
            .unwrap();

        assert!(!first.nodes().is_empty());
        assert_eq!(first.nodes(), second.nodes());
        assert_eq!(first.edges(), second.edges());
        assert_eq!(first.report(), second.report());
    }

    #[test]
    fn unmapped_identifiers_are_counted() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, Identifier::uniprot("P1"), "GO:A", "IDA");
        annotate(&mut annotations, Identifier::uniprot("P2"), "GO:A", "IDA");
        annotate(&mut annotations, Identifier::uniprot("P2"), "GO:B", "IEA");
        annotate(&mut annotations, Identifier::uniprot("P3"), "GO:B", "IDA");
        let mut registry = GeneRegistry::default();
        registry.add_uniprot_mapping("P1", &["ENSG1"]);
        registry.add_uniprot_mapping("P3", &["ENSG3"]);
        let mut interactome = Interactome::default();
        interactome.add(ens("ENSG1"), ens("ENSG3"));

        let engine = ClosureEngine::new(&graph);
        let res = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .run(&[CategoryLabel::new("cycle", ["GO:C", "GO:unknown"])])
            .unwrap();

        let label = &res.report().labels()[0];
        assert_eq!(label.annotated_identifiers(), 3);
        assert_eq!(label.unmapped_identifiers(), 1);
        assert_eq!(label.candidate_genes(), 2);
        assert_eq!(res.report().unmapped_identifiers(), 1);
        assert_eq!(res.report().unknown_seeds().len(), 1);
        assert_eq!(res.edges().len(), 1);
    }

    #[test]
    fn strict_mode_fails_on_unknown_seed() {
        let graph = graph();
        let annotations = AnnotationTable::default();
        let registry = GeneRegistry::default();
        let interactome = Interactome::default();
        let engine = ClosureEngine::new(&graph);
        let res = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .with_config(PipelineConfig::default().with_strictness(Strictness::Strict))
            .run(&[CategoryLabel::new("cycle", ["GO:C", "GO:unknown"])]);
        assert!(matches!(res, Err(GoError::UnknownTerm(_))));
    }

    #[test]
    fn evidence_filter() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, ens("ENSG1"), "GO:A", "IDA");
        annotate(&mut annotations, ens("ENSG2"), "GO:B", "IEA");
        annotate(&mut annotations, ens("ENSG3"), "GO:B", "IPI");
        let registry = GeneRegistry::default();
        let mut interactome = Interactome::default();
        interactome.add(ens("ENSG1"), ens("ENSG2"));
        interactome.add(ens("ENSG1"), ens("ENSG3"));
        let engine = ClosureEngine::new(&graph);
        let labels = [CategoryLabel::new("cycle", ["GO:C"])];

        let all = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .run(&labels)
            .unwrap();
        assert_eq!(all.edges().len(), 2);

        let curated = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .with_config(PipelineConfig::default().with_evidence_filter(EvidenceFilter::experimental()))
            .run(&labels)
            .unwrap();
        assert_eq!(curated.edges().len(), 1);
        assert!(curated.node(&ens("ENSG2")).is_none());
    }

    #[test]
    fn duplicate_edges() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, ens("ENSG1"), "GO:A", "IDA");
        annotate(&mut annotations, ens("ENSG2"), "GO:B", "IDA");
        let registry = GeneRegistry::default();
        let mut interactome = Interactome::default();
        interactome.add(ens("ENSG1"), ens("ENSG2"));
        interactome.add(ens("ENSG2"), ens("ENSG1"));
        interactome.add(ens("ENSG1"), ens("ENSG2"));
        let engine = ClosureEngine::new(&graph);
        let labels = [CategoryLabel::new("cycle", ["GO:C"])];

        let kept = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .run(&labels)
            .unwrap();
        assert_eq!(kept.edges().len(), 3);
        assert_eq!(kept.report().duplicate_edges(), 0);

        let dedup = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .with_config(PipelineConfig::default().with_deduplicate_edges(true))
            .run(&labels)
            .unwrap();
        assert_eq!(dedup.edges().len(), 1);
        assert_eq!(dedup.report().duplicate_edges(), 2);
        assert_eq!(dedup.edges()[0].a(), &ens("ENSG1"));
    }

    #[test]
    fn seeds_are_optional() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, ens("ENSG1"), "GO:C", "IDA");
        annotate(&mut annotations, ens("ENSG2"), "GO:A", "IDA");
        let registry = GeneRegistry::default();
        let mut interactome = Interactome::default();
        interactome.add(ens("ENSG1"), ens("ENSG2"));
        let engine = ClosureEngine::new(&graph);
        let labels = [CategoryLabel::new("cycle", ["GO:C"])];

        let without = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .run(&labels)
            .unwrap();
        assert!(without.edges().is_empty());

        let with = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .with_config(PipelineConfig::default().with_include_seeds(true))
            .run(&labels)
            .unwrap();
        assert_eq!(with.edges().len(), 1);
        assert_eq!(with.report().labels()[0].terms().len(), 4);
    }

    #[test]
    fn empty_label_is_not_fatal() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, ens("ENSG1"), "GO:N", "IDA");
        annotate(&mut annotations, ens("ENSG2"), "GO:N", "IDA");
        let registry = GeneRegistry::default();
        let mut interactome = Interactome::default();
        interactome.add(ens("ENSG1"), ens("ENSG2"));
        let engine = ClosureEngine::new(&graph);

        let res = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .run(&[
                // GO:A is a leaf term
                CategoryLabel::new("leaf", ["GO:A"]),
                CategoryLabel::new("other", ["GO:M"]),
            ])
            .unwrap();
        assert_eq!(res.report().labels()[0].terms().len(), 0);
        assert_eq!(res.edges().len(), 1);
        assert!(!res.nodes()[0].is_member("leaf"));
    }

    #[test]
    fn expanded_terms_are_reported() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, ens("ENSG1"), "GO:R", "IDA");
        let registry = GeneRegistry::default();
        let interactome = Interactome::default();
        let engine = ClosureEngine::new(&graph);

        let res = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .run(&[
                CategoryLabel::new("cycle", ["GO:C"]),
                CategoryLabel::new("other", ["GO:M"]),
            ])
            .unwrap();

        let cycle = res.report().label("cycle").unwrap();
        let terms: Vec<&str> = cycle.terms().iter().map(TermId::as_str).collect();
        assert_eq!(terms, vec!["GO:A", "GO:B", "GO:R"]);
        assert_eq!(cycle.candidate_genes(), 1);

        let other = res.report().label("other").unwrap();
        let terms: Vec<&str> = other.terms().iter().map(TermId::as_str).collect();
        assert_eq!(terms, vec!["GO:N"]);
        assert!(res.report().label("missing").is_none());
    }

    #[test]
    fn duplicate_label_names() {
        let graph = graph();
        let annotations = AnnotationTable::default();
        let registry = GeneRegistry::default();
        let interactome = Interactome::default();
        let engine = ClosureEngine::new(&graph);
        let res = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome).run(&[
            CategoryLabel::new("cycle", ["GO:C"]),
            CategoryLabel::new("cycle", ["GO:M"]),
        ]);
        assert!(matches!(res, Err(GoError::InvalidInput(_))));
    }

    #[test]
    fn display_name_priority() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, Identifier::uniprot("P1"), "GO:A", "IDA");
        annotate(&mut annotations, ens("ENSG2"), "GO:A", "IDA");
        let mut registry = GeneRegistry::default();
        registry.add_uniprot_mapping("P1", &["ENSG1"]);
        registry.add_hgnc("CDK1", "cyclin dependent kinase 1", Some("ENSG1"), &["P1"]);
        registry.add_record(
            Identifier::uniprot("P1"),
            GeneRecord::new(Namespace::UniProtKb, "CDK1_HUMAN", "Cyclin-dependent kinase 1"),
        );
        let mut interactome = Interactome::default();
        interactome.add(ens("ENSG1"), ens("ENSG2"));
        let engine = ClosureEngine::new(&graph);
        let labels = [CategoryLabel::new("cycle", ["GO:C"])];

        let default = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .run(&labels)
            .unwrap();
        let node = default.node(&ens("ENSG1")).unwrap();
        assert_eq!(node.name(), "CDK1_HUMAN");
        assert_eq!(node.description(), "Cyclin-dependent kinase 1");
        // no record at all
        let node = default.node(&ens("ENSG2")).unwrap();
        assert_eq!(node.name(), "ENSG2");
        assert_eq!(node.description(), "");

        let hgnc_first = GraphFilterPipeline::new(&engine, &annotations, &registry, &interactome)
            .with_config(PipelineConfig::default().with_namespace_priority(vec![Namespace::HgncSymbol]))
            .run(&labels)
            .unwrap();
        let node = hgnc_first.node(&ens("ENSG1")).unwrap();
        assert_eq!(node.name(), "CDK1");
        assert_eq!(node.description(), "cyclin dependent kinase 1");
    }

    struct Unreachable;

    impl AnnotationIndex for Unreachable {
        fn identifiers_for_terms(
            &self,
            _terms: &TermSet,
            _evidence: Option<&EvidenceFilter>,
        ) -> GoResult<HashSet<(Identifier, EvidenceCode)>> {
            Err(GoError::CollaboratorUnavailable("annotation db is down".to_string()))
        }
    }

    impl InteractionStore for Unreachable {
        fn edges_within(&self, _nodes: &HashSet<Identifier>) -> GoResult<Vec<InteractionEdge>> {
            Err(GoError::CollaboratorUnavailable("interaction db is down".to_string()))
        }
    }

    #[test]
    fn collaborator_failures_abort_the_run() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, ens("ENSG1"), "GO:A", "IDA");
        let registry = GeneRegistry::default();
        let interactome = Interactome::default();
        let engine = ClosureEngine::new(&graph);
        let labels = [CategoryLabel::new("cycle", ["GO:C"])];

        let res = GraphFilterPipeline::new(&engine, &Unreachable, &registry, &interactome).run(&labels);
        assert!(matches!(res, Err(GoError::CollaboratorUnavailable(_))));

        let res = GraphFilterPipeline::new(&engine, &annotations, &registry, &Unreachable).run(&labels);
        assert!(matches!(res, Err(GoError::CollaboratorUnavailable(_))));
    }

    /// Returns every stored edge, ignoring the filter
    struct Leaky(Interactome);

    impl InteractionStore for Leaky {
        fn edges_within(&self, _nodes: &HashSet<Identifier>) -> GoResult<Vec<InteractionEdge>> {
            Ok(self.0.iter().cloned().collect())
        }
    }

    #[test]
    fn foreign_edges_are_dropped() {
        let graph = graph();
        let mut annotations = AnnotationTable::default();
        annotate(&mut annotations, ens("ENSG1"), "GO:A", "IDA");
        annotate(&mut annotations, ens("ENSG2"), "GO:A", "IDA");
        let registry = GeneRegistry::default();
        let mut interactome = Interactome::default();
        interactome.add(ens("ENSG1"), ens("ENSG2"));
        interactome.add(ens("ENSG1"), ens("ENSG9"));
        let store = Leaky(interactome);
        let engine = ClosureEngine::new(&graph);

        let res = GraphFilterPipeline::new(&engine, &annotations, &registry, &store)
            .run(&[CategoryLabel::new("cycle", ["GO:C"])])
            .unwrap();
        assert_eq!(res.edges().len(), 1);
        assert_eq!(res.report().foreign_edges(), 1);
        assert_eq!(res.nodes().len(), 2);
    }
}
