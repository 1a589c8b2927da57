//! Gene and protein identifiers and the mapping between them
//!
//! Genes are referenced by different identifier systems depending on the
//! data source. Interactions use Ensembl gene IDs, GO annotations mostly
//! use UniProtKB accessions and humans prefer HGNC symbols.
//!
//! Identifiers of different [`Namespace`]s never compare equal, even if
//! their string values are the same. The only way to move between
//! namespaces is an [`IdentityResolver`].
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use tracing::trace;

use crate::GoResult;

/// An identifier system for genes or gene products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// Ensembl gene ID, e.g. `ENSG00000170312`
    Ensembl,
    /// UniProtKB accession, e.g. `P06493`
    UniProtKb,
    /// HGNC approved gene symbol, e.g. `CDK1`
    HgncSymbol,
}

impl Namespace {
    /// All namespaces, in the default display-name priority
    pub const ALL: [Namespace; 3] = [
        Namespace::Ensembl,
        Namespace::UniProtKb,
        Namespace::HgncSymbol,
    ];
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Namespace::Ensembl => "Ensembl",
            Namespace::UniProtKb => "UniProtKB",
            Namespace::HgncSymbol => "HGNC symbol",
        };
        f.write_str(name)
    }
}

/// A gene or gene product identifier, tagged with its [`Namespace`]
///
/// # Examples
///
/// ```
/// use go_interactome::identity::{Identifier, Namespace};
///
/// let a = Identifier::ensembl("ENSG00000170312");
/// let b = Identifier::hgnc_symbol("ENSG00000170312");
///
/// assert_eq!(a.namespace(), Namespace::Ensembl);
/// assert_eq!(a.value(), b.value());
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// Ensembl gene ID
    Ensembl(String),
    /// UniProtKB accession
    UniProtKb(String),
    /// HGNC symbol
    HgncSymbol(String),
}

impl Identifier {
    /// Constructs an identifier in `namespace`
    pub fn new<S: Into<String>>(namespace: Namespace, value: S) -> Self {
        match namespace {
            Namespace::Ensembl => Identifier::Ensembl(value.into()),
            Namespace::UniProtKb => Identifier::UniProtKb(value.into()),
            Namespace::HgncSymbol => Identifier::HgncSymbol(value.into()),
        }
    }

    /// Constructs an Ensembl gene identifier
    pub fn ensembl<S: Into<String>>(value: S) -> Self {
        Identifier::Ensembl(value.into())
    }

    /// Constructs a UniProtKB identifier
    pub fn uniprot<S: Into<String>>(value: S) -> Self {
        Identifier::UniProtKb(value.into())
    }

    /// Constructs an HGNC symbol identifier
    pub fn hgnc_symbol<S: Into<String>>(value: S) -> Self {
        Identifier::HgncSymbol(value.into())
    }

    /// The [`Namespace`] of the identifier
    pub fn namespace(&self) -> Namespace {
        match self {
            Identifier::Ensembl(_) => Namespace::Ensembl,
            Identifier::UniProtKb(_) => Namespace::UniProtKb,
            Identifier::HgncSymbol(_) => Namespace::HgncSymbol,
        }
    }

    /// The raw value, without namespace
    pub fn value(&self) -> &str {
        match self {
            Identifier::Ensembl(value)
            | Identifier::UniProtKb(value)
            | Identifier::HgncSymbol(value) => value,
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

/// Descriptive data of a gene, as provided by one source table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneRecord {
    source: Namespace,
    name: String,
    description: String,
}

impl GeneRecord {
    /// Constructs a new record
    pub fn new<S: Into<String>, T: Into<String>>(
        source: Namespace,
        name: S,
        description: T,
    ) -> Self {
        Self {
            source,
            name: name.into(),
            description: description.into(),
        }
    }

    /// The namespace of the table that provided the record
    pub fn source(&self) -> Namespace {
        self.source
    }

    /// Display name, e.g. a gene symbol
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description, e.g. the full gene name
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Maps identifiers between [`Namespace`]s
///
/// Implementors are free to load the mapping lazily, e.g. from a database.
/// Failures to reach the data should be reported as
/// [`crate::GoError::CollaboratorUnavailable`].
pub trait IdentityResolver {
    /// Returns the identifier in `target` that corresponds to `identifier`
    ///
    /// Returns `Ok(None)` if no mapping exists.
    ///
    /// # Errors
    ///
    /// [`crate::GoError::CollaboratorUnavailable`] if the mapping source fails
    fn resolve(&self, identifier: &Identifier, target: Namespace) -> GoResult<Option<Identifier>>;

    /// Returns all descriptive records known for `identifier`
    ///
    /// # Errors
    ///
    /// [`crate::GoError::CollaboratorUnavailable`] if the mapping source fails
    fn gene_records(&self, identifier: &Identifier) -> GoResult<Vec<GeneRecord>>;
}

type LinkTable = HashMap<String, BTreeSet<String>>;

/// In-memory [`IdentityResolver`]
///
/// The registry stores bidirectional links between identifiers of
/// different namespaces and descriptive [`GeneRecord`]s.
///
/// If several identifiers match, [`IdentityResolver::resolve`] returns the
/// lexicographically smallest one, so the result never depends on
/// insertion order. When no direct link exists, the registry tries a
/// single intermediate namespace.
///
/// # Examples
///
/// ```
/// use go_interactome::identity::{GeneRegistry, Identifier, IdentityResolver, Namespace};
///
/// let mut registry = GeneRegistry::default();
/// registry.add_uniprot_mapping("P06493", &["ENSG00000170312"]);
/// registry.add_hgnc("CDK1", "cyclin dependent kinase 1", Some("ENSG00000170312"), &["P06493"]);
///
/// let ensembl = registry
///     .resolve(&Identifier::uniprot("P06493"), Namespace::Ensembl)
///     .unwrap();
/// assert_eq!(ensembl, Some(Identifier::ensembl("ENSG00000170312")));
///
/// let records = registry.gene_records(&Identifier::ensembl("ENSG00000170312")).unwrap();
/// assert_eq!(records[0].name(), "CDK1");
/// ```
#[derive(Debug, Default)]
pub struct GeneRegistry {
    links: HashMap<(Namespace, Namespace), LinkTable>,
    records: HashMap<Identifier, BTreeSet<GeneRecord>>,
}

impl GeneRegistry {
    /// Links two identifiers in both directions
    ///
    /// Links within the same namespace are ignored.
    pub fn add_link(&mut self, a: &Identifier, b: &Identifier) {
        if a.namespace() == b.namespace() {
            trace!("Ignoring link within {}: {} - {}", a.namespace(), a, b);
            return;
        }
        self.links
            .entry((a.namespace(), b.namespace()))
            .or_default()
            .entry(a.value().to_string())
            .or_default()
            .insert(b.value().to_string());
        self.links
            .entry((b.namespace(), a.namespace()))
            .or_default()
            .entry(b.value().to_string())
            .or_default()
            .insert(a.value().to_string());
    }

    /// Adds a descriptive record for `identifier`
    pub fn add_record(&mut self, identifier: Identifier, record: GeneRecord) {
        self.records.entry(identifier).or_default().insert(record);
    }

    /// Links a UniProtKB accession to its Ensembl gene IDs
    pub fn add_uniprot_mapping(&mut self, accession: &str, ensembl_ids: &[&str]) {
        let uniprot = Identifier::uniprot(accession);
        for ensembl in ensembl_ids {
            self.add_link(&uniprot, &Identifier::ensembl(*ensembl));
        }
    }

    /// Adds an HGNC gene with its links and its display record
    ///
    /// The symbol becomes the display name and `name` the description.
    pub fn add_hgnc(
        &mut self,
        symbol: &str,
        name: &str,
        ensembl_id: Option<&str>,
        uniprot_ids: &[&str],
    ) {
        let hgnc = Identifier::hgnc_symbol(symbol);
        if let Some(ensembl) = ensembl_id {
            self.add_link(&hgnc, &Identifier::ensembl(ensembl));
        }
        for accession in uniprot_ids {
            self.add_link(&hgnc, &Identifier::uniprot(*accession));
        }
        self.add_record(hgnc, GeneRecord::new(Namespace::HgncSymbol, symbol, name));
    }

    /// Returns the number of identifiers with at least one link
    pub fn len(&self) -> usize {
        self.links.values().map(HashMap::len).sum()
    }

    /// Returns `true` if the registry has no links
    pub fn is_empty(&self) -> bool {
        self.links.values().all(HashMap::is_empty)
    }

    fn linked(&self, value: &str, from: Namespace, to: Namespace) -> Option<&BTreeSet<String>> {
        self.links.get(&(from, to)).and_then(|table| table.get(value))
    }

    /// All identifiers that are directly linked to `identifier`
    fn neighbours<'a>(&'a self, identifier: &'a Identifier) -> impl Iterator<Item = Identifier> + 'a {
        Namespace::ALL
            .into_iter()
            .filter(move |ns| *ns != identifier.namespace())
            .filter_map(move |ns| {
                self.linked(identifier.value(), identifier.namespace(), ns)
                    .map(move |values| values.iter().map(move |v| Identifier::new(ns, v.as_str())))
            })
            .flatten()
    }
}

impl IdentityResolver for GeneRegistry {
    fn resolve(&self, identifier: &Identifier, target: Namespace) -> GoResult<Option<Identifier>> {
        let source = identifier.namespace();
        if source == target {
            return Ok(Some(identifier.clone()));
        }

        if let Some(direct) = self.linked(identifier.value(), source, target) {
            if let Some(value) = direct.first() {
                return Ok(Some(Identifier::new(target, value.as_str())));
            }
        }

        // one hop through the remaining namespace
        let best = Namespace::ALL
            .into_iter()
            .filter(|via| *via != source && *via != target)
            .filter_map(|via| self.linked(identifier.value(), source, via).map(|ids| (via, ids)))
            .flat_map(|(via, ids)| {
                ids.iter()
                    .filter_map(move |id| self.linked(id, via, target))
                    .filter_map(BTreeSet::first)
            })
            .min();

        Ok(best.map(|value| Identifier::new(target, value.as_str())))
    }

    fn gene_records(&self, identifier: &Identifier) -> GoResult<Vec<GeneRecord>> {
        let mut records: BTreeSet<GeneRecord> = BTreeSet::new();
        if let Some(own) = self.records.get(identifier) {
            records.extend(own.iter().cloned());
        }
        for linked in self.neighbours(identifier) {
            if let Some(other) = self.records.get(&linked) {
                records.extend(other.iter().cloned());
            }
        }
        Ok(records.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn registry() -> GeneRegistry {
        let mut registry = GeneRegistry::default();
        registry.add_uniprot_mapping("P06493", &["ENSG00000170312"]);
        registry.add_uniprot_mapping("Q9NQ00", &["ENSG00000002", "ENSG00000001"]);
        registry.add_hgnc(
            "CDK1",
            "cyclin dependent kinase 1",
            Some("ENSG00000170312"),
            &["P06493"],
        );
        registry.add_hgnc("ORPHAN", "symbol without ensembl", None, &["Q9NQ00"]);
        registry
    }

    #[test]
    fn same_namespace_is_identity() {
        let registry = registry();
        let id = Identifier::ensembl("ENSG_not_in_registry");
        assert_eq!(
            registry.resolve(&id, Namespace::Ensembl).unwrap(),
            Some(id.clone())
        );
    }

    #[test]
    fn direct_links() {
        let registry = registry();
        assert_eq!(
            registry
                .resolve(&Identifier::hgnc_symbol("CDK1"), Namespace::Ensembl)
                .unwrap(),
            Some(Identifier::ensembl("ENSG00000170312"))
        );
        assert_eq!(
            registry
                .resolve(&Identifier::ensembl("ENSG00000170312"), Namespace::UniProtKb)
                .unwrap(),
            Some(Identifier::uniprot("P06493"))
        );
    }

    #[test]
    fn smallest_match_wins() {
        let registry = registry();
        assert_eq!(
            registry
                .resolve(&Identifier::uniprot("Q9NQ00"), Namespace::Ensembl)
                .unwrap(),
            Some(Identifier::ensembl("ENSG00000001"))
        );
    }

    #[test]
    fn resolve_through_intermediate() {
        let registry = registry();
        // ORPHAN has no Ensembl ID in HGNC, only via its UniProt accession
        assert_eq!(
            registry
                .resolve(&Identifier::hgnc_symbol("ORPHAN"), Namespace::Ensembl)
                .unwrap(),
            Some(Identifier::ensembl("ENSG00000001"))
        );
    }

    #[test]
    fn unmapped() {
        let registry = registry();
        assert!(registry
            .resolve(&Identifier::uniprot("P99999"), Namespace::Ensembl)
            .unwrap()
            .is_none());
        // string equality across namespaces is not a mapping
        assert!(registry
            .resolve(&Identifier::hgnc_symbol("P06493"), Namespace::UniProtKb)
            .unwrap()
            .is_none());
    }

    #[test]
    fn records_of_linked_identifiers() {
        let mut registry = registry();
        registry.add_record(
            Identifier::uniprot("P06493"),
            GeneRecord::new(Namespace::UniProtKb, "CDK1_HUMAN", "Cyclin-dependent kinase 1"),
        );
        let records = registry
            .gene_records(&Identifier::ensembl("ENSG00000170312"))
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .any(|r| r.source() == Namespace::HgncSymbol && r.name() == "CDK1"));

        assert!(registry
            .gene_records(&Identifier::ensembl("ENSG_unknown"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn ignores_links_within_namespace() {
        let mut registry = GeneRegistry::default();
        assert!(registry.is_empty());
        registry.add_link(&Identifier::ensembl("A"), &Identifier::ensembl("B"));
        assert!(registry.is_empty());
        registry.add_link(&Identifier::ensembl("A"), &Identifier::uniprot("B"));
        assert_eq!(registry.len(), 2);
    }
}
