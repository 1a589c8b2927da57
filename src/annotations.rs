//! Gene Ontology annotations of genes and gene products
//!
//! An [`Annotation`] connects an [`Identifier`] to a GO term, together with
//! the evidence that supports it. The [`AnnotationIndex`] trait is used by
//! the pipeline to find all identifiers annotated with a set of terms.
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Display;

use crate::identity::Identifier;
use crate::{GoResult, TermId, TermSet};

/// Evidence codes of manually curated, experimental annotations
const EXPERIMENTAL_CODES: [&str; 11] = [
    "EXP", "IDA", "IPI", "IMP", "IGI", "IEP", "HTP", "HDA", "HMP", "HGI", "HEP",
];

/// A GO evidence code, e.g. `IDA` or `IEA`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EvidenceCode {
    inner: String,
}

impl EvidenceCode {
    /// The evidence code as `str`
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns `true` for experimental evidence codes
    ///
    /// This includes the high-throughput experimental codes.
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::annotations::EvidenceCode;
    ///
    /// assert!(EvidenceCode::from("IDA").is_experimental());
    /// assert!(!EvidenceCode::from("IEA").is_experimental());
    /// ```
    pub fn is_experimental(&self) -> bool {
        EXPERIMENTAL_CODES.contains(&self.as_str())
    }
}

impl From<&str> for EvidenceCode {
    fn from(value: &str) -> Self {
        Self {
            inner: value.to_string(),
        }
    }
}

impl From<String> for EvidenceCode {
    fn from(inner: String) -> Self {
        Self { inner }
    }
}

impl Display for EvidenceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

/// An allow-list of [`EvidenceCode`]s
///
/// Annotations with codes that are not in the list are ignored.
///
/// # Examples
///
/// ```
/// use go_interactome::annotations::{EvidenceCode, EvidenceFilter};
///
/// let filter: EvidenceFilter = ["IDA", "IPI"].into_iter().collect();
/// assert!(filter.allows(&EvidenceCode::from("IPI")));
/// assert!(!filter.allows(&EvidenceCode::from("IEA")));
///
/// assert_eq!(EvidenceFilter::experimental().len(), 11);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceFilter {
    codes: BTreeSet<EvidenceCode>,
}

impl EvidenceFilter {
    /// Constructs an empty filter that does not allow any code
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows only experimental evidence codes
    pub fn experimental() -> Self {
        EXPERIMENTAL_CODES.into_iter().collect()
    }

    /// Adds `code` to the allow-list
    pub fn insert<C: Into<EvidenceCode>>(&mut self, code: C) -> bool {
        self.codes.insert(code.into())
    }

    /// Returns `true` if `code` is allowed
    pub fn allows(&self, code: &EvidenceCode) -> bool {
        self.codes.contains(code)
    }

    /// Returns the number of allowed codes
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if no code is allowed
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<C: Into<EvidenceCode>> FromIterator<C> for EvidenceFilter {
    fn from_iter<T: IntoIterator<Item = C>>(iter: T) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single GO annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    identifier: Identifier,
    term_id: TermId,
    evidence_code: EvidenceCode,
    source_db: String,
}

impl Annotation {
    /// Constructs a new annotation
    pub fn new<T: Into<TermId>, E: Into<EvidenceCode>>(
        identifier: Identifier,
        term_id: T,
        evidence_code: E,
        source_db: &str,
    ) -> Self {
        Self {
            identifier,
            term_id: term_id.into(),
            evidence_code: evidence_code.into(),
            source_db: source_db.to_string(),
        }
    }

    /// The annotated gene or gene product
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The GO term
    pub fn term_id(&self) -> &TermId {
        &self.term_id
    }

    /// The evidence code
    pub fn evidence_code(&self) -> &EvidenceCode {
        &self.evidence_code
    }

    /// The database that contributed the annotation, e.g. `UniProtKB`
    pub fn source_db(&self) -> &str {
        &self.source_db
    }
}

/// Looks up annotated identifiers by GO term
pub trait AnnotationIndex {
    /// Returns all identifiers annotated to any term in `terms`
    ///
    /// Every identifier is returned once per distinct evidence code. If
    /// `evidence` is given, only annotations with an allowed code are used,
    /// otherwise all evidence codes are accepted.
    ///
    /// # Errors
    ///
    /// [`crate::GoError::CollaboratorUnavailable`] if the index cannot be queried
    fn identifiers_for_terms(
        &self,
        terms: &TermSet,
        evidence: Option<&EvidenceFilter>,
    ) -> GoResult<HashSet<(Identifier, EvidenceCode)>>;
}

/// In-memory [`AnnotationIndex`]
///
/// # Examples
///
/// ```
/// use go_interactome::annotations::{Annotation, AnnotationIndex, AnnotationTable};
/// use go_interactome::identity::Identifier;
/// use go_interactome::TermSet;
///
/// let mut table = AnnotationTable::default();
/// table.add(Annotation::new(Identifier::uniprot("P06493"), "GO:0000278", "IDA", "UniProtKB"));
/// table.add(Annotation::new(Identifier::uniprot("P06493"), "GO:0000278", "IEA", "UniProtKB"));
///
/// let terms: TermSet = ["GO:0000278"].into_iter().collect();
/// assert_eq!(table.identifiers_for_terms(&terms, None).unwrap().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct AnnotationTable {
    annotations: Vec<Annotation>,
    by_term: HashMap<TermId, Vec<usize>>,
    seen: HashSet<Annotation>,
}

impl AnnotationTable {
    /// Adds an annotation to the table
    ///
    /// Exact duplicates are stored only once.
    pub fn add(&mut self, annotation: Annotation) -> bool {
        if !self.seen.insert(annotation.clone()) {
            return false;
        }
        self.by_term
            .entry(annotation.term_id.clone())
            .or_default()
            .push(self.annotations.len());
        self.annotations.push(annotation);
        true
    }

    /// Returns all annotations of `term`
    pub fn annotations_of_term<'a>(
        &'a self,
        term: &TermId,
    ) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.by_term
            .get(term)
            .into_iter()
            .flatten()
            .map(|idx| &self.annotations[*idx])
    }

    /// Returns an iterator of all annotations
    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.annotations.iter()
    }

    /// Returns the number of annotations
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Returns `true` if the table has no annotations
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl AnnotationIndex for AnnotationTable {
    fn identifiers_for_terms(
        &self,
        terms: &TermSet,
        evidence: Option<&EvidenceFilter>,
    ) -> GoResult<HashSet<(Identifier, EvidenceCode)>> {
        Ok(terms
            .iter()
            .flat_map(|term| self.annotations_of_term(term))
            .filter(|annotation| evidence.map_or(true, |f| f.allows(&annotation.evidence_code)))
            .map(|annotation| {
                (
                    annotation.identifier.clone(),
                    annotation.evidence_code.clone(),
                )
            })
            .collect())
    }
}

impl<'a> IntoIterator for &'a AnnotationTable {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
