use core::fmt::Debug;
use std::fmt::Display;
use std::sync::Arc;

/// A stable, prefix-qualified identifier of an ontology term
///
/// e.g. `GO:0007049`
///
/// The identifier is treated as an opaque string, cloning it is cheap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId {
    inner: Arc<str>,
}

impl TermId {
    /// Returns the identifier as `&str`
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the prefix of the identifier, e.g. `GO` for `GO:0007049`
    ///
    /// # Examples
    ///
    /// ```
    /// use go_interactome::TermId;
    ///
    /// assert_eq!(TermId::from("GO:0007049").prefix(), Some("GO"));
    /// assert_eq!(TermId::from("0007049").prefix(), None);
    /// ```
    pub fn prefix(&self) -> Option<&str> {
        self.inner.split_once(':').map(|(prefix, _)| prefix)
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        TermId { inner: s.into() }
    }
}

impl From<String> for TermId {
    fn from(s: String) -> Self {
        TermId { inner: s.into() }
    }
}

impl From<&TermId> for TermId {
    fn from(id: &TermId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({self})")
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        &*self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        &*self.inner == *other
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compare_with_str() {
        let id = TermId::from("GO:0007049");
        assert_eq!(id, "GO:0007049");
        assert!(id != "GO:0007050");
        assert_eq!(id.to_string(), "GO:0007049");
    }

    #[test]
    fn ordering_follows_string() {
        let mut ids: Vec<TermId> = ["GO:0000278", "GO:0000002", "GO:0051301"]
            .into_iter()
            .map(TermId::from)
            .collect();
        ids.sort();
        assert_eq!(ids[0], "GO:0000002");
        assert_eq!(ids[2], "GO:0051301");
    }
}
