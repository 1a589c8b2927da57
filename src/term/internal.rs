use smallvec::SmallVec;

use crate::term::{Direction, RelationKind, TermNamespace};
use crate::{TermId, DEFAULT_NUM_RELATIONS};

/// One end of a relation, stored at the other end
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Link {
    pub(crate) kind: RelationKind,
    pub(crate) term: TermId,
}

pub(crate) type Links = SmallVec<[Link; DEFAULT_NUM_RELATIONS]>;

#[derive(Debug)]
pub(crate) struct TermInternal {
    id: TermId,
    name: String,
    namespace: TermNamespace,
    parents: Links,
    children: Links,
    obsolete: bool,
}

impl TermInternal {
    pub fn new(id: TermId, name: String, namespace: TermNamespace) -> TermInternal {
        TermInternal {
            id,
            name,
            namespace,
            parents: Links::new(),
            children: Links::new(),
            obsolete: false,
        }
    }

    pub fn id(&self) -> &TermId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &TermNamespace {
        &self.namespace
    }

    pub fn parents(&self) -> &Links {
        &self.parents
    }

    pub fn children(&self) -> &Links {
        &self.children
    }

    /// Returns the links of the term towards `direction`
    pub fn links(&self, direction: Direction) -> &Links {
        match direction {
            Direction::Ancestors => &self.parents,
            Direction::Descendants => &self.children,
        }
    }

    /// Adds a parent link, returns `false` if the same link already exists
    pub fn add_parent(&mut self, kind: RelationKind, parent: TermId) -> bool {
        add_link(&mut self.parents, kind, parent)
    }

    /// Adds a child link, returns `false` if the same link already exists
    pub fn add_child(&mut self, kind: RelationKind, child: TermId) -> bool {
        add_link(&mut self.children, kind, child)
    }

    pub fn obsolete(&self) -> bool {
        self.obsolete
    }

    pub fn obsolete_mut(&mut self) -> &mut bool {
        &mut self.obsolete
    }
}

fn add_link(links: &mut Links, kind: RelationKind, term: TermId) -> bool {
    if links.iter().any(|link| link.kind == kind && link.term == term) {
        return false;
    }
    links.push(Link { kind, term });
    true
}

impl PartialEq for TermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TermInternal {}
