use crate::Origin;
use oxrdf::{Term, TermRef};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An RDF term paired with the [`Origin`] it was parsed from.
///
/// Equality and hashing are defined over the term alone. Two nodes carrying
/// the same term compare equal even when one was minted synthetically and
/// the other was authored in the document.
#[derive(Clone, Debug, Eq)]
pub struct Node {
    term: Term,
    origin: Origin,
}

impl Node {
    pub fn new(term: impl Into<Term>, origin: Origin) -> Self {
        Self {
            term: term.into(),
            origin,
        }
    }

    pub fn term(&self) -> TermRef<'_> {
        self.term.as_ref()
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn into_term(self) -> Term {
        self.term
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.term.hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.term.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    #[test]
    fn test_equality_ignores_origin() {
        let term = NamedNode::new("http://example.com/a").unwrap();
        let authored = Node::new(term.clone(), Origin::element(vec![1]));
        let synthetic = Node::new(term, Origin::blank());
        assert_eq!(authored, synthetic);
    }
}
