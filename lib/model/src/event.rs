use crate::Node;
use std::fmt;

/// A parse event produced while streaming an RDFa document.
///
/// Events are produced in document order. `StartSubject`/`EndSubject` pairs
/// are balanced for the same node and may nest; every triple referencing a
/// newly introduced subject is emitted between that subject's brackets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RdfEvent {
    StartDocument,
    EndDocument,
    /// A namespace declaration seen on the way down. `prefix` is `None` for
    /// the default namespace.
    Namespace {
        prefix: Option<String>,
        iri: String,
    },
    StartSubject(Node),
    EndSubject(Node),
    Triple(RdfTriple),
}

/// A streamed triple, possibly inverted.
///
/// `subject` is always the subject of the element that asserted the triple.
/// With `inverse` set (a `rev` relation) the underlying RDF statement reads
/// `object predicate subject`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RdfTriple {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
    pub inverse: bool,
}

impl RdfTriple {
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
            inverse: false,
        }
    }

    pub fn inverted(subject: Node, predicate: Node, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
            inverse: true,
        }
    }
}

impl fmt::Display for RdfTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            write!(f, "{} {} {} .", self.object, self.predicate, self.subject)
        } else {
            write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
        }
    }
}
