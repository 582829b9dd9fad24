mod event;
mod node;
mod origin;
pub mod vocab;

pub use event::*;
pub use node::*;
pub use origin::*;

// Re-export the parts of oxrdf's data model that the rest of the workspace
// relies on. Other crates should depend on this crate instead of depending
// on oxrdf directly.
pub use oxiri::{Iri, IriParseError};
pub use oxrdf::{
    BlankNode, LanguageTagParseError, Literal, LiteralRef, NamedNode, NamedNodeRef, Term, TermRef,
};
