use rdfa_weave_model::Node;
use rustc_hash::FxHashMap;

/// A relation declared on a hanging element, waiting for its target.
#[derive(Clone, Debug)]
pub(crate) struct PendingRelation {
    pub predicate: Node,
    pub inverse: bool,
}

/// Property predicates waiting for the element's character data.
#[derive(Debug)]
pub(crate) struct PendingLiteral {
    pub predicates: Vec<Node>,
    pub datatype: Option<rdfa_weave_model::NamedNode>,
    pub language: Option<String>,
    pub origin: rdfa_weave_model::Origin,
}

/// One parse scope per open element.
///
/// Frames form an explicit stack instead of recursion-held references so
/// that disposal happens exactly at element close. The template-variable
/// cache is copied from the parent at creation, which is what keeps sibling
/// subtrees from observing each other's entries.
#[derive(Debug)]
pub(crate) struct Frame {
    /// 1-based sibling-index path from the document root.
    pub path: Vec<usize>,
    /// Child elements seen so far, used to assign sibling indices.
    pub children: usize,
    /// Language declared on this element. `Some("")` clears the language.
    pub lang: Option<String>,
    /// Namespace declarations made on this element, keyed by prefix.
    pub namespaces: FxHashMap<Option<String>, String>,
    /// Template-variable nodes resolved in this subtree, keyed by the raw
    /// attribute value (e.g. `?title`).
    pub variables: FxHashMap<String, Node>,
    /// Explicit candidate subject from `about`/`src`/`resource`/`href`.
    pub candidate: Option<Node>,
    /// Subject of this element's own property triples.
    pub subject: Option<Node>,
    /// Target of a completed `rel`/`rev` on this element.
    pub resource: Option<Node>,
    /// `rel`/`rev` present with the target deferred to a descendant.
    pub hanging: bool,
    /// Relations of a hanging element, replayed per completing descendant.
    pub pending: Vec<PendingRelation>,
    /// Whether any descendant completed the hanging relations.
    pub completed: bool,
    /// Reserved target for subject-less completing children, minted on
    /// first use and shared by all of them.
    pub deferred: Option<Node>,
    /// Subjects whose `EndSubject` is emitted when this element closes.
    pub closers: Vec<Node>,
    /// Literal predicates waiting for collected text.
    pub literal: Option<PendingLiteral>,
    /// Character data collected for a pending literal.
    pub text: String,
    pub collecting_text: bool,
}

impl Frame {
    pub fn new(path: Vec<usize>, variables: FxHashMap<String, Node>) -> Self {
        Self {
            path,
            children: 0,
            lang: None,
            namespaces: FxHashMap::default(),
            variables,
            candidate: None,
            subject: None,
            resource: None,
            hanging: false,
            pending: Vec::new(),
            completed: false,
            deferred: None,
            closers: Vec::new(),
            literal: None,
            text: String::new(),
            collecting_text: false,
        }
    }
}

/// Looks up the nearest in-scope declaration for a CURIE prefix, consulting
/// the frame under construction before its ancestors.
pub(crate) fn lookup_prefix<'a>(
    frame: &'a Frame,
    ancestors: &'a [Frame],
    prefix: &str,
) -> Option<&'a str> {
    let key = Some(prefix.to_owned());
    if let Some(iri) = frame.namespaces.get(&key) {
        return Some(iri);
    }
    ancestors
        .iter()
        .rev()
        .find_map(|ancestor| ancestor.namespaces.get(&key))
        .map(String::as_str)
}

/// The nearest in-scope language, if any. An empty declaration clears it.
pub(crate) fn in_scope_language(frame: &Frame, ancestors: &[Frame]) -> Option<String> {
    std::iter::once(frame)
        .chain(ancestors.iter().rev())
        .find_map(|scope| scope.lang.clone())
        .filter(|lang| !lang.is_empty())
}
