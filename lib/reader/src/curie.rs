use crate::error::RdfaParseError;
use crate::scope::{lookup_prefix, Frame};
use rdfa_weave_model::{vocab, NamedNode, Node, Origin};

/// Resolves a CURIE against the in-scope prefix declarations.
///
/// The nearest declaration wins. An undeclared non-empty prefix is a parse
/// error; an unprefixed CURIE resolves against the XHTML vocabulary only on
/// the document root element. A namespace equal to the (X)HTML document
/// namespace is remapped onto the XHTML vocabulary namespace.
pub(crate) fn resolve_curie(
    frame: &Frame,
    ancestors: &[Frame],
    curie: &str,
    origin: &Origin,
    system_id: &str,
) -> Result<Node, RdfaParseError> {
    let named = resolve_curie_named(frame, ancestors, curie, system_id)?;
    Ok(Node::new(named, origin.clone()))
}

/// Like [`resolve_curie`] but yields the bare IRI, for positions that take
/// no origin such as a literal datatype.
pub(crate) fn resolve_curie_named(
    frame: &Frame,
    ancestors: &[Frame],
    curie: &str,
    system_id: &str,
) -> Result<NamedNode, RdfaParseError> {
    let iri = curie_iri(frame, ancestors, curie, system_id)?;
    NamedNode::new(iri).map_err(|source| RdfaParseError::InvalidIri {
        value: curie.to_owned(),
        source,
        system_id: system_id.to_owned(),
    })
}

fn curie_iri(
    frame: &Frame,
    ancestors: &[Frame],
    curie: &str,
    system_id: &str,
) -> Result<String, RdfaParseError> {
    match curie.split_once(':') {
        Some((prefix, local)) => {
            if prefix.is_empty() {
                return Ok(format!("{}{local}", vocab::xhtml::VOCAB));
            }
            let Some(namespace) = lookup_prefix(frame, ancestors, prefix) else {
                return Err(RdfaParseError::UndefinedPrefix {
                    prefix: prefix.to_owned(),
                    curie: curie.to_owned(),
                    system_id: system_id.to_owned(),
                });
            };
            let namespace = if namespace == vocab::xhtml::NAMESPACE {
                vocab::xhtml::VOCAB
            } else {
                namespace
            };
            Ok(format!("{namespace}{local}"))
        }
        None if ancestors.is_empty() => Ok(format!("{}{curie}", vocab::xhtml::VOCAB)),
        None => Err(RdfaParseError::UndefinedPrefix {
            prefix: String::new(),
            curie: curie.to_owned(),
            system_id: system_id.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    const SYSTEM_ID: &str = "http://example.com/test";

    fn frame_with(prefix: &str, namespace: &str) -> Frame {
        let mut frame = Frame::new(vec![1], FxHashMap::default());
        frame
            .namespaces
            .insert(Some(prefix.to_owned()), namespace.to_owned());
        frame
    }

    fn iri_of(node: &Node) -> String {
        node.term().to_string()
    }

    #[test]
    fn test_nearest_declaration_wins() {
        let outer = frame_with("dc", "http://purl.org/dc/elements/1.1/");
        let inner = frame_with("dc", "http://purl.org/dc/terms/");
        let node =
            resolve_curie(&inner, &[outer], "dc:title", &Origin::blank(), SYSTEM_ID).unwrap();
        assert_eq!(iri_of(&node), "<http://purl.org/dc/terms/title>");
    }

    #[test]
    fn test_ancestor_declaration_visible() {
        let outer = frame_with("dc", "http://purl.org/dc/terms/");
        let inner = Frame::new(vec![1, 1], FxHashMap::default());
        let node =
            resolve_curie(&inner, &[outer], "dc:title", &Origin::blank(), SYSTEM_ID).unwrap();
        assert_eq!(iri_of(&node), "<http://purl.org/dc/terms/title>");
    }

    #[test]
    fn test_undefined_prefix_is_an_error() {
        let frame = Frame::new(vec![1], FxHashMap::default());
        let error =
            resolve_curie(&frame, &[], "dc:title", &Origin::blank(), SYSTEM_ID).unwrap_err();
        assert!(matches!(
            error,
            RdfaParseError::UndefinedPrefix { prefix, .. } if prefix == "dc"
        ));
    }

    #[test]
    fn test_unprefixed_resolves_to_xhtml_vocabulary_at_root() {
        let root = Frame::new(vec![1], FxHashMap::default());
        let node = resolve_curie(&root, &[], "license", &Origin::blank(), SYSTEM_ID).unwrap();
        assert_eq!(iri_of(&node), "<http://www.w3.org/1999/xhtml/vocab#license>");

        let ancestor = Frame::new(vec![1], FxHashMap::default());
        let inner = Frame::new(vec![1, 1], FxHashMap::default());
        assert!(
            resolve_curie(&inner, &[ancestor], "license", &Origin::blank(), SYSTEM_ID).is_err()
        );
    }

    #[test]
    fn test_xhtml_namespace_is_remapped() {
        let frame = frame_with("h", "http://www.w3.org/1999/xhtml");
        let node = resolve_curie(&frame, &[], "h:next", &Origin::blank(), SYSTEM_ID).unwrap();
        assert_eq!(iri_of(&node), "<http://www.w3.org/1999/xhtml/vocab#next>");
    }
}
