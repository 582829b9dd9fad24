//! Vocabulary constants used by the template engine.

pub mod rdf {
    //! [RDF](https://www.w3.org/TR/rdf11-concepts/) vocabulary.

    use oxrdf::NamedNodeRef;

    /// The `rdf:type` property.
    pub const TYPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");

    /// The `rdf:XMLLiteral` datatype.
    pub const XML_LITERAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral");
}

pub mod xhtml {
    //! XHTML namespaces relevant to RDFa processing.

    /// The (X)HTML document namespace.
    pub const NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

    /// The XHTML vocabulary namespace. Unprefixed CURIEs on the document
    /// root resolve against this namespace, and CURIEs whose prefix maps to
    /// [`NAMESPACE`] are remapped onto it.
    pub const VOCAB: &str = "http://www.w3.org/1999/xhtml/vocab#";
}
