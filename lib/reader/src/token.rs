use crate::error::MarkupError;

/// A qualified markup name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QName {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(
        namespace: impl Into<String>,
        prefix: Option<&str>,
        local: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            prefix: prefix.map(ToOwned::to_owned),
            local: local.into(),
        }
    }

    /// A name without a namespace, e.g. an unprefixed attribute.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local: local.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// A namespace declaration carried on an element start. `prefix` is `None`
/// for the default namespace.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamespaceDecl {
    pub prefix: Option<String>,
    pub iri: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartElement {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub namespaces: Vec<NamespaceDecl>,
}

impl StartElement {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            namespaces: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, local: &str, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: QName::local(local),
            value: value.into(),
        });
        self
    }

    pub fn with_namespace(mut self, prefix: Option<&str>, iri: impl Into<String>) -> Self {
        self.namespaces.push(NamespaceDecl {
            prefix: prefix.map(ToOwned::to_owned),
            iri: iri.into(),
        });
        self
    }

    /// Looks up an RDFa attribute by local name. Attributes in the XML
    /// namespace (`xml:lang`) are matched as well.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| {
                attr.name.local == local
                    && matches!(attr.name.prefix.as_deref(), None | Some("xml"))
            })
            .map(|attr| attr.value.as_str())
    }
}

/// One token of the order-preserving markup stream consumed by the reader.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MarkupEvent {
    StartDocument,
    StartElement(StartElement),
    Characters(String),
    EndElement,
    EndDocument,
}

/// Pull source of markup tokens.
///
/// The reader pulls tokens on demand and releases the source exactly once,
/// including on error paths.
pub trait TokenSource {
    /// Pulls the next token, or `None` once the stream is exhausted.
    fn pull(&mut self) -> Result<Option<MarkupEvent>, MarkupError>;

    /// Releases the underlying stream. Called at most once.
    fn close(&mut self) -> Result<(), MarkupError>;
}

/// An in-memory [`TokenSource`] over an already tokenized document.
#[derive(Debug)]
pub struct TokenBuffer {
    events: std::vec::IntoIter<MarkupEvent>,
    closed: bool,
}

impl TokenBuffer {
    pub fn new(events: Vec<MarkupEvent>) -> Self {
        Self {
            events: events.into_iter(),
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl TokenSource for TokenBuffer {
    fn pull(&mut self) -> Result<Option<MarkupEvent>, MarkupError> {
        if self.closed {
            return Err(MarkupError::msg("token buffer already closed"));
        }
        Ok(self.events.next())
    }

    fn close(&mut self) -> Result<(), MarkupError> {
        self.closed = true;
        Ok(())
    }
}
