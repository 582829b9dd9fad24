use rdfa_weave_model::{IriParseError, LanguageTagParseError};
use std::error::Error;

/// An error raised by a [`TokenSource`](crate::TokenSource) implementation.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct MarkupError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl MarkupError {
    /// Builds an error from a printable message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an underlying tokenizer error.
    pub fn new(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// An error raised while turning markup into RDF events.
///
/// Every variant carries the system identifier of the document being
/// processed. Parse errors are fatal to the current document; the reader
/// yields no further events after reporting one.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RdfaParseError {
    /// The underlying token stream was malformed or failed.
    #[error("{system_id}: {source}")]
    Markup {
        #[source]
        source: MarkupError,
        system_id: String,
    },
    /// Element starts and ends did not pair up.
    #[error("{system_id}: unbalanced markup: {message}")]
    UnbalancedMarkup { message: String, system_id: String },
    /// A CURIE used a prefix with no in-scope declaration.
    #[error("{system_id}: undefined CURIE prefix {prefix:?} in {curie:?}")]
    UndefinedPrefix {
        prefix: String,
        curie: String,
        system_id: String,
    },
    /// An attribute value did not resolve to a valid IRI.
    #[error("{system_id}: invalid IRI reference {value:?}: {source}")]
    InvalidIri {
        value: String,
        #[source]
        source: IriParseError,
        system_id: String,
    },
    /// An in-scope language tag was not well formed.
    #[error("{system_id}: invalid language tag {tag:?}: {source}")]
    InvalidLanguageTag {
        tag: String,
        #[source]
        source: LanguageTagParseError,
        system_id: String,
    },
    /// Releasing the token stream failed with no parse error in flight.
    #[error("{system_id}: failed to release the token stream: {source}")]
    CloseFailed {
        #[source]
        source: MarkupError,
        system_id: String,
    },
}

impl RdfaParseError {
    pub fn system_id(&self) -> &str {
        match self {
            RdfaParseError::Markup { system_id, .. }
            | RdfaParseError::UnbalancedMarkup { system_id, .. }
            | RdfaParseError::UndefinedPrefix { system_id, .. }
            | RdfaParseError::InvalidIri { system_id, .. }
            | RdfaParseError::InvalidLanguageTag { system_id, .. }
            | RdfaParseError::CloseFailed { system_id, .. } => system_id,
        }
    }
}
