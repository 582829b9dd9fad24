use rdfa_weave_model::RdfEvent;
use rdfa_weave_query::{ParameterizedQuery, QueryParameterError};
use rdfa_weave_reader::{RdfaParseError, RdfaReader, TokenSource};
use rustc_hash::FxHashMap;

/// An error raised while compiling, binding or rendering a template.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TemplateError {
    #[error(transparent)]
    Parse(#[from] RdfaParseError),
    #[error(transparent)]
    Query(#[from] QueryParameterError),
    /// A failure inside a query-producing or materializing collaborator.
    #[error("template collaborator failed: {message}")]
    Collaborator { message: String },
}

impl TemplateError {
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator {
            message: message.into(),
        }
    }
}

/// Collaborator turning the RDF event sequence of a template into SPARQL
/// SELECT text. The algebra compilation itself lives outside this crate;
/// only the event grammar is guaranteed here.
pub trait QueryProducer {
    fn produce(&mut self, events: &[RdfEvent]) -> Result<String, TemplateError>;
}

/// Collaborator pouring bound query results back into the source markup.
/// Result rows arrive in an external shape; the template contributes its
/// event sequence, whose origins locate the markup positions to fill.
pub trait Materializer {
    type Results;
    type Output;

    fn materialize(
        &mut self,
        template: &CompiledTemplate,
        results: Self::Results,
    ) -> Result<Self::Output, TemplateError>;
}

/// A compiled template: the RDF events extracted from the source markup and
/// the parameterized query produced from them.
///
/// Compilation happens once per template; [`bind`](Self::bind) and
/// [`render`](Self::render) run once per request.
#[derive(Debug)]
pub struct CompiledTemplate {
    events: Vec<RdfEvent>,
    query: ParameterizedQuery,
}

impl CompiledTemplate {
    /// Drains the reader over `source`, hands the event sequence to
    /// `producer` and scans the produced query for parameters. The system
    /// identifier doubles as the base IRI on both sides.
    pub fn compile<S: TokenSource, P: QueryProducer>(
        source: S,
        base: &str,
        system_id: &str,
        producer: &mut P,
    ) -> Result<Self, TemplateError> {
        let mut reader = RdfaReader::new(source, base, system_id)?;
        let mut events = Vec::new();
        while let Some(event) = reader.next_event()? {
            events.push(event);
        }
        reader.close()?;
        let text = producer.produce(&events)?;
        let query = ParameterizedQuery::parse(&text, system_id)?;
        Ok(Self { events, query })
    }

    /// The RDF events of the template, in document order.
    pub fn events(&self) -> &[RdfEvent] {
        &self.events
    }

    pub fn query(&self) -> &ParameterizedQuery {
        &self.query
    }

    /// Executable query text for one request's parameter values.
    pub fn bind(
        &self,
        values: &FxHashMap<String, Vec<String>>,
    ) -> Result<String, TemplateError> {
        Ok(self.query.bind(values)?)
    }

    /// Recombines query results with the template via `materializer`.
    pub fn render<M: Materializer>(
        &self,
        results: M::Results,
        materializer: &mut M,
    ) -> Result<M::Output, TemplateError> {
        materializer.materialize(self, results)
    }
}
