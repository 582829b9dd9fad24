#![cfg(test)]
#![allow(clippy::panic, clippy::unwrap_used)]

use rdfa_weave::model::RdfEvent;
use rdfa_weave::reader::{MarkupEvent, QName, StartElement, TokenBuffer};
use rdfa_weave::{CompiledTemplate, Materializer, QueryProducer, TemplateError};
use rustc_hash::FxHashMap;

const BASE: &str = "http://example.com/page";

/// Produces one query line per triple predicate seen in the template,
/// parameterized on a fixed title placeholder.
struct TitleQuery;

impl QueryProducer for TitleQuery {
    fn produce(&mut self, events: &[RdfEvent]) -> Result<String, TemplateError> {
        let has_title = events.iter().any(|event| {
            matches!(
                event,
                RdfEvent::Triple(triple)
                    if triple.predicate.to_string().contains("title")
            )
        });
        if !has_title {
            return Err(TemplateError::collaborator("template asserts no title"));
        }
        Ok("SELECT ?s WHERE { ?s <http://purl.org/dc/terms/title> \"$title\" }".to_owned())
    }
}

struct EventCounter;

impl Materializer for EventCounter {
    type Results = usize;
    type Output = usize;

    fn materialize(
        &mut self,
        template: &CompiledTemplate,
        results: usize,
    ) -> Result<usize, TemplateError> {
        Ok(template.events().len() + results)
    }
}

fn page_tokens() -> Vec<MarkupEvent> {
    vec![
        MarkupEvent::StartDocument,
        MarkupEvent::StartElement(
            StartElement::new(QName::new("http://www.w3.org/1999/xhtml", None, "div"))
                .with_namespace(Some("dc"), "http://purl.org/dc/terms/")
                .with_attribute("property", "dc:title")
                .with_attribute("content", "$title"),
        ),
        MarkupEvent::EndElement,
        MarkupEvent::EndDocument,
    ]
}

#[test]
fn test_compile_bind_and_render() {
    let template = CompiledTemplate::compile(
        TokenBuffer::new(page_tokens()),
        BASE,
        BASE,
        &mut TitleQuery,
    )
    .unwrap();
    assert!(template.query().is_parameterized());
    assert_eq!(template.query().parameters()[0].name(), "title");

    let mut values = FxHashMap::default();
    values.insert("title".to_owned(), vec!["Home".to_owned()]);
    let bound = template.bind(&values).unwrap();
    assert!(bound.ends_with("VALUES (?title) { (\"Home\") }"));

    let rendered = template.render(2, &mut EventCounter).unwrap();
    assert_eq!(rendered, template.events().len() + 2);
}

#[test]
fn test_collaborator_errors_surface() {
    let tokens = vec![
        MarkupEvent::StartDocument,
        MarkupEvent::StartElement(StartElement::new(QName::new(
            "http://www.w3.org/1999/xhtml",
            None,
            "div",
        ))),
        MarkupEvent::EndElement,
        MarkupEvent::EndDocument,
    ];
    let error = CompiledTemplate::compile(TokenBuffer::new(tokens), BASE, BASE, &mut TitleQuery)
        .unwrap_err();
    assert!(matches!(error, TemplateError::Collaborator { .. }));
}
