use crate::token::{MarkupEvent, NamespaceDecl, QName};

/// Re-serializes a captured markup fragment as the lexical form of an
/// `rdf:XMLLiteral`.
///
/// In-scope namespace declarations are repaired onto each top-level fragment
/// element unless the element redeclares the prefix itself, so the fragment
/// stays well formed outside its original document.
pub(crate) fn serialize(
    events: &[MarkupEvent],
    in_scope: &[(Option<String>, String)],
) -> String {
    let mut out = String::new();
    let mut open: Vec<String> = Vec::new();
    for event in events {
        match event {
            MarkupEvent::StartElement(element) => {
                let element_qname = qname(&element.name);
                out.push('<');
                out.push_str(&element_qname);
                if open.is_empty() {
                    for (prefix, iri) in in_scope {
                        let redeclared = element
                            .namespaces
                            .iter()
                            .any(|decl| decl.prefix == *prefix);
                        if !redeclared {
                            push_declaration(&mut out, prefix.as_deref(), iri);
                        }
                    }
                }
                for NamespaceDecl { prefix, iri } in &element.namespaces {
                    push_declaration(&mut out, prefix.as_deref(), iri);
                }
                for attribute in &element.attributes {
                    out.push(' ');
                    out.push_str(&qname(&attribute.name));
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(&attribute.value));
                    out.push('"');
                }
                out.push('>');
                open.push(element_qname);
            }
            MarkupEvent::Characters(text) => out.push_str(&escape_text(text)),
            MarkupEvent::EndElement => {
                if let Some(qname) = open.pop() {
                    out.push_str("</");
                    out.push_str(&qname);
                    out.push('>');
                }
            }
            MarkupEvent::StartDocument | MarkupEvent::EndDocument => {}
        }
    }
    out
}

fn qname(name: &QName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.clone(),
    }
}

fn push_declaration(out: &mut String, prefix: Option<&str>, iri: &str) {
    match prefix {
        Some(prefix) => {
            out.push_str(" xmlns:");
            out.push_str(prefix);
        }
        None => out.push_str(" xmlns"),
    }
    out.push_str("=\"");
    out.push_str(&escape_attribute(iri));
    out.push('"');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::StartElement;

    #[test]
    fn test_repairs_in_scope_namespaces_onto_fragment_roots() {
        let events = vec![
            MarkupEvent::StartElement(
                StartElement::new(QName::new("http://www.w3.org/1999/xhtml", None, "b"))
                    .with_attribute("class", "x"),
            ),
            MarkupEvent::Characters("bold & <brave>".to_owned()),
            MarkupEvent::EndElement,
        ];
        let in_scope = vec![(None, "http://www.w3.org/1999/xhtml".to_owned())];
        assert_eq!(
            serialize(&events, &in_scope),
            "<b xmlns=\"http://www.w3.org/1999/xhtml\" class=\"x\">bold &amp; &lt;brave&gt;</b>"
        );
    }

    #[test]
    fn test_nested_elements_are_not_redeclared() {
        let events = vec![
            MarkupEvent::StartElement(StartElement::new(QName::local("p"))),
            MarkupEvent::StartElement(StartElement::new(QName::local("em"))),
            MarkupEvent::Characters("x".to_owned()),
            MarkupEvent::EndElement,
            MarkupEvent::EndElement,
        ];
        let in_scope = vec![(None, "http://www.w3.org/1999/xhtml".to_owned())];
        assert_eq!(
            serialize(&events, &in_scope),
            "<p xmlns=\"http://www.w3.org/1999/xhtml\"><em>x</em></p>"
        );
    }

    #[test]
    fn test_attributes_follow_the_element_name() {
        let events = vec![
            MarkupEvent::StartElement(
                StartElement::new(QName::new("urn:svg", Some("svg"), "rect"))
                    .with_attribute("width", "4")
                    .with_attribute("height", "2"),
            ),
            MarkupEvent::EndElement,
        ];
        assert_eq!(
            serialize(&events, &[]),
            "<svg:rect width=\"4\" height=\"2\"></svg:rect>"
        );
    }

    #[test]
    fn test_own_declaration_is_not_duplicated() {
        let events = vec![
            MarkupEvent::StartElement(
                StartElement::new(QName::new("urn:svg", Some("svg"), "rect"))
                    .with_namespace(Some("svg"), "urn:svg"),
            ),
            MarkupEvent::EndElement,
        ];
        let in_scope = vec![(Some("svg".to_owned()), "urn:other".to_owned())];
        assert_eq!(
            serialize(&events, &in_scope),
            "<svg:rect xmlns:svg=\"urn:svg\"></svg:rect>"
        );
    }
}
