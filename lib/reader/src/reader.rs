use crate::curie::{resolve_curie, resolve_curie_named};
use crate::error::RdfaParseError;
use crate::expression::{CurieExpressionScanner, ExpressionScanner, InlineExpression};
use crate::scope::{in_scope_language, Frame, PendingLiteral, PendingRelation};
use crate::token::{MarkupEvent, StartElement, TokenSource};
use crate::xml_literal;
use rdfa_weave_model::{
    vocab, BlankNode, Iri, Literal, NamedNode, Node, Origin, RdfEvent, RdfTriple, Term,
};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ReaderState {
    Fresh,
    Streaming,
    Finished,
}

/// Captured child tokens of an `rdf:XMLLiteral` property element.
struct XmlCapture {
    subject: Node,
    predicates: Vec<Node>,
    origin: Origin,
    events: Vec<MarkupEvent>,
    depth: usize,
}

/// Streaming RDFa reader.
///
/// Consumes a pull-based markup token stream and produces a lazy, finite,
/// single-pass sequence of [`RdfEvent`]s. The reader is not restartable and
/// releases the underlying token stream exactly once, including on error
/// paths. A parse error is fatal to the current document: the reader yields
/// no further events after reporting one.
pub struct RdfaReader<S: TokenSource> {
    source: S,
    base: Iri<String>,
    system_id: String,
    scanner: Box<dyn ExpressionScanner>,
    queue: VecDeque<RdfEvent>,
    frames: Vec<Frame>,
    /// Subjects with an open `StartSubject` bracket, outermost first.
    open_subjects: Vec<Term>,
    capture: Option<XmlCapture>,
    /// Shared per-document counter; a hanging element's not-yet-created
    /// child target is always "current + 1".
    blank_counter: u64,
    state: ReaderState,
    closed: bool,
}

impl<S: TokenSource> RdfaReader<S> {
    pub fn new(
        source: S,
        base: &str,
        system_id: impl Into<String>,
    ) -> Result<Self, RdfaParseError> {
        let system_id = system_id.into();
        let base = Iri::parse(base.to_owned()).map_err(|source| RdfaParseError::InvalidIri {
            value: base.to_owned(),
            source,
            system_id: system_id.clone(),
        })?;
        Ok(Self {
            source,
            base,
            system_id,
            scanner: Box::new(CurieExpressionScanner),
            queue: VecDeque::new(),
            frames: Vec::new(),
            open_subjects: Vec::new(),
            capture: None,
            blank_counter: 0,
            state: ReaderState::Fresh,
            closed: false,
        })
    }

    /// Replaces the inline expression matcher, e.g. with
    /// [`NoopScanner`](crate::NoopScanner) to disable expression scanning.
    pub fn with_scanner(mut self, scanner: Box<dyn ExpressionScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    /// Whether another event is available. While this returns `true`,
    /// [`next_event`](Self::next_event) returns `Some`.
    pub fn has_next(&mut self) -> Result<bool, RdfaParseError> {
        self.fill()?;
        Ok(!self.queue.is_empty())
    }

    pub fn peek(&mut self) -> Result<Option<&RdfEvent>, RdfaParseError> {
        self.fill()?;
        Ok(self.queue.front())
    }

    pub fn next_event(&mut self) -> Result<Option<RdfEvent>, RdfaParseError> {
        self.fill()?;
        Ok(self.queue.pop_front())
    }

    /// Releases the underlying token stream.
    pub fn close(mut self) -> Result<(), RdfaParseError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source
            .close()
            .map_err(|source| RdfaParseError::CloseFailed {
                source,
                system_id: self.system_id.clone(),
            })
    }

    fn fill(&mut self) -> Result<(), RdfaParseError> {
        while self.queue.is_empty() && self.state != ReaderState::Finished {
            if let Err(error) = self.step() {
                self.abort();
                return Err(error);
            }
        }
        Ok(())
    }

    /// Discards all buffered state after a parse error so the document
    /// yields no partial output.
    fn abort(&mut self) {
        self.queue.clear();
        self.frames.clear();
        self.capture = None;
        self.state = ReaderState::Finished;
        self.release();
    }

    /// Best-effort release. A close failure here never masks the in-flight
    /// parse error; it is logged instead.
    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(error) = self.source.close() {
            tracing::warn!(
                system_id = %self.system_id,
                error = %error,
                "failed to release the token stream"
            );
        }
    }

    fn step(&mut self) -> Result<(), RdfaParseError> {
        let token = self
            .source
            .pull()
            .map_err(|source| RdfaParseError::Markup {
                source,
                system_id: self.system_id.clone(),
            })?;
        let Some(token) = token else {
            if self.state == ReaderState::Streaming && !self.frames.is_empty() {
                return Err(self.unbalanced("token stream ended with open elements"));
            }
            self.state = ReaderState::Finished;
            self.release();
            return Ok(());
        };
        if self.capture.is_some() {
            return self.step_capture(token);
        }
        match token {
            MarkupEvent::StartDocument => {
                if self.state != ReaderState::Fresh {
                    return Err(self.unbalanced("unexpected start of document"));
                }
                self.state = ReaderState::Streaming;
                self.queue.push_back(RdfEvent::StartDocument);
                Ok(())
            }
            MarkupEvent::EndDocument => {
                if !self.frames.is_empty() {
                    return Err(self.unbalanced("end of document with open elements"));
                }
                self.queue.push_back(RdfEvent::EndDocument);
                self.state = ReaderState::Finished;
                self.release();
                Ok(())
            }
            MarkupEvent::StartElement(element) => {
                match self.state {
                    ReaderState::Fresh => {
                        self.state = ReaderState::Streaming;
                        self.queue.push_back(RdfEvent::StartDocument);
                    }
                    ReaderState::Streaming => {}
                    ReaderState::Finished => {
                        return Err(self.unbalanced("element after end of document"));
                    }
                }
                self.start_element(element)
            }
            MarkupEvent::Characters(text) => self.characters(&text),
            MarkupEvent::EndElement => self.end_element(),
        }
    }

    fn step_capture(&mut self, token: MarkupEvent) -> Result<(), RdfaParseError> {
        match token {
            MarkupEvent::StartElement(element) => {
                if let Some(capture) = self.capture.as_mut() {
                    capture.depth += 1;
                    capture.events.push(MarkupEvent::StartElement(element));
                }
                Ok(())
            }
            MarkupEvent::Characters(text) => {
                if let Some(capture) = self.capture.as_mut() {
                    capture.events.push(MarkupEvent::Characters(text));
                }
                Ok(())
            }
            MarkupEvent::EndElement => {
                let done = self.capture.as_ref().is_some_and(|capture| capture.depth == 0);
                if done {
                    if let Some(capture) = self.capture.take() {
                        self.finish_capture(capture)?;
                    }
                    Ok(())
                } else {
                    if let Some(capture) = self.capture.as_mut() {
                        capture.depth -= 1;
                        capture.events.push(MarkupEvent::EndElement);
                    }
                    Ok(())
                }
            }
            MarkupEvent::StartDocument | MarkupEvent::EndDocument => {
                Err(self.unbalanced("document boundary inside an XML literal"))
            }
        }
    }

    fn finish_capture(&mut self, capture: XmlCapture) -> Result<(), RdfaParseError> {
        let in_scope = self.in_scope_namespaces();
        let xml = xml_literal::serialize(&capture.events, &in_scope);
        let literal = Literal::new_typed_literal(xml, vocab::rdf::XML_LITERAL.into_owned());
        let object = Node::new(literal, capture.origin);
        if let Some(frame) = self.frames.last_mut() {
            ensure_subject_bracket(
                &mut self.queue,
                &mut self.open_subjects,
                frame,
                &capture.subject,
            );
        }
        for predicate in capture.predicates {
            self.queue.push_back(RdfEvent::Triple(RdfTriple::new(
                capture.subject.clone(),
                predicate,
                object.clone(),
            )));
        }
        self.end_element()
    }

    fn start_element(&mut self, element: StartElement) -> Result<(), RdfaParseError> {
        let path = match self.frames.last_mut() {
            Some(parent) => {
                parent.children += 1;
                let mut path = parent.path.clone();
                path.push(parent.children);
                path
            }
            None => vec![1],
        };
        let origin = Origin::element(path.clone());

        for decl in &element.namespaces {
            self.queue.push_back(RdfEvent::Namespace {
                prefix: decl.prefix.clone(),
                iri: decl.iri.clone(),
            });
        }

        let variables = self
            .frames
            .last()
            .map(|parent| parent.variables.clone())
            .unwrap_or_default();
        let mut frame = Frame::new(path, variables);
        for decl in &element.namespaces {
            frame
                .namespaces
                .insert(decl.prefix.clone(), decl.iri.clone());
        }
        frame.lang = element.attribute("lang").map(ToOwned::to_owned);

        let about = element.attribute("about");
        let src = element.attribute("src");
        let resource = element.attribute("resource");
        let href = element.attribute("href");
        let rel = element.attribute("rel");
        let rev = element.attribute("rev");
        let property = element.attribute("property");
        let type_of = element.attribute("typeof");
        let content = element.attribute("content");
        let datatype = element.attribute("datatype").filter(|value| !value.is_empty());
        let has_relation = rel.is_some() || rev.is_some();

        let inline: Vec<InlineExpression> = element
            .attributes
            .iter()
            .flat_map(|attribute| self.scanner.scan_attribute(&attribute.value))
            .collect();

        let asserts =
            property.is_some() || has_relation || type_of.is_some() || !inline.is_empty();

        // Candidate subject, in priority order. With rel/rev present,
        // resource and href name the relation target instead. A template
        // hole is skipped, not resolved.
        let candidate_sources = if has_relation {
            [about, src, None, None]
        } else {
            [about, src, resource, href]
        };
        let mut candidate = None;
        for value in candidate_sources.into_iter().flatten() {
            if let Some(node) = self.resolve_reference(&mut frame, value, &origin)? {
                candidate = Some(node);
                break;
            }
        }
        frame.candidate = candidate.clone();

        let parent_hanging = self.frames.last().is_some_and(|parent| parent.hanging);
        let inherited = self
            .frames
            .last()
            .and_then(|parent| parent.resource.clone().or_else(|| parent.subject.clone()));
        let completes_parent = parent_hanging && (asserts || candidate.is_some());
        // A deferred target existing at this point was already replayed by
        // an earlier subject-less sibling.
        let deferred_before = self
            .frames
            .last()
            .and_then(|parent| parent.deferred.clone());

        let subject = if let Some(candidate) = candidate {
            candidate
        } else if self.is_root_container(&element) {
            self.document_node(&origin)?
        } else if type_of.is_some() {
            self.mint_blank()
        } else if completes_parent {
            self.deferred_target()
        } else if let Some(inherited) = inherited {
            inherited
        } else {
            self.document_node(&origin)?
        };
        frame.subject = Some(subject.clone());

        if completes_parent {
            let replay = match self.frames.last_mut() {
                Some(parent) => {
                    // The shared deferred target is replayed only once.
                    let replayed = deferred_before
                        .as_ref()
                        .is_some_and(|target| *target == subject);
                    parent.completed = true;
                    if let Some(parent_subject) = parent.subject.clone() {
                        ensure_subject_bracket(
                            &mut self.queue,
                            &mut self.open_subjects,
                            parent,
                            &parent_subject,
                        );
                    }
                    if replayed {
                        None
                    } else {
                        parent
                            .subject
                            .clone()
                            .map(|parent_subject| (parent_subject, parent.pending.clone()))
                    }
                }
                None => None,
            };
            ensure_subject_bracket(&mut self.queue, &mut self.open_subjects, &mut frame, &subject);
            if let Some((parent_subject, pending)) = replay {
                for relation in pending {
                    self.queue.push_back(RdfEvent::Triple(relation_triple(
                        parent_subject.clone(),
                        relation,
                        subject.clone(),
                    )));
                }
            }
        }

        if let Some(type_of) = type_of {
            for curie in type_of.split_whitespace() {
                let class = resolve_curie(&frame, &self.frames, curie, &origin, &self.system_id)?;
                ensure_subject_bracket(
                    &mut self.queue,
                    &mut self.open_subjects,
                    &mut frame,
                    &subject,
                );
                let predicate = Node::new(vocab::rdf::TYPE.into_owned(), Origin::blank());
                self.queue.push_back(RdfEvent::Triple(RdfTriple::new(
                    subject.clone(),
                    predicate,
                    class,
                )));
            }
        }

        if has_relation {
            let mut relations = Vec::new();
            for curie in rel.unwrap_or_default().split_whitespace() {
                relations.push(PendingRelation {
                    predicate: resolve_curie(
                        &frame,
                        &self.frames,
                        curie,
                        &origin,
                        &self.system_id,
                    )?,
                    inverse: false,
                });
            }
            for curie in rev.unwrap_or_default().split_whitespace() {
                relations.push(PendingRelation {
                    predicate: resolve_curie(
                        &frame,
                        &self.frames,
                        curie,
                        &origin,
                        &self.system_id,
                    )?,
                    inverse: true,
                });
            }
            if resource.is_some() || href.is_some() {
                let mut target = None;
                if let Some(value) = resource {
                    target = self.resolve_reference(&mut frame, value, &origin)?;
                }
                if target.is_none() {
                    if let Some(value) = href {
                        target = self.resolve_reference(&mut frame, value, &origin)?;
                    }
                }
                // An unresolvable target degrades to a fresh blank node.
                let target = match target {
                    Some(target) => target,
                    None => self.mint_blank(),
                };
                ensure_subject_bracket(
                    &mut self.queue,
                    &mut self.open_subjects,
                    &mut frame,
                    &subject,
                );
                ensure_subject_bracket(
                    &mut self.queue,
                    &mut self.open_subjects,
                    &mut frame,
                    &target,
                );
                frame.resource = Some(target.clone());
                for relation in relations {
                    self.queue.push_back(RdfEvent::Triple(relation_triple(
                        subject.clone(),
                        relation,
                        target.clone(),
                    )));
                }
            } else {
                frame.hanging = true;
                frame.pending = relations;
            }
        }

        if let Some(property) = property {
            let mut predicates = Vec::new();
            for curie in property.split_whitespace() {
                predicates.push(resolve_curie(
                    &frame,
                    &self.frames,
                    curie,
                    &origin,
                    &self.system_id,
                )?);
            }
            let language = in_scope_language(&frame, &self.frames);
            let datatype = match datatype {
                Some(value) => Some(resolve_curie_named(
                    &frame,
                    &self.frames,
                    value,
                    &self.system_id,
                )?),
                None => None,
            };
            let is_xml_literal = datatype
                .as_ref()
                .is_some_and(|datatype| datatype.as_ref() == vocab::rdf::XML_LITERAL);
            if let Some(content) = content {
                // An attribute-borne content value wins over element text.
                let literal_origin = if content.is_empty() {
                    origin.text_content()
                } else {
                    origin.clone()
                };
                let literal = self.build_literal(content, datatype, language)?;
                let object = Node::new(literal, literal_origin);
                for predicate in predicates {
                    ensure_subject_bracket(
                        &mut self.queue,
                        &mut self.open_subjects,
                        &mut frame,
                        &subject,
                    );
                    self.queue.push_back(RdfEvent::Triple(RdfTriple::new(
                        subject.clone(),
                        predicate,
                        object.clone(),
                    )));
                }
            } else if is_xml_literal {
                self.capture = Some(XmlCapture {
                    subject: subject.clone(),
                    predicates,
                    origin: origin.text_content(),
                    events: Vec::new(),
                    depth: 0,
                });
            } else {
                frame.literal = Some(PendingLiteral {
                    predicates,
                    datatype,
                    language,
                    origin: origin.text_content(),
                });
                frame.collecting_text = true;
            }
        }

        for expression in inline {
            let predicate = resolve_curie(
                &frame,
                &self.frames,
                &expression.curie,
                &origin,
                &self.system_id,
            )?;
            let object = self.mint_with_origin(origin.clone());
            ensure_subject_bracket(&mut self.queue, &mut self.open_subjects, &mut frame, &subject);
            self.queue.push_back(RdfEvent::Triple(RdfTriple::new(
                subject.clone(),
                predicate,
                object,
            )));
        }

        self.frames.push(frame);
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), RdfaParseError> {
        for frame in &mut self.frames {
            if frame.collecting_text {
                frame.text.push_str(text);
            }
        }
        let matches = self.scanner.scan_text(text);
        if matches.is_empty() {
            return Ok(());
        }
        let Some((frame, ancestors)) = self.frames.split_last_mut() else {
            return Ok(());
        };
        let Some(subject) = frame.subject.clone() else {
            return Ok(());
        };
        let origin = Origin::element(frame.path.clone()).text_content();
        for expression in matches {
            let predicate =
                resolve_curie(frame, ancestors, &expression.curie, &origin, &self.system_id)?;
            self.blank_counter += 1;
            let object = Node::new(
                BlankNode::new_unchecked(format!("b{}", self.blank_counter)),
                origin.clone(),
            );
            ensure_subject_bracket(&mut self.queue, &mut self.open_subjects, frame, &subject);
            self.queue.push_back(RdfEvent::Triple(RdfTriple::new(
                subject.clone(),
                predicate,
                object,
            )));
        }
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), RdfaParseError> {
        let Some(mut frame) = self.frames.pop() else {
            return Err(self.unbalanced("element end without matching start"));
        };
        if let Some(pending) = frame.literal.take() {
            let literal = self.build_literal(&frame.text, pending.datatype, pending.language)?;
            let object = Node::new(literal, pending.origin);
            if let Some(subject) = frame.subject.clone() {
                for predicate in pending.predicates {
                    ensure_subject_bracket(
                        &mut self.queue,
                        &mut self.open_subjects,
                        &mut frame,
                        &subject,
                    );
                    self.queue.push_back(RdfEvent::Triple(RdfTriple::new(
                        subject.clone(),
                        predicate,
                        object.clone(),
                    )));
                }
            }
        }
        if frame.hanging && !frame.completed {
            // An empty hanging element degrades to a freshly minted blank.
            if let Some(subject) = frame.subject.clone() {
                ensure_subject_bracket(
                    &mut self.queue,
                    &mut self.open_subjects,
                    &mut frame,
                    &subject,
                );
                let target = self.mint_blank();
                self.queue.push_back(RdfEvent::StartSubject(target.clone()));
                self.open_subjects.push(target.term().into_owned());
                for relation in frame.pending.drain(..) {
                    self.queue.push_back(RdfEvent::Triple(relation_triple(
                        subject.clone(),
                        relation,
                        target.clone(),
                    )));
                }
                self.queue.push_back(RdfEvent::EndSubject(target.clone()));
                self.open_subjects.pop();
            }
        }
        for node in frame.closers.drain(..).rev() {
            let term = node.term().into_owned();
            self.queue.push_back(RdfEvent::EndSubject(node));
            if let Some(position) = self.open_subjects.iter().rposition(|open| *open == term) {
                self.open_subjects.remove(position);
            }
        }
        Ok(())
    }

    /// Resolves an attribute value as an IRI reference, a safe CURIE, the
    /// `[]` ancestor reference or a template variable. Values containing a
    /// template hole are never resolvable.
    fn resolve_reference(
        &mut self,
        frame: &mut Frame,
        value: &str,
        origin: &Origin,
    ) -> Result<Option<Node>, RdfaParseError> {
        if value.contains('{') {
            return Ok(None);
        }
        if value == "[]" {
            return Ok(self
                .frames
                .iter()
                .rev()
                .find_map(|ancestor| ancestor.candidate.clone()));
        }
        if let Some(curie) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            return resolve_curie(frame, &self.frames, curie, origin, &self.system_id).map(Some);
        }
        if value.starts_with('?') {
            if let Some(node) = frame.variables.get(value) {
                return Ok(Some(node.clone()));
            }
            self.blank_counter += 1;
            let node = Node::new(
                BlankNode::new_unchecked(variable_label(value, self.blank_counter)),
                origin.clone(),
            );
            frame.variables.insert(value.to_owned(), node.clone());
            return Ok(Some(node));
        }
        let iri = self
            .base
            .resolve(value)
            .map_err(|source| RdfaParseError::InvalidIri {
                value: value.to_owned(),
                source,
                system_id: self.system_id.clone(),
            })?;
        let named =
            NamedNode::new(iri.into_inner()).map_err(|source| RdfaParseError::InvalidIri {
                value: value.to_owned(),
                source,
                system_id: self.system_id.clone(),
            })?;
        Ok(Some(Node::new(named, origin.clone())))
    }

    fn build_literal(
        &self,
        value: &str,
        datatype: Option<NamedNode>,
        language: Option<String>,
    ) -> Result<Literal, RdfaParseError> {
        match (datatype, language) {
            (Some(datatype), _) => Ok(Literal::new_typed_literal(value, datatype)),
            (None, Some(language)) => Literal::new_language_tagged_literal(value, &language)
                .map_err(|source| RdfaParseError::InvalidLanguageTag {
                    tag: language,
                    source,
                    system_id: self.system_id.clone(),
                }),
            (None, None) => Ok(Literal::new_simple_literal(value)),
        }
    }

    fn document_node(&self, origin: &Origin) -> Result<Node, RdfaParseError> {
        let named = NamedNode::new(self.base.as_str().to_owned()).map_err(|source| {
            RdfaParseError::InvalidIri {
                value: self.base.as_str().to_owned(),
                source,
                system_id: self.system_id.clone(),
            }
        })?;
        Ok(Node::new(named, origin.clone()))
    }

    fn is_root_container(&self, element: &StartElement) -> bool {
        if self.frames.is_empty() {
            return true;
        }
        element.name.namespace.as_deref() == Some(vocab::xhtml::NAMESPACE)
            && matches!(element.name.local.as_str(), "head" | "body")
    }

    /// The single reserved child target of a hanging parent, minted on
    /// first use so every subject-less completing child observes one node.
    fn deferred_target(&mut self) -> Node {
        if let Some(target) = self
            .frames
            .last()
            .and_then(|parent| parent.deferred.clone())
        {
            return target;
        }
        let target = self.mint_blank();
        if let Some(parent) = self.frames.last_mut() {
            parent.deferred = Some(target.clone());
        }
        target
    }

    fn mint_blank(&mut self) -> Node {
        self.blank_counter += 1;
        Node::new(
            BlankNode::new_unchecked(format!("b{}", self.blank_counter)),
            Origin::blank(),
        )
    }

    fn mint_with_origin(&mut self, origin: Origin) -> Node {
        self.blank_counter += 1;
        Node::new(
            BlankNode::new_unchecked(format!("b{}", self.blank_counter)),
            origin,
        )
    }

    fn in_scope_namespaces(&self) -> Vec<(Option<String>, String)> {
        let mut map: FxHashMap<Option<String>, String> = FxHashMap::default();
        for frame in &self.frames {
            for (prefix, iri) in &frame.namespaces {
                map.insert(prefix.clone(), iri.clone());
            }
        }
        let mut list: Vec<_> = map.into_iter().collect();
        list.sort();
        list
    }

    fn unbalanced(&self, message: &str) -> RdfaParseError {
        RdfaParseError::UnbalancedMarkup {
            message: message.to_owned(),
            system_id: self.system_id.clone(),
        }
    }
}

impl<S: TokenSource> Iterator for RdfaReader<S> {
    type Item = Result<RdfEvent, RdfaParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

impl<S: TokenSource> Drop for RdfaReader<S> {
    fn drop(&mut self) {
        self.release();
    }
}

fn ensure_subject_bracket(
    queue: &mut VecDeque<RdfEvent>,
    open_subjects: &mut Vec<Term>,
    frame: &mut Frame,
    node: &Node,
) {
    let term = node.term().into_owned();
    if open_subjects.contains(&term) {
        return;
    }
    queue.push_back(RdfEvent::StartSubject(node.clone()));
    open_subjects.push(term);
    frame.closers.push(node.clone());
}

fn relation_triple(subject: Node, relation: PendingRelation, target: Node) -> RdfTriple {
    if relation.inverse {
        RdfTriple::inverted(subject, relation.predicate, target)
    } else {
        RdfTriple::new(subject, relation.predicate, target)
    }
}

/// Blank-node label of a template variable such as `?title`. The raw name
/// keys the per-scope cache; the counter keeps labels unique per document.
fn variable_label(raw: &str, counter: u64) -> String {
    let name: String = raw
        .trim_start_matches('?')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{name}_{counter}")
}
