use crate::error::QueryParameterError;
use crate::parameterized::ParameterBinding;
use oxiri::Iri;
use percent_encoding::percent_decode_str;
use rustc_hash::FxHashMap;
use spargebra::algebra::{AggregateExpression, Expression, GraphPattern, OrderExpression};
use spargebra::term::{
    GroundTerm, Literal, NamedNode, NamedNodePattern, TermPattern, TriplePattern, Variable,
};

/// Characters a parameter name must not contain; they collide with the
/// form/query-string syntax parameter values arrive in.
const RESERVED: [char; 4] = ['$', '?', '&', '='];

/// Rewrites `"$name"` and `<base$name>` placeholder constants into ordinary
/// bind-variables, recording one [`ParameterBinding`] per distinct name in
/// declaration order.
pub(crate) struct PlaceholderScanner {
    system_id: String,
    base: String,
    bindings: Vec<ParameterBinding>,
    index: FxHashMap<String, usize>,
}

impl PlaceholderScanner {
    pub fn new(system_id: &str, base: &str) -> Self {
        Self {
            system_id: system_id.to_owned(),
            base: base.to_owned(),
            bindings: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn into_bindings(self) -> Vec<ParameterBinding> {
        self.bindings
    }

    pub fn rewrite_pattern(
        &mut self,
        pattern: &mut GraphPattern,
    ) -> Result<(), QueryParameterError> {
        match pattern {
            GraphPattern::Bgp { patterns } => {
                for triple in patterns {
                    self.rewrite_triple(triple)?;
                }
            }
            GraphPattern::Path {
                subject, object, ..
            } => {
                self.rewrite_term(subject)?;
                self.rewrite_term(object)?;
            }
            GraphPattern::Join { left, right }
            | GraphPattern::Union { left, right }
            | GraphPattern::Minus { left, right } => {
                self.rewrite_pattern(left)?;
                self.rewrite_pattern(right)?;
            }
            GraphPattern::LeftJoin {
                left,
                right,
                expression,
            } => {
                self.rewrite_pattern(left)?;
                self.rewrite_pattern(right)?;
                if let Some(expression) = expression {
                    self.rewrite_expression(expression)?;
                }
            }
            GraphPattern::Filter { expr, inner } => {
                self.rewrite_expression(expr)?;
                self.rewrite_pattern(inner)?;
            }
            GraphPattern::Graph { name, inner } => {
                self.rewrite_named(name)?;
                self.rewrite_pattern(inner)?;
            }
            GraphPattern::Extend {
                inner, expression, ..
            } => {
                self.rewrite_pattern(inner)?;
                self.rewrite_expression(expression)?;
            }
            GraphPattern::Values { .. } => {
                // The trailing bindings clause is how parameters are
                // injected at bind time; a source-level one is ambiguous.
                return Err(QueryParameterError::DisallowedValuesClause {
                    system_id: self.system_id.clone(),
                });
            }
            GraphPattern::OrderBy { inner, expression } => {
                self.rewrite_pattern(inner)?;
                for order in expression {
                    match order {
                        OrderExpression::Asc(expression) | OrderExpression::Desc(expression) => {
                            self.rewrite_expression(expression)?;
                        }
                    }
                }
            }
            GraphPattern::Group {
                inner, aggregates, ..
            } => {
                self.rewrite_pattern(inner)?;
                for (_, aggregate) in aggregates {
                    match aggregate {
                        AggregateExpression::CountSolutions { .. } => {}
                        AggregateExpression::FunctionCall { expr, .. } => {
                            self.rewrite_expression(expr)?;
                        }
                    }
                }
            }
            GraphPattern::Service { name, inner, .. } => {
                self.rewrite_named(name)?;
                self.rewrite_pattern(inner)?;
            }
            GraphPattern::Project { inner, .. }
            | GraphPattern::Distinct { inner }
            | GraphPattern::Reduced { inner }
            | GraphPattern::Slice { inner, .. } => self.rewrite_pattern(inner)?,
        }
        Ok(())
    }

    fn rewrite_triple(&mut self, triple: &mut TriplePattern) -> Result<(), QueryParameterError> {
        self.rewrite_term(&mut triple.subject)?;
        self.rewrite_named(&mut triple.predicate)?;
        self.rewrite_term(&mut triple.object)
    }

    fn rewrite_term(&mut self, term: &mut TermPattern) -> Result<(), QueryParameterError> {
        match term {
            TermPattern::NamedNode(node) => {
                if let Some(variable) = self.placeholder_iri(node)? {
                    *term = TermPattern::Variable(variable);
                }
            }
            TermPattern::Literal(literal) => {
                if let Some(variable) = self.placeholder_literal(literal)? {
                    *term = TermPattern::Variable(variable);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn rewrite_named(
        &mut self,
        pattern: &mut NamedNodePattern,
    ) -> Result<(), QueryParameterError> {
        if let NamedNodePattern::NamedNode(node) = pattern {
            if let Some(variable) = self.placeholder_iri(node)? {
                *pattern = NamedNodePattern::Variable(variable);
            }
        }
        Ok(())
    }

    fn rewrite_expression(
        &mut self,
        expression: &mut Expression,
    ) -> Result<(), QueryParameterError> {
        match expression {
            Expression::NamedNode(node) => {
                if let Some(variable) = self.placeholder_iri(node)? {
                    *expression = Expression::Variable(variable);
                }
            }
            Expression::Literal(literal) => {
                if let Some(variable) = self.placeholder_literal(literal)? {
                    *expression = Expression::Variable(variable);
                }
            }
            Expression::Variable(_) | Expression::Bound(_) => {}
            Expression::Or(left, right)
            | Expression::And(left, right)
            | Expression::Equal(left, right)
            | Expression::SameTerm(left, right)
            | Expression::Greater(left, right)
            | Expression::GreaterOrEqual(left, right)
            | Expression::Less(left, right)
            | Expression::LessOrEqual(left, right)
            | Expression::Add(left, right)
            | Expression::Subtract(left, right)
            | Expression::Multiply(left, right)
            | Expression::Divide(left, right) => {
                self.rewrite_expression(left)?;
                self.rewrite_expression(right)?;
            }
            Expression::In(value, list) => {
                self.rewrite_expression(value)?;
                for item in list {
                    self.rewrite_expression(item)?;
                }
            }
            Expression::UnaryPlus(inner)
            | Expression::UnaryMinus(inner)
            | Expression::Not(inner) => self.rewrite_expression(inner)?,
            Expression::Exists(pattern) => self.rewrite_pattern(pattern)?,
            Expression::If(test, then, otherwise) => {
                self.rewrite_expression(test)?;
                self.rewrite_expression(then)?;
                self.rewrite_expression(otherwise)?;
            }
            Expression::Coalesce(list) | Expression::FunctionCall(_, list) => {
                for item in list {
                    self.rewrite_expression(item)?;
                }
            }
        }
        Ok(())
    }

    /// A literal placeholder is a string whose lexical form starts with `$`.
    fn placeholder_literal(
        &mut self,
        literal: &Literal,
    ) -> Result<Option<Variable>, QueryParameterError> {
        let Some(name) = literal.value().strip_prefix('$') else {
            return Ok(None);
        };
        let name = name.to_owned();
        self.register(&name, GroundTerm::Literal(literal.clone()))
            .map(Some)
    }

    /// An IRI placeholder is the reference `$name` resolved against the
    /// query base. Any other IRI carrying `$` is an ordinary constant.
    fn placeholder_iri(
        &mut self,
        node: &NamedNode,
    ) -> Result<Option<Variable>, QueryParameterError> {
        let Some((_, name)) = node.as_str().split_once('$') else {
            return Ok(None);
        };
        if !self.resolves_from_base(name, node.as_str()) {
            return Ok(None);
        }
        let name = name.to_owned();
        self.register(&name, GroundTerm::NamedNode(node.clone()))
            .map(Some)
    }

    fn resolves_from_base(&self, name: &str, iri: &str) -> bool {
        Iri::parse(self.base.as_str())
            .and_then(|base| base.resolve(&format!("${name}")))
            .is_ok_and(|resolved| resolved.as_str() == iri)
    }

    fn register(
        &mut self,
        name: &str,
        sample: GroundTerm,
    ) -> Result<Variable, QueryParameterError> {
        if name.is_empty()
            || name.contains(RESERVED)
            || !decodes_to_itself(name)
        {
            return Err(QueryParameterError::InvalidParameterName {
                name: name.to_owned(),
                system_id: self.system_id.clone(),
            });
        }
        if let Some(&position) = self.index.get(name) {
            if self.bindings[position].sample() != &sample {
                return Err(QueryParameterError::ConflictingParameter {
                    name: name.to_owned(),
                    system_id: self.system_id.clone(),
                });
            }
            return Ok(self.bindings[position].variable().clone());
        }
        let variable = Variable::new(name).map_err(|_| {
            QueryParameterError::InvalidParameterName {
                name: name.to_owned(),
                system_id: self.system_id.clone(),
            }
        })?;
        self.index.insert(name.to_owned(), self.bindings.len());
        self.bindings
            .push(ParameterBinding::new(name, variable.clone(), sample));
        Ok(variable)
    }
}

/// A name that percent-decodes to something else would bind differently
/// depending on which decoding stage saw it first.
fn decodes_to_itself(name: &str) -> bool {
    match percent_decode_str(name).decode_utf8() {
        Ok(decoded) => decoded == name,
        Err(_) => false,
    }
}
