use crate::error::QueryParameterError;
use crate::parameterized::{ParameterBinding, ParameterizedQuery};
use itertools::Itertools;
use oxiri::Iri;
use oxrdf::vocab::xsd;
use rustc_hash::FxHashMap;
use spargebra::term::{GroundTerm, Literal, NamedNode};

pub(crate) fn bind(
    query: &ParameterizedQuery,
    values: &FxHashMap<String, Vec<String>>,
) -> Result<String, QueryParameterError> {
    if query.parameters().is_empty() {
        return Ok(query.text().to_owned());
    }
    let mut per_parameter: Vec<Vec<Option<GroundTerm>>> = Vec::new();
    for binding in query.parameters() {
        let supplied = values
            .get(binding.name())
            .filter(|list| !list.is_empty());
        let row_values = match supplied {
            Some(list) => {
                let mut coerced = Vec::with_capacity(list.len());
                for raw in list {
                    if raw.is_empty() {
                        coerced.push(None);
                    } else {
                        coerced.push(Some(coerce(query, binding, raw)?));
                    }
                }
                coerced
            }
            None => vec![Some(binding.sample().clone())],
        };
        per_parameter.push(row_values);
    }

    let mut clause = String::from("VALUES (");
    for (position, binding) in query.parameters().iter().enumerate() {
        if position > 0 {
            clause.push(' ');
        }
        clause.push_str(&binding.variable().to_string());
    }
    clause.push_str(") {");
    for row in per_parameter.into_iter().multi_cartesian_product() {
        clause.push_str(" (");
        for (position, cell) in row.iter().enumerate() {
            if position > 0 {
                clause.push(' ');
            }
            match cell {
                Some(term) => clause.push_str(&term.to_string()),
                None => clause.push_str("UNDEF"),
            }
        }
        clause.push(')');
    }
    clause.push_str(" }");
    Ok(format!("{}\n{clause}", query.text()))
}

/// Coerces one raw request value to the shape of the parameter's sample.
fn coerce(
    query: &ParameterizedQuery,
    binding: &ParameterBinding,
    raw: &str,
) -> Result<GroundTerm, QueryParameterError> {
    match binding.sample() {
        GroundTerm::Literal(sample) => {
            if let Some(language) = sample.language() {
                Literal::new_language_tagged_literal(raw, language)
                    .map(GroundTerm::Literal)
                    .map_err(|error| invalid_value(query, binding, raw, &error.to_string()))
            } else if sample.datatype() == xsd::STRING {
                Ok(GroundTerm::Literal(Literal::new_simple_literal(raw)))
            } else {
                Ok(GroundTerm::Literal(Literal::new_typed_literal(
                    raw,
                    NamedNode::from(sample.datatype()),
                )))
            }
        }
        GroundTerm::NamedNode(_) => {
            let base = Iri::parse(query.base().to_owned())
                .map_err(|error| invalid_value(query, binding, raw, &error.to_string()))?;
            let iri = base
                .resolve(raw)
                .map_err(|error| invalid_value(query, binding, raw, &error.to_string()))?;
            NamedNode::new(iri.into_inner())
                .map(GroundTerm::NamedNode)
                .map_err(|error| invalid_value(query, binding, raw, &error.to_string()))
        }
    }
}

fn invalid_value(
    query: &ParameterizedQuery,
    binding: &ParameterBinding,
    raw: &str,
    message: &str,
) -> QueryParameterError {
    QueryParameterError::InvalidParameterValue {
        name: binding.name().to_owned(),
        value: raw.to_owned(),
        message: message.to_owned(),
        system_id: query.system_id().to_owned(),
    }
}
