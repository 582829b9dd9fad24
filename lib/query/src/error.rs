use spargebra::SparqlSyntaxError;

/// An error raised while scanning a query for parameters or while binding
/// request values to them. Every variant carries the system identifier of
/// the query being processed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryParameterError {
    /// The query text is not valid SPARQL.
    #[error("failed to parse query {system_id}: {source}")]
    ParseFailed {
        #[source]
        source: SparqlSyntaxError,
        system_id: String,
    },
    /// Only single-result-row (SELECT-shaped) queries can be parameterized.
    #[error("query {system_id} is not a SELECT query")]
    UnsupportedQueryForm { system_id: String },
    /// The source query already carries an inline VALUES clause, which is
    /// reserved for parameter injection.
    #[error("query {system_id} already carries a VALUES clause")]
    DisallowedValuesClause { system_id: String },
    /// A parameter name is empty, contains a reserved character or is not
    /// stable under percent-decoding.
    #[error("invalid parameter name {name:?} in query {system_id}")]
    InvalidParameterName { name: String, system_id: String },
    /// The same parameter name is bound to two different constants.
    #[error("parameter {name:?} is bound to two different constants in query {system_id}")]
    ConflictingParameter { name: String, system_id: String },
    /// A raw request value cannot be coerced to the parameter's sample
    /// shape.
    #[error("invalid value {value:?} for parameter {name:?} in query {system_id}: {message}")]
    InvalidParameterValue {
        name: String,
        value: String,
        message: String,
        system_id: String,
    },
}

impl QueryParameterError {
    /// The system identifier of the query this error belongs to.
    pub fn system_id(&self) -> &str {
        match self {
            Self::ParseFailed { system_id, .. }
            | Self::UnsupportedQueryForm { system_id }
            | Self::DisallowedValuesClause { system_id }
            | Self::InvalidParameterName { system_id, .. }
            | Self::ConflictingParameter { system_id, .. }
            | Self::InvalidParameterValue { system_id, .. } => system_id,
        }
    }
}
