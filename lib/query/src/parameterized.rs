use crate::bind;
use crate::error::QueryParameterError;
use crate::scan::PlaceholderScanner;
use rustc_hash::FxHashMap;
use spargebra::term::{GroundTerm, Variable};
use spargebra::Query;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One scanned parameter: its name, the bind-variable its placeholder was
/// rewritten to and the original constant, whose shape dictates how raw
/// request values are coerced.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ParameterBinding {
    name: String,
    variable: Variable,
    sample: GroundTerm,
}

impl ParameterBinding {
    pub(crate) fn new(name: &str, variable: Variable, sample: GroundTerm) -> Self {
        Self {
            name: name.to_owned(),
            variable,
            sample,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// The constant the placeholder was scanned from. Also the fallback
    /// value when a bind call supplies no override.
    pub fn sample(&self) -> &GroundTerm {
        &self.sample
    }
}

/// A SELECT query whose `"$name"` / `<base$name>` placeholders have been
/// rewritten to bind-variables, ready to take request values.
///
/// Scanning happens once at template-compile time; [`bind`](Self::bind) is a
/// pure transform safe to call concurrently from many requests. Equality and
/// hashing cover the rewritten text, the system identifier and the scanned
/// bindings.
#[derive(Clone, Debug)]
pub struct ParameterizedQuery {
    text: String,
    system_id: String,
    /// Base for reference-resolving IRI parameter values; the query's own
    /// BASE declaration when present, the system identifier otherwise.
    base: String,
    bindings: Vec<ParameterBinding>,
}

impl ParameterizedQuery {
    /// Scans `query` for parameter placeholders. The system identifier
    /// doubles as the base IRI for the query and its parameter values.
    pub fn parse(query: &str, system_id: &str) -> Result<Self, QueryParameterError> {
        let mut parsed = Query::parse(query, Some(system_id)).map_err(|source| {
            QueryParameterError::ParseFailed {
                source,
                system_id: system_id.to_owned(),
            }
        })?;
        let Query::Select {
            pattern, base_iri, ..
        } = &mut parsed
        else {
            return Err(QueryParameterError::UnsupportedQueryForm {
                system_id: system_id.to_owned(),
            });
        };
        let base = base_iri
            .as_ref()
            .map_or_else(|| system_id.to_owned(), |iri| iri.as_str().to_owned());
        let mut scanner = PlaceholderScanner::new(system_id, &base);
        scanner.rewrite_pattern(pattern)?;
        let bindings = scanner.into_bindings();
        // Without parameters the source text passes through untouched.
        let text = if bindings.is_empty() {
            query.to_owned()
        } else {
            parsed.to_string()
        };
        Ok(Self {
            text,
            system_id: system_id.to_owned(),
            base,
            bindings,
        })
    }

    /// The query text with placeholders rewritten to bind-variables.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    pub(crate) fn base(&self) -> &str {
        &self.base
    }

    /// Scanned parameters in declaration order.
    pub fn parameters(&self) -> &[ParameterBinding] {
        &self.bindings
    }

    pub fn is_parameterized(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Produces executable query text for one request.
    ///
    /// `values` maps parameter names to ordered raw strings, the shape of a
    /// decoded form or query string. An absent or empty list falls back to
    /// the scanned constant; an empty string becomes `UNDEF`. The Cartesian
    /// product of all value lists is appended as one multi-row VALUES
    /// clause with columns in declaration order.
    pub fn bind(
        &self,
        values: &FxHashMap<String, Vec<String>>,
    ) -> Result<String, QueryParameterError> {
        bind::bind(self, values)
    }
}

impl PartialEq for ParameterizedQuery {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.system_id == other.system_id
            && self.bindings == other.bindings
    }
}

impl Eq for ParameterizedQuery {}

impl Hash for ParameterizedQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.system_id.hash(state);
        self.bindings.hash(state);
    }
}

impl fmt::Display for ParameterizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
