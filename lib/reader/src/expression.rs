use regex::Regex;
use std::sync::LazyLock;

/// A property expression matched inside character data or an attribute
/// value, e.g. the `dc:title` of `{dc:title}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InlineExpression {
    pub curie: String,
}

/// Collaborator scanning character data and attribute values for inline
/// property micro-syntax. Matches become triples whose object is a freshly
/// minted node carrying a text-content origin.
pub trait ExpressionScanner {
    fn scan_text(&mut self, text: &str) -> Vec<InlineExpression>;

    fn scan_attribute(&mut self, value: &str) -> Vec<InlineExpression>;
}

/// Scanner that never matches; inline expressions are disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopScanner;

impl ExpressionScanner for NoopScanner {
    fn scan_text(&mut self, _text: &str) -> Vec<InlineExpression> {
        Vec::new()
    }

    fn scan_attribute(&mut self, _value: &str) -> Vec<InlineExpression> {
        Vec::new()
    }
}

static CURIE_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used, reason = "The pattern is a constant")]
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_.-]*:[A-Za-z0-9_.-]+)\}").expect("valid pattern")
});

/// Default scanner matching `{prefix:local}` template expressions.
#[derive(Clone, Copy, Debug, Default)]
pub struct CurieExpressionScanner;

impl CurieExpressionScanner {
    fn matches(text: &str) -> Vec<InlineExpression> {
        CURIE_EXPRESSION
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .map(|curie| InlineExpression {
                curie: curie.as_str().to_owned(),
            })
            .collect()
    }
}

impl ExpressionScanner for CurieExpressionScanner {
    fn scan_text(&mut self, text: &str) -> Vec<InlineExpression> {
        Self::matches(text)
    }

    fn scan_attribute(&mut self, value: &str) -> Vec<InlineExpression> {
        Self::matches(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_curie_expressions() {
        let mut scanner = CurieExpressionScanner;
        let matches = scanner.scan_text("by {dc:creator} on {dcterms:issued}");
        assert_eq!(
            matches,
            vec![
                InlineExpression {
                    curie: "dc:creator".to_owned()
                },
                InlineExpression {
                    curie: "dcterms:issued".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_ignores_plain_braces() {
        let mut scanner = CurieExpressionScanner;
        assert!(scanner.scan_text("plain {braces} here").is_empty());
        assert!(scanner.scan_attribute("no match").is_empty());
    }
}
