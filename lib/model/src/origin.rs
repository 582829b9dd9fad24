use std::fmt;
use std::sync::Arc;

/// A locator tying an emitted term or triple back to its source markup.
///
/// The position is a path of 1-based sibling indices from the document root,
/// so `/1/2` identifies the second child element of the root element. Origins
/// travel alongside terms but never participate in term equality, which lets
/// a later materialization step pour query results back into the exact
/// position a value was parsed from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Origin {
    kind: OriginKind,
    path: Option<Arc<[usize]>>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum OriginKind {
    /// The value was written on the element itself (attribute or tag).
    Element,
    /// The value is derived from character data below the element.
    TextContent,
    /// The value has no authoring position, e.g. a minted blank node.
    Blank,
}

impl Origin {
    /// Creates an origin for a value authored on the element at `path`.
    pub fn element(path: impl Into<Arc<[usize]>>) -> Self {
        Self {
            kind: OriginKind::Element,
            path: Some(path.into()),
        }
    }

    /// Creates an origin for a synthetic value without an authoring position.
    pub fn blank() -> Self {
        Self {
            kind: OriginKind::Blank,
            path: None,
        }
    }

    /// Derives an origin marking the value as coming from character data at
    /// the same position.
    pub fn text_content(&self) -> Self {
        Self {
            kind: OriginKind::TextContent,
            path: self.path.clone(),
        }
    }

    /// The sibling-index path from the document root, if the value has an
    /// authoring position.
    pub fn path(&self) -> Option<&[usize]> {
        self.path.as_deref()
    }

    pub fn is_blank(&self) -> bool {
        self.kind == OriginKind::Blank
    }

    pub fn is_text_content(&self) -> bool {
        self.kind == OriginKind::TextContent
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            None => f.write_str("(synthetic)"),
            Some(path) => {
                for index in path {
                    write!(f, "/{index}")?;
                }
                if self.is_text_content() {
                    f.write_str("/text()")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_keeps_path() {
        let origin = Origin::element(vec![1, 3]);
        let derived = origin.text_content();
        assert_eq!(derived.path(), Some(&[1, 3][..]));
        assert!(derived.is_text_content());
        assert!(!origin.is_text_content());
    }

    #[test]
    fn test_blank_has_no_path() {
        let origin = Origin::blank();
        assert!(origin.is_blank());
        assert_eq!(origin.path(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Origin::element(vec![1, 2]).to_string(), "/1/2");
        assert_eq!(
            Origin::element(vec![1, 2]).text_content().to_string(),
            "/1/2/text()"
        );
        assert_eq!(Origin::blank().to_string(), "(synthetic)");
    }
}
