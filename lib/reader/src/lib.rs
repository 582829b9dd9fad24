mod curie;
mod error;
mod expression;
mod reader;
mod scope;
mod token;
mod xml_literal;

pub use error::{MarkupError, RdfaParseError};
pub use expression::{CurieExpressionScanner, ExpressionScanner, InlineExpression, NoopScanner};
pub use reader::RdfaReader;
pub use token::{
    Attribute, MarkupEvent, NamespaceDecl, QName, StartElement, TokenBuffer, TokenSource,
};
