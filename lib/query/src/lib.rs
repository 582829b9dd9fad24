mod bind;
mod error;
mod parameterized;
mod scan;

pub use error::QueryParameterError;
pub use parameterized::{ParameterBinding, ParameterizedQuery};
