#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

pub mod template;

pub mod model {
    pub use rdfa_weave_model::*;
}

pub mod reader {
    pub use rdfa_weave_reader::*;
}

pub mod query {
    pub use rdfa_weave_query::*;
}

pub use template::{CompiledTemplate, Materializer, QueryProducer, TemplateError};
