// RFC 6570 URI Template expansion
//
// Expands a template string containing literal text and `{...}` expressions
// against a map of substitution values, producing a fully resolved URI
// string in a single pass over the input.

mod error;
mod template;
mod value;

pub use error::{ExpandError, Result};
pub use template::expand;
pub use value::{Substitutions, Value};
