pub mod ast;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::{Result, SchemaError};
pub use parser::Parser;
