use crate::ast::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Root node {0} does not exist")]
    MissingRoot(NodeId),

    #[error("Undefined reference: node {node} points at missing node {target}")]
    UndefinedReference { node: NodeId, target: NodeId },

    #[error("Reference cycle starting at node {0}")]
    ReferenceCycle(NodeId),

    #[error("Inheritance cycle starting at node {0}")]
    InheritanceCycle(NodeId),

    #[error("Invalid base type: node {node} inherits from non-object node {base}")]
    InvalidBaseType { node: NodeId, base: NodeId },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for SchemaError {
    fn from(err: std::io::Error) -> Self {
        SchemaError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::SyntaxError {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
