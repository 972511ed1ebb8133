use schemaforge_schema::NodeId;
use std::error::Error as _;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that abort a whole generation run.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<tera::Error> for CodegenError {
    fn from(err: tera::Error) -> Self {
        // tera keeps the useful detail (missing variable, bad filter) in the source chain
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        CodegenError::Template(message)
    }
}

impl From<toml::de::Error> for CodegenError {
    fn from(err: toml::de::Error) -> Self {
        CodegenError::Config(err.to_string())
    }
}

/// A problem local to one schema node. Faults are collected, never thrown:
/// the offending node's subtree is skipped and the rest of the graph is
/// still generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFault {
    pub node: NodeId,
    pub hint: Option<String>,
    pub kind: FaultKind,
}

impl GenerationFault {
    pub fn new(node: NodeId, hint: Option<&str>, kind: FaultKind) -> Self {
        Self {
            node,
            hint: hint.map(str::to_string),
            kind,
        }
    }
}

impl fmt::Display for GenerationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "node {} ({:?}): {}", self.node, hint, self.kind),
            None => write!(f, "node {}: {}", self.node, self.kind),
        }
    }
}

impl std::error::Error for GenerationFault {}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    #[error("no type name can be derived")]
    Unnamed,

    #[error("union declares no variants")]
    EmptyUnion,
}
