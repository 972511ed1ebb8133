use crate::ast::*;
use crate::error::{Result, SchemaError};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Loads resolved schema graphs serialized as JSON.
///
/// The document shape is `{ "root": <id>, "nodes": [ ... ] }` where every
/// node id is an index into `nodes`. Loading checks the structural
/// preconditions the generator relies on (no dangling ids, no reference or
/// inheritance cycles) but does not validate schema semantics.
pub struct Parser;

impl Parser {
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SchemaGraph> {
        let path = path.as_ref();
        info!("Loading schema graph: {}", path.display());

        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        Self::parse_string(&content)
    }

    pub fn parse_string(input: &str) -> Result<SchemaGraph> {
        let graph: SchemaGraph = serde_json::from_str(input)?;

        debug!(
            "Schema graph has {} nodes, root {}",
            graph.len(),
            graph.root
        );

        graph.validate()?;
        Ok(graph)
    }

    pub fn parse_value(value: serde_json::Value) -> Result<SchemaGraph> {
        let graph: SchemaGraph = serde_json::from_value(value)?;
        graph.validate()?;
        Ok(graph)
    }
}
