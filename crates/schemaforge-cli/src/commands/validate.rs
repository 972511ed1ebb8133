use anyhow::Result;
use schemaforge_schema::{NodeKind, Parser};
use std::path::PathBuf;
use tracing::info;

pub fn execute(graph_path: PathBuf) -> Result<()> {
    info!("Validating schema graph: {}", graph_path.display());

    if !graph_path.is_file() {
        anyhow::bail!("Schema graph not found: {}", graph_path.display());
    }

    let graph = Parser::parse_file(&graph_path)?;

    let mut objects = 0;
    let mut enums = 0;
    let mut unions = 0;
    for (_, node) in graph.iter() {
        match node.kind {
            NodeKind::Object(_) => objects += 1,
            NodeKind::Enumeration { .. } => enums += 1,
            NodeKind::Union { .. } => unions += 1,
            _ => {}
        }
    }

    info!("✓ Schema graph validation passed!");
    info!("  - {} nodes, root {}", graph.len(), graph.root);
    info!("  - {} objects", objects);
    info!("  - {} enumerations", enums);
    info!("  - {} unions", unions);

    Ok(())
}
