use crate::artifact::CodeArtifact;
use crate::base::BaseGenerator;
use crate::config::GenerationSettings;
use crate::csharp;
use crate::error::{GenerationFault, Result};
use crate::Language;
use schemaforge_schema::SchemaGraph;
use tracing::{info, warn};

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// The complete compilation unit.
    pub code: String,
    /// Every artifact in output order: base artifacts first, then synthesized.
    pub artifacts: Vec<CodeArtifact>,
    pub faults: Vec<GenerationFault>,
}

impl GeneratedFile {
    pub fn artifact(&self, type_name: &str) -> Option<&CodeArtifact> {
        self.artifacts.iter().find(|a| a.type_name() == type_name)
    }

    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }
}

pub struct Generator {
    language: Language,
}

impl Generator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn generate(
        &self,
        graph: &SchemaGraph,
        settings: &GenerationSettings,
    ) -> Result<GeneratedFile> {
        info!(
            "Generating {} code for {} schema nodes",
            self.language,
            graph.len()
        );

        let base = BaseGenerator::new(graph, settings, self.language).generate()?;
        let mut artifacts = base.artifacts;

        match self.language {
            Language::CSharp => {
                let helpers = csharp::synthesize_union_helpers(&base.features, settings)?;
                let utilities =
                    csharp::inject_utilities(&base.features, !helpers.is_empty(), settings)?;
                artifacts.extend(helpers);
                artifacts.extend(utilities);
            }
        }

        let code = match self.language {
            Language::CSharp => csharp::generate_file(&artifacts, settings)?,
        };

        if !base.faults.is_empty() {
            warn!(
                "Generation finished with {} skipped schema nodes",
                base.faults.len()
            );
        }
        info!("Generated {} artifacts", artifacts.len());

        Ok(GeneratedFile {
            code,
            artifacts,
            faults: base.faults,
        })
    }
}
