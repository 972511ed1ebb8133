pub mod artifact;
pub mod base;
pub mod config;
pub mod csharp;
pub mod error;
pub mod generator;
pub mod model;
pub mod naming;
pub mod resolver;
pub mod templates;

pub use artifact::{ArtifactCategory, ArtifactKind, CodeArtifact};
pub use base::{BaseGenerator, BaseOutput, Features};
pub use config::{CodegenConfig, GenerationSettings};
pub use error::{CodegenError, FaultKind, GenerationFault, Result};
pub use generator::{GeneratedFile, Generator};
pub use resolver::TypeResolver;
pub use templates::{TemplateFactory, TeraTemplateFactory};

use schemaforge_schema::SchemaGraph;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    CSharp,
}

impl Language {
    pub const ALL: &'static [Language] = &[Language::CSharp];

    /// Sub-directory holding this language's templates.
    pub fn template_dir(self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
        }
    }

    /// Names taken by synthesized support types. User types never receive
    /// one of these.
    pub fn reserved_type_names(self) -> &'static [&'static str] {
        match self {
            Language::CSharp => csharp::RESERVED_TYPE_NAMES,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "csharp" | "cs" | "c#" => Some(Language::CSharp),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::CSharp => write!(f, "C#"),
        }
    }
}

pub fn generate(
    graph: &SchemaGraph,
    settings: &GenerationSettings,
    lang: Language,
) -> Result<GeneratedFile> {
    let generator = Generator::new(lang);
    generator.generate(graph, settings)
}
