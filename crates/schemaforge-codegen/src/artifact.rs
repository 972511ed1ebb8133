use crate::Language;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    Class,
    Enum,
    UnionHelper,
    Utility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactCategory {
    Contract,
    Utility,
}

/// One generated, named unit of target-language code.
///
/// Artifacts are immutable once built; generation only ever appends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeArtifact {
    type_name: String,
    base_type_name: Option<String>,
    kind: ArtifactKind,
    category: ArtifactCategory,
    language: Language,
    code: String,
}

impl CodeArtifact {
    pub fn new(
        type_name: impl Into<String>,
        kind: ArtifactKind,
        category: ArtifactCategory,
        language: Language,
        code: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            base_type_name: None,
            kind,
            category,
            language,
            code: code.into(),
        }
    }

    pub fn with_base_type(mut self, base_type_name: Option<String>) -> Self {
        self.base_type_name = base_type_name;
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn base_type_name(&self) -> Option<&str> {
        self.base_type_name.as_deref()
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn category(&self) -> ArtifactCategory {
        self.category
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}
