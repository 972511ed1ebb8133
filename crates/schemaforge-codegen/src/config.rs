use crate::error::{CodegenError, Result};
use crate::templates::{TeraTemplateFactory, TemplateFactory};
use crate::Language;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd";

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Container the generated types are placed in.
    pub namespace: Option<String>,

    /// Support types that must not be emitted even when needed, e.g. because
    /// the consumer already ships its own `JsonInheritanceConverter`.
    pub excluded_type_names: BTreeSet<String>,

    pub nullable_annotations: bool,

    /// Name hint for a root node that declares no name of its own.
    pub root_type_name: Option<String>,

    /// Format string baked into the generated date converter.
    pub date_format: String,

    pub template_factory: Arc<dyn TemplateFactory>,
}

impl GenerationSettings {
    /// Default settings rendering through the built-in templates.
    pub fn new() -> Result<Self> {
        Ok(Self::with_template_factory(Arc::new(
            TeraTemplateFactory::new()?,
        )))
    }

    pub fn with_template_factory(template_factory: Arc<dyn TemplateFactory>) -> Self {
        Self {
            namespace: None,
            excluded_type_names: BTreeSet::new(),
            nullable_annotations: false,
            root_type_name: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            template_factory,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_root_type_name(mut self, name: impl Into<String>) -> Self {
        self.root_type_name = Some(name.into());
        self
    }

    pub fn with_nullable_annotations(mut self, enabled: bool) -> Self {
        self.nullable_annotations = enabled;
        self
    }

    pub fn exclude(mut self, type_name: impl Into<String>) -> Self {
        self.excluded_type_names.insert(type_name.into());
        self
    }

    pub fn is_excluded(&self, type_name: &str) -> bool {
        self.excluded_type_names.contains(type_name)
    }
}

/// File-level configuration, read from the `[codegen]` table of a
/// `schemaforge.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct CodegenConfig {
    pub language: Language,
    pub namespace: Option<String>,
    pub excluded_type_names: Vec<String>,
    pub nullable_annotations: bool,
    pub root_type_name: Option<String>,
    pub date_format: Option<String>,
    pub template_directory: Option<PathBuf>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            language: Language::CSharp,
            namespace: None,
            excluded_type_names: Vec::new(),
            nullable_annotations: false,
            root_type_name: None,
            date_format: None,
            template_directory: None,
        }
    }
}

impl CodegenConfig {
    /// Loads a config file. A relative `template_directory` is resolved
    /// against the directory containing the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(dir) = &config.template_directory {
            if dir.is_relative() {
                if let Some(parent) = path.parent() {
                    config.template_directory = Some(parent.join(dir));
                }
            }
        }

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let toml_config: TomlConfig = toml::from_str(content)?;
        toml_config.codegen.into_codegen_config()
    }

    pub fn into_settings(self) -> Result<GenerationSettings> {
        let factory = match &self.template_directory {
            Some(dir) => TeraTemplateFactory::with_directory(dir)?,
            None => TeraTemplateFactory::new()?,
        };

        let mut settings = GenerationSettings::with_template_factory(Arc::new(factory));
        settings.namespace = self.namespace;
        settings.excluded_type_names = self.excluded_type_names.into_iter().collect();
        settings.nullable_annotations = self.nullable_annotations;
        settings.root_type_name = self.root_type_name;
        if let Some(date_format) = self.date_format {
            settings.date_format = date_format;
        }

        Ok(settings)
    }
}

#[derive(Debug, Deserialize)]
struct TomlConfig {
    #[serde(default)]
    codegen: TomlCodegen,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlCodegen {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    excluded_type_names: Vec<String>,
    #[serde(default)]
    nullable_annotations: bool,
    #[serde(default)]
    root_type_name: Option<String>,
    #[serde(default)]
    date_format: Option<String>,
    #[serde(default)]
    template_directory: Option<PathBuf>,
}

impl TomlCodegen {
    fn into_codegen_config(self) -> Result<CodegenConfig> {
        let language = match self.language.as_deref() {
            None => Language::CSharp,
            Some(name) => Language::from_name(name)
                .ok_or_else(|| CodegenError::Config(format!("Unsupported language: {}", name)))?,
        };

        Ok(CodegenConfig {
            language,
            namespace: self.namespace,
            excluded_type_names: self.excluded_type_names,
            nullable_annotations: self.nullable_annotations,
            root_type_name: self.root_type_name,
            date_format: self.date_format,
            template_directory: self.template_directory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codegen_table() {
        let config = CodegenConfig::from_toml_str(
            r#"
            [codegen]
            language = "csharp"
            namespace = "Acme.Contracts"
            excluded_type_names = ["JsonInheritanceConverter"]
            nullable_annotations = true
            date_format = "dd.MM.yyyy"
            "#,
        )
        .unwrap();

        assert_eq!(config.language, Language::CSharp);
        assert_eq!(config.namespace.as_deref(), Some("Acme.Contracts"));
        assert_eq!(config.excluded_type_names, vec!["JsonInheritanceConverter"]);
        assert!(config.nullable_annotations);

        let settings = config.into_settings().unwrap();
        assert!(settings.is_excluded("JsonInheritanceConverter"));
        assert!(!settings.is_excluded("DateFormatConverter"));
        assert_eq!(settings.date_format, "dd.MM.yyyy");
    }

    #[test]
    fn test_missing_table_uses_defaults() {
        let config = CodegenConfig::from_toml_str("").unwrap();
        assert_eq!(config, CodegenConfig::default());

        let settings = config.into_settings().unwrap();
        assert_eq!(settings.date_format, DEFAULT_DATE_FORMAT);
        assert!(settings.namespace.is_none());
    }

    #[test]
    fn test_unsupported_language_is_rejected() {
        let err = CodegenConfig::from_toml_str("[codegen]\nlanguage = \"cobol\"").unwrap_err();
        assert!(matches!(err, CodegenError::Config(message) if message.contains("cobol")));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = CodegenConfig::from_toml_str("[codegen]\nnamepsace = \"Typo\"").unwrap_err();
        assert!(matches!(err, CodegenError::Config(_)));
    }

    #[test]
    fn test_template_directory_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemaforge.toml");
        fs::write(&path, "[codegen]\ntemplate_directory = \"templates\"\n").unwrap();

        let config = CodegenConfig::from_file(&path).unwrap();
        assert_eq!(
            config.template_directory,
            Some(dir.path().join("templates"))
        );
    }
}
