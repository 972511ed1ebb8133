use crate::error::Result;
use crate::Language;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};
use tracing::debug;

/// Renders an artifact model through a named template.
///
/// Implementations must be deterministic for fixed inputs. They are shared
/// read-only between generation runs, hence `Send + Sync`.
pub trait TemplateFactory: Send + Sync + fmt::Debug {
    fn render(&self, language: Language, template: &str, model: &serde_json::Value)
        -> Result<String>;
}

const CSHARP_TEMPLATES: &[(&str, &str)] = &[
    ("File", include_str!("../templates/csharp/File.tera")),
    ("Class", include_str!("../templates/csharp/Class.tera")),
    ("Enum", include_str!("../templates/csharp/Enum.tera")),
    ("OneOfNamed", include_str!("../templates/csharp/OneOfNamed.tera")),
    ("OneOfAnonymous", include_str!("../templates/csharp/OneOfAnonymous.tera")),
    ("OneOfBase", include_str!("../templates/csharp/OneOfBase.tera")),
    ("OneOfConverter", include_str!("../templates/csharp/OneOfConverter.tera")),
    (
        "JsonInheritanceAttribute",
        include_str!("../templates/csharp/JsonInheritanceAttribute.tera"),
    ),
    (
        "JsonInheritanceConverter",
        include_str!("../templates/csharp/JsonInheritanceConverter.tera"),
    ),
    (
        "DateFormatConverter",
        include_str!("../templates/csharp/DateFormatConverter.tera"),
    ),
];

/// Serializes `model` and renders it through the configured factory.
pub(crate) fn render_model<M: Serialize>(
    factory: &dyn TemplateFactory,
    language: Language,
    template: &str,
    model: &M,
) -> Result<String> {
    let value = serde_json::to_value(model)?;
    factory.render(language, template, &value)
}

fn template_key(language: Language, template: &str) -> String {
    format!("{}/{}", language.template_dir(), template)
}

/// Default renderer: built-in templates compiled into the binary, optionally
/// overridden by `.tera` files on disk.
#[derive(Debug)]
pub struct TeraTemplateFactory {
    tera: Tera,
}

impl TeraTemplateFactory {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(
            CSHARP_TEMPLATES
                .iter()
                .map(|(name, source)| (template_key(Language::CSharp, name), *source)),
        )?;
        Ok(Self { tera })
    }

    /// Built-in templates plus overrides from `dir`.
    ///
    /// Overrides live in one sub-directory per language named after
    /// [`Language::template_dir`], e.g. `dir/csharp/Class.tera` replaces the
    /// built-in `Class` template.
    pub fn with_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut factory = Self::new()?;
        factory.load_overrides(dir.as_ref())?;
        Ok(factory)
    }

    fn load_overrides(&mut self, dir: &Path) -> Result<()> {
        for language in Language::ALL {
            let language_dir = dir.join(language.template_dir());
            if !language_dir.is_dir() {
                continue;
            }

            let mut entries: Vec<_> = fs::read_dir(&language_dir)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            entries.sort_by_key(|entry| entry.path());

            for entry in entries {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) != Some("tera") {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                let key = template_key(*language, stem);
                debug!("Loading template override {} from {}", key, path.display());
                self.tera.add_template_file(&path, Some(&key))?;
            }
        }
        Ok(())
    }
}

impl TemplateFactory for TeraTemplateFactory {
    fn render(
        &self,
        language: Language,
        template: &str,
        model: &serde_json::Value,
    ) -> Result<String> {
        let context = Context::from_value(model.clone())?;
        let rendered = self.tera.render(&template_key(language, template), &context)?;
        Ok(rendered)
    }
}
