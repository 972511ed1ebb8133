use anyhow::Result;
use schemaforge_codegen::{generate, CodegenConfig, Language};
use schemaforge_schema::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::utils::file_util::{find_config_file, write_output};

pub struct GenerateArgs {
    pub graph: PathBuf,
    pub output: Option<PathBuf>,
    pub namespace: Option<String>,
    pub config: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub lang: Option<String>,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    info!("Generating code from schema graph: {}", args.graph.display());

    let mut config = load_config(args.config.as_ref())?;

    if let Some(lang) = args.lang.as_deref() {
        config.language = match Language::from_name(lang) {
            Some(language) => language,
            None => anyhow::bail!("Unsupported language: {}", lang),
        };
    }
    if let Some(namespace) = args.namespace {
        config.namespace = Some(namespace);
    }
    if let Some(templates) = args.templates {
        config.template_directory = Some(templates);
    }

    let language = config.language;
    let settings = config.into_settings()?;
    let graph = Parser::parse_file(&args.graph)?;

    let generated = generate(&graph, &settings, language)?;

    match &args.output {
        Some(path) => {
            write_output(path, &generated.code)?;
            info!(
                "✓ Wrote {} artifacts to {}",
                generated.artifacts.len(),
                path.display()
            );
        }
        None => print!("{}", generated.code),
    }

    Ok(())
}

fn load_config(explicit: Option<&PathBuf>) -> Result<CodegenConfig> {
    let path = match explicit {
        Some(path) => Some(path.clone()),
        None => find_config_file(&std::env::current_dir()?),
    };

    match path {
        Some(path) => {
            info!("Using config: {}", path.display());
            Ok(CodegenConfig::from_file(&path)?)
        }
        None => Ok(CodegenConfig::default()),
    }
}
