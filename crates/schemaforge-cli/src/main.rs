use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "schemaforge")]
#[command(about = "Schemaforge - typed C# contracts from resolved schema graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Generate {
        #[arg(short, long)]
        graph: PathBuf,

        /// Write the generated file here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        namespace: Option<String>,

        /// Defaults to the nearest schemaforge.toml, if any.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory of .tera template overrides.
        #[arg(short, long)]
        templates: Option<PathBuf>,

        #[arg(short, long)]
        lang: Option<String>,
    },

    Validate {
        #[arg(short, long)]
        graph: PathBuf,
    },

    Version,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            graph,
            output,
            namespace,
            config,
            templates,
            lang,
        } => {
            commands::generate::execute(commands::generate::GenerateArgs {
                graph,
                output,
                namespace,
                config,
                templates,
                lang,
            })?;
        }
        Commands::Validate { graph } => {
            commands::validate::execute(graph)?;
        }
        Commands::Version => {
            println!("schemaforge {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
