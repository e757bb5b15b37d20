//! Command-line interface for the tempelhof document ingestion service.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tempelhof::{ExtractionConfig, Pipeline};

#[derive(Parser)]
#[command(
    name = "tempelhof",
    about = "Document ingestion: type sniffing, text extraction with OCR fallback, language detection",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP extraction service
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 5001)]
        port: u16,

        /// Explicit config file (otherwise tempelhof.toml is discovered)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Extract one local file and print the result as JSON
    Extract {
        /// File to extract
        file: PathBuf,

        /// Explicit config file (otherwise tempelhof.toml is discovered)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<ExtractionConfig> {
    let mut config = match explicit {
        Some(path) => ExtractionConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ExtractionConfig::discover()
            .context("config discovery failed")?
            .unwrap_or_default(),
    };
    config.apply_env_overrides();
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tempelhof=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port, config } => {
            let config = load_config(config.as_deref())?;
            tempelhof::api::serve_with_config(&host, port, config)
                .await
                .context("server failed")?;
        }
        Command::Extract { file, config } => {
            let config = load_config(config.as_deref())?;
            let pipeline = Pipeline::new(config);

            let content = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();

            let result = pipeline
                .extract(&content, &filename)
                .await
                .with_context(|| format!("extraction failed for {}", file.display()))?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["tempelhof", "serve"]);
        match cli.command {
            Command::Serve { host, port, config } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 5001);
                assert!(config.is_none());
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_extract_parses_file_argument() {
        let cli = Cli::parse_from(["tempelhof", "extract", "some/doc.pdf"]);
        match cli.command {
            Command::Extract { file, .. } => {
                assert_eq!(file, PathBuf::from("some/doc.pdf"));
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_load_config_missing_explicit_file_errors() {
        assert!(load_config(Some(Path::new("/nonexistent/tempelhof.toml"))).is_err());
    }
}
