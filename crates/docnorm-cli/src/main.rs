//! docnorm command-line interface.
//!
//! - `docnorm serve` runs the HTTP service
//! - `docnorm sanitize <FILE>` normalizes one local document to stdout
//! - `docnorm formats` lists the supported content types

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use docnorm::core::mime::content_type_from_path;
use docnorm::{DocnormConfig, DocumentRequest, NormalizationPipeline};

#[derive(Parser)]
#[command(name = "docnorm")]
#[command(version)]
#[command(about = "Normalize PDF, DOCX and plain-text documents into Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to bind (overrides config and DOCNORM_HOST)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind (overrides config and DOCNORM_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Config file (.toml, .yaml, .yml or .json); discovered when omitted
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Normalize a local document and print the result
    Sanitize {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Content type; guessed from the file extension when omitted
        #[arg(short = 't', long = "type", value_name = "MIME")]
        content_type: Option<String>,

        /// The file holds base64 text rather than raw document bytes
        #[arg(long)]
        base64: bool,

        /// Config file (.toml, .yaml, .yml or .json); discovered when omitted
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,
    },

    /// List supported content types
    Formats {
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn sanitize_file(
    config: &DocnormConfig,
    input: &Path,
    content_type: Option<String>,
    base64: bool,
) -> Result<String> {
    let content_type = match content_type {
        Some(content_type) => content_type,
        None => content_type_from_path(input)?,
    };

    let mut payload = std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;

    let request = if base64 {
        let trimmed_len = payload.trim_ascii_end().len();
        payload.truncate(trimmed_len);
        DocumentRequest::base64(payload, content_type)
    } else {
        DocumentRequest::new(payload, content_type)
    };

    let pipeline = NormalizationPipeline::with_defaults(config)?;
    let result = pipeline.sanitize(&request)?;
    Ok(result.markdown)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, config } => {
            let mut config = DocnormConfig::load(config.as_deref()).context("failed to load configuration")?;
            if let Some(host) = host {
                config.service.host = host;
            }
            if let Some(port) = port {
                config.service.port = port;
            }
            config.validate()?;

            docnorm::service::serve(config).await?;
        }
        Commands::Sanitize {
            input,
            content_type,
            base64,
            config,
            format,
        } => {
            let config = DocnormConfig::load(config.as_deref()).context("failed to load configuration")?;
            config.validate()?;
            let markdown = sanitize_file(&config, &input, content_type, base64)?;

            match format {
                OutputFormat::Markdown => println!("{}", markdown),
                OutputFormat::Json => {
                    let output = serde_json::json!({ "sanitized_content": markdown });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
        }
        Commands::Formats { format } => {
            let pipeline = NormalizationPipeline::with_defaults(&DocnormConfig::default())?;
            let content_types = pipeline.registry().content_types();

            match format {
                OutputFormat::Markdown => {
                    for content_type in content_types {
                        println!("{}", content_type);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&content_types)?),
            }
        }
    }

    Ok(())
}
